use thiserror::Error;

/// Top-level error type for the Hearth client.
///
/// Subsystem crates either use this directly or define their own error
/// type with a `From<HearthError>` impl so the `?` operator works across
/// crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HearthError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid conversational role: {0}")]
    InvalidRole(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for HearthError {
    fn from(err: toml::de::Error) -> Self {
        HearthError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for HearthError {
    fn from(err: toml::ser::Error) -> Self {
        HearthError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for HearthError {
    fn from(err: serde_json::Error) -> Self {
        HearthError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Hearth operations.
pub type Result<T> = std::result::Result<T, HearthError>;
