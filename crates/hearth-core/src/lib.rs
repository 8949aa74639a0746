//! Shared types, configuration, and errors for the Hearth client.
//!
//! Everything the other crates exchange lives here: the conversation
//! message model, property records as the backend serves them, structured
//! search filters, and the top-level error type.

pub mod config;
pub mod error;
pub mod filters;
pub mod types;

pub use config::HearthConfig;
pub use error::{HearthError, Result};
pub use filters::{Filters, TransactionType};
pub use types::{ImageVariant, Message, PageInfo, Price, Property};
