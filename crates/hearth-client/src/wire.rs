//! Wire shapes for the backend REST surface.

use serde::{Deserialize, Serialize};
use tracing::warn;

use hearth_core::error::HearthError;
use hearth_core::filters::{Filters, TransactionType};
use hearth_core::types::Property;

/// Conversational role of one history turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::str::FromStr for Role {
    type Err = HearthError;

    /// Any role outside the user/assistant contract is a bug in state
    /// construction, so this fails fast rather than coercing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(HearthError::InvalidRole(other.to_string())),
        }
    }
}

/// One `{role, content}` pair of outbound conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<ChatTurn>,
    pub session_id: String,
}

/// Reply of `POST /chat`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub results: Vec<Property>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub parsed_filters: Option<ParsedFilters>,
}

/// Criteria the backend inferred from natural language.
///
/// Numeric fields arrive as JSON numbers that may be integral or not, so
/// they deserialize as `f64` and get rounded at the conversion boundary.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ParsedFilters {
    pub property_type: Option<String>,
    pub bedrooms: Option<f64>,
    pub bathrooms: Option<f64>,
    pub location: Option<String>,
    pub transaction_type: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
}

impl ParsedFilters {
    /// Convert to client-side filters.
    ///
    /// An unrecognized transaction type is dropped with a warning instead
    /// of poisoning the merge.
    pub fn to_filters(&self) -> Filters {
        let transaction_type = match self.transaction_type.as_deref() {
            None => None,
            Some(raw) => match raw.parse::<TransactionType>() {
                Ok(t) => Some(t),
                Err(_) => {
                    warn!("Ignoring unrecognized transaction type from backend: {}", raw);
                    None
                }
            },
        };
        Filters {
            price_min: self.price_min.map(|v| v.round() as u64),
            price_max: self.price_max.map(|v| v.round() as u64),
            bedrooms: self.bedrooms.map(|v| v.round() as u32),
            bathrooms: self.bathrooms.map(|v| v.round() as u32),
            location: self.location.clone().filter(|s| !s.is_empty()),
            property_type: self.property_type.clone().filter(|s| !s.is_empty()),
            transaction_type,
            search: None,
        }
    }
}

/// Pagination block of `GET /properties`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Reply of `GET /properties`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PropertiesPage {
    pub properties: Vec<Property>,
    pub pagination: Pagination,
}
