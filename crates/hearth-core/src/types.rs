//! Data model shared across the Hearth crates.
//!
//! `Message` is the conversation turn as kept in the client log (and as
//! persisted). `Property` and `ImageVariant` are read-only projections of
//! backend records; the wire uses camelCase keys, so serde renames apply
//! throughout.

use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};

/// Fixed welcome text shown at the top of every conversation.
pub const WELCOME_TEXT: &str = "Welcome to Property Search Assistant! I'm your intelligent \
real estate assistant. Ask me anything about properties - I can help you find homes by \
location, price, bedrooms, or any specific criteria you have in mind.";

/// Identifier of the welcome message. The welcome turn is re-inserted
/// whenever the log is empty or cleared, and never counts as history.
pub const WELCOME_ID: &str = "welcome";

/// One turn in the conversation log.
///
/// Messages are never mutated after creation. `id` is derived from the
/// wall clock in milliseconds, so ordering is best-effort monotonic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub content: String,
    pub is_user: bool,
    /// Clock-formatted time of creation (`HH:MM`), for display only.
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<Property>>,
}

impl Message {
    /// The fixed welcome message. Timestamp reflects creation time.
    pub fn welcome() -> Self {
        Self {
            id: WELCOME_ID.to_string(),
            content: WELCOME_TEXT.to_string(),
            is_user: false,
            timestamp: clock_time(),
            properties: None,
        }
    }

    /// A user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Utc::now().timestamp_millis().to_string(),
            content: content.into(),
            is_user: true,
            timestamp: clock_time(),
            properties: None,
        }
    }

    /// An assistant turn, optionally carrying property results.
    pub fn assistant(content: impl Into<String>, properties: Option<Vec<Property>>) -> Self {
        Self {
            id: (Utc::now().timestamp_millis() + 1).to_string(),
            content: content.into(),
            is_user: false,
            timestamp: clock_time(),
            properties,
        }
    }

    /// Whether this is the welcome message.
    pub fn is_welcome(&self) -> bool {
        self.id == WELCOME_ID
    }
}

fn clock_time() -> String {
    Local::now().format("%H:%M").to_string()
}

/// A price as the backend serves it: numeric or free-form text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Price::Number(n) => write!(f, "${:.0}", n),
            Price::Text(s) => write!(f, "{}", s),
        }
    }
}

/// URL variants of one property image at fixed resolutions.
///
/// Any individual URL may be absent or dead; consumers fall back through
/// medium, then small, then a placeholder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageVariant {
    pub small_url: Option<String>,
    pub medium_url: Option<String>,
    pub large_url: Option<String>,
    pub x_large_url: Option<String>,
    pub xx_large_url: Option<String>,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

impl ImageVariant {
    /// Preferred display URL: medium, falling back to small.
    pub fn display_url(&self) -> Option<&str> {
        self.medium_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .or_else(|| self.small_url.as_deref().filter(|u| !u.is_empty()))
    }
}

/// Read-only projection of a backend property record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Property {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub sales_price: Option<Price>,
    pub full_address: Option<String>,
    pub location: Option<String>,
    pub bedroom_count: Option<u32>,
    pub bath_count: Option<u32>,
    pub square_feet: Option<u32>,
    pub living_space_size: Option<String>,
    pub image: Option<Vec<ImageVariant>>,
    pub media: Option<Vec<ImageVariant>>,
    pub slug: String,
}

impl Property {
    /// Image list: `media` wins over the legacy `image` field.
    pub fn images(&self) -> &[ImageVariant] {
        self.media
            .as_deref()
            .filter(|m| !m.is_empty())
            .or(self.image.as_deref())
            .unwrap_or(&[])
    }

    /// First displayable image URL, if any.
    pub fn display_image(&self) -> Option<&str> {
        self.images().iter().find_map(|v| v.display_url())
    }

    /// Address line: full address, falling back to the coarse location.
    pub fn address(&self) -> Option<&str> {
        self.full_address.as_deref().or(self.location.as_deref())
    }
}

/// Pagination state for the all-properties listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl PageInfo {
    /// First page with the given page size.
    pub fn first(limit: u32) -> Self {
        Self {
            page: 1,
            limit,
            total: 0,
            total_pages: 0,
        }
    }
}

impl Default for PageInfo {
    fn default() -> Self {
        Self::first(12)
    }
}
