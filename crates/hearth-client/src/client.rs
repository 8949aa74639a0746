use std::time::Duration;

use reqwest::StatusCode;
use tracing::debug;

use hearth_core::config::HearthConfig;
use hearth_core::error::{HearthError, Result};
use hearth_core::filters::Filters;
use hearth_core::types::Property;

use crate::wire::{ChatReply, ChatRequest, PropertiesPage};

/// Client for the property search backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client against `base_url` with the given request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HearthError::Http(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from the resolved application configuration.
    pub fn from_config(config: &HearthConfig) -> Result<Self> {
        Self::new(
            config.api_base_url(),
            Duration::from_secs(config.api.timeout_secs),
        )
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /chat` — one conversational turn.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        let url = format!("{}/chat", self.base_url);
        debug!("POST {} ({} history turns)", url, request.history.len());
        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| HearthError::Http(e.to_string()))?;
        Self::expect_success(response).await?.json().await.map_err(into_http_err)
    }

    /// `POST /clear-session` — ask the backend to release server-side
    /// conversational state. The reply body is ignored.
    pub async fn clear_session(&self, session_id: &str) -> Result<()> {
        let url = format!("{}/clear-session", self.base_url);
        debug!("POST {}", url);
        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "session_id": session_id }))
            .send()
            .await
            .map_err(|e| HearthError::Http(e.to_string()))?;
        Self::expect_success(response).await?;
        Ok(())
    }

    /// `GET /properties` — paginated listing with optional filters.
    pub async fn list_properties(
        &self,
        page: u32,
        limit: u32,
        filters: &Filters,
    ) -> Result<PropertiesPage> {
        let url = format!("{}/properties", self.base_url);
        let query = listing_query(page, limit, filters);
        debug!("GET {} with {} query params", url, query.len());
        let response = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| HearthError::Http(e.to_string()))?;
        Self::expect_success(response).await?.json().await.map_err(into_http_err)
    }

    /// `GET /properties/{id}` — detail record. A 404 is a recognized,
    /// non-fatal outcome and maps to `None`.
    pub async fn get_property(&self, id: &str) -> Result<Option<Property>> {
        let url = format!("{}/properties/{}", self.base_url, id);
        debug!("GET {}", url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| HearthError::Http(e.to_string()))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let property = Self::expect_success(response)
            .await?
            .json()
            .await
            .map_err(into_http_err)?;
        Ok(Some(property))
    }

    async fn expect_success(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(HearthError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

fn into_http_err(e: reqwest::Error) -> HearthError {
    HearthError::Http(e.to_string())
}

/// Build the `GET /properties` query parameters.
///
/// `page` and `limit` are always present; filter fields are appended only
/// when defined and non-empty, under their wire names.
pub fn listing_query(page: u32, limit: u32, filters: &Filters) -> Vec<(&'static str, String)> {
    let mut query = vec![("page", page.to_string()), ("limit", limit.to_string())];
    if let Some(search) = filters.search.as_deref().filter(|s| !s.is_empty()) {
        query.push(("search", search.to_string()));
    }
    if let Some(price_min) = filters.price_min {
        query.push(("price_min", price_min.to_string()));
    }
    if let Some(price_max) = filters.price_max {
        query.push(("price_max", price_max.to_string()));
    }
    if let Some(bedrooms) = filters.bedrooms {
        query.push(("bedrooms", bedrooms.to_string()));
    }
    if let Some(bathrooms) = filters.bathrooms {
        query.push(("bathrooms", bathrooms.to_string()));
    }
    if let Some(location) = filters.location.as_deref().filter(|s| !s.is_empty()) {
        query.push(("location", location.to_string()));
    }
    if let Some(property_type) = filters.property_type.as_deref().filter(|s| !s.is_empty()) {
        query.push(("property_type", property_type.to_string()));
    }
    if let Some(transaction_type) = filters.transaction_type {
        query.push(("transaction_type", transaction_type.to_string()));
    }
    query
}
