//! HTTP client for the property search backend.
//!
//! The backend is an external collaborator consumed over four endpoints:
//! `POST /chat`, `POST /clear-session`, `GET /properties`, and
//! `GET /properties/{id}`. This crate owns the wire shapes and the
//! request plumbing; conversational state lives in `hearth-chat`.

pub mod client;
pub mod wire;

pub use client::{listing_query, ApiClient};
pub use wire::{ChatReply, ChatRequest, ChatTurn, Pagination, ParsedFilters, PropertiesPage, Role};
