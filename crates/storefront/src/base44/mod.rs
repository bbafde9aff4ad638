//! Base44 backend client.
//!
//! # Architecture
//!
//! - The backend owns every record: no local storage, direct API calls
//! - [`Base44Client::request`] is the single fetch wrapper; it attaches the
//!   API key and returns whatever JSON the backend sent, even on non-2xx
//! - Typed accessors decode that JSON and report records that do not decode
//!
//! # APIs
//!
//! ## Entities
//! - `ClothingItem`: list, filter, create, update, schema
//! - `Outfit`: list, filter, create, update
//!
//! ## Auth
//! - Current user fetch and update, logout
//!
//! ## Integrations
//! - File upload and AI attribute extraction
//!
//! # Example
//!
//! ```rust,ignore
//! use kiova_storefront::base44::Base44Client;
//!
//! let client = Base44Client::new(&config.base44);
//!
//! let user = client.me().await?;
//! let wardrobe = client.clothing_items().owned_by(&user.email).await?;
//! ```

mod auth;
mod client;
mod entities;
mod integrations;

pub use client::{Base44Client, RequestOptions};
pub use entities::{Entity, EntityClient};
pub use integrations::{EXTRACTION_SUCCESS, ExtractionResult};

use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum Base44Error {
    /// HTTP request failed before a response body was read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The body was JSON but not the expected shape.
    #[error("Unexpected {what} response: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The endpoint path could not be resolved against the base URL.
    #[error("Invalid endpoint '{path}': {source}")]
    Endpoint {
        path: String,
        #[source]
        source: url::ParseError,
    },

    /// A caller-supplied header was not a valid HTTP header.
    #[error("Invalid header '{0}'")]
    Header(String),
}
