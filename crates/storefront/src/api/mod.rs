//! Bookstore REST API client.
//!
//! # Architecture
//!
//! - Plain JSON over `reqwest`; every call is `api/v1/<endpoint>` under the
//!   configured base URL
//! - The API is the source of truth: no local persistence, direct calls
//! - Catalog reads are cached in memory via `moka`; any catalog mutation
//!   clears the cache
//! - No retries and no request deduplication
//!
//! # Example
//!
//! ```rust,ignore
//! use bookshelf_storefront::api::{ApiAuth, BookstoreClient};
//!
//! let client = BookstoreClient::new(&config);
//! let books = client.all_books().await?;
//!
//! let auth = ApiAuth::from_session(&session).expect("signed in");
//! client.add_to_cart(&auth, &books[0].id).await?;
//! ```

mod cache;
mod client;
mod types;

pub use client::BookstoreClient;
pub use types::{ApiAuth, SignedIn};

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the bookstore API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response: connection refused, DNS failure or timeout.
    #[error("no response from bookstore API: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("bookstore API rejected request ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Rejected {
        status: StatusCode,
        message: Option<String>,
    },

    /// Any other transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not the JSON we expected.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A success envelope without a `data` field.
    #[error("response from {0} carried no data")]
    MissingData(&'static str),

    /// The endpoint URL could not be built from the base URL.
    #[error("invalid endpoint URL for {0}")]
    InvalidUrl(&'static str),
}

impl ApiError {
    /// Classify a transport error: connect failures and timeouts mean the
    /// server never answered.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::Unreachable(err)
        } else {
            Self::Http(err)
        }
    }

    /// Server-supplied message, when the API rejected the request.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Whether the API answered with `status`.
    #[must_use]
    pub fn is_status(&self, status: StatusCode) -> bool {
        matches!(self, Self::Rejected { status: s, .. } if *s == status)
    }
}
