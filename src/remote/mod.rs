//! Remote quote source.
//!
//! The remote is a mock read/write endpoint: GET lists posts that are
//! turned into quotes, POST accepts a newly created local quote. There is
//! no authentication, pagination, or idempotency key.
//!
//! # Submodules
//!
//! - `client` - HTTP client for the remote endpoint

pub mod client;

use std::future::Future;

use crate::storage::models::Quote;

pub use client::RemoteClient;

/// Default remote endpoint.
pub const DEFAULT_REMOTE_URL: &str = "https://jsonplaceholder.typicode.com/posts";

/// Category given to every quote pulled from the remote.
pub const DEFAULT_REMOTE_CATEGORY: &str = "Server";

/// Something the sync engine can pull quotes from and push quotes to.
///
/// Implemented by [`RemoteClient`] for HTTP and by in-memory fakes in tests.
pub trait QuoteRemote: Send + Sync + 'static {
    /// Retrieves the full remote record set.
    fn fetch_quotes(&self) -> impl Future<Output = Result<Vec<Quote>, RemoteError>> + Send;

    /// Submits one locally created quote.
    fn push_quote(&self, quote: &Quote) -> impl Future<Output = Result<(), RemoteError>> + Send;
}

/// Custom error type for remote operations.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// HTTP request error.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Server returned an error response.
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// The response body was not what the endpoint promises.
    #[error("Unexpected response body: {0}")]
    DecodeError(String),
}
