//! HTTP client for the remote quote endpoint.
//!
//! Provides `RemoteClient`, which pulls posts from the endpoint and maps
//! each one to a quote, and posts newly created local quotes back.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{QuoteRemote, RemoteError, DEFAULT_REMOTE_CATEGORY};
use crate::config::Config;
use crate::storage::models::Quote;

/// Remote API client for sync operations.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    /// HTTP client instance.
    client: Client,
    /// Endpoint URL used for both GET and POST.
    url: String,
    /// Category assigned to pulled quotes.
    category: String,
}

impl RemoteClient {
    /// Creates a client for `url` with the default category and timeout.
    pub fn new(url: &str) -> Result<Self, RemoteError> {
        Self::with_timeout(url, Duration::from_secs(10))
    }

    pub fn with_timeout(url: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.trim_end_matches('/').to_string(),
            category: DEFAULT_REMOTE_CATEGORY.to_string(),
        })
    }

    /// Builds a client from the user's configuration.
    pub fn from_config(config: &Config) -> Result<Self, RemoteError> {
        Ok(Self::with_timeout(&config.remote_url, config.request_timeout())?
            .with_category(&config.remote_category))
    }

    /// Sets the category assigned to pulled quotes.
    pub fn with_category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Pulls every post from the endpoint and maps it to a quote.
    ///
    /// Posts with a blank title cannot become quotes and are skipped.
    pub async fn fetch(&self) -> Result<Vec<Quote>, RemoteError> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RemoteError::ServerError { status, message });
        }

        let body = response.bytes().await?;
        let posts: Vec<RemotePost> =
            serde_json::from_slice(&body).map_err(|e| RemoteError::DecodeError(e.to_string()))?;

        let total = posts.len();
        let quotes: Vec<Quote> = posts
            .into_iter()
            .filter_map(|post| post.into_quote(&self.category))
            .collect();

        if quotes.len() < total {
            tracing::debug!("Skipped {} remote posts without a title", total - quotes.len());
        }

        Ok(quotes)
    }

    /// Posts a newly created local quote.
    pub async fn push(&self, quote: &Quote) -> Result<PushResponse, RemoteError> {
        let payload = PushRequest::from(quote);

        let response = self.client.post(&self.url).json(&payload).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RemoteError::ServerError { status, message });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| RemoteError::DecodeError(e.to_string()))
    }
}

impl QuoteRemote for RemoteClient {
    async fn fetch_quotes(&self) -> Result<Vec<Quote>, RemoteError> {
        self.fetch().await
    }

    async fn push_quote(&self, quote: &Quote) -> Result<(), RemoteError> {
        let response = self.push(quote).await?;
        tracing::debug!("Remote accepted quote as post {:?}", response.id);
        Ok(())
    }
}

// ==================== API Types ====================

/// A post as served by the remote endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemotePost {
    #[serde(default)]
    pub id: Option<u64>,

    /// Becomes the quote text.
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub body: Option<String>,

    #[serde(default)]
    pub user_id: Option<u64>,
}

impl RemotePost {
    fn into_quote(self, category: &str) -> Option<Quote> {
        Quote::new(&self.title, category).ok()
    }
}

/// Request payload for pushing a quote.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushRequest {
    /// The quote's category.
    pub title: String,

    /// The quote's text.
    pub body: String,

    pub user_id: u64,
}

impl From<&Quote> for PushRequest {
    fn from(quote: &Quote) -> Self {
        Self {
            title: quote.category.clone(),
            body: quote.text.clone(),
            user_id: 1,
        }
    }
}

/// Response from pushing a quote. The mock endpoint echoes the post with an id.
#[derive(Debug, Clone, Deserialize)]
pub struct PushResponse {
    #[serde(default)]
    pub id: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::DEFAULT_REMOTE_URL;

    #[test]
    fn test_remote_client_trims_trailing_slash() {
        let client = RemoteClient::new("https://custom.example.com/posts/").unwrap();
        assert_eq!(client.url(), "https://custom.example.com/posts");
    }

    #[test]
    fn test_remote_client_default_url() {
        let client = RemoteClient::from_config(&Config::default()).unwrap();
        assert_eq!(client.url(), DEFAULT_REMOTE_URL);
        assert_eq!(client.category, DEFAULT_REMOTE_CATEGORY);
    }

    #[test]
    fn test_from_config_uses_category() {
        let mut config = Config::default();
        config.remote_category = "Remote".to_string();
        let client = RemoteClient::from_config(&config).unwrap();
        assert_eq!(client.category, "Remote");
    }

    #[test]
    fn test_remote_post_deserialize() {
        let json = r#"{
            "userId": 1,
            "id": 3,
            "title": "ea molestias quasi",
            "body": "et iusto sed quo iure"
        }"#;

        let post: RemotePost = serde_json::from_str(json).unwrap();
        assert_eq!(post.id, Some(3));
        assert_eq!(post.user_id, Some(1));

        let quote = post.into_quote("Server").unwrap();
        assert_eq!(quote.text, "ea molestias quasi");
        assert_eq!(quote.category, "Server");
    }

    #[test]
    fn test_remote_post_without_title_is_skipped() {
        let post: RemotePost = serde_json::from_str(r#"{"id": 9, "body": "x"}"#).unwrap();
        assert!(post.into_quote("Server").is_none());
    }

    #[test]
    fn test_push_request_maps_fields() {
        let quote = Quote::new("Be yourself.", "Wisdom").unwrap();
        let json = serde_json::to_value(PushRequest::from(&quote)).unwrap();

        assert_eq!(json["title"], "Wisdom");
        assert_eq!(json["body"], "Be yourself.");
        assert_eq!(json["userId"], 1);
    }
}
