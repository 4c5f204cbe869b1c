use crate::error::{FetchError, Result};
use reqwest::Client as HttpClient;

/// Thin HTTP client for the price endpoint.
pub struct Client {
    http_client: HttpClient,
    url: String,
}

impl Client {
    pub fn new(url: impl Into<String>) -> Self {
        let http_client = HttpClient::new();
        Self {
            http_client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issues one GET and returns the body bytes on a success status.
    pub async fn get(&self) -> Result<Vec<u8>, FetchError> {
        let response = self
            .http_client
            .get(&self.url)
            .header("user-agent", "reqwest")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::status(status));
        }

        let body = response.bytes().await?;
        Ok(body.to_vec())
    }
}
