use crate::error::FetchError;
use crate::model::PayloadSource;
use crate::source::client::Client;
use async_trait::async_trait;

/// Fetches the price payload over HTTP, turning every failure into `None`.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PayloadSource for HttpFetcher {
    async fn fetch(&self) -> Option<Vec<u8>> {
        tracing::info!("Sending price request to server.");

        match self.client.get().await {
            Ok(body) => {
                tracing::info!(bytes = body.len(), "Received pricing data from server.");
                Some(body)
            }
            Err(FetchError::Status { status }) => {
                tracing::error!("Unexpected status code: {}", status);
                None
            }
            Err(FetchError::Transport(e)) => {
                tracing::warn!(url = %self.client.url(), "Price request failed: {}", e);
                None
            }
        }
    }
}
