//! Share-service client that shortens builder links.

use discohook_types::ShortLink;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ShortenError {
    #[error("share service returned HTTP {0}")]
    Status(u16),
    #[error("share service request failed: {0}")]
    Request(#[from] reqwest::Error),
}

#[derive(Serialize)]
struct CreateRequest<'a> {
    url: &'a str,
}

/// One POST per link; failures are reported, never retried.
#[derive(Debug, Clone)]
pub struct ShortLinkResolver {
    client: reqwest::Client,
    endpoint: String,
}

impl ShortLinkResolver {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub async fn shorten(&self, url: &str) -> Result<ShortLink, ShortenError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&CreateRequest { url })
            .send()
            .await?;

        let status = resp.status();
        if status.as_u16() >= 400 {
            warn!(status = status.as_u16(), "Share service rejected link");
            return Err(ShortenError::Status(status.as_u16()));
        }

        let link: ShortLink = resp.json().await?;
        debug!(expires_at = %link.expires_at, "Shortened builder link");
        Ok(link)
    }
}
