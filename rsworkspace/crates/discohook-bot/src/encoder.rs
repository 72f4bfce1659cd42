//! Builder link encoding
//!
//! Turns message snapshots into a `https://<builder-host>/?data=<token>` link,
//! where the token is the compact JSON [`RestoreDocument`] in unpadded
//! base64url.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use discohook_types::{CommandError, MessageSnapshot, RestoreDocument};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed to serialize builder document: {0}")]
pub struct EncodeError(#[from] serde_json::Error);

impl From<EncodeError> for CommandError {
    fn from(err: EncodeError) -> Self {
        CommandError::Internal(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct MessageEncoder {
    builder_host: String,
}

impl MessageEncoder {
    pub fn new(builder_host: impl Into<String>) -> Self {
        Self {
            builder_host: builder_host.into(),
        }
    }

    pub fn encode(
        &self,
        messages: &[MessageSnapshot],
        target_webhook_url: Option<&str>,
        include_references: bool,
    ) -> Result<String, EncodeError> {
        let document = RestoreDocument::build(messages, target_webhook_url, include_references);
        self.link_for(&document)
    }

    fn link_for<T: Serialize>(&self, document: &T) -> Result<String, EncodeError> {
        let json = serde_json::to_vec(document)?;
        let token = URL_SAFE_NO_PAD.encode(json);
        Ok(format!("https://{}/?data={}", self.builder_host, token))
    }
}
