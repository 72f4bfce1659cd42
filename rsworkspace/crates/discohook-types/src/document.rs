//! The document the builder service reconstructs messages from.
//!
//! Field order in these structs is the key order in the serialized JSON.

use serde::{Deserialize, Serialize};

use crate::embed::{normalize, EmbedDocument};
use crate::types::MessageSnapshot;

/// Message body: text content and restorable embeds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageData {
    /// Always serialized; `null` when the message has no text.
    pub content: Option<String>,
    /// Omitted entirely when no embed survives normalization.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<EmbedDocument>,
}

impl MessageData {
    pub fn from_snapshot(message: &MessageSnapshot) -> Self {
        Self {
            content: message.content.clone().filter(|c| !c.is_empty()),
            embeds: message.embeds.iter().filter_map(normalize).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RestoreMessage {
    pub data: MessageData,
    /// Jump link to the source message; lets the builder edit it in place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Destination the builder will send or edit through.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RestoreTarget {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RestoreDocument {
    pub messages: Vec<RestoreMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<RestoreTarget>>,
}

impl RestoreDocument {
    /// Assemble a document from messages in the order given.
    pub fn build(
        messages: &[MessageSnapshot],
        target_webhook_url: Option<&str>,
        include_references: bool,
    ) -> Self {
        let messages = messages
            .iter()
            .map(|message| RestoreMessage {
                data: MessageData::from_snapshot(message),
                reference: include_references.then(|| message.jump_url()),
            })
            .collect();

        Self {
            messages,
            targets: target_webhook_url.map(|url| {
                vec![RestoreTarget {
                    url: url.to_string(),
                }]
            }),
        }
    }
}
