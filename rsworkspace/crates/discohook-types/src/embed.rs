//! Rich embeds: the shape received from Discord and the shape sent onward.
//!
//! [`SourceEmbed`] mirrors Discord's embed object, including the fields the
//! platform fills in from its media cache (`proxy_url`, `width`, `height`,
//! `proxy_icon_url`) and the `type` discriminator. [`EmbedDocument`] is the
//! externally valid subset. [`normalize`] converts one into the other by
//! construction, so cache-only fields have nowhere to go.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The only embed kind that can be restored.
pub const RICH_EMBED_KIND: &str = "rich";

/// Embed field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

/// Image or thumbnail as received
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SourceMedia {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Embed author as received
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SourceAuthor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_icon_url: Option<String>,
}

/// Embed footer as received
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SourceFooter {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_icon_url: Option<String>,
}

/// Embed as attached to a platform message
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SourceEmbed {
    /// Embed kind; Discord treats a missing kind as `rich`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<SourceAuthor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<SourceFooter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<SourceMedia>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<SourceMedia>,
    /// ISO 8601 timestamp string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl SourceEmbed {
    pub fn is_rich(&self) -> bool {
        self.kind.as_deref().unwrap_or(RICH_EMBED_KIND) == RICH_EMBED_KIND
    }
}

/// Embed author
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedAuthor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// Embed footer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedFooter {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// Embed image or thumbnail (just a URL)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedMedia {
    pub url: String,
}

/// Embed in the form external consumers accept.
///
/// Also used for every embed the bot itself sends.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EmbedDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<EmbedMedia>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<EmbedMedia>,
    /// ISO 8601 timestamp string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl EmbedDocument {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail = Some(EmbedMedia { url: url.into() });
        self
    }

    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(EmbedMedia { url: url.into() });
        self
    }

    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(EmbedFooter {
            text: text.into(),
            icon_url: None,
        });
        self
    }

    pub fn timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.timestamp = Some(at.to_rfc3339());
        self
    }
}

/// Strip a received embed down to its externally valid fields.
///
/// Returns `None` for anything but rich embeds (link previews, videos, ...),
/// which cannot be restored.
pub fn normalize(embed: &SourceEmbed) -> Option<EmbedDocument> {
    if !embed.is_rich() {
        return None;
    }

    Some(EmbedDocument {
        title: embed.title.clone(),
        description: embed.description.clone(),
        url: embed.url.clone(),
        color: embed.color,
        fields: embed.fields.clone(),
        author: embed.author.as_ref().map(|a| EmbedAuthor {
            name: a.name.clone(),
            url: a.url.clone(),
            icon_url: a.icon_url.clone(),
        }),
        footer: embed.footer.as_ref().map(|f| EmbedFooter {
            text: f.text.clone(),
            icon_url: f.icon_url.clone(),
        }),
        image: embed.image.as_ref().map(|m| EmbedMedia { url: m.url.clone() }),
        thumbnail: embed
            .thumbnail
            .as_ref()
            .map(|m| EmbedMedia { url: m.url.clone() }),
        timestamp: embed.timestamp.clone(),
    })
}
