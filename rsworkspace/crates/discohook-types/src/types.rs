//! Core Discord domain types

use chrono::{DateTime, TimeZone, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::embed::SourceEmbed;
use crate::errors::InputError;

/// Milliseconds between the Unix epoch and the Discord epoch (2015-01-01).
pub const DISCORD_EPOCH_MS: i64 = 1_420_070_400_000;

/// Longest webhook name Discord accepts, in characters.
pub const MAX_WEBHOOK_NAME_LEN: usize = 80;

/// Creation time encoded in a Discord snowflake.
pub fn snowflake_timestamp(id: u64) -> DateTime<Utc> {
    let ms = (id >> 22) as i64 + DISCORD_EPOCH_MS;
    Utc.timestamp_millis_opt(ms).single().unwrap_or_default()
}

/// Reject webhook names over [`MAX_WEBHOOK_NAME_LEN`] characters.
pub fn validate_webhook_name(name: &str) -> Result<(), InputError> {
    let len = name.chars().count();
    if len > MAX_WEBHOOK_NAME_LEN {
        return Err(InputError::NameTooLong { len });
    }
    Ok(())
}

/// Channel type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChannelType {
    GuildText,
    Dm,
    GuildVoice,
    GroupDm,
    GuildCategory,
    GuildNews,
    GuildStageVoice,
    GuildForum,
    Unknown,
}

impl ChannelType {
    /// Whether Discord allows webhooks to be created in this kind of channel.
    pub fn supports_webhooks(self) -> bool {
        matches!(
            self,
            Self::GuildText
                | Self::GuildNews
                | Self::GuildVoice
                | Self::GuildStageVoice
                | Self::GuildForum
        )
    }
}

/// Discord channel, as far as command handling cares
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelInfo {
    pub id: u64,
    pub kind: ChannelType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Effective permissions of one user in one channel, after overwrites.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChannelPermissions {
    pub view_channel: bool,
    pub read_message_history: bool,
    pub manage_webhooks: bool,
}

impl ChannelPermissions {
    /// All permissions granted.
    pub fn all() -> Self {
        Self {
            view_channel: true,
            read_message_history: true,
            manage_webhooks: true,
        }
    }

    pub fn can_manage_webhooks(&self) -> bool {
        self.view_channel && self.manage_webhooks
    }

    pub fn can_read_history(&self) -> bool {
        self.view_channel && self.read_message_history
    }
}

/// Message attachment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attachment {
    pub id: u64,
    pub filename: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub size: u64,
}

/// Read-only view of a platform message, taken when the command runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageSnapshot {
    pub id: u64,
    pub channel_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<u64>,
    /// `None` when the message has no text content.
    pub content: Option<String>,
    #[serde(default)]
    pub embeds: Vec<SourceEmbed>,
    /// Set when the message was sent through a webhook.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_id: Option<u64>,
}

impl MessageSnapshot {
    /// Canonical jump link to this message.
    pub fn jump_url(&self) -> String {
        let guild = self
            .guild_id
            .map_or_else(|| "@me".to_string(), |id| id.to_string());
        format!(
            "https://discord.com/channels/{}/{}/{}",
            guild, self.channel_id, self.id
        )
    }
}

/// Webhook type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WebhookKind {
    Incoming,
    ChannelFollower,
    Application,
    Unknown,
}

/// Webhook as reported by the platform.
///
/// `token` is only present for webhooks created by this bot's application;
/// everything else is read-only to us.
#[derive(Debug, Clone)]
pub struct WebhookRecord {
    pub id: u64,
    pub kind: WebhookKind,
    pub name: String,
    pub guild_id: Option<u64>,
    pub channel_id: u64,
    /// Avatar image hash
    pub avatar: Option<String>,
    pub token: Option<SecretString>,
}

impl WebhookRecord {
    pub fn created_at(&self) -> DateTime<Utc> {
        snowflake_timestamp(self.id)
    }

    /// True when we hold the secret token and may mutate the webhook.
    pub fn is_owned(&self) -> bool {
        self.token.is_some()
    }

    /// Full execute URL. Contains the secret token.
    pub fn url(&self) -> Option<String> {
        self.token.as_ref().map(|token| {
            format!(
                "https://discord.com/api/webhooks/{}/{}",
                self.id,
                token.expose_secret()
            )
        })
    }

    pub fn avatar_url(&self) -> String {
        match &self.avatar {
            Some(hash) => {
                let ext = if hash.starts_with("a_") { "gif" } else { "png" };
                format!(
                    "https://cdn.discordapp.com/avatars/{}/{}.{}",
                    self.id, hash, ext
                )
            }
            None => "https://cdn.discordapp.com/embed/avatars/0.png".to_string(),
        }
    }

    pub fn channel_mention(&self) -> String {
        format!("<#{}>", self.channel_id)
    }
}

/// CDN image extension: animated hashes start with `a_`.
fn image_ext(hash: &str, static_only: bool) -> &'static str {
    if !static_only && hash.starts_with("a_") {
        "gif"
    } else {
        "png"
    }
}

/// A user, for showing their avatar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: u64,
    pub name: String,
    /// `None` for accounts on the new username system.
    pub discriminator: Option<u16>,
    /// Avatar image hash
    pub avatar: Option<String>,
}

impl UserProfile {
    /// `name#1234`, or just the name once discriminators are gone.
    pub fn tag(&self) -> String {
        match self.discriminator {
            Some(d) => format!("{}#{:04}", self.name, d),
            None => self.name.clone(),
        }
    }

    /// Full-size avatar, or the default avatar when none is set.
    pub fn avatar_url(&self, static_only: bool) -> String {
        match &self.avatar {
            Some(hash) => format!(
                "https://cdn.discordapp.com/avatars/{}/{}.{}?size=4096",
                self.id,
                hash,
                image_ext(hash, static_only)
            ),
            None => {
                let index = match self.discriminator {
                    Some(d) => u64::from(d) % 5,
                    None => (self.id >> 22) % 6,
                };
                format!("https://cdn.discordapp.com/embed/avatars/{}.png", index)
            }
        }
    }
}

/// A guild, for showing its icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildProfile {
    pub id: u64,
    pub name: String,
    /// Icon image hash
    pub icon: Option<String>,
}

impl GuildProfile {
    pub fn icon_url(&self, static_only: bool) -> Option<String> {
        self.icon.as_ref().map(|hash| {
            format!(
                "https://cdn.discordapp.com/icons/{}/{}.{}?size=4096",
                self.id,
                hash,
                image_ext(hash, static_only)
            )
        })
    }
}

/// Raw avatar image uploaded with a command.
#[derive(Clone, PartialEq)]
pub struct Avatar {
    pub filename: String,
    pub data: Vec<u8>,
}

impl std::fmt::Debug for Avatar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Avatar")
            .field("filename", &self.filename)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Requested change to an existing webhook. At least one field is set.
#[derive(Debug, Clone, PartialEq)]
pub struct EditRequest {
    name: Option<String>,
    avatar: Option<Avatar>,
}

impl EditRequest {
    pub fn new(name: Option<String>, avatar: Option<Avatar>) -> Result<Self, InputError> {
        if name.is_none() && avatar.is_none() {
            return Err(InputError::NoEditFields);
        }
        if let Some(name) = &name {
            validate_webhook_name(name)?;
        }
        Ok(Self { name, avatar })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn avatar(&self) -> Option<&Avatar> {
        self.avatar.as_ref()
    }
}

/// Shortened builder link returned by the share service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShortLink {
    pub url: String,
    #[serde(rename = "expires")]
    pub expires_at: DateTime<Utc>,
}
