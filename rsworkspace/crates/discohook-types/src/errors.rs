//! Error taxonomy for bot commands.
//!
//! [`PlatformError`] describes a failed Discord API call. [`CommandError`]
//! is what a command reports to the user; every variant renders to an embed
//! title and description, and none of them is fatal to the process.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::MAX_WEBHOOK_NAME_LEN;

/// High-level category of a command failure.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Rate limit or cooldown hit: must wait before retrying.
    RateLimit,
    /// Target resource (channel, message, webhook …) not found.
    NotFound,
    /// Insufficient permissions for the requested action.
    PermissionDenied,
    /// Webhook belongs to another application and cannot be touched.
    Ownership,
    /// Malformed or semantically invalid input.
    InvalidInput,
    /// A service outside Discord's API, or DM delivery, refused the request.
    ExternalService,
    /// Network or I/O error (transient).
    Network,
    /// Unknown or uncategorised error.
    Unknown,
}

/// Discord-specific error code (subset relevant to webhook and message work).
///
/// Maps the actionable Discord JSON error codes
/// (<https://discord.com/developers/docs/topics/opcodes-and-status-codes#json>)
/// to named variants; everything else falls through to [`DiscordErrorCode::Unknown`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiscordErrorCode {
    // ── Not found ─────────────────────────────────────────────────────────────
    /// 10003: Unknown channel.
    UnknownChannel,
    /// 10004: Unknown guild.
    UnknownGuild,
    /// 10007: Unknown member.
    UnknownMember,
    /// 10008: Unknown message (likely deleted).
    UnknownMessage,
    /// 10013: Unknown user.
    UnknownUser,
    /// 10015: Unknown webhook.
    UnknownWebhook,

    // ── Permission errors ──────────────────────────────────────────────────────
    /// 50001: Missing access.
    MissingAccess,
    /// 50007: Cannot send messages to this user (DMs closed or bot blocked).
    CannotSendToUser,
    /// 50013: Missing permissions.
    MissingPermissions,

    // ── Rate limiting ──────────────────────────────────────────────────────────
    /// HTTP 429: Global or per-route rate limit.
    RateLimited,

    // ── Input / resource limits ───────────────────────────────────────────────
    /// 30007: Maximum number of webhooks reached.
    MaxWebhooksReached,
    /// 50035: Invalid form body (validation failed).
    InvalidFormBody,
    /// 40005 / HTTP 413: Request entity too large.
    RequestEntityTooLarge,

    // ── Auth ───────────────────────────────────────────────────────────────────
    /// 50027: Invalid webhook token.
    InvalidWebhookToken,
    /// 40001 / 50014: Invalid or expired token.
    InvalidToken,

    // ── Server / client ───────────────────────────────────────────────────────
    /// 130000: API resource overloaded.
    ApiOverloaded,
    /// Network or I/O error on the client side.
    NetworkError,

    // ── Catch-all ─────────────────────────────────────────────────────────────
    /// Any Discord JSON error code not listed above.
    Unknown,
}

impl DiscordErrorCode {
    /// Derive the code from a raw Discord JSON error code integer.
    pub fn from_raw(code: u32) -> Self {
        match code {
            10003 => Self::UnknownChannel,
            10004 => Self::UnknownGuild,
            10007 => Self::UnknownMember,
            10008 => Self::UnknownMessage,
            10013 => Self::UnknownUser,
            10015 => Self::UnknownWebhook,
            30007 => Self::MaxWebhooksReached,
            40001 | 50014 => Self::InvalidToken,
            40005 => Self::RequestEntityTooLarge,
            50001 => Self::MissingAccess,
            50007 => Self::CannotSendToUser,
            50013 => Self::MissingPermissions,
            50027 => Self::InvalidWebhookToken,
            50035 => Self::InvalidFormBody,
            130000 => Self::ApiOverloaded,
            _ => Self::Unknown,
        }
    }

    /// The high-level category for this code.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownChannel
            | Self::UnknownGuild
            | Self::UnknownMember
            | Self::UnknownMessage
            | Self::UnknownUser
            | Self::UnknownWebhook => ErrorCategory::NotFound,

            Self::MissingAccess | Self::MissingPermissions => ErrorCategory::PermissionDenied,

            Self::CannotSendToUser => ErrorCategory::ExternalService,

            Self::RateLimited => ErrorCategory::RateLimit,

            Self::MaxWebhooksReached | Self::InvalidFormBody | Self::RequestEntityTooLarge => {
                ErrorCategory::InvalidInput
            }

            Self::InvalidWebhookToken => ErrorCategory::Ownership,

            Self::NetworkError => ErrorCategory::Network,

            Self::InvalidToken | Self::ApiOverloaded | Self::Unknown => ErrorCategory::Unknown,
        }
    }
}

/// A failed call to the chat platform.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Discord API error (HTTP {http_status}, {code:?}): {message}")]
pub struct PlatformError {
    pub code: DiscordErrorCode,
    /// HTTP status code (0 if the request never got a response).
    pub http_status: u16,
    pub message: String,
}

impl PlatformError {
    pub fn new(code: DiscordErrorCode, http_status: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            http_status,
            message: message.into(),
        }
    }

    /// Build from a raw Discord JSON error code and HTTP status.
    pub fn from_response(raw_code: u32, http_status: u16, message: impl Into<String>) -> Self {
        let code = if http_status == 429 {
            DiscordErrorCode::RateLimited
        } else {
            DiscordErrorCode::from_raw(raw_code)
        };
        Self::new(code, http_status, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(DiscordErrorCode::NetworkError, 0, message)
    }

    /// Category from the JSON code, falling back on the HTTP status.
    pub fn category(&self) -> ErrorCategory {
        match (self.code.category(), self.http_status) {
            (ErrorCategory::Unknown, 403) => ErrorCategory::PermissionDenied,
            (ErrorCategory::Unknown, 404) => ErrorCategory::NotFound,
            (category, _) => category,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.category() == ErrorCategory::NotFound
    }

    pub fn is_forbidden(&self) -> bool {
        self.category() == ErrorCategory::PermissionDenied
    }
}

/// Who lacks a permission.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    User,
    Bot,
}

/// Webhook operation refused on a webhook this bot does not own.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WebhookAction {
    RevealUrl,
    Edit,
    Delete,
}

impl WebhookAction {
    fn verb(self) -> &'static str {
        match self {
            Self::RevealUrl => "get its full URL",
            Self::Edit => "edit it",
            Self::Delete => "delete it",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Self::RevealUrl => "Unable to get URL",
            Self::Edit => "Unable to edit",
            Self::Delete => "Unable to delete",
        }
    }
}

fn messages_are(count: &usize) -> &'static str {
    if *count == 1 {
        "message is"
    } else {
        "messages are"
    }
}

/// Bad command input. Reported before any network call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Webhook names can only be up to {max} characters long (got {len})", max = MAX_WEBHOOK_NAME_LEN)]
    NameTooLong { len: usize },

    #[error("No new name or avatar was given")]
    NoEditFields,

    #[error("The messages must not be sent by different webhooks.")]
    MixedWebhooks,

    #[error("The {} not sent by webhooks.", messages_are(.count))]
    NotWebhookMessages { count: usize },

    #[error("Missing required argument `{0}`")]
    MissingArgument(&'static str),

    #[error("`{value}` is not a valid {expected}")]
    InvalidArgument {
        value: String,
        expected: &'static str,
    },

    #[error("`{0}` is a channel; a webhook was expected")]
    ExpectedWebhook(String),

    #[error("Only incoming webhooks can be managed")]
    UnsupportedWebhook,

    #[error("Webhooks cannot be created in that channel")]
    UnsupportedChannel,

    #[error("This command can only be used in a server")]
    GuildOnly,
}

/// Something that could not be found when the command ran.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotFound {
    #[error("No message could be found for `{0}`.")]
    Message(String),

    #[error("No webhook could be found for `{0}`.")]
    Webhook(String),

    #[error("No channel could be found for `{0}`.")]
    Channel(String),

    #[error("No user could be found for `{0}`.")]
    User(String),

    #[error("This server has no icon.")]
    GuildIcon,

    /// The webhook behind a restored message no longer exists.
    #[error("The webhook that was used to send the message was deleted.")]
    WebhookDeleted,

    /// Webhook vanished between being looked up and being changed.
    #[error("The webhook was deleted before the change could be made.")]
    WebhookVanished,
}

/// A recoverable failure outside our control.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExternalFailure {
    #[error("Failed to get short URL")]
    ShortLink,

    #[error("Could not send DM, check server privacy settings or unblock me.")]
    DirectMessageRefused,
}

/// A command failure, rendered to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("{actor:?} is missing the {permission} permission")]
    Permission {
        actor: Actor,
        permission: &'static str,
        channel_id: Option<u64>,
    },

    #[error(transparent)]
    NotFound(#[from] NotFound),

    #[error(transparent)]
    ExternalService(#[from] ExternalFailure),

    #[error("This webhook was created by a bot other than myself, so I cannot {}.", .action.verb())]
    Ownership { action: WebhookAction },

    #[error("Command on cooldown, retry in {retry_after_secs}s")]
    Cooldown { retry_after_secs: u64 },

    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// A bug on our side; the detail is logged, never shown.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CommandError {
    pub fn manage_webhooks(actor: Actor, channel_id: Option<u64>) -> Self {
        Self::Permission {
            actor,
            permission: "Manage Webhooks",
            channel_id,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Input(_) => ErrorCategory::InvalidInput,
            Self::Permission { .. } => ErrorCategory::PermissionDenied,
            Self::NotFound(_) => ErrorCategory::NotFound,
            Self::ExternalService(_) => ErrorCategory::ExternalService,
            Self::Ownership { .. } => ErrorCategory::Ownership,
            Self::Cooldown { .. } => ErrorCategory::RateLimit,
            Self::Platform(err) => err.category(),
            Self::Internal(_) => ErrorCategory::Unknown,
        }
    }

    /// Embed title shown to the user.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Input(InputError::NameTooLong { .. }) => "Webhook name too long",
            Self::Input(InputError::MissingArgument(_)) => "Missing argument",
            Self::Input(_) => "Error",
            Self::Permission { .. } => "Missing Permissions",
            Self::NotFound(NotFound::WebhookDeleted | NotFound::WebhookVanished) => {
                "Webhook Deleted"
            }
            Self::NotFound(_) => "Not found",
            Self::ExternalService(ExternalFailure::DirectMessageRefused) => "Forbidden",
            Self::ExternalService(_) => "Error",
            Self::Ownership { action } => action.title(),
            Self::Cooldown { .. } => "Slow down",
            Self::Platform(_) => "Discord error",
            Self::Internal(_) => "Error",
        }
    }

    /// Embed description shown to the user.
    pub fn description(&self) -> String {
        match self {
            Self::Permission {
                actor,
                permission,
                channel_id,
            } => {
                let place = channel_id
                    .map(|id| format!(" in <#{}>", id))
                    .unwrap_or_default();
                match actor {
                    Actor::Bot => {
                        format!("I don't have the {} permission{}.", permission, place)
                    }
                    Actor::User => {
                        format!("You need the {} permission{}.", permission, place)
                    }
                }
            }
            Self::Cooldown { retry_after_secs } => format!(
                "You are using this command too often. Try again in {}s.",
                retry_after_secs
            ),
            Self::Platform(_) => {
                "Discord rejected the request. Please try again later.".to_string()
            }
            Self::Internal(_) => {
                "Something went wrong on my side. Please try again later.".to_string()
            }
            other => other.to_string(),
        }
    }
}
