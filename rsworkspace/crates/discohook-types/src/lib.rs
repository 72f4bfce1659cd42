//! Shared types for the Discohook Discord bot
//!
//! Everything in this crate is platform-client agnostic: the bot crate
//! converts serenity models into these types at the edge.

pub mod commands;
pub mod document;
pub mod embed;
pub mod errors;
pub mod types;

pub use commands::*;
pub use document::*;
pub use embed::*;
pub use errors::{
    Actor, CommandError, DiscordErrorCode, ErrorCategory, ExternalFailure, InputError, NotFound,
    PlatformError, WebhookAction,
};
pub use types::*;
