//! `restore` and `restore edit`: turn existing messages into builder links.

#[path = "restore_tests.rs"]
mod restore_tests;

use std::collections::BTreeSet;

use discohook_types::{
    Actor, CommandError, EmbedDocument, ExternalFailure, InputError, MessageLink, MessageSnapshot,
    NotFound, ShortLink, WebhookAction,
};
use tracing::{info, warn};

use crate::dispatch::{deliver_privately, Invocation};
use crate::encoder::MessageEncoder;
use crate::platform::Platform;
use crate::shortener::ShortLinkResolver;

pub struct RestoreService {
    encoder: MessageEncoder,
    shortener: ShortLinkResolver,
}

impl RestoreService {
    pub fn new(encoder: MessageEncoder, shortener: ShortLinkResolver) -> Self {
        Self { encoder, shortener }
    }

    /// Public link with message data only.
    pub async fn restore<P: Platform>(
        &self,
        platform: &P,
        inv: &Invocation,
        links: &[MessageLink],
    ) -> Result<Vec<EmbedDocument>, CommandError> {
        let messages = resolve_messages(platform, inv, links).await?;
        let url = self.encoder.encode(&messages, None, false)?;
        let link = self.shorten(&url).await?;

        info!(user_id = inv.user_id, messages = messages.len(), "Restored messages");
        Ok(vec![link_embed(&link)])
    }

    /// Link pre-filled with the originating webhook, delivered by DM.
    pub async fn restore_edit<P: Platform>(
        &self,
        platform: &P,
        inv: &Invocation,
        links: &[MessageLink],
    ) -> Result<Vec<EmbedDocument>, CommandError> {
        let messages = resolve_messages(platform, inv, links).await?;
        let webhook_id = single_webhook_origin(&messages)?;

        // Webhook messages live in the webhook's own channel.
        let channel_id = messages.first().map(|m| m.channel_id);
        let hook = platform.fetch_webhook(webhook_id).await.map_err(|e| {
            if e.is_not_found() {
                CommandError::from(NotFound::WebhookDeleted)
            } else if e.is_forbidden() {
                CommandError::manage_webhooks(Actor::Bot, channel_id)
            } else {
                CommandError::from(e)
            }
        })?;
        let target = hook.url().ok_or(CommandError::Ownership {
            action: WebhookAction::RevealUrl,
        })?;

        let url = self.encoder.encode(&messages, Some(&target), true)?;
        let link = self.shorten(&url).await?;
        deliver_privately(platform, inv.user_id, &link_embed(&link)).await?;

        info!(
            user_id = inv.user_id,
            webhook_id,
            messages = messages.len(),
            "Sent restore edit link by DM"
        );
        Ok(vec![EmbedDocument::titled("Message URL sent").description(
            "Because the webhook URL should be kept secret, a message has been sent to your DMs.",
        )])
    }

    async fn shorten(&self, url: &str) -> Result<ShortLink, CommandError> {
        self.shortener.shorten(url).await.map_err(|e| {
            warn!("Failed to shorten builder link: {}", e);
            CommandError::from(ExternalFailure::ShortLink)
        })
    }
}

fn link_embed(link: &ShortLink) -> EmbedDocument {
    EmbedDocument::titled("Message")
        .description(&link.url)
        .footer("Expires")
        .timestamp(link.expires_at)
}

/// The one webhook every message was sent through.
///
/// A mix of webhook and non-webhook messages counts as mixed.
fn single_webhook_origin(messages: &[MessageSnapshot]) -> Result<u64, InputError> {
    let origins: BTreeSet<Option<u64>> = messages.iter().map(|m| m.webhook_id).collect();
    if origins.len() > 1 {
        return Err(InputError::MixedWebhooks);
    }
    origins
        .into_iter()
        .next()
        .flatten()
        .ok_or(InputError::NotWebhookMessages {
            count: messages.len(),
        })
}

/// Fetch every referenced message the requester is allowed to read.
///
/// Messages outside the invoking guild (or DM), or in channels the
/// requester cannot read, are reported as not found.
async fn resolve_messages<P: Platform>(
    platform: &P,
    inv: &Invocation,
    links: &[MessageLink],
) -> Result<Vec<MessageSnapshot>, CommandError> {
    let mut messages = Vec::with_capacity(links.len());
    for link in links {
        let missing = || CommandError::from(NotFound::Message(link.raw.clone()));

        if link.guild_id.is_some() && link.guild_id != inv.guild_id {
            return Err(missing());
        }
        let channel_id = link.channel_id.unwrap_or(inv.channel_id);

        let channel = match platform.fetch_channel(channel_id).await {
            Ok(channel) => channel,
            Err(e) if e.is_not_found() || e.is_forbidden() => return Err(missing()),
            Err(e) => return Err(e.into()),
        };
        if channel.guild_id != inv.guild_id {
            return Err(missing());
        }

        let perms = platform.permissions_in(channel_id, inv.user_id).await?;
        if !perms.can_read_history() {
            return Err(missing());
        }

        match platform.fetch_message(channel_id, link.message_id).await {
            Ok(message) => messages.push(message),
            Err(e) if e.is_not_found() || e.is_forbidden() => return Err(missing()),
            Err(e) => return Err(e.into()),
        }
    }
    Ok(messages)
}
