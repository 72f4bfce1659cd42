//! Webhook lifecycle: list, inspect, reveal, create, edit and delete.
//!
//! Every operation re-checks Manage Webhooks for both the requester and the
//! bot in the webhook's own channel, since channel overwrites can differ from
//! what the invocation channel grants. Webhooks without a token belong to
//! another application and are read-only here.

#[path = "webhooks_tests.rs"]
mod webhooks_tests;

use std::time::Duration;

use chrono::{DateTime, Utc};
use discohook_types::{
    validate_webhook_name, Actor, Avatar, ChannelInfo, ChannelRef, CommandError, EditRequest,
    EmbedDocument, InputError, NotFound, PlatformError, WebhookAction, WebhookKind, WebhookRecord,
    WebhookRef,
};
use tracing::info;

use crate::confirmation::ConfirmationGate;
use crate::dispatch::{deliver_privately, Invocation};
use crate::platform::Platform;

pub struct WebhookManager {
    prefix: String,
    page_size: usize,
    confirmation_timeout: Duration,
}

impl WebhookManager {
    pub fn new(prefix: impl Into<String>, page_size: usize, confirmation_timeout: Duration) -> Self {
        Self {
            prefix: prefix.into(),
            page_size: page_size.max(1),
            confirmation_timeout,
        }
    }

    /// Incoming webhooks of the guild, or of one channel, one embed per page.
    pub async fn list<P: Platform>(
        &self,
        platform: &P,
        inv: &Invocation,
        channel: Option<&ChannelRef>,
    ) -> Result<Vec<EmbedDocument>, CommandError> {
        let guild_id = inv.guild_id.ok_or(InputError::GuildOnly)?;

        let filter = match channel {
            Some(reference) => {
                let channel = resolve_channel(platform, inv, reference).await?;
                ensure_can_manage(platform, inv, channel.id).await?;
                Some(channel.id)
            }
            None => {
                ensure_can_manage(platform, inv, inv.channel_id).await?;
                None
            }
        };

        let hooks: Vec<WebhookRecord> = platform
            .guild_webhooks(guild_id)
            .await
            .map_err(|e| bot_forbidden(e, None))?
            .into_iter()
            .filter(|h| h.kind == WebhookKind::Incoming)
            .filter(|h| filter.map_or(true, |id| h.channel_id == id))
            .collect();

        Ok(self.list_pages(&hooks, filter))
    }

    pub async fn get<P: Platform>(
        &self,
        platform: &P,
        inv: &Invocation,
        reference: &WebhookRef,
    ) -> Result<Vec<EmbedDocument>, CommandError> {
        let hook = resolve_webhook(platform, inv, reference).await?;
        ensure_can_manage(platform, inv, hook.channel_id).await?;
        Ok(vec![self.webhook_embed(&hook, None, false)])
    }

    /// Send the secret URL to the requester's DMs only.
    pub async fn url<P: Platform>(
        &self,
        platform: &P,
        inv: &Invocation,
        reference: &WebhookRef,
    ) -> Result<Vec<EmbedDocument>, CommandError> {
        let hook = resolve_webhook(platform, inv, reference).await?;
        ensure_can_manage(platform, inv, hook.channel_id).await?;
        require_owned(&hook, WebhookAction::RevealUrl)?;

        deliver_privately(platform, inv.user_id, &self.webhook_embed(&hook, None, true)).await?;

        info!(user_id = inv.user_id, webhook_id = hook.id, "Sent webhook URL by DM");
        Ok(vec![EmbedDocument::titled("Webhook URL sent").description(
            "Because the URL should be kept secret, a message has been sent to your DMs.",
        )])
    }

    pub async fn create<P: Platform>(
        &self,
        platform: &P,
        inv: &Invocation,
        channel: &ChannelRef,
        name: &str,
    ) -> Result<Vec<EmbedDocument>, CommandError> {
        validate_webhook_name(name)?;

        let channel = resolve_channel(platform, inv, channel).await?;
        if !channel.kind.supports_webhooks() {
            return Err(InputError::UnsupportedChannel.into());
        }
        ensure_can_manage(platform, inv, channel.id).await?;

        let avatar = read_avatar(platform, inv).await?;
        let hook = platform
            .create_webhook(channel.id, name, avatar.as_ref())
            .await
            .map_err(|e| bot_forbidden(e, Some(channel.id)))?;

        info!(
            user_id = inv.user_id,
            webhook_id = hook.id,
            channel_id = channel.id,
            "Created webhook"
        );
        Ok(vec![self.webhook_embed(&hook, Some("New webhook created"), false)])
    }

    /// Rename and/or replace the avatar, then report the re-fetched state.
    pub async fn edit<P: Platform>(
        &self,
        platform: &P,
        inv: &Invocation,
        reference: &WebhookRef,
        new_name: Option<String>,
    ) -> Result<Vec<EmbedDocument>, CommandError> {
        if let Some(name) = &new_name {
            validate_webhook_name(name)?;
        }
        if new_name.is_none() && inv.attachments.is_empty() {
            return Err(InputError::NoEditFields.into());
        }

        let hook = resolve_webhook(platform, inv, reference).await?;
        ensure_can_manage(platform, inv, hook.channel_id).await?;
        require_owned(&hook, WebhookAction::Edit)?;

        let avatar = read_avatar(platform, inv).await?;
        let request = EditRequest::new(new_name, avatar)?;
        platform
            .edit_webhook(hook.id, &request)
            .await
            .map_err(|e| webhook_gone(e, hook.channel_id))?;

        let hook = platform
            .fetch_webhook(hook.id)
            .await
            .map_err(|e| webhook_gone(e, hook.channel_id))?;

        info!(user_id = inv.user_id, webhook_id = hook.id, "Edited webhook");
        Ok(vec![self.webhook_embed(&hook, Some("Webhook edited"), false)])
    }

    /// Delete after the requester confirms.
    pub async fn delete<P: Platform>(
        &self,
        platform: &P,
        inv: &Invocation,
        reference: &WebhookRef,
    ) -> Result<Vec<EmbedDocument>, CommandError> {
        let hook = resolve_webhook(platform, inv, reference).await?;
        ensure_can_manage(platform, inv, hook.channel_id).await?;
        require_owned(&hook, WebhookAction::Delete)?;

        let prompt = EmbedDocument::titled("Confirmation").description(format!(
            "Are you sure you want to delete `{}`? This action cannot be reverted.",
            hook.name
        ));
        let mut responses = platform
            .prompt_confirmation(inv.channel_id, &prompt, self.confirmation_timeout)
            .await?;
        let mut gate = ConfirmationGate::new(inv.user_id, self.confirmation_timeout);
        let state = gate.wait(&mut responses).await;
        // Closing the channel retires the prompt's buttons.
        drop(responses);

        if !state.permits() {
            info!(user_id = inv.user_id, webhook_id = hook.id, ?state, "Webhook deletion not confirmed");
            return Ok(vec![EmbedDocument::titled("Confirmation cancelled")
                .description("Action cancelled or command expired.")]);
        }

        platform
            .delete_webhook(hook.id)
            .await
            .map_err(|e| webhook_gone(e, hook.channel_id))?;

        info!(user_id = inv.user_id, webhook_id = hook.id, "Deleted webhook");
        Ok(vec![EmbedDocument::titled("Webhook deleted")
            .description("Messages sent by this webhook have not been deleted.")])
    }

    fn webhook_embed(&self, hook: &WebhookRecord, heading: Option<&str>, show_url: bool) -> EmbedDocument {
        let title = match heading {
            Some(heading) => format!("{}: {}", heading, hook.name),
            None => hook.name.clone(),
        };
        let url = match hook.url() {
            Some(url) if show_url => url,
            Some(_) => format!("Use `{}webhook url <webhook>` to obtain the URL.", self.prefix),
            None => CommandError::Ownership {
                action: WebhookAction::RevealUrl,
            }
            .description(),
        };

        EmbedDocument::titled(title)
            .thumbnail(hook.avatar_url())
            .field("Channel", hook.channel_mention(), true)
            .field("Created at", format_created_at(hook.created_at()), true)
            .field("Webhook URL", url, false)
    }

    fn list_pages(&self, hooks: &[WebhookRecord], channel: Option<u64>) -> Vec<EmbedDocument> {
        let base = || {
            EmbedDocument::titled("Webhooks").description(format!(
                "Use `{}webhook get <webhook>` to get more info on a webhook.",
                self.prefix
            ))
        };

        if hooks.is_empty() {
            let place = channel.map_or_else(
                || "this server".to_string(),
                |id| format!("<#{}>", id),
            );
            return vec![EmbedDocument::titled("Webhooks")
                .description(format!("There are no webhooks in {}.", place))];
        }

        let total = hooks.len();
        let pages = total.div_ceil(self.page_size);
        hooks
            .chunks(self.page_size)
            .enumerate()
            .map(|(page, chunk)| {
                let first = page * self.page_size + 1;
                let last = first + chunk.len() - 1;
                chunk
                    .iter()
                    .fold(base(), |embed, hook| {
                        embed.field(
                            hook.name.clone(),
                            format!("Channel: {}\nID: {}", hook.channel_mention(), hook.id),
                            true,
                        )
                    })
                    .footer(format!(
                        "Page {}/{}, showing webhook {}..{}/{}.",
                        page + 1,
                        pages,
                        first,
                        last,
                        total
                    ))
            })
            .collect()
    }
}

/// `ctime`-style timestamp, e.g. `Sat Mar 7 14:03:09 2026 UTC`.
fn format_created_at(at: DateTime<Utc>) -> String {
    format!("{} UTC", at.format("%a %b %e %H:%M:%S %Y")).replace("  ", " ")
}

fn require_owned(hook: &WebhookRecord, action: WebhookAction) -> Result<(), CommandError> {
    if hook.is_owned() {
        Ok(())
    } else {
        Err(CommandError::Ownership { action })
    }
}

fn bot_forbidden(err: PlatformError, channel_id: Option<u64>) -> CommandError {
    if err.is_forbidden() {
        CommandError::manage_webhooks(Actor::Bot, channel_id)
    } else {
        err.into()
    }
}

/// Mutation failed: the webhook may have been deleted since it was resolved.
fn webhook_gone(err: PlatformError, channel_id: u64) -> CommandError {
    if err.is_not_found() {
        NotFound::WebhookVanished.into()
    } else {
        bot_forbidden(err, Some(channel_id))
    }
}

/// Resolve a webhook reference in the invoking guild.
///
/// A bare id is fetched as a webhook first; only when that fails is it
/// checked as a channel, which is then rejected rather than reinterpreted.
async fn resolve_webhook<P: Platform>(
    platform: &P,
    inv: &Invocation,
    reference: &WebhookRef,
) -> Result<WebhookRecord, CommandError> {
    let missing = || CommandError::from(NotFound::Webhook(reference.raw.clone()));

    let hook = match platform.fetch_webhook(reference.id).await {
        Ok(hook) => hook,
        Err(e) if e.is_not_found() => {
            if !reference.from_url && platform.fetch_channel(reference.id).await.is_ok() {
                return Err(InputError::ExpectedWebhook(reference.raw.clone()).into());
            }
            return Err(missing());
        }
        Err(e) => return Err(bot_forbidden(e, None)),
    };

    if hook.guild_id.is_none() || hook.guild_id != inv.guild_id {
        return Err(missing());
    }
    if hook.kind != WebhookKind::Incoming {
        return Err(InputError::UnsupportedWebhook.into());
    }
    Ok(hook)
}

async fn resolve_channel<P: Platform>(
    platform: &P,
    inv: &Invocation,
    reference: &ChannelRef,
) -> Result<ChannelInfo, CommandError> {
    let missing = || CommandError::from(NotFound::Channel(reference.raw.clone()));
    let channel = match platform.fetch_channel(reference.id).await {
        Ok(channel) => channel,
        Err(e) if e.is_not_found() || e.is_forbidden() => return Err(missing()),
        Err(e) => return Err(e.into()),
    };
    if channel.guild_id.is_none() || channel.guild_id != inv.guild_id {
        return Err(missing());
    }
    Ok(channel)
}

/// Both the requester and the bot need Manage Webhooks in `channel_id`.
async fn ensure_can_manage<P: Platform>(
    platform: &P,
    inv: &Invocation,
    channel_id: u64,
) -> Result<(), CommandError> {
    let user = platform.permissions_in(channel_id, inv.user_id).await?;
    if !user.can_manage_webhooks() {
        return Err(CommandError::manage_webhooks(Actor::User, Some(channel_id)));
    }
    let bot = platform
        .permissions_in(channel_id, platform.bot_user_id())
        .await?;
    if !bot.can_manage_webhooks() {
        return Err(CommandError::manage_webhooks(Actor::Bot, Some(channel_id)));
    }
    Ok(())
}

/// First attachment of the command message, if any.
async fn read_avatar<P: Platform>(
    platform: &P,
    inv: &Invocation,
) -> Result<Option<Avatar>, CommandError> {
    let Some(attachment) = inv.attachments.first() else {
        return Ok(None);
    };
    let data = platform.read_attachment(attachment).await?;
    Ok(Some(Avatar {
        filename: attachment.filename.clone(),
        data,
    }))
}
