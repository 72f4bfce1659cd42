//! Chat platform access
//!
//! [`Platform`] is the narrow surface command handlers use to read and
//! mutate Discord state. [`SerenityPlatform`] implements it over serenity's
//! HTTP client; tests use the in-memory `MockPlatform`.

use std::time::Duration;

use discohook_types::{
    Attachment, Avatar, ChannelInfo, ChannelPermissions, ChannelType, EditRequest, EmbedDocument,
    EmbedField, GuildProfile, MessageSnapshot, PlatformError, SourceAuthor, SourceEmbed,
    SourceFooter, SourceMedia, UserProfile, WebhookKind, WebhookRecord,
};
use futures::{Stream, StreamExt};
use secrecy::SecretString;
use serenity::builder::{
    CreateActionRow, CreateAttachment, CreateButton, CreateEmbed, CreateEmbedAuthor,
    CreateEmbedFooter, CreateInteractionResponse, CreateMessage, CreateWebhook, EditMessage,
    EditWebhook,
};
use serenity::client::Context;
use serenity::model::application::ButtonStyle;
use serenity::model::channel::{
    Attachment as SerenityAttachment, Channel, ChannelType as SerenityChannelType,
    Embed as SerenityEmbed, Message as SerenityMessage,
};
use serenity::model::guild::PartialGuild;
use serenity::model::id::{ChannelId, GuildId, MessageId, UserId, WebhookId};
use serenity::model::user::User;
use serenity::model::webhook::{Webhook, WebhookType};
use serenity::model::Timestamp;
use tokio::sync::mpsc;
use tracing::debug;

use crate::confirmation::{GateChoice, GateResponse};
use crate::errors::classify;

const CONFIRM_ID: &str = "discohook:confirm";
const CANCEL_ID: &str = "discohook:cancel";

/// Operations command handlers need from the chat platform.
#[allow(async_fn_in_trait)]
pub trait Platform {
    fn bot_user_id(&self) -> u64;

    async fn fetch_message(
        &self,
        channel_id: u64,
        message_id: u64,
    ) -> Result<MessageSnapshot, PlatformError>;

    async fn fetch_channel(&self, channel_id: u64) -> Result<ChannelInfo, PlatformError>;

    async fn fetch_user(&self, user_id: u64) -> Result<UserProfile, PlatformError>;

    async fn fetch_guild(&self, guild_id: u64) -> Result<GuildProfile, PlatformError>;

    /// Effective permissions of `user_id` in a channel, after overwrites.
    async fn permissions_in(
        &self,
        channel_id: u64,
        user_id: u64,
    ) -> Result<ChannelPermissions, PlatformError>;

    async fn guild_webhooks(&self, guild_id: u64) -> Result<Vec<WebhookRecord>, PlatformError>;

    async fn fetch_webhook(&self, webhook_id: u64) -> Result<WebhookRecord, PlatformError>;

    async fn create_webhook(
        &self,
        channel_id: u64,
        name: &str,
        avatar: Option<&Avatar>,
    ) -> Result<WebhookRecord, PlatformError>;

    async fn edit_webhook(&self, webhook_id: u64, edit: &EditRequest) -> Result<(), PlatformError>;

    async fn delete_webhook(&self, webhook_id: u64) -> Result<(), PlatformError>;

    async fn read_attachment(&self, attachment: &Attachment) -> Result<Vec<u8>, PlatformError>;

    async fn send_reply(&self, channel_id: u64, embed: &EmbedDocument) -> Result<(), PlatformError>;

    /// Send to the user's DM channel.
    async fn send_private(&self, user_id: u64, embed: &EmbedDocument) -> Result<(), PlatformError>;

    /// Post a yes/no prompt. Interactions from any user are forwarded on the
    /// returned channel until `timeout` elapses or the receiver is dropped;
    /// the buttons are then removed from the prompt.
    async fn prompt_confirmation(
        &self,
        channel_id: u64,
        embed: &EmbedDocument,
        timeout: Duration,
    ) -> Result<mpsc::Receiver<GateResponse>, PlatformError>;
}

/// [`Platform`] over a live gateway context.
#[derive(Clone)]
pub struct SerenityPlatform {
    ctx: Context,
    downloads: reqwest::Client,
    bot_user_id: u64,
}

impl SerenityPlatform {
    pub fn new(ctx: Context, downloads: reqwest::Client) -> Self {
        let bot_user_id = ctx.cache.current_user().id.get();
        Self {
            ctx,
            downloads,
            bot_user_id,
        }
    }

    async fn guild_channel_permissions(
        &self,
        channel: &serenity::model::channel::GuildChannel,
        user_id: u64,
    ) -> Result<ChannelPermissions, PlatformError> {
        let http = &self.ctx.http;
        let guild = http.get_guild(channel.guild_id).await.map_err(|e| classify(&e))?;
        let member = http
            .get_member(channel.guild_id, UserId::new(user_id))
            .await
            .map_err(|e| classify(&e))?;
        let perms = guild.user_permissions_in(channel, &member);
        Ok(ChannelPermissions {
            view_channel: perms.view_channel(),
            read_message_history: perms.read_message_history(),
            manage_webhooks: perms.manage_webhooks(),
        })
    }
}

impl Platform for SerenityPlatform {
    fn bot_user_id(&self) -> u64 {
        self.bot_user_id
    }

    async fn fetch_message(
        &self,
        channel_id: u64,
        message_id: u64,
    ) -> Result<MessageSnapshot, PlatformError> {
        let msg = self
            .ctx
            .http
            .get_message(ChannelId::new(channel_id), MessageId::new(message_id))
            .await
            .map_err(|e| classify(&e))?;
        Ok(convert_message(&msg))
    }

    async fn fetch_channel(&self, channel_id: u64) -> Result<ChannelInfo, PlatformError> {
        let channel = self
            .ctx
            .http
            .get_channel(ChannelId::new(channel_id))
            .await
            .map_err(|e| classify(&e))?;
        Ok(convert_channel(&channel))
    }

    async fn fetch_user(&self, user_id: u64) -> Result<UserProfile, PlatformError> {
        let user = self
            .ctx
            .http
            .get_user(UserId::new(user_id))
            .await
            .map_err(|e| classify(&e))?;
        Ok(convert_user(&user))
    }

    async fn fetch_guild(&self, guild_id: u64) -> Result<GuildProfile, PlatformError> {
        let guild = self
            .ctx
            .http
            .get_guild(GuildId::new(guild_id))
            .await
            .map_err(|e| classify(&e))?;
        Ok(convert_guild(&guild))
    }

    async fn permissions_in(
        &self,
        channel_id: u64,
        user_id: u64,
    ) -> Result<ChannelPermissions, PlatformError> {
        let channel = self
            .ctx
            .http
            .get_channel(ChannelId::new(channel_id))
            .await
            .map_err(|e| classify(&e))?;
        match channel {
            Channel::Guild(gc) => self.guild_channel_permissions(&gc, user_id).await,
            Channel::Private(pc) if pc.recipient.id.get() == user_id => Ok(ChannelPermissions {
                view_channel: true,
                read_message_history: true,
                manage_webhooks: false,
            }),
            _ => Ok(ChannelPermissions::default()),
        }
    }

    async fn guild_webhooks(&self, guild_id: u64) -> Result<Vec<WebhookRecord>, PlatformError> {
        let hooks = self
            .ctx
            .http
            .get_guild_webhooks(GuildId::new(guild_id))
            .await
            .map_err(|e| classify(&e))?;
        Ok(hooks.iter().map(convert_webhook).collect())
    }

    async fn fetch_webhook(&self, webhook_id: u64) -> Result<WebhookRecord, PlatformError> {
        let hook = self
            .ctx
            .http
            .get_webhook(WebhookId::new(webhook_id))
            .await
            .map_err(|e| classify(&e))?;
        Ok(convert_webhook(&hook))
    }

    async fn create_webhook(
        &self,
        channel_id: u64,
        name: &str,
        avatar: Option<&Avatar>,
    ) -> Result<WebhookRecord, PlatformError> {
        let mut builder = CreateWebhook::new(name);
        let attachment = avatar.map(|a| CreateAttachment::bytes(a.data.clone(), a.filename.clone()));
        if let Some(attachment) = &attachment {
            builder = builder.avatar(attachment);
        }
        let hook = ChannelId::new(channel_id)
            .create_webhook(&*self.ctx.http, builder)
            .await
            .map_err(|e| classify(&e))?;
        Ok(convert_webhook(&hook))
    }

    async fn edit_webhook(&self, webhook_id: u64, edit: &EditRequest) -> Result<(), PlatformError> {
        let http = &self.ctx.http;
        let mut hook = http
            .get_webhook(WebhookId::new(webhook_id))
            .await
            .map_err(|e| classify(&e))?;

        let mut builder = EditWebhook::new();
        if let Some(name) = edit.name() {
            builder = builder.name(name);
        }
        let attachment = edit
            .avatar()
            .map(|a| CreateAttachment::bytes(a.data.clone(), a.filename.clone()));
        if let Some(attachment) = &attachment {
            builder = builder.avatar(attachment);
        }

        hook.edit(&**http, builder).await.map_err(|e| classify(&e))
    }

    async fn delete_webhook(&self, webhook_id: u64) -> Result<(), PlatformError> {
        self.ctx
            .http
            .delete_webhook(WebhookId::new(webhook_id), None)
            .await
            .map_err(|e| classify(&e))
    }

    async fn read_attachment(&self, attachment: &Attachment) -> Result<Vec<u8>, PlatformError> {
        let resp = self
            .downloads
            .get(&attachment.url)
            .send()
            .await
            .map_err(|e| PlatformError::network(e.to_string()))?;
        let status = resp.status().as_u16();
        if status >= 400 {
            return Err(PlatformError::from_response(
                0,
                status,
                format!("attachment download failed: {}", attachment.filename),
            ));
        }
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| PlatformError::network(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn send_reply(&self, channel_id: u64, embed: &EmbedDocument) -> Result<(), PlatformError> {
        ChannelId::new(channel_id)
            .send_message(&*self.ctx.http, CreateMessage::new().embed(to_create_embed(embed)))
            .await
            .map_err(|e| classify(&e))?;
        Ok(())
    }

    async fn send_private(&self, user_id: u64, embed: &EmbedDocument) -> Result<(), PlatformError> {
        UserId::new(user_id)
            .direct_message(&*self.ctx.http, CreateMessage::new().embed(to_create_embed(embed)))
            .await
            .map_err(|e| classify(&e))?;
        Ok(())
    }

    async fn prompt_confirmation(
        &self,
        channel_id: u64,
        embed: &EmbedDocument,
        timeout: Duration,
    ) -> Result<mpsc::Receiver<GateResponse>, PlatformError> {
        let buttons = CreateActionRow::Buttons(vec![
            CreateButton::new(CONFIRM_ID)
                .label("Delete")
                .emoji('🗑')
                .style(ButtonStyle::Danger),
            CreateButton::new(CANCEL_ID)
                .label("Cancel")
                .style(ButtonStyle::Secondary),
        ]);
        let prompt = ChannelId::new(channel_id)
            .send_message(
                &*self.ctx.http,
                CreateMessage::new()
                    .embed(to_create_embed(embed))
                    .components(vec![buttons]),
            )
            .await
            .map_err(|e| classify(&e))?;

        let interactions = prompt
            .await_component_interactions(&self.ctx)
            .timeout(timeout)
            .stream();
        let http = self.ctx.http.clone();
        let ack_http = http.clone();
        let clicks = interactions.filter_map(move |interaction| {
            let http = ack_http.clone();
            async move {
                let choice = match interaction.data.custom_id.as_str() {
                    CONFIRM_ID => GateChoice::Confirm,
                    CANCEL_ID => GateChoice::Cancel,
                    _ => return None,
                };
                if let Err(e) = interaction
                    .create_response(&*http, CreateInteractionResponse::Acknowledge)
                    .await
                {
                    debug!("Failed to acknowledge confirmation click: {}", e);
                }
                Some(GateResponse {
                    user_id: interaction.user.id.get(),
                    choice,
                })
            }
        });
        let (tx, rx) = mpsc::channel(8);
        let (prompt_channel, prompt_id) = (prompt.channel_id, prompt.id);

        tokio::spawn(async move {
            forward_responses(clicks, tx).await;
            if let Err(e) = prompt_channel
                .edit_message(&*http, prompt_id, EditMessage::new().components(vec![]))
                .await
            {
                debug!("Failed to remove confirmation buttons: {}", e);
            }
        });

        Ok(rx)
    }
}

/// Pass clicks on until they run out or nobody is listening any more.
async fn forward_responses<S>(clicks: S, tx: mpsc::Sender<GateResponse>)
where
    S: Stream<Item = GateResponse>,
{
    tokio::pin!(clicks);
    loop {
        let response = tokio::select! {
            _ = tx.closed() => break,
            next = clicks.next() => match next {
                Some(response) => response,
                None => break,
            },
        };
        if tx.send(response).await.is_err() {
            break;
        }
    }
}

// ── Conversion helpers ─────────────────────────────────────────────────────

fn convert_message(msg: &SerenityMessage) -> MessageSnapshot {
    MessageSnapshot {
        id: msg.id.get(),
        channel_id: msg.channel_id.get(),
        guild_id: msg.guild_id.map(|g| g.get()),
        content: Some(msg.content.clone()).filter(|c| !c.is_empty()),
        embeds: msg.embeds.iter().map(convert_embed).collect(),
        webhook_id: msg.webhook_id.map(|w| w.get()),
    }
}

pub fn convert_attachment(a: &SerenityAttachment) -> Attachment {
    Attachment {
        id: a.id.get(),
        filename: a.filename.clone(),
        url: a.url.clone(),
        content_type: a.content_type.clone(),
        size: u64::from(a.size),
    }
}

fn convert_embed(e: &SerenityEmbed) -> SourceEmbed {
    SourceEmbed {
        kind: e.kind.clone(),
        title: e.title.clone(),
        description: e.description.clone(),
        url: e.url.clone(),
        color: e.colour.map(|c| c.0),
        fields: e
            .fields
            .iter()
            .map(|f| EmbedField {
                name: f.name.clone(),
                value: f.value.clone(),
                inline: f.inline,
            })
            .collect(),
        author: e.author.as_ref().map(|a| SourceAuthor {
            name: a.name.clone(),
            url: a.url.clone(),
            icon_url: a.icon_url.clone(),
            proxy_icon_url: a.proxy_icon_url.clone(),
        }),
        footer: e.footer.as_ref().map(|f| SourceFooter {
            text: f.text.clone(),
            icon_url: f.icon_url.clone(),
            proxy_icon_url: f.proxy_icon_url.clone(),
        }),
        image: e.image.as_ref().map(|i| SourceMedia {
            url: i.url.clone(),
            proxy_url: i.proxy_url.clone(),
            width: i.width,
            height: i.height,
        }),
        thumbnail: e.thumbnail.as_ref().map(|t| SourceMedia {
            url: t.url.clone(),
            proxy_url: t.proxy_url.clone(),
            width: t.width,
            height: t.height,
        }),
        timestamp: e.timestamp.and_then(|t| t.to_rfc3339()),
    }
}

fn convert_user(user: &User) -> UserProfile {
    UserProfile {
        id: user.id.get(),
        name: user.name.clone(),
        discriminator: user.discriminator.map(|d| d.get()),
        avatar: user.avatar.as_ref().map(|a| a.to_string()),
    }
}

fn convert_guild(guild: &PartialGuild) -> GuildProfile {
    GuildProfile {
        id: guild.id.get(),
        name: guild.name.clone(),
        icon: guild.icon.as_ref().map(|i| i.to_string()),
    }
}

fn convert_channel(channel: &Channel) -> ChannelInfo {
    match channel {
        Channel::Guild(gc) => ChannelInfo {
            id: gc.id.get(),
            kind: convert_channel_type(gc.kind),
            guild_id: Some(gc.guild_id.get()),
            name: Some(gc.name.clone()),
        },
        Channel::Private(pc) => ChannelInfo {
            id: pc.id.get(),
            kind: ChannelType::Dm,
            guild_id: None,
            name: None,
        },
        other => ChannelInfo {
            id: other.id().get(),
            kind: ChannelType::Unknown,
            guild_id: None,
            name: None,
        },
    }
}

fn convert_channel_type(kind: SerenityChannelType) -> ChannelType {
    match kind {
        SerenityChannelType::Text => ChannelType::GuildText,
        SerenityChannelType::Private => ChannelType::Dm,
        SerenityChannelType::Voice => ChannelType::GuildVoice,
        SerenityChannelType::GroupDm => ChannelType::GroupDm,
        SerenityChannelType::Category => ChannelType::GuildCategory,
        SerenityChannelType::News => ChannelType::GuildNews,
        SerenityChannelType::Stage => ChannelType::GuildStageVoice,
        SerenityChannelType::Forum => ChannelType::GuildForum,
        _ => ChannelType::Unknown,
    }
}

fn convert_webhook(hook: &Webhook) -> WebhookRecord {
    let kind = match hook.kind {
        WebhookType::Incoming => WebhookKind::Incoming,
        WebhookType::ChannelFollower => WebhookKind::ChannelFollower,
        WebhookType::Application => WebhookKind::Application,
        _ => WebhookKind::Unknown,
    };
    // The execute URL is only available when the token was returned to us.
    let token = hook
        .url()
        .ok()
        .and_then(|url| url.rsplit('/').next().map(String::from))
        .filter(|t| !t.is_empty())
        .map(SecretString::from);

    WebhookRecord {
        id: hook.id.get(),
        kind,
        name: hook.name.clone().unwrap_or_default(),
        guild_id: hook.guild_id.map(|g| g.get()),
        channel_id: hook.channel_id.map_or(0, |c| c.get()),
        avatar: hook.avatar.as_ref().map(|a| a.to_string()),
        token,
    }
}

fn to_create_embed(doc: &EmbedDocument) -> CreateEmbed {
    let mut embed = CreateEmbed::new();
    if let Some(title) = &doc.title {
        embed = embed.title(title);
    }
    if let Some(description) = &doc.description {
        embed = embed.description(description);
    }
    if let Some(url) = &doc.url {
        embed = embed.url(url);
    }
    if let Some(color) = doc.color {
        embed = embed.colour(color);
    }
    for field in &doc.fields {
        embed = embed.field(&field.name, &field.value, field.inline);
    }
    if let Some(author) = &doc.author {
        let mut a = CreateEmbedAuthor::new(&author.name);
        if let Some(url) = &author.url {
            a = a.url(url);
        }
        if let Some(icon) = &author.icon_url {
            a = a.icon_url(icon);
        }
        embed = embed.author(a);
    }
    if let Some(footer) = &doc.footer {
        let mut f = CreateEmbedFooter::new(&footer.text);
        if let Some(icon) = &footer.icon_url {
            f = f.icon_url(icon);
        }
        embed = embed.footer(f);
    }
    if let Some(image) = &doc.image {
        embed = embed.image(&image.url);
    }
    if let Some(thumbnail) = &doc.thumbnail {
        embed = embed.thumbnail(&thumbnail.url);
    }
    if let Some(ts) = doc
        .timestamp
        .as_deref()
        .and_then(|raw| Timestamp::parse(raw).ok())
    {
        embed = embed.timestamp(ts);
    }
    embed
}
