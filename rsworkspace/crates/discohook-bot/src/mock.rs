//! In-memory platform for unit testing without a Discord connection.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use discohook_types::{
    Attachment, Avatar, ChannelInfo, ChannelPermissions, ChannelType, DiscordErrorCode,
    EditRequest, EmbedDocument, GuildProfile, MessageSnapshot, PlatformError, UserProfile,
    WebhookKind, WebhookRecord,
};
use secrecy::SecretString;
use tokio::sync::mpsc;

use crate::confirmation::GateResponse;
use crate::platform::Platform;

pub const BOT_ID: u64 = 1;
pub const GUILD_ID: u64 = 100;

/// A recorded platform call, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FetchMessage { channel_id: u64, message_id: u64 },
    FetchChannel(u64),
    FetchUser(u64),
    FetchGuild(u64),
    Permissions { channel_id: u64, user_id: u64 },
    GuildWebhooks(u64),
    FetchWebhook(u64),
    CreateWebhook { channel_id: u64, name: String, avatar: Option<Vec<u8>> },
    EditWebhook { webhook_id: u64, name: Option<String>, avatar: Option<Vec<u8>> },
    DeleteWebhook(u64),
    ReadAttachment(String),
    Reply { channel_id: u64, embed: EmbedDocument },
    Private { user_id: u64, embed: EmbedDocument },
    Prompt { channel_id: u64, embed: EmbedDocument },
}

#[derive(Default)]
struct State {
    messages: HashMap<(u64, u64), MessageSnapshot>,
    channels: HashMap<u64, ChannelInfo>,
    permissions: HashMap<(u64, u64), ChannelPermissions>,
    webhooks: HashMap<u64, WebhookRecord>,
    users: HashMap<u64, UserProfile>,
    guilds: HashMap<u64, GuildProfile>,
    attachments: HashMap<String, Vec<u8>>,
    failures: HashMap<&'static str, PlatformError>,
    gate_responses: Vec<GateResponse>,
    calls: Vec<Call>,
    next_id: u64,
}

/// In-memory platform that records every call.
///
/// Permissions default to everything granted; channels, messages and
/// webhooks only exist once seeded. Any operation can be forced to fail with
/// [`MockPlatform::fail`], keyed by the trait method name.
#[derive(Clone, Default)]
pub struct MockPlatform {
    state: Arc<Mutex<State>>,
}

pub fn not_found(code: u32) -> PlatformError {
    PlatformError::from_response(code, 404, "Not Found")
}

pub fn forbidden() -> PlatformError {
    PlatformError::from_response(50013, 403, "Missing Permissions")
}

pub fn text_channel(id: u64) -> ChannelInfo {
    ChannelInfo {
        id,
        kind: ChannelType::GuildText,
        guild_id: Some(GUILD_ID),
        name: Some(format!("channel-{}", id)),
    }
}

pub fn webhook(id: u64, channel_id: u64, token: Option<&str>) -> WebhookRecord {
    WebhookRecord {
        id,
        kind: WebhookKind::Incoming,
        name: format!("hook-{}", id),
        guild_id: Some(GUILD_ID),
        channel_id,
        avatar: None,
        token: token.map(|t| SecretString::from(t.to_string())),
    }
}

impl MockPlatform {
    pub fn new() -> Self {
        let mock = Self::default();
        mock.state.lock().unwrap().next_id = 9_000;
        mock
    }

    pub fn with_channel(self, channel: ChannelInfo) -> Self {
        self.state.lock().unwrap().channels.insert(channel.id, channel);
        self
    }

    pub fn with_message(self, message: MessageSnapshot) -> Self {
        self.state
            .lock()
            .unwrap()
            .messages
            .insert((message.channel_id, message.id), message);
        self
    }

    pub fn with_webhook(self, hook: WebhookRecord) -> Self {
        self.state.lock().unwrap().webhooks.insert(hook.id, hook);
        self
    }

    pub fn with_user(self, user: UserProfile) -> Self {
        self.state.lock().unwrap().users.insert(user.id, user);
        self
    }

    pub fn with_guild(self, guild: GuildProfile) -> Self {
        self.state.lock().unwrap().guilds.insert(guild.id, guild);
        self
    }

    pub fn with_permissions(self, channel_id: u64, user_id: u64, perms: ChannelPermissions) -> Self {
        self.state
            .lock()
            .unwrap()
            .permissions
            .insert((channel_id, user_id), perms);
        self
    }

    pub fn with_attachment(self, url: &str, bytes: &[u8]) -> Self {
        self.state
            .lock()
            .unwrap()
            .attachments
            .insert(url.to_string(), bytes.to_vec());
        self
    }

    /// Responses delivered, in order, to the next confirmation prompt.
    pub fn with_gate_responses(self, responses: Vec<GateResponse>) -> Self {
        self.state.lock().unwrap().gate_responses = responses;
        self
    }

    pub fn fail(self, operation: &'static str, err: PlatformError) -> Self {
        self.state.lock().unwrap().failures.insert(operation, err);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn replies(&self) -> Vec<EmbedDocument> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Reply { embed, .. } => Some(embed),
                _ => None,
            })
            .collect()
    }

    pub fn private_messages(&self) -> Vec<EmbedDocument> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Private { embed, .. } => Some(embed),
                _ => None,
            })
            .collect()
    }

    /// True if any create, edit or delete call was issued.
    pub fn mutated(&self) -> bool {
        self.calls().iter().any(|c| {
            matches!(
                c,
                Call::CreateWebhook { .. } | Call::EditWebhook { .. } | Call::DeleteWebhook(_)
            )
        })
    }

    pub fn webhook_name(&self, id: u64) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .webhooks
            .get(&id)
            .map(|h| h.name.clone())
    }

    fn record(&self, call: Call, operation: &'static str) -> Result<(), PlatformError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        match state.failures.get(operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl Platform for MockPlatform {
    fn bot_user_id(&self) -> u64 {
        BOT_ID
    }

    async fn fetch_message(
        &self,
        channel_id: u64,
        message_id: u64,
    ) -> Result<MessageSnapshot, PlatformError> {
        self.record(
            Call::FetchMessage {
                channel_id,
                message_id,
            },
            "fetch_message",
        )?;
        self.state
            .lock()
            .unwrap()
            .messages
            .get(&(channel_id, message_id))
            .cloned()
            .ok_or_else(|| not_found(10008))
    }

    async fn fetch_channel(&self, channel_id: u64) -> Result<ChannelInfo, PlatformError> {
        self.record(Call::FetchChannel(channel_id), "fetch_channel")?;
        self.state
            .lock()
            .unwrap()
            .channels
            .get(&channel_id)
            .cloned()
            .ok_or_else(|| not_found(10003))
    }

    async fn fetch_user(&self, user_id: u64) -> Result<UserProfile, PlatformError> {
        self.record(Call::FetchUser(user_id), "fetch_user")?;
        self.state
            .lock()
            .unwrap()
            .users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| not_found(10013))
    }

    async fn fetch_guild(&self, guild_id: u64) -> Result<GuildProfile, PlatformError> {
        self.record(Call::FetchGuild(guild_id), "fetch_guild")?;
        self.state
            .lock()
            .unwrap()
            .guilds
            .get(&guild_id)
            .cloned()
            .ok_or_else(|| not_found(10004))
    }

    async fn permissions_in(
        &self,
        channel_id: u64,
        user_id: u64,
    ) -> Result<ChannelPermissions, PlatformError> {
        self.record(
            Call::Permissions {
                channel_id,
                user_id,
            },
            "permissions_in",
        )?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .permissions
            .get(&(channel_id, user_id))
            .copied()
            .unwrap_or_else(ChannelPermissions::all))
    }

    async fn guild_webhooks(&self, guild_id: u64) -> Result<Vec<WebhookRecord>, PlatformError> {
        self.record(Call::GuildWebhooks(guild_id), "guild_webhooks")?;
        let mut hooks: Vec<_> = self
            .state
            .lock()
            .unwrap()
            .webhooks
            .values()
            .filter(|h| h.guild_id == Some(guild_id))
            .cloned()
            .collect();
        hooks.sort_by_key(|h| h.id);
        Ok(hooks)
    }

    async fn fetch_webhook(&self, webhook_id: u64) -> Result<WebhookRecord, PlatformError> {
        self.record(Call::FetchWebhook(webhook_id), "fetch_webhook")?;
        self.state
            .lock()
            .unwrap()
            .webhooks
            .get(&webhook_id)
            .cloned()
            .ok_or_else(|| not_found(10015))
    }

    async fn create_webhook(
        &self,
        channel_id: u64,
        name: &str,
        avatar: Option<&Avatar>,
    ) -> Result<WebhookRecord, PlatformError> {
        self.record(
            Call::CreateWebhook {
                channel_id,
                name: name.to_string(),
                avatar: avatar.map(|a| a.data.clone()),
            },
            "create_webhook",
        )?;
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let mut hook = webhook(state.next_id, channel_id, Some("fresh-token"));
        hook.name = name.to_string();
        if avatar.is_some() {
            hook.avatar = Some("uploaded".to_string());
        }
        state.webhooks.insert(hook.id, hook.clone());
        Ok(hook)
    }

    async fn edit_webhook(&self, webhook_id: u64, edit: &EditRequest) -> Result<(), PlatformError> {
        self.record(
            Call::EditWebhook {
                webhook_id,
                name: edit.name().map(String::from),
                avatar: edit.avatar().map(|a| a.data.clone()),
            },
            "edit_webhook",
        )?;
        let mut state = self.state.lock().unwrap();
        let hook = state
            .webhooks
            .get_mut(&webhook_id)
            .ok_or_else(|| not_found(10015))?;
        if let Some(name) = edit.name() {
            hook.name = name.to_string();
        }
        if edit.avatar().is_some() {
            hook.avatar = Some("edited".to_string());
        }
        Ok(())
    }

    async fn delete_webhook(&self, webhook_id: u64) -> Result<(), PlatformError> {
        self.record(Call::DeleteWebhook(webhook_id), "delete_webhook")?;
        self.state
            .lock()
            .unwrap()
            .webhooks
            .remove(&webhook_id)
            .map(|_| ())
            .ok_or_else(|| not_found(10015))
    }

    async fn read_attachment(&self, attachment: &Attachment) -> Result<Vec<u8>, PlatformError> {
        self.record(Call::ReadAttachment(attachment.url.clone()), "read_attachment")?;
        self.state
            .lock()
            .unwrap()
            .attachments
            .get(&attachment.url)
            .cloned()
            .ok_or_else(|| PlatformError::new(DiscordErrorCode::Unknown, 404, "no such file"))
    }

    async fn send_reply(&self, channel_id: u64, embed: &EmbedDocument) -> Result<(), PlatformError> {
        self.record(
            Call::Reply {
                channel_id,
                embed: embed.clone(),
            },
            "send_reply",
        )
    }

    async fn send_private(&self, user_id: u64, embed: &EmbedDocument) -> Result<(), PlatformError> {
        self.record(
            Call::Private {
                user_id,
                embed: embed.clone(),
            },
            "send_private",
        )
    }

    async fn prompt_confirmation(
        &self,
        channel_id: u64,
        embed: &EmbedDocument,
        _timeout: Duration,
    ) -> Result<mpsc::Receiver<GateResponse>, PlatformError> {
        self.record(
            Call::Prompt {
                channel_id,
                embed: embed.clone(),
            },
            "prompt_confirmation",
        )?;
        let responses = std::mem::take(&mut self.state.lock().unwrap().gate_responses);
        let (tx, rx) = mpsc::channel(responses.len().max(1));
        for response in responses {
            // Capacity covers every queued response.
            let _ = tx.try_send(response);
        }
        Ok(rx)
    }
}
