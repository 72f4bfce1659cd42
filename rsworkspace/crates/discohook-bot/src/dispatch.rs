//! Command routing
//!
//! Parses message content, runs the command's guards, invokes the handler
//! and posts either its replies or a rendered error.

use discohook_types::{
    Attachment, BotCommand, CommandError, CommandGroup, DiscordErrorCode, EmbedDocument,
    ExternalFailure,
};
use serenity::prelude::TypeMapKey;
use std::sync::Arc;
use tracing::{debug, error};

use crate::config::Config;
use crate::encoder::MessageEncoder;
use crate::errors::log_command_error;
use crate::guards::{guards_for, run_guards, CooldownTracker};
use crate::platform::Platform;
use crate::restore::RestoreService;
use crate::shortener::ShortLinkResolver;
use crate::utilities;
use crate::webhooks::WebhookManager;

const ERROR_COLOR: u32 = 0xED4245;

/// Who invoked a command, and where.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub user_id: u64,
    /// `None` in DMs.
    pub guild_id: Option<u64>,
    pub channel_id: u64,
    /// Files attached to the command message.
    pub attachments: Vec<Attachment>,
}

/// Send to the user's DMs; a refusal is reported to them, never worked
/// around by posting publicly.
pub(crate) async fn deliver_privately<P: Platform>(
    platform: &P,
    user_id: u64,
    embed: &EmbedDocument,
) -> Result<(), CommandError> {
    platform
        .send_private(user_id, embed)
        .await
        .map_err(|e| match e.code {
            DiscordErrorCode::CannotSendToUser => {
                CommandError::from(ExternalFailure::DirectMessageRefused)
            }
            _ if e.is_forbidden() => CommandError::from(ExternalFailure::DirectMessageRefused),
            _ => CommandError::from(e),
        })
}

pub struct Dispatcher {
    prefix: String,
    restore: RestoreService,
    webhooks: WebhookManager,
    cooldowns: CooldownTracker,
    http: reqwest::Client,
}

impl TypeMapKey for Dispatcher {
    type Value = Arc<Dispatcher>;
}

impl Dispatcher {
    pub fn new(config: &Config, http: reqwest::Client) -> Self {
        let prefix = config.discord.command_prefix.clone();
        let encoder = MessageEncoder::new(config.discohook.builder_host.clone());
        let shortener = ShortLinkResolver::new(http.clone(), config.discohook.share_endpoint.clone());
        Self {
            restore: RestoreService::new(encoder, shortener),
            webhooks: WebhookManager::new(
                prefix.clone(),
                config.discohook.page_size(),
                config.discohook.confirmation_timeout(),
            ),
            prefix,
            cooldowns: CooldownTracker::new(),
            http,
        }
    }

    /// HTTP client shared with attachment downloads.
    pub fn http_client(&self) -> reqwest::Client {
        self.http.clone()
    }

    /// Handle one message. Returns `false` when it is not a command.
    pub async fn handle<P: Platform>(&self, platform: &P, inv: &Invocation, content: &str) -> bool {
        let Some(parsed) = BotCommand::parse(content, &self.prefix) else {
            return false;
        };

        let (name, outcome) = match parsed {
            Ok(command) => {
                let name = command.name();
                debug!(command = name, user_id = inv.user_id, "Dispatching command");
                (name, self.run(platform, inv, &command).await)
            }
            Err(input) => ("parse", Err(CommandError::from(input))),
        };

        let replies = match outcome {
            Ok(replies) => replies,
            Err(err) => {
                log_command_error(name, inv.user_id, &err);
                vec![error_embed(&err)]
            }
        };

        for reply in &replies {
            if let Err(e) = platform.send_reply(inv.channel_id, reply).await {
                error!(command = name, "Failed to send reply: {}", e);
            }
        }
        true
    }

    async fn run<P: Platform>(
        &self,
        platform: &P,
        inv: &Invocation,
        command: &BotCommand,
    ) -> Result<Vec<EmbedDocument>, CommandError> {
        run_guards(
            &guards_for(command),
            command.name(),
            inv,
            platform,
            &self.cooldowns,
        )
        .await?;

        match command {
            BotCommand::Help { group } => Ok(vec![help_embed(&self.prefix, *group)]),
            BotCommand::Restore { messages } => {
                self.restore.restore(platform, inv, messages).await
            }
            BotCommand::RestoreEdit { messages } => {
                self.restore.restore_edit(platform, inv, messages).await
            }
            BotCommand::WebhookList { channel } => {
                self.webhooks.list(platform, inv, channel.as_ref()).await
            }
            BotCommand::WebhookGet { webhook } => self.webhooks.get(platform, inv, webhook).await,
            BotCommand::WebhookUrl { webhook } => self.webhooks.url(platform, inv, webhook).await,
            BotCommand::WebhookNew { channel, name } => {
                self.webhooks.create(platform, inv, channel, name).await
            }
            BotCommand::WebhookEdit { webhook, new_name } => {
                self.webhooks
                    .edit(platform, inv, webhook, new_name.clone())
                    .await
            }
            BotCommand::WebhookDelete { webhook } => {
                self.webhooks.delete(platform, inv, webhook).await
            }
            BotCommand::Emoji { emoji } => Ok(utilities::emoji(emoji)),
            BotCommand::Avatar { user, static_only } => {
                utilities::avatar(platform, inv, user.as_ref(), *static_only).await
            }
            BotCommand::Icon { static_only } => utilities::icon(platform, inv, *static_only).await,
        }
    }
}

pub fn error_embed(err: &CommandError) -> EmbedDocument {
    let mut embed = EmbedDocument::titled(err.title()).description(err.description());
    embed.color = Some(ERROR_COLOR);
    embed
}

const RESTORE_HELP: &[(&str, &str)] = &[
    (
        "restore <messages...>",
        "Sends a Discohook link for a given Discord message link",
    ),
    (
        "restore edit <messages...>",
        "Sends a Discohook link with the webhook filled in for faster editing",
    ),
];

const WEBHOOK_HELP: &[(&str, &str)] = &[
    ("webhook list [channel]", "Lists webhooks for the server or a given channel"),
    ("webhook get <webhook>", "Shows data for a given webhook"),
    ("webhook url <webhook>", "Obtains the URL for a given webhook"),
    (
        "webhook new <channel> <name>",
        "Creates a new webhook for a given channel",
    ),
    (
        "webhook edit <webhook> [new name]",
        "Edits an existing webhook; attach an image to change its avatar",
    ),
    (
        "webhook delete <webhook>",
        "Deletes a given webhook; its messages are kept",
    ),
];

const UTILITY_HELP: &[(&str, &str)] = &[
    ("big <emoji>", "Gives the URL for a custom emoji"),
    (
        "avatar [static] [user]",
        "Gives the avatar URL for a user, or yourself; `static` skips animation",
    ),
    (
        "icon [static]",
        "Gives the icon URL for this server; `static` skips animation",
    ),
];

pub fn help_embed(prefix: &str, group: CommandGroup) -> EmbedDocument {
    let (title, entries): (&str, Vec<&(&str, &str)>) = match group {
        CommandGroup::All => (
            "Help",
            RESTORE_HELP
                .iter()
                .chain(WEBHOOK_HELP)
                .chain(UTILITY_HELP)
                .collect(),
        ),
        CommandGroup::Restore => ("Help: restore", RESTORE_HELP.iter().collect()),
        CommandGroup::Webhook => ("Help: webhook", WEBHOOK_HELP.iter().collect()),
    };
    entries
        .into_iter()
        .fold(EmbedDocument::titled(title), |embed, (usage, about)| {
            embed.field(format!("{}{}", prefix, usage), *about, false)
        })
}
