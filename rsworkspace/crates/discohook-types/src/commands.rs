//! Prefix command grammar
//!
//! Parses message content such as `d.webhook edit 123 "New name"` into a
//! [`BotCommand`]. Argument references are only parsed here; resolving them
//! against the platform happens in the bot crate.

use url::Url;

use crate::errors::InputError;

const DISCORD_HOSTS: &[&str] = &[
    "discord.com",
    "ptb.discord.com",
    "canary.discord.com",
    "discordapp.com",
    "ptb.discordapp.com",
    "canary.discordapp.com",
];

/// Reference to a message, as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageLink {
    /// `None` for DM links and for references without a guild part.
    pub guild_id: Option<u64>,
    /// `None` means "the channel the command was sent in".
    pub channel_id: Option<u64>,
    pub message_id: u64,
    pub raw: String,
}

impl MessageLink {
    /// Accepts a jump link, `<channel>-<message>`, or a bare message id.
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        let invalid = || InputError::InvalidArgument {
            value: raw.to_string(),
            expected: "message link",
        };

        if let Ok(url) = Url::parse(raw) {
            if !is_discord_url(&url) {
                return Err(invalid());
            }
            let segments: Vec<&str> = url
                .path_segments()
                .map(|s| s.filter(|p| !p.is_empty()).collect())
                .unwrap_or_default();
            return match segments.as_slice() {
                ["channels", guild, channel, message] => {
                    let guild_id = match *guild {
                        "@me" => None,
                        id => Some(id.parse().map_err(|_| invalid())?),
                    };
                    Ok(Self {
                        guild_id,
                        channel_id: Some(channel.parse().map_err(|_| invalid())?),
                        message_id: message.parse().map_err(|_| invalid())?,
                        raw: raw.to_string(),
                    })
                }
                _ => Err(invalid()),
            };
        }

        if let Some((channel, message)) = raw.split_once('-') {
            return Ok(Self {
                guild_id: None,
                channel_id: Some(channel.parse().map_err(|_| invalid())?),
                message_id: message.parse().map_err(|_| invalid())?,
                raw: raw.to_string(),
            });
        }

        Ok(Self {
            guild_id: None,
            channel_id: None,
            message_id: raw.parse().map_err(|_| invalid())?,
            raw: raw.to_string(),
        })
    }
}

/// Reference to a channel: a `<#id>` mention or a bare id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRef {
    pub id: u64,
    pub raw: String,
}

impl ChannelRef {
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        let id = channel_mention_id(raw)
            .or_else(|| raw.parse().ok())
            .ok_or_else(|| InputError::InvalidArgument {
                value: raw.to_string(),
                expected: "channel",
            })?;
        Ok(Self {
            id,
            raw: raw.to_string(),
        })
    }
}

/// Reference to a webhook: its URL or a bare id.
///
/// A bare id may just as well name a channel. That can only be told apart
/// against the platform, so `from_url` records whether the reference was
/// unambiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookRef {
    pub id: u64,
    pub from_url: bool,
    pub raw: String,
}

impl WebhookRef {
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        if channel_mention_id(raw).is_some() {
            return Err(InputError::ExpectedWebhook(raw.to_string()));
        }

        let invalid = || InputError::InvalidArgument {
            value: raw.to_string(),
            expected: "webhook",
        };

        if let Ok(url) = Url::parse(raw) {
            if !is_discord_url(&url) {
                return Err(invalid());
            }
            let segments: Vec<&str> = url
                .path_segments()
                .map(|s| s.filter(|p| !p.is_empty()).collect())
                .unwrap_or_default();
            let rest = match segments.as_slice() {
                ["api", version, rest @ ..] if is_api_version(version) => rest,
                ["api", rest @ ..] => rest,
                _ => return Err(invalid()),
            };
            return match rest {
                ["webhooks", id, _token] => Ok(Self {
                    id: id.parse().map_err(|_| invalid())?,
                    from_url: true,
                    raw: raw.to_string(),
                }),
                _ => Err(invalid()),
            };
        }

        Ok(Self {
            id: raw.parse().map_err(|_| invalid())?,
            from_url: false,
            raw: raw.to_string(),
        })
    }
}

fn is_discord_url(url: &Url) -> bool {
    matches!(url.scheme(), "https" | "http")
        && url
            .host_str()
            .is_some_and(|host| DISCORD_HOSTS.contains(&host))
}

fn is_api_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

fn channel_mention_id(raw: &str) -> Option<u64> {
    raw.strip_prefix("<#")?.strip_suffix('>')?.parse().ok()
}

/// Custom emoji, as written in a message: `<:name:id>` or `<a:name:id>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomEmoji {
    pub id: u64,
    pub name: String,
    pub animated: bool,
}

impl CustomEmoji {
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        let invalid = || InputError::InvalidArgument {
            value: raw.to_string(),
            expected: "custom emoji",
        };
        let inner = raw
            .strip_prefix('<')
            .and_then(|r| r.strip_suffix('>'))
            .ok_or_else(invalid)?;
        let (animated, inner) = match inner.strip_prefix("a:") {
            Some(rest) => (true, rest),
            None => (false, inner.strip_prefix(':').ok_or_else(invalid)?),
        };
        let (name, id) = inner.split_once(':').ok_or_else(invalid)?;
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(invalid());
        }
        Ok(Self {
            id: id.parse().map_err(|_| invalid())?,
            name: name.to_string(),
            animated,
        })
    }

    pub fn url(&self) -> String {
        let ext = if self.animated { "gif" } else { "png" };
        format!("https://cdn.discordapp.com/emojis/{}.{}", self.id, ext)
    }
}

/// Reference to a user: a `<@id>`/`<@!id>` mention or a bare id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    pub id: u64,
    pub raw: String,
}

impl UserRef {
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        let mention = raw
            .strip_prefix("<@")
            .and_then(|r| r.strip_suffix('>'))
            .map(|r| r.strip_prefix('!').unwrap_or(r));
        let id = mention
            .unwrap_or(raw)
            .parse()
            .map_err(|_| InputError::InvalidArgument {
                value: raw.to_string(),
                expected: "user",
            })?;
        Ok(Self {
            id,
            raw: raw.to_string(),
        })
    }
}

/// Command group, for help output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    All,
    Restore,
    Webhook,
}

/// A parsed bot command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Restore { messages: Vec<MessageLink> },
    RestoreEdit { messages: Vec<MessageLink> },
    WebhookList { channel: Option<ChannelRef> },
    WebhookGet { webhook: WebhookRef },
    WebhookUrl { webhook: WebhookRef },
    WebhookNew { channel: ChannelRef, name: String },
    WebhookEdit {
        webhook: WebhookRef,
        new_name: Option<String>,
    },
    WebhookDelete { webhook: WebhookRef },
    Emoji { emoji: CustomEmoji },
    /// `user` defaults to the invoking user.
    Avatar {
        user: Option<UserRef>,
        static_only: bool,
    },
    Icon { static_only: bool },
    Help { group: CommandGroup },
}

impl BotCommand {
    /// Parse message content.
    ///
    /// Returns `None` when the content is not addressed to the bot at all,
    /// and `Some(Err(_))` when it is but the arguments are malformed.
    pub fn parse(content: &str, prefix: &str) -> Option<Result<Self, InputError>> {
        let body = content.trim_start().strip_prefix(prefix)?;
        let tokens = tokenize(body);
        let (head, args) = tokens.split_first()?;

        match head.text.to_lowercase().as_str() {
            "help" => Some(Ok(Self::Help {
                group: CommandGroup::All,
            })),
            "restore" => Some(Self::parse_restore(args)),
            "webhook" | "webhooks" => Some(Self::parse_webhook(body, args)),
            "big" | "bigemoji" | "emoji" => Some(Self::parse_emoji(args)),
            "avatar" | "av" | "pfp" => Some(Self::parse_avatar(args)),
            "icon" | "servericon" | "guildicon" => Some(Ok(Self::Icon {
                static_only: is_static(args.first()),
            })),
            _ => None,
        }
    }

    fn parse_restore(args: &[Token]) -> Result<Self, InputError> {
        let (edit, links) = match args.split_first() {
            Some((first, rest)) if first.text.eq_ignore_ascii_case("edit") => (true, rest),
            _ => (false, args),
        };
        if links.is_empty() {
            return Err(InputError::MissingArgument("messages"));
        }
        let messages = links
            .iter()
            .map(|raw| MessageLink::parse(&raw.text))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(if edit {
            Self::RestoreEdit { messages }
        } else {
            Self::Restore { messages }
        })
    }

    fn parse_webhook(body: &str, args: &[Token]) -> Result<Self, InputError> {
        let help = Self::Help {
            group: CommandGroup::Webhook,
        };
        let Some((sub, rest)) = args.split_first() else {
            return Ok(help);
        };

        match sub.text.to_lowercase().as_str() {
            "list" => Ok(Self::WebhookList {
                channel: rest.first().map(|c| ChannelRef::parse(&c.text)).transpose()?,
            }),
            "get" | "show" => Ok(Self::WebhookGet {
                webhook: webhook_arg(rest)?,
            }),
            "url" => Ok(Self::WebhookUrl {
                webhook: webhook_arg(rest)?,
            }),
            "new" | "add" | "create" => {
                let (channel, name) = rest
                    .split_first()
                    .ok_or(InputError::MissingArgument("channel"))?;
                let name = rest_of_line(body, name).ok_or(InputError::MissingArgument("name"))?;
                Ok(Self::WebhookNew {
                    channel: ChannelRef::parse(&channel.text)?,
                    name,
                })
            }
            "edit" | "rename" | "avatar" => {
                let (webhook, name) = rest
                    .split_first()
                    .ok_or(InputError::MissingArgument("webhook"))?;
                Ok(Self::WebhookEdit {
                    webhook: WebhookRef::parse(&webhook.text)?,
                    new_name: rest_of_line(body, name),
                })
            }
            "delete" | "remove" => Ok(Self::WebhookDelete {
                webhook: webhook_arg(rest)?,
            }),
            _ => Ok(help),
        }
    }

    fn parse_emoji(args: &[Token]) -> Result<Self, InputError> {
        let raw = args.first().ok_or(InputError::MissingArgument("emoji"))?;
        Ok(Self::Emoji {
            emoji: CustomEmoji::parse(&raw.text)?,
        })
    }

    fn parse_avatar(args: &[Token]) -> Result<Self, InputError> {
        let static_only = is_static(args.first());
        let user_arg = if static_only { args.get(1) } else { args.first() };
        Ok(Self::Avatar {
            user: user_arg.map(|u| UserRef::parse(&u.text)).transpose()?,
            static_only,
        })
    }

    /// Qualified command name, e.g. `webhook edit`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Restore { .. } => "restore",
            Self::RestoreEdit { .. } => "restore edit",
            Self::WebhookList { .. } => "webhook list",
            Self::WebhookGet { .. } => "webhook get",
            Self::WebhookUrl { .. } => "webhook url",
            Self::WebhookNew { .. } => "webhook new",
            Self::WebhookEdit { .. } => "webhook edit",
            Self::WebhookDelete { .. } => "webhook delete",
            Self::Emoji { .. } => "big",
            Self::Avatar {
                static_only: false,
                ..
            } => "avatar",
            Self::Avatar {
                static_only: true, ..
            } => "avatar static",
            Self::Icon { static_only: false } => "icon",
            Self::Icon { static_only: true } => "icon static",
            Self::Help { .. } => "help",
        }
    }
}

fn is_static(arg: Option<&Token>) -> bool {
    arg.is_some_and(|a| !a.quoted && a.text.eq_ignore_ascii_case("static"))
}

fn webhook_arg(args: &[Token]) -> Result<WebhookRef, InputError> {
    let raw = args.first().ok_or(InputError::MissingArgument("webhook"))?;
    WebhookRef::parse(&raw.text)
}

/// Everything from the first of `args` to the end of the input, as typed.
///
/// A lone quoted argument gives its unquoted text instead.
fn rest_of_line(body: &str, args: &[Token]) -> Option<String> {
    let rest = match args {
        [] => return None,
        [only] if only.quoted => only.text.trim(),
        [first, ..] => body[first.start..].trim(),
    };
    (!rest.is_empty()).then(|| rest.to_string())
}

/// One argument and where it starts in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    text: String,
    /// Byte offset of the token's first character, opening quote included.
    start: usize,
    quoted: bool,
}

/// Split on whitespace; double quotes group words into one argument.
fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut start = None;
    let mut in_quotes = false;
    let mut quoted = false;

    for (i, c) in input.char_indices() {
        match c {
            '"' => {
                start.get_or_insert(i);
                in_quotes = !in_quotes;
                quoted = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if let Some(start) = start.take() {
                    tokens.push(Token {
                        text: std::mem::take(&mut current),
                        start,
                        quoted,
                    });
                }
                quoted = false;
            }
            c => {
                start.get_or_insert(i);
                current.push(c);
            }
        }
    }
    if let Some(start) = start {
        tokens.push(Token {
            text: current,
            start,
            quoted,
        });
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<BotCommand, InputError> {
        BotCommand::parse(content, "d.").expect("addressed to the bot")
    }

    fn texts(input: &str) -> Vec<String> {
        tokenize(input).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_tokenize_quotes() {
        assert_eq!(
            texts(r#"edit 123 "My new  name" tail"#),
            vec!["edit", "123", "My new  name", "tail"]
        );
        assert_eq!(texts("  a   b "), vec!["a", "b"]);
        assert_eq!(texts(r#"x """#), vec!["x", ""]);
    }

    #[test]
    fn test_tokenize_records_offsets() {
        let tokens = tokenize(r#"  new "a b"  c"#);
        let starts: Vec<usize> = tokens.iter().map(|t| t.start).collect();
        assert_eq!(starts, vec![2, 6, 13]);
        assert!(tokens[1].quoted);
        assert!(!tokens[2].quoted);
    }

    #[test]
    fn test_not_addressed_to_bot() {
        assert!(BotCommand::parse("hello there", "d.").is_none());
        assert!(BotCommand::parse("d.ping", "d.").is_none());
        assert!(BotCommand::parse("d.", "d.").is_none());
    }

    #[test]
    fn test_message_link_forms() {
        let link = MessageLink::parse("https://discord.com/channels/1/2/3").unwrap();
        assert_eq!(
            (link.guild_id, link.channel_id, link.message_id),
            (Some(1), Some(2), 3)
        );

        let link = MessageLink::parse("https://canary.discordapp.com/channels/@me/2/3/").unwrap();
        assert_eq!((link.guild_id, link.channel_id), (None, Some(2)));

        let link = MessageLink::parse("2-3").unwrap();
        assert_eq!((link.channel_id, link.message_id), (Some(2), 3));

        let link = MessageLink::parse("3").unwrap();
        assert_eq!((link.channel_id, link.message_id), (None, 3));
    }

    #[test]
    fn test_message_link_rejects_foreign_hosts() {
        assert!(MessageLink::parse("https://example.com/channels/1/2/3").is_err());
        assert!(MessageLink::parse("https://discord.com/invite/abc").is_err());
        assert!(MessageLink::parse("not-a-link").is_err());
    }

    #[test]
    fn test_restore_variants() {
        assert_eq!(
            parse("d.restore 2-3 4-5").unwrap(),
            BotCommand::Restore {
                messages: vec![
                    MessageLink::parse("2-3").unwrap(),
                    MessageLink::parse("4-5").unwrap()
                ]
            }
        );
        assert!(matches!(
            parse("d.restore edit https://discord.com/channels/1/2/3").unwrap(),
            BotCommand::RestoreEdit { messages } if messages.len() == 1
        ));
    }

    #[test]
    fn test_restore_requires_messages() {
        assert_eq!(
            parse("d.restore").unwrap_err(),
            InputError::MissingArgument("messages")
        );
        assert_eq!(
            parse("d.restore edit").unwrap_err(),
            InputError::MissingArgument("messages")
        );
    }

    #[test]
    fn test_webhook_ref_forms() {
        let hook = WebhookRef::parse("https://discord.com/api/webhooks/123/tok-en_x").unwrap();
        assert_eq!((hook.id, hook.from_url), (123, true));

        let hook = WebhookRef::parse("https://ptb.discord.com/api/v10/webhooks/123/tok").unwrap();
        assert_eq!(hook.id, 123);

        let hook = WebhookRef::parse("123").unwrap();
        assert_eq!((hook.id, hook.from_url), (123, false));
    }

    #[test]
    fn test_webhook_ref_rejects_channel_mention() {
        assert_eq!(
            WebhookRef::parse("<#42>").unwrap_err(),
            InputError::ExpectedWebhook("<#42>".to_string())
        );
    }

    #[test]
    fn test_webhook_ref_rejects_garbage() {
        assert!(WebhookRef::parse("https://discord.com/api/webhooks/abc/t").is_err());
        assert!(WebhookRef::parse("https://example.com/api/webhooks/1/t").is_err());
        assert!(WebhookRef::parse("hook-name").is_err());
    }

    #[test]
    fn test_channel_ref_forms() {
        assert_eq!(ChannelRef::parse("<#42>").unwrap().id, 42);
        assert_eq!(ChannelRef::parse("42").unwrap().id, 42);
        assert!(ChannelRef::parse("#general").is_err());
    }

    #[test]
    fn test_webhook_subcommand_aliases() {
        for (content, name) in [
            ("d.webhook list", "webhook list"),
            ("d.webhook list <#5>", "webhook list"),
            ("d.webhook show 1", "webhook get"),
            ("d.webhook url 1", "webhook url"),
            ("d.webhook add <#5> Hook", "webhook new"),
            ("d.webhook create <#5> Hook", "webhook new"),
            ("d.webhook rename 1 Name", "webhook edit"),
            ("d.webhook avatar 1", "webhook edit"),
            ("d.webhook remove 1", "webhook delete"),
        ] {
            assert_eq!(parse(content).unwrap().name(), name, "{}", content);
        }
    }

    #[test]
    fn test_webhook_new_takes_rest_as_name() {
        assert_eq!(
            parse("d.webhook new <#5> Release   notes bot  ").unwrap(),
            BotCommand::WebhookNew {
                channel: ChannelRef::parse("<#5>").unwrap(),
                name: "Release   notes bot".to_string(),
            }
        );
    }

    #[test]
    fn test_rest_of_line_keeps_quotes_inside_names() {
        assert_eq!(
            parse(r#"d.webhook new 5 "Quoted"   and not"#).unwrap(),
            BotCommand::WebhookNew {
                channel: ChannelRef::parse("5").unwrap(),
                name: r#""Quoted"   and not"#.to_string(),
            }
        );
        assert_eq!(
            parse(r#"d.webhook rename 9 The  "Best" hook"#).unwrap(),
            BotCommand::WebhookEdit {
                webhook: WebhookRef::parse("9").unwrap(),
                new_name: Some(r#"The  "Best" hook"#.to_string()),
            }
        );
    }

    #[test]
    fn test_rest_of_line_with_non_ascii_prefix() {
        assert_eq!(
            parse("d.webhook new <#5> Café  ☕ bot").unwrap(),
            BotCommand::WebhookNew {
                channel: ChannelRef::parse("<#5>").unwrap(),
                name: "Café  ☕ bot".to_string(),
            }
        );
    }

    #[test]
    fn test_webhook_new_requires_name() {
        assert_eq!(
            parse("d.webhook new <#5>").unwrap_err(),
            InputError::MissingArgument("name")
        );
    }

    #[test]
    fn test_webhook_edit_name_optional() {
        assert_eq!(
            parse(r#"d.webhook edit 9 "Quoted name""#).unwrap(),
            BotCommand::WebhookEdit {
                webhook: WebhookRef::parse("9").unwrap(),
                new_name: Some("Quoted name".to_string()),
            }
        );
        assert_eq!(
            parse("d.webhook edit 9").unwrap(),
            BotCommand::WebhookEdit {
                webhook: WebhookRef::parse("9").unwrap(),
                new_name: None,
            }
        );
    }

    #[test]
    fn test_webhook_get_with_channel_is_rejected() {
        assert_eq!(
            parse("d.webhook get <#5>").unwrap_err(),
            InputError::ExpectedWebhook("<#5>".to_string())
        );
    }

    #[test]
    fn test_help_fallbacks() {
        assert_eq!(
            parse("d.webhook").unwrap(),
            BotCommand::Help {
                group: CommandGroup::Webhook
            }
        );
        assert_eq!(
            parse("d.webhook frobnicate").unwrap(),
            BotCommand::Help {
                group: CommandGroup::Webhook
            }
        );
        assert_eq!(
            parse("d.help").unwrap(),
            BotCommand::Help {
                group: CommandGroup::All
            }
        );
    }

    #[test]
    fn test_custom_prefix() {
        assert!(BotCommand::parse("!webhook list", "!").is_some());
        assert!(BotCommand::parse("d.webhook list", "!").is_none());
    }

    #[test]
    fn test_custom_emoji_forms() {
        let emoji = CustomEmoji::parse("<:blobwave:123>").unwrap();
        assert_eq!((emoji.id, emoji.name.as_str(), emoji.animated), (123, "blobwave", false));
        assert_eq!(emoji.url(), "https://cdn.discordapp.com/emojis/123.png");

        let emoji = CustomEmoji::parse("<a:party_blob:456>").unwrap();
        assert!(emoji.animated);
        assert_eq!(emoji.url(), "https://cdn.discordapp.com/emojis/456.gif");
    }

    #[test]
    fn test_custom_emoji_rejects_unicode_and_garbage() {
        for raw in ["😀", ":blob:", "<:blob:>", "<:bl ob:1>", "123"] {
            assert_eq!(
                CustomEmoji::parse(raw).unwrap_err(),
                InputError::InvalidArgument {
                    value: raw.to_string(),
                    expected: "custom emoji",
                },
                "{}",
                raw
            );
        }
    }

    #[test]
    fn test_user_ref_forms() {
        assert_eq!(UserRef::parse("<@42>").unwrap().id, 42);
        assert_eq!(UserRef::parse("<@!42>").unwrap().id, 42);
        assert_eq!(UserRef::parse("42").unwrap().id, 42);
        assert!(UserRef::parse("<#42>").is_err());
        assert!(UserRef::parse("someone").is_err());
    }

    #[test]
    fn test_utility_commands() {
        assert_eq!(
            parse("d.big <a:wave:9>").unwrap(),
            BotCommand::Emoji {
                emoji: CustomEmoji::parse("<a:wave:9>").unwrap()
            }
        );
        assert_eq!(
            parse("d.big").unwrap_err(),
            InputError::MissingArgument("emoji")
        );
        assert_eq!(
            parse("d.avatar").unwrap(),
            BotCommand::Avatar {
                user: None,
                static_only: false
            }
        );
        assert_eq!(
            parse("d.avatar static <@!7>").unwrap(),
            BotCommand::Avatar {
                user: Some(UserRef::parse("<@!7>").unwrap()),
                static_only: true
            }
        );
        assert_eq!(
            parse("d.icon STATIC").unwrap(),
            BotCommand::Icon { static_only: true }
        );
    }

    #[test]
    fn test_utility_command_names() {
        for (content, name) in [
            ("d.big <:a:1>", "big"),
            ("d.avatar <@1>", "avatar"),
            ("d.pfp static", "avatar static"),
            ("d.icon", "icon"),
            ("d.icon static", "icon static"),
        ] {
            assert_eq!(parse(content).unwrap().name(), name, "{}", content);
        }
    }
}
