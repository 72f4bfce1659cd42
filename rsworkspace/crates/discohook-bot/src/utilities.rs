//! `big`, `avatar` and `icon`: full-size image links for emoji, users and
//! the current server.

use discohook_types::{
    CommandError, CustomEmoji, EmbedDocument, InputError, NotFound, PlatformError, UserRef,
};
use tracing::debug;

use crate::dispatch::Invocation;
use crate::platform::Platform;

/// Title, link and image of one picture.
fn image_embed(title: String, url: String, id: u64) -> EmbedDocument {
    EmbedDocument::titled(title)
        .description(url.clone())
        .image(url)
        .footer(format!("ID: {}", id))
}

pub fn emoji(emoji: &CustomEmoji) -> Vec<EmbedDocument> {
    vec![image_embed(
        format!("Emoji URL for :{}:", emoji.name),
        emoji.url(),
        emoji.id,
    )]
}

/// Avatar of `user`, or of the invoking user.
pub async fn avatar<P: Platform>(
    platform: &P,
    inv: &Invocation,
    user: Option<&UserRef>,
    static_only: bool,
) -> Result<Vec<EmbedDocument>, CommandError> {
    let user_id = user.map_or(inv.user_id, |u| u.id);
    let profile = platform.fetch_user(user_id).await.map_err(|e| {
        not_found_as(e, || {
            NotFound::User(user.map_or_else(|| user_id.to_string(), |u| u.raw.clone()))
        })
    })?;

    debug!(user_id, static_only, "Showing avatar");
    Ok(vec![image_embed(
        format!("Avatar URL for @{}", profile.tag()),
        profile.avatar_url(static_only),
        profile.id,
    )])
}

/// Icon of the server the command was sent in.
pub async fn icon<P: Platform>(
    platform: &P,
    inv: &Invocation,
    static_only: bool,
) -> Result<Vec<EmbedDocument>, CommandError> {
    let guild_id = inv.guild_id.ok_or(InputError::GuildOnly)?;
    let guild = platform.fetch_guild(guild_id).await?;
    let url = guild.icon_url(static_only).ok_or(NotFound::GuildIcon)?;

    Ok(vec![image_embed(
        format!("Icon URL for {}", guild.name),
        url,
        guild.id,
    )])
}

fn not_found_as(err: PlatformError, missing: impl FnOnce() -> NotFound) -> CommandError {
    if err.is_not_found() {
        missing().into()
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Call, MockPlatform, GUILD_ID};
    use discohook_types::{GuildProfile, UserProfile};

    const USER: u64 = 42;

    fn inv(guild_id: Option<u64>) -> Invocation {
        Invocation {
            user_id: USER,
            guild_id,
            channel_id: 500,
            attachments: vec![],
        }
    }

    fn profile(id: u64, avatar: Option<&str>) -> UserProfile {
        UserProfile {
            id,
            name: format!("user{}", id),
            discriminator: None,
            avatar: avatar.map(String::from),
        }
    }

    fn guild(icon: Option<&str>) -> GuildProfile {
        GuildProfile {
            id: GUILD_ID,
            name: "Discohook".to_string(),
            icon: icon.map(String::from),
        }
    }

    #[test]
    fn test_emoji_embed() {
        let replies = emoji(&CustomEmoji::parse("<a:blobdance:345>").unwrap());
        let embed = &replies[0];
        assert_eq!(embed.title.as_deref(), Some("Emoji URL for :blobdance:"));
        assert_eq!(
            embed.description.as_deref(),
            Some("https://cdn.discordapp.com/emojis/345.gif")
        );
        assert_eq!(
            embed.image.as_ref().map(|i| i.url.as_str()),
            embed.description.as_deref()
        );
        assert_eq!(embed.footer.as_ref().unwrap().text, "ID: 345");
    }

    #[tokio::test]
    async fn test_avatar_defaults_to_author() {
        let platform = MockPlatform::new().with_user(profile(USER, Some("a_feed")));
        let replies = avatar(&platform, &inv(None), None, false).await.unwrap();

        assert_eq!(platform.calls(), vec![Call::FetchUser(USER)]);
        assert_eq!(replies[0].title.as_deref(), Some("Avatar URL for @user42"));
        assert_eq!(
            replies[0].image.as_ref().unwrap().url,
            "https://cdn.discordapp.com/avatars/42/a_feed.gif?size=4096"
        );
        assert_eq!(replies[0].footer.as_ref().unwrap().text, "ID: 42");
    }

    #[tokio::test]
    async fn test_avatar_static_of_mentioned_user() {
        let platform = MockPlatform::new().with_user(profile(7, Some("a_feed")));
        let user = UserRef::parse("<@!7>").unwrap();
        let replies = avatar(&platform, &inv(Some(GUILD_ID)), Some(&user), true)
            .await
            .unwrap();
        assert_eq!(
            replies[0].description.as_deref(),
            Some("https://cdn.discordapp.com/avatars/7/a_feed.png?size=4096")
        );
    }

    #[tokio::test]
    async fn test_avatar_unknown_user() {
        let platform = MockPlatform::new();
        let user = UserRef::parse("<@7>").unwrap();
        let err = avatar(&platform, &inv(None), Some(&user), false)
            .await
            .unwrap_err();
        assert_eq!(err, CommandError::from(NotFound::User("<@7>".to_string())));
    }

    #[tokio::test]
    async fn test_icon() {
        let platform = MockPlatform::new().with_guild(guild(Some("a_cafe")));
        let replies = icon(&platform, &inv(Some(GUILD_ID)), false).await.unwrap();
        assert_eq!(replies[0].title.as_deref(), Some("Icon URL for Discohook"));
        assert_eq!(
            replies[0].image.as_ref().unwrap().url,
            format!("https://cdn.discordapp.com/icons/{}/a_cafe.gif?size=4096", GUILD_ID)
        );
        assert_eq!(
            replies[0].footer.as_ref().unwrap().text,
            format!("ID: {}", GUILD_ID)
        );

        let replies = icon(&platform, &inv(Some(GUILD_ID)), true).await.unwrap();
        assert!(replies[0]
            .description
            .as_deref()
            .unwrap()
            .ends_with("/a_cafe.png?size=4096"));
    }

    #[tokio::test]
    async fn test_icon_missing() {
        let platform = MockPlatform::new().with_guild(guild(None));
        let err = icon(&platform, &inv(Some(GUILD_ID)), false).await.unwrap_err();
        assert_eq!(err, CommandError::from(NotFound::GuildIcon));
        assert_eq!(err.description(), "This server has no icon.");
    }

    #[tokio::test]
    async fn test_icon_in_dm() {
        let platform = MockPlatform::new();
        let err = icon(&platform, &inv(None), false).await.unwrap_err();
        assert_eq!(err, CommandError::from(InputError::GuildOnly));
        assert!(platform.calls().is_empty());
    }
}
