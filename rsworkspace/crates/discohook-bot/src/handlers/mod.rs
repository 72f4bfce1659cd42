//! Serenity event handler implementation

use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use tracing::{error, info};

use crate::dispatch::{Dispatcher, Invocation};
use crate::health::AppState;
use crate::platform::{convert_attachment, SerenityPlatform};

pub struct Handler;

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            "Discord bot connected as {}#{:04}",
            ready.user.name,
            ready.user.discriminator.map_or(0, |d| d.get())
        );

        let data = ctx.data.read().await;
        if let Some(state) = data.get::<AppState>() {
            state.set_bot_username(ready.user.name.clone()).await;
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        // Skip bot and webhook messages
        if msg.author.bot || msg.webhook_id.is_some() {
            return;
        }

        let (dispatcher, health) = {
            let data = ctx.data.read().await;
            match (data.get::<Dispatcher>(), data.get::<AppState>()) {
                (Some(d), Some(h)) => (d.clone(), h.clone()),
                _ => {
                    error!("Dispatcher not found in context data");
                    return;
                }
            }
        };

        let invocation = Invocation {
            user_id: msg.author.id.get(),
            guild_id: msg.guild_id.map(|g| g.get()),
            channel_id: msg.channel_id.get(),
            attachments: msg.attachments.iter().map(convert_attachment).collect(),
        };
        let platform = SerenityPlatform::new(ctx, dispatcher.http_client());

        if dispatcher.handle(&platform, &invocation, &msg.content).await {
            health.record_command();
        }
    }
}
