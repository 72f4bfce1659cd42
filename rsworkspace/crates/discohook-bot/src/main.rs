//! Discohook helper bot
//!
//! Restores existing Discord messages as Discohook builder links, manages
//! the webhooks of the servers it is in and links full-size emoji, avatars
//! and server icons, driven by prefix commands.

mod config;
mod confirmation;
mod dispatch;
mod encoder;
mod errors;
mod guards;
mod handlers;
mod health;
#[cfg(test)]
mod mock;
mod platform;
mod restore;
mod shortener;
mod utilities;
mod webhooks;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use secrecy::{ExposeSecret, SecretString};
use serenity::model::gateway::GatewayIntents;
use serenity::prelude::*;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::handlers::Handler;
use crate::health::AppState;

/// Discohook bot CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/discohook-bot.toml")]
    config: String,

    /// Discord bot token (overrides config file)
    #[arg(long, env = "DISCORD_BOT_TOKEN")]
    bot_token: Option<String>,

    /// Command prefix (overrides config file)
    #[arg(long, env = "DISCORD_COMMAND_PREFIX")]
    prefix: Option<String>,

    /// Health check server port
    #[arg(long, env = "HEALTH_CHECK_PORT", default_value = "3001")]
    health_port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "discohook_bot=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Discohook bot");

    let args = Args::parse();

    let mut config = if std::path::Path::new(&args.config).exists() {
        info!("Loading config from file: {}", args.config);
        Config::from_file(&args.config)?
    } else {
        info!("Config file not found, loading from environment");
        Config::from_env()?
    };
    if let Some(bot_token) = args.bot_token {
        config.discord.bot_token = SecretString::from(bot_token);
    }
    if let Some(prefix) = args.prefix {
        config.discord.command_prefix = prefix;
    }

    info!(
        prefix = %config.discord.command_prefix,
        builder_host = %config.discohook.builder_host,
        "Command prefix and builder host configured"
    );

    let http = reqwest::Client::builder()
        .user_agent(concat!("discohook-bot/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let dispatcher = Arc::new(Dispatcher::new(&config, http));

    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILDS
        | GatewayIntents::GUILD_WEBHOOKS;

    let mut client = Client::builder(config.discord.bot_token.expose_secret(), intents)
        .event_handler(Handler)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create Discord client: {}", e))?;

    let health_state = AppState::new();

    {
        let mut data = client.data.write().await;
        data.insert::<Dispatcher>(dispatcher);
        data.insert::<AppState>(health_state.clone());
    }

    let health_port = args.health_port;
    tokio::spawn(async move {
        if let Err(e) = health::start_health_server(health_state, health_port).await {
            error!("Health server error: {}", e);
        }
    });

    // Graceful shutdown: close all shards on SIGTERM or Ctrl+C.
    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => {}
                        _ = sigterm.recv() => {}
                    }
                }
                Err(e) => {
                    error!("Failed to install SIGTERM handler: {}", e);
                    tokio::signal::ctrl_c().await.ok();
                }
            }
        }
        #[cfg(not(unix))]
        {
            tokio::signal::ctrl_c().await.ok();
        }
        info!("Shutdown signal received, stopping Discord client...");
        shard_manager.shutdown_all().await;
    });

    info!("Starting Discord gateway connection...");

    client
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("Discord client error: {}", e))?;

    info!("Discohook bot stopped");
    Ok(())
}
