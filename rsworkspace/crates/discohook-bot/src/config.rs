//! Configuration management for discohook-bot

#[path = "config_tests.rs"]
mod config_tests;

use std::fs;
use std::time::Duration;

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;

const DEFAULT_PREFIX: &str = "d.";
const DEFAULT_BUILDER_HOST: &str = "discohook.app";
const DEFAULT_SHARE_ENDPOINT: &str = "https://share.discohook.app/create";
const DEFAULT_CONFIRM_TIMEOUT_SECS: u64 = 60;
const DEFAULT_PAGE_SIZE: usize = 10;
/// Discord caps an embed at 25 fields.
const MAX_PAGE_SIZE: usize = 25;

/// Source of environment variables; swapped for an in-memory map in tests.
pub trait ReadEnv {
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads the real process environment.
pub struct SystemEnv;

impl ReadEnv for SystemEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Complete bot configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub discord: DiscordBotConfig,
    #[serde(default)]
    pub discohook: DiscohookConfig,
}

/// Discord connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordBotConfig {
    /// Bot token from the Discord developer portal
    #[serde(deserialize_with = "deserialize_secret_string")]
    pub bot_token: SecretString,
    #[serde(default = "default_prefix")]
    pub command_prefix: String,
}

/// Builder service and command behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct DiscohookConfig {
    #[serde(default = "default_builder_host")]
    pub builder_host: String,
    #[serde(default = "default_share_endpoint")]
    pub share_endpoint: String,
    #[serde(default = "default_confirm_timeout")]
    pub confirmation_timeout_secs: u64,
    #[serde(default = "default_page_size")]
    pub list_page_size: usize,
}

impl Default for DiscohookConfig {
    fn default() -> Self {
        Self {
            builder_host: default_builder_host(),
            share_endpoint: default_share_endpoint(),
            confirmation_timeout_secs: default_confirm_timeout(),
            list_page_size: default_page_size(),
        }
    }
}

impl DiscohookConfig {
    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }

    /// Fields per `webhook list` page, within Discord's embed limits.
    pub fn page_size(&self) -> usize {
        self.list_page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_env_impl(&SystemEnv)
    }

    pub(crate) fn from_env_impl(env: &impl ReadEnv) -> Result<Self> {
        let bot_token = env
            .var("DISCORD_BOT_TOKEN")
            .context("DISCORD_BOT_TOKEN not set")?;

        let command_prefix = env
            .var("DISCORD_COMMAND_PREFIX")
            .unwrap_or_else(default_prefix);

        let builder_host = env
            .var("DISCOHOOK_BUILDER_HOST")
            .unwrap_or_else(default_builder_host);

        let share_endpoint = env
            .var("DISCOHOOK_SHARE_ENDPOINT")
            .unwrap_or_else(default_share_endpoint);

        let confirmation_timeout_secs = match env.var("DISCOHOOK_CONFIRM_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid DISCOHOOK_CONFIRM_TIMEOUT_SECS: {}", raw))?,
            None => default_confirm_timeout(),
        };

        Ok(Config {
            discord: DiscordBotConfig {
                bot_token: SecretString::from(bot_token),
                command_prefix,
            },
            discohook: DiscohookConfig {
                builder_host,
                share_endpoint,
                confirmation_timeout_secs,
                list_page_size: default_page_size(),
            },
        })
    }
}

fn deserialize_secret_string<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(SecretString::from(s))
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_builder_host() -> String {
    DEFAULT_BUILDER_HOST.to_string()
}

fn default_share_endpoint() -> String {
    DEFAULT_SHARE_ENDPOINT.to_string()
}

fn default_confirm_timeout() -> u64 {
    DEFAULT_CONFIRM_TIMEOUT_SECS
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}
