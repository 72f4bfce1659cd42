//! Pre-handler checks
//!
//! Each command declares an ordered list of [`Guard`]s; [`run_guards`] runs
//! them in order and stops at the first rejection.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use discohook_types::{Actor, BotCommand, CommandError, InputError};
use tokio::time::Instant;

use crate::dispatch::Invocation;
use crate::platform::Platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Reject commands sent outside a guild.
    GuildOnly,
    /// The invoking user needs Manage Webhooks in the invocation channel.
    UserPermission,
    /// The bot needs Manage Webhooks in the invocation channel.
    BotPermission,
    /// At most `uses` invocations per user within `per`.
    Cooldown { uses: usize, per: Duration },
}

const fn cooldown(uses: usize, per_secs: u64) -> Guard {
    Guard::Cooldown {
        uses,
        per: Duration::from_secs(per_secs),
    }
}

/// Guards for a command, in evaluation order.
pub fn guards_for(command: &BotCommand) -> Vec<Guard> {
    use Guard::*;
    match command {
        BotCommand::Help { .. } => vec![],
        BotCommand::Restore { .. } => vec![cooldown(3, 30)],
        BotCommand::RestoreEdit { .. } => vec![GuildOnly, UserPermission, cooldown(3, 30)],
        BotCommand::WebhookList { .. } => {
            vec![GuildOnly, UserPermission, BotPermission, cooldown(4, 4)]
        }
        BotCommand::WebhookGet { .. } | BotCommand::WebhookUrl { .. } => {
            vec![GuildOnly, UserPermission, BotPermission, cooldown(3, 8)]
        }
        BotCommand::WebhookNew { .. }
        | BotCommand::WebhookEdit { .. }
        | BotCommand::WebhookDelete { .. } => {
            vec![GuildOnly, UserPermission, BotPermission, cooldown(3, 30)]
        }
        BotCommand::Emoji { .. } | BotCommand::Avatar { .. } => vec![cooldown(4, 4)],
        BotCommand::Icon { .. } => vec![GuildOnly, cooldown(4, 4)],
    }
}

/// Drained windows are dropped at most this often.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Sliding-window usage log per (command, user).
#[derive(Default)]
pub struct CooldownTracker {
    state: Mutex<CooldownState>,
}

#[derive(Default)]
struct CooldownState {
    windows: HashMap<(&'static str, u64), Window>,
    next_sweep: Option<Instant>,
}

struct Window {
    per: Duration,
    uses: VecDeque<Instant>,
}

impl Window {
    fn is_drained(&self, now: Instant) -> bool {
        self.uses
            .back()
            .is_none_or(|last| now.duration_since(*last) >= self.per)
    }
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a use at `now`, or return how long until the next one is allowed.
    pub fn check(
        &self,
        command: &'static str,
        user_id: u64,
        uses: usize,
        per: Duration,
        now: Instant,
    ) -> Result<(), Duration> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.next_sweep.is_none_or(|at| now >= at) {
            state.windows.retain(|_, window| !window.is_drained(now));
            state.next_sweep = Some(now + SWEEP_INTERVAL);
        }

        let window = state
            .windows
            .entry((command, user_id))
            .or_insert_with(|| Window {
                per,
                uses: VecDeque::new(),
            });
        window.per = per;
        while window
            .uses
            .front()
            .is_some_and(|used| now.duration_since(*used) >= per)
        {
            window.uses.pop_front();
        }
        if window.uses.len() >= uses {
            let oldest = window.uses.front().copied().unwrap_or(now);
            return Err(per.saturating_sub(now.duration_since(oldest)));
        }
        window.uses.push_back(now);
        Ok(())
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .windows
            .len()
    }
}

/// Run `guards` in order; the first failure is returned.
pub async fn run_guards<P: Platform>(
    guards: &[Guard],
    command: &'static str,
    inv: &Invocation,
    platform: &P,
    cooldowns: &CooldownTracker,
) -> Result<(), CommandError> {
    for guard in guards {
        match *guard {
            Guard::GuildOnly => {
                if inv.guild_id.is_none() {
                    return Err(InputError::GuildOnly.into());
                }
            }
            Guard::UserPermission => {
                let perms = platform.permissions_in(inv.channel_id, inv.user_id).await?;
                if !perms.can_manage_webhooks() {
                    return Err(CommandError::manage_webhooks(Actor::User, None));
                }
            }
            Guard::BotPermission => {
                let perms = platform
                    .permissions_in(inv.channel_id, platform.bot_user_id())
                    .await?;
                if !perms.can_manage_webhooks() {
                    return Err(CommandError::manage_webhooks(Actor::Bot, None));
                }
            }
            Guard::Cooldown { uses, per } => {
                cooldowns
                    .check(command, inv.user_id, uses, per, Instant::now())
                    .map_err(|wait| CommandError::Cooldown {
                        retry_after_secs: wait.as_secs() + u64::from(wait.subsec_nanos() > 0),
                    })?;
            }
        }
    }
    Ok(())
}
