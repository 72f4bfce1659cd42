//! Yes/no confirmation before destructive actions.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{timeout_at, Instant};
use tracing::debug;

/// Button pressed on a confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateChoice {
    Confirm,
    Cancel,
}

/// One interaction with the prompt, by any user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateResponse {
    pub user_id: u64,
    pub choice: GateChoice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Pending,
    Confirmed,
    Cancelled,
    Expired,
}

impl GateState {
    /// Only an explicit confirmation lets the guarded action run.
    pub fn permits(self) -> bool {
        self == Self::Confirmed
    }
}

/// Where prompt interactions arrive from.
#[allow(async_fn_in_trait)]
pub trait ResponseSource {
    /// Next interaction, or `None` once no more can arrive.
    async fn next_response(&mut self) -> Option<GateResponse>;
}

impl ResponseSource for mpsc::Receiver<GateResponse> {
    async fn next_response(&mut self) -> Option<GateResponse> {
        self.recv().await
    }
}

/// Confirmation bound to the user who invoked the command.
#[derive(Debug)]
pub struct ConfirmationGate {
    requester: u64,
    timeout: Duration,
    state: GateState,
}

impl ConfirmationGate {
    pub fn new(requester: u64, timeout: Duration) -> Self {
        Self {
            requester,
            timeout,
            state: GateState::Pending,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Wait for the requester's answer or the deadline, whichever comes first.
    ///
    /// Responses from other users are ignored. A source that closes without
    /// an answer counts as expired.
    pub async fn wait(&mut self, source: &mut impl ResponseSource) -> GateState {
        if self.state != GateState::Pending {
            return self.state;
        }

        let deadline = Instant::now() + self.timeout;
        self.state = loop {
            match timeout_at(deadline, source.next_response()).await {
                Ok(Some(resp)) if resp.user_id == self.requester => {
                    break match resp.choice {
                        GateChoice::Confirm => GateState::Confirmed,
                        GateChoice::Cancel => GateState::Cancelled,
                    };
                }
                Ok(Some(resp)) => {
                    debug!(user_id = resp.user_id, "Ignoring confirmation from another user");
                }
                Ok(None) | Err(_) => break GateState::Expired,
            }
        };
        self.state
    }
}
