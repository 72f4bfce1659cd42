//! Discord-specific error handling for the bot.
//!
//! Converts serenity errors into [`PlatformError`]s and logs command
//! failures at a level matching their category.

use discohook_types::{CommandError, ErrorCategory, PlatformError};
use serenity::http::HttpError;
use tracing::{debug, error, warn};

/// Classify a serenity `Error` into a [`PlatformError`].
pub fn classify(err: &serenity::Error) -> PlatformError {
    match err {
        serenity::Error::Http(http_err) => classify_http(http_err),
        _ => PlatformError::network(err.to_string()),
    }
}

fn classify_http(http_err: &HttpError) -> PlatformError {
    match http_err {
        HttpError::UnsuccessfulRequest(resp) => PlatformError::from_response(
            resp.error.code as u32,
            resp.status_code.as_u16(),
            resp.error.message.clone(),
        ),
        // Network / request-level failures (not Discord API errors)
        _ => PlatformError::network(http_err.to_string()),
    }
}

/// Log a failed command.
///
/// - Bad input, ownership refusals and cooldowns → `debug!`
/// - Permission, not-found and external failures → `warn!`
/// - Everything else → `error!`
pub fn log_command_error(command: &str, user_id: u64, err: &CommandError) {
    match err.category() {
        ErrorCategory::InvalidInput | ErrorCategory::Ownership | ErrorCategory::RateLimit => {
            debug!(command, user_id, "Command rejected: {}", err);
        }
        ErrorCategory::PermissionDenied
        | ErrorCategory::NotFound
        | ErrorCategory::ExternalService => {
            warn!(command, user_id, "Command failed: {}", err);
        }
        ErrorCategory::Network | ErrorCategory::Unknown => {
            error!(command, user_id, "Command errored: {}", err);
        }
    }
}
