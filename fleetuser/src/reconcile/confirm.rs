//! Bounded re-probing after a mutating command.

use std::time::Duration;

use log::debug;

use super::probe::probe;
use super::session::Session;
use crate::error::Result;

/// Re-probe until the account's presence equals `expected_presence`.
///
/// Probes at most `max_attempts` times with `delay` between attempts and
/// returns `Ok(true)` on the first match, `Ok(false)` once the budget is
/// spent. With `max_attempts == 0` nothing is sent and the result is
/// `Ok(false)`. A failing probe aborts the loop with its error.
pub async fn confirm<S: Session>(
    session: &mut S,
    username: &str,
    expected_presence: bool,
    max_attempts: u32,
    delay: Duration,
) -> Result<bool> {
    for attempt in 1..=max_attempts {
        if probe(session, username).await? == expected_presence {
            debug!("'{}' confirmed on attempt {}", username, attempt);
            return Ok(true);
        }
        if attempt < max_attempts {
            tokio::time::sleep(delay).await;
        }
    }

    debug!(
        "'{}' not confirmed after {} attempt(s)",
        username, max_attempts
    );
    Ok(false)
}
