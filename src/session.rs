//! Messaging session recovery.
//!
//! The node is unattended: if the broker session is down, nothing useful
//! can be confirmed to the supervisor, so the control loop parks here and
//! retries forever.  One *attempt* is connect **plus** subscribing every
//! command topic — a session with a partial subscription set is treated as
//! failed and torn down by the next connect, never handed back to the
//! loop.  Every failed attempt is followed by the same fixed back-off.

use core::time::Duration;

use log::{info, warn};

use crate::app::commands::COMMAND_TOPICS;
use crate::app::ports::{Clock, CommsError, Credentials, MessagingChannel};

/// Pause between failed connection attempts.
pub const RECONNECT_BACKOFF: Duration = Duration::from_secs(5);

/// Block until a fresh session is connected with all command topics
/// subscribed.  Returns the number of failed attempts along the way.
pub fn recover(
    link: &mut impl MessagingChannel,
    clock: &mut impl Clock,
    identity: &str,
    credentials: &Credentials<'_>,
) -> u32 {
    let mut failed_attempts: u32 = 0;
    loop {
        info!("attempting broker session as '{identity}'");
        match establish(link, identity, credentials) {
            Ok(()) => {
                info!(
                    "broker session up, {} command topics subscribed",
                    COMMAND_TOPICS.len()
                );
                return failed_attempts;
            }
            Err(e) => {
                failed_attempts = failed_attempts.saturating_add(1);
                warn!(
                    "broker session attempt {failed_attempts} failed ({e}), retrying in {}s",
                    RECONNECT_BACKOFF.as_secs()
                );
                clock.sleep(RECONNECT_BACKOFF);
            }
        }
    }
}

/// One atomic attempt: connect, then subscribe every command topic.
fn establish(
    link: &mut impl MessagingChannel,
    identity: &str,
    credentials: &Credentials<'_>,
) -> Result<(), CommsError> {
    link.connect(identity, credentials)?;
    for topic in COMMAND_TOPICS {
        link.subscribe(topic)?;
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
