//! Zombie prevention (spec.md §5): the daemon exits after 60 minutes
//! with no inbound request on any connection.

use std::sync::Arc;

use succ_core::constants::DAEMON_IDLE_TIMEOUT_MINS;

use crate::state::AppState;

/// Resolves once the daemon has been idle for `DAEMON_IDLE_TIMEOUT_MINS`
/// minutes. Polls rather than resetting a single timer so that activity
/// from any connection (not just the one that started the poll) counts.
pub async fn watch(state: Arc<AppState>) {
    let timeout_secs = DAEMON_IDLE_TIMEOUT_MINS as i64 * 60;
    let poll_interval = std::time::Duration::from_secs(30);
    loop {
        tokio::time::sleep(poll_interval).await;
        if state.seconds_since_activity() >= timeout_secs {
            tracing::info!(idle_secs = state.seconds_since_activity(), "daemon idle timeout reached, shutting down");
            return;
        }
    }
}
