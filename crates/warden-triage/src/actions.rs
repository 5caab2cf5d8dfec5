//! Moderation action executors.
//!
//! Ordering is a hard contract: the forward must be attempted before the
//! delete, because delete-for-everyone is irrevocable and would leave no
//! copy for the audit conversation. A forward failure never blocks the
//! delete — removing the message from the monitored group takes priority
//! over the audit trail.

use std::time::Duration;

use tracing::{info, warn};

use warden_core::platform::ChatPlatform;
use warden_core::types::MessageRef;

/// What actually happened during a removal attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovalOutcome {
    pub forwarded: bool,
    pub deleted: bool,
}

/// Forward `message` to `destination`, then delete it for everyone.
///
/// Each platform call has its own timeout and failure boundary; neither
/// failure escapes this function. Delete failures are reported, not
/// retried.
pub async fn forward_then_delete(
    platform: &dyn ChatPlatform,
    message: &MessageRef,
    destination: &str,
    io_timeout: Duration,
) -> RemovalOutcome {
    let forwarded =
        match tokio::time::timeout(io_timeout, platform.forward(message, destination)).await {
            Ok(Ok(())) => {
                info!(destination, message = message.as_str(), "promotional message forwarded");
                true
            }
            Ok(Err(e)) => {
                warn!(destination, error = %e, "forward failed, proceeding to delete");
                false
            }
            Err(_) => {
                warn!(destination, "forward timed out, proceeding to delete");
                false
            }
        };

    let deleted = match tokio::time::timeout(io_timeout, platform.delete_for_everyone(message)).await
    {
        Ok(Ok(())) => {
            info!(message = message.as_str(), "promotional message deleted");
            true
        }
        Ok(Err(e)) => {
            warn!(message = message.as_str(), error = %e, "delete failed");
            false
        }
        Err(_) => {
            warn!(message = message.as_str(), "delete timed out");
            false
        }
    };

    RemovalOutcome { forwarded, deleted }
}
