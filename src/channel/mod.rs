pub mod email;
pub mod registry;
pub mod telegram;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::error::NotificationError;
use crate::types::{Notification, NotificationResult, Recipient};

pub use email::{EmailChannel, EmailMessage, Mailer, SmtpMailer};
pub use registry::ChannelRegistry;
pub use telegram::TelegramChannel;

pub const DEFAULT_RETRY_PRIORITY: i32 = 50;

/// A delivery mechanism for notifications.
///
/// Variants implement [`Channel::do_send`]; the provided [`Channel::send`]
/// wraps it with the configuration gate and the failure boundary, so no
/// variant error ever reaches the orchestrator.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Fixed channel identifier ("email", "telegram", ...).
    fn name(&self) -> &'static str;

    /// Whether this channel handles the given channel name. The default
    /// matches the channel's own name; a variant may accept aliases.
    fn supports(&self, channel: &str) -> bool {
        channel == self.name()
    }

    /// Whether the channel's static configuration allows sending.
    fn is_configured(&self) -> bool;

    /// Hint for external retry tooling; higher means retry first. Never
    /// consulted by the dispatch core itself.
    fn retry_priority(&self) -> i32 {
        DEFAULT_RETRY_PRIORITY
    }

    /// Variant-specific send logic. Errors returned here are captured by
    /// [`Channel::send`] and turned into failed results.
    async fn do_send(
        &self,
        notification: &Notification,
        recipient: &Recipient,
    ) -> Result<NotificationResult, NotificationError>;

    /// Send a notification, capturing every failure as a failed result.
    async fn send(&self, notification: &Notification, recipient: &Recipient) -> NotificationResult {
        if !self.is_configured() {
            warn!(channel = self.name(), "channel is not configured, skipping");
            return NotificationResult::failed(
                self.name(),
                format!("Channel {} is not configured", self.name()),
            );
        }

        info!(
            channel = self.name(),
            title = %notification.title,
            "sending notification"
        );

        match self.do_send(notification, recipient).await {
            Ok(result) => result,
            Err(e) => {
                error!(
                    channel = self.name(),
                    error = %e,
                    "failed to send notification"
                );
                NotificationResult::failed(self.name(), e.to_string())
                    .with_metadata("error_kind", e.kind())
            }
        }
    }
}

impl std::fmt::Debug for dyn Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel").field("name", &self.name()).finish()
    }
}
