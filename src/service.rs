use std::sync::Arc;

use tracing::{error, info, warn};

use crate::channel::ChannelRegistry;
use crate::events::{EventDispatcher, FailedEvent, PreSendEvent, SentEvent};
use crate::types::{Notification, NotificationResult, Recipient};

/// Orchestrates sending one notification through its configured channels.
///
/// Channels run strictly in the order listed, each getting an independent
/// attempt; a failure in one never short-circuits the rest. Skipped channels
/// (cancelled by a listener, or unavailable) produce no result at all, so the
/// returned sequence can be shorter than the requested channel list.
pub struct NotificationService {
    registry: Arc<ChannelRegistry>,
    dispatcher: Arc<EventDispatcher>,
    default_channels: Vec<String>,
}

impl NotificationService {
    pub fn new(registry: Arc<ChannelRegistry>, dispatcher: Arc<EventDispatcher>) -> Self {
        Self {
            registry,
            dispatcher,
            default_channels: vec!["email".to_string()],
        }
    }

    /// Channels used when a notification names none.
    pub fn with_default_channels<I, S>(mut self, channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_channels = channels.into_iter().map(Into::into).collect();
        self
    }

    pub async fn send(
        &self,
        notification: &Notification,
        recipient: &Recipient,
    ) -> Vec<NotificationResult> {
        let channels: &[String] = if notification.channels.is_empty() {
            &self.default_channels
        } else {
            &notification.channels
        };

        let mut results = Vec::new();

        for channel_name in channels {
            let mut pre_send = PreSendEvent::new(notification, recipient, channel_name);
            self.dispatcher.dispatch_pre_send(&mut pre_send);
            if pre_send.is_cancelled() {
                info!(
                    channel = %channel_name,
                    title = %notification.title,
                    "notification cancelled by listener"
                );
                continue;
            }

            if !self.registry.has_channel(channel_name) {
                warn!(channel = %channel_name, "channel not available");
                continue;
            }

            // Guaranteed to resolve after the has_channel check
            let Ok(channel) = self.registry.get_channel(channel_name) else {
                continue;
            };

            let result = channel.send(notification, recipient).await;

            if result.is_success() {
                self.dispatcher
                    .dispatch_sent(&SentEvent::new(notification, recipient, &result));
                info!(
                    channel = %channel_name,
                    title = %notification.title,
                    "notification sent"
                );
            } else {
                self.dispatcher
                    .dispatch_failed(&FailedEvent::new(notification, recipient, &result));
                error!(
                    channel = %channel_name,
                    message = result.message.as_deref().unwrap_or(""),
                    "notification failed"
                );
            }

            results.push(result);
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::tests::StubChannel;
    use crate::types::ResultStatus;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn registry() -> Arc<ChannelRegistry> {
        Arc::new(ChannelRegistry::new(vec![
            Arc::new(StubChannel::succeeding("email")),
            Arc::new(StubChannel::failing("telegram", "chat not found")),
            Arc::new(StubChannel::unconfigured("discord")),
        ]))
    }

    #[tokio::test]
    async fn test_collects_success_and_failure_in_order() {
        let service = NotificationService::new(registry(), Arc::new(EventDispatcher::new()));

        let notification = Notification::new("t", "c").with_channels(["email", "telegram"]);
        let results = service.send(&notification, &Recipient::new()).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].channel, "email");
        assert_eq!(results[0].status, ResultStatus::Success);
        assert_eq!(results[1].channel, "telegram");
        assert_eq!(results[1].status, ResultStatus::Failed);
    }

    #[tokio::test]
    async fn test_results_never_exceed_requested_channels() {
        let service = NotificationService::new(registry(), Arc::new(EventDispatcher::new()));

        let notification =
            Notification::new("t", "c").with_channels(["email", "telegram", "discord", "sms"]);
        let results = service.send(&notification, &Recipient::new()).await;

        // discord is unconfigured and sms unknown; both silently skipped
        assert_eq!(results.len(), 2);
        assert!(results.len() <= notification.channels.len());
    }

    #[tokio::test]
    async fn test_default_channels_apply_when_list_empty() {
        let service = NotificationService::new(registry(), Arc::new(EventDispatcher::new()))
            .with_default_channels(["telegram"]);

        let results = service
            .send(&Notification::new("t", "c"), &Recipient::new())
            .await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].channel, "telegram");
    }

    #[tokio::test]
    async fn test_cancelled_channel_produces_no_result_and_no_events() {
        let sent_events = Arc::new(AtomicUsize::new(0));
        let failed_events = Arc::new(AtomicUsize::new(0));

        let mut dispatcher = EventDispatcher::new();
        dispatcher.on_pre_send(|event| {
            if event.channel == "telegram" {
                event.cancel();
            }
        });
        {
            let sent_events = Arc::clone(&sent_events);
            dispatcher.on_sent(move |_| {
                sent_events.fetch_add(1, Ordering::SeqCst);
            });
        }
        {
            let failed_events = Arc::clone(&failed_events);
            dispatcher.on_failed(move |_| {
                failed_events.fetch_add(1, Ordering::SeqCst);
            });
        }

        let service = NotificationService::new(registry(), Arc::new(dispatcher));
        let notification = Notification::new("t", "c").with_channels(["email", "telegram"]);
        let results = service.send(&notification, &Recipient::new()).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].channel, "email");
        // telegram never ran, so only email's sent event fired
        assert_eq!(sent_events.load(Ordering::SeqCst), 1);
        assert_eq!(failed_events.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_sent_and_failed_events_carry_results() {
        let observed: Arc<Mutex<Vec<(String, ResultStatus)>>> = Arc::new(Mutex::new(Vec::new()));

        let mut dispatcher = EventDispatcher::new();
        {
            let observed = Arc::clone(&observed);
            dispatcher.on_sent(move |event| {
                observed
                    .lock()
                    .unwrap()
                    .push((event.result.channel.clone(), event.result.status));
            });
        }
        {
            let observed = Arc::clone(&observed);
            dispatcher.on_failed(move |event| {
                observed
                    .lock()
                    .unwrap()
                    .push((event.result.channel.clone(), event.result.status));
            });
        }

        let service = NotificationService::new(registry(), Arc::new(dispatcher));
        let notification = Notification::new("t", "c").with_channels(["email", "telegram"]);
        service.send(&notification, &Recipient::new()).await;

        let observed = observed.lock().unwrap();
        assert_eq!(
            *observed,
            vec![
                ("email".to_string(), ResultStatus::Success),
                ("telegram".to_string(), ResultStatus::Failed),
            ]
        );
    }

    #[tokio::test]
    async fn test_unknown_channel_is_silently_dropped() {
        let service = NotificationService::new(registry(), Arc::new(EventDispatcher::new()));

        let notification = Notification::new("t", "c").with_channels(["sms"]);
        let results = service.send(&notification, &Recipient::new()).await;
        assert!(results.is_empty());
    }
}
