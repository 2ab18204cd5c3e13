use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use super::Channel;
use crate::error::NotificationError;
use crate::telegram::TelegramApi;
use crate::types::{Notification, NotificationPriority, NotificationResult, Recipient};

/// Telegram notification channel.
///
/// A recipient with an explicit chat id gets exactly one message; otherwise
/// the notification fans out to every configured chat id, and the per-chat
/// outcomes are aggregated into a single result.
pub struct TelegramChannel {
    api: Arc<TelegramApi>,
}

impl TelegramChannel {
    pub fn new(api: Arc<TelegramApi>) -> Self {
        Self { api }
    }

    fn resolve_chat_ids(&self, recipient: &Recipient) -> Vec<String> {
        match &recipient.telegram_chat_id {
            Some(chat_id) => vec![chat_id.clone()],
            None => self.api.chat_ids().to_vec(),
        }
    }

    fn format_message(&self, notification: &Notification) -> String {
        let emoji = match notification.priority {
            NotificationPriority::Urgent => "🚨",
            NotificationPriority::High => "⚠️",
            NotificationPriority::Normal => "ℹ️",
            NotificationPriority::Low => "📝",
        };

        let mut message = format!("{emoji} *{}*\n\n{}", notification.title, notification.content);

        if let Some(url) = notification.metadata.get("url").and_then(Value::as_str) {
            let _ = write!(message, "\n\n🔗 [See more]({url})");
        }

        message
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &'static str {
        "telegram"
    }

    fn is_configured(&self) -> bool {
        self.api.is_configured()
    }

    // Below email (100), above the default (50)
    fn retry_priority(&self) -> i32 {
        80
    }

    async fn do_send(
        &self,
        notification: &Notification,
        recipient: &Recipient,
    ) -> Result<NotificationResult, NotificationError> {
        let chat_ids = self.resolve_chat_ids(recipient);
        if chat_ids.is_empty() {
            return Ok(NotificationResult::failed(
                self.name(),
                "No Telegram chat ID provided for recipient",
            ));
        }

        let text = self.format_message(notification);

        let mut per_chat = Vec::with_capacity(chat_ids.len());
        let mut success_count = 0usize;
        let mut first_error: Option<String> = None;

        for chat_id in &chat_ids {
            match self.api.send_message(chat_id, &text, &[], &[]).await {
                Ok(response) => {
                    success_count += 1;
                    per_chat.push(json!({
                        "chat_id": chat_id,
                        "ok": true,
                        "message_id": response.message_id,
                    }));
                }
                Err(e) => {
                    let error = e.detail();
                    if first_error.is_none() {
                        first_error = Some(error.clone());
                    }
                    per_chat.push(json!({
                        "chat_id": chat_id,
                        "ok": false,
                        "error": error,
                    }));
                }
            }
        }

        let total = chat_ids.len();
        let result = if success_count == total {
            NotificationResult::success(
                self.name(),
                format!("Telegram message sent to {total} chat(s)"),
            )
        } else if success_count == 0 {
            NotificationResult::failed(
                self.name(),
                first_error.unwrap_or_else(|| "Unknown Telegram API error".to_string()),
            )
        } else {
            NotificationResult::failed(
                self.name(),
                format!(
                    "Telegram: {success_count}/{total} sent, first error: {}",
                    first_error.unwrap_or_default()
                ),
            )
        };

        Ok(result.with_metadata("results", Value::Array(per_chat)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TelegramConfig;
    use crate::types::ResultStatus;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn channel(server: &MockServer, chat_ids: &[&str]) -> TelegramChannel {
        let config = TelegramConfig {
            enabled: true,
            bot_token: "123:abc".to_string(),
            chat_ids: chat_ids.iter().map(|s| s.to_string()).collect(),
            disable_preview: false,
            webhook_secret: None,
        };
        TelegramChannel::new(Arc::new(
            TelegramApi::new(config).with_api_base(server.uri()),
        ))
    }

    fn ok_response(message_id: i64) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": { "message_id": message_id }
        }))
    }

    fn error_response(description: &str) -> ResponseTemplate {
        ResponseTemplate::new(400).set_body_json(json!({
            "ok": false,
            "description": description
        }))
    }

    async fn mock_chat(server: &MockServer, chat_id: &str, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .and(body_partial_json(json!({ "chat_id": chat_id })))
            .respond_with(response)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_fan_out_all_success() {
        let server = MockServer::start().await;
        mock_chat(&server, "A", ok_response(10)).await;
        mock_chat(&server, "B", ok_response(11)).await;

        let result = channel(&server, &["A", "B"])
            .send(&Notification::new("Deploy", "done"), &Recipient::new())
            .await;

        assert_eq!(result.status, ResultStatus::Success);
        assert_eq!(
            result.message.as_deref(),
            Some("Telegram message sent to 2 chat(s)")
        );
        let results = result.metadata["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["message_id"], 10);
        assert_eq!(results[1]["message_id"], 11);
    }

    #[tokio::test]
    async fn test_fan_out_mixed_reports_counts_and_first_error() {
        let server = MockServer::start().await;
        mock_chat(&server, "A", ok_response(1)).await;
        mock_chat(&server, "B", ok_response(2)).await;
        mock_chat(&server, "C", error_response("Bad Request: chat not found")).await;

        let result = channel(&server, &["A", "B", "C"])
            .send(&Notification::new("Deploy", "done"), &Recipient::new())
            .await;

        assert_eq!(result.status, ResultStatus::Failed);
        assert_eq!(
            result.message.as_deref(),
            Some("Telegram: 2/3 sent, first error: Bad Request: chat not found")
        );
        let results = result.metadata["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[2]["ok"], false);
        assert_eq!(results[2]["error"], "Bad Request: chat not found");
    }

    #[tokio::test]
    async fn test_fan_out_all_failed_uses_first_error() {
        let server = MockServer::start().await;
        mock_chat(&server, "A", error_response("bot was blocked by the user")).await;
        mock_chat(&server, "B", error_response("chat not found")).await;

        let result = channel(&server, &["A", "B"])
            .send(&Notification::new("Deploy", "done"), &Recipient::new())
            .await;

        assert!(result.is_failed());
        assert_eq!(
            result.message.as_deref(),
            Some("bot was blocked by the user")
        );
    }

    #[tokio::test]
    async fn test_explicit_chat_id_overrides_fan_out() {
        let server = MockServer::start().await;
        mock_chat(&server, "personal", ok_response(7)).await;

        let recipient = Recipient::new().with_telegram_chat_id("personal");
        let result = channel(&server, &["A", "B"])
            .send(&Notification::new("Deploy", "done"), &recipient)
            .await;

        assert!(result.is_success());
        assert_eq!(
            result.message.as_deref(),
            Some("Telegram message sent to 1 chat(s)")
        );
        // Only the explicit chat was contacted
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
    }

    #[tokio::test]
    async fn test_no_chat_ids_anywhere_fails_fast() {
        let server = MockServer::start().await;

        let result = channel(&server, &[])
            .send(&Notification::new("Deploy", "done"), &Recipient::new())
            .await;

        assert!(result.is_failed());
        assert_eq!(
            result.message.as_deref(),
            Some("No Telegram chat ID provided for recipient")
        );
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_message_formatting_with_priority_and_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .and(body_partial_json(json!({
                "text": "🚨 *Outage*\n\nPrimary DB down\n\n🔗 [See more](https://status.example.com)"
            })))
            .respond_with(ok_response(1))
            .expect(1)
            .mount(&server)
            .await;

        let notification = Notification::new("Outage", "Primary DB down")
            .with_priority(NotificationPriority::Urgent)
            .with_metadata("url", "https://status.example.com");
        let recipient = Recipient::new().with_telegram_chat_id("42");
        channel(&server, &[]).send(&notification, &recipient).await;
    }

    #[test]
    fn test_configuration_and_retry_priority() {
        let disabled = TelegramChannel::new(Arc::new(TelegramApi::new(TelegramConfig::default())));
        assert!(!disabled.is_configured());
        assert_eq!(disabled.retry_priority(), 80);
        assert!(disabled.supports("telegram"));
        assert!(!disabled.supports("email"));
    }
}
