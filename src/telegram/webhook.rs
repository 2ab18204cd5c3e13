//! Translates inbound Telegram webhook updates into dispatchable events.
//!
//! HTTP routing and response marshaling belong to the embedding application;
//! this adapter only verifies the shared secret, classifies the update, and
//! drives the event listeners. Unhandled button clicks still get their
//! callback query answered so the Telegram client stops its spinner.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::api::TelegramApi;
use crate::error::NotificationError;
use crate::events::{EventDispatcher, TelegramCallbackEvent, TelegramMessageEvent};

const UNHANDLED_CALLBACK_TEXT: &str = "Action not implemented";

pub struct TelegramWebhookHandler {
    api: Arc<TelegramApi>,
    dispatcher: Arc<EventDispatcher>,
    secret: Option<String>,
}

impl TelegramWebhookHandler {
    pub fn new(api: Arc<TelegramApi>, dispatcher: Arc<EventDispatcher>, secret: Option<String>) -> Self {
        Self {
            api,
            dispatcher,
            secret,
        }
    }

    /// Check the `X-Telegram-Bot-Api-Secret-Token` header value. Always true
    /// when no secret is configured.
    pub fn verify_secret(&self, provided: Option<&str>) -> bool {
        match &self.secret {
            None => true,
            Some(expected) => provided == Some(expected.as_str()),
        }
    }

    /// Classify and process one update. Update kinds other than callback
    /// queries and plain text messages are ignored.
    pub async fn handle_update(&self, update: &Value) -> Result<(), NotificationError> {
        debug!("Telegram webhook update received");

        if update.get("callback_query").is_some() {
            return self.handle_callback_query(update).await;
        }
        if update.pointer("/message/text").is_some() {
            self.handle_message(update);
            return Ok(());
        }
        Ok(())
    }

    async fn handle_callback_query(&self, update: &Value) -> Result<(), NotificationError> {
        let callback_query = &update["callback_query"];
        let callback_query_id = callback_query["id"].as_str().unwrap_or_default();
        let callback_data = callback_query["data"].as_str().unwrap_or_default();
        let chat_id = id_string(&callback_query["message"]["chat"]["id"]);
        let message_id = callback_query["message"]["message_id"].as_i64().unwrap_or(0);

        if callback_query_id.is_empty() || callback_data.is_empty() {
            warn!("Telegram callback query missing id or data");
            return Err(NotificationError::InvalidWebhookPayload(
                "callback query missing id or data".into(),
            ));
        }

        info!(
            callback_data,
            chat_id = %chat_id,
            message_id,
            "Telegram callback query received"
        );

        let mut event = TelegramCallbackEvent::new(
            callback_query_id,
            callback_data,
            chat_id,
            message_id,
            callback_query["from"].clone(),
            update.clone(),
        );
        self.dispatcher.dispatch_telegram_callback(&mut event);

        let response_text = if event.is_handled() {
            event.response_text().to_string()
        } else {
            UNHANDLED_CALLBACK_TEXT.to_string()
        };
        self.api
            .answer_callback_query(callback_query_id, &response_text, event.show_alert())
            .await?;
        Ok(())
    }

    fn handle_message(&self, update: &Value) {
        let message = &update["message"];
        let chat_id = id_string(&message["chat"]["id"]);
        let user_id = id_string(&message["from"]["id"]);
        let text = message["text"].as_str().unwrap_or_default();
        let message_id = message["message_id"].as_i64().unwrap_or(0);
        let reply_to_message_id = message["reply_to_message"]["message_id"].as_i64();

        if chat_id.is_empty() || user_id.is_empty() || text.is_empty() {
            return;
        }

        info!(
            chat_id = %chat_id,
            text_preview = %text.chars().take(50).collect::<String>(),
            is_reply = reply_to_message_id.is_some(),
            "Telegram message received"
        );

        let mut event = TelegramMessageEvent::new(
            chat_id,
            user_id,
            text,
            message_id,
            message["from"].clone(),
            reply_to_message_id,
            update.clone(),
        );
        // Listeners respond through TelegramApi themselves; the webhook only
        // acknowledges.
        self.dispatcher.dispatch_telegram_message(&mut event);
    }
}

/// Telegram sends ids as numbers; config and recipients carry them as strings.
fn id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}
