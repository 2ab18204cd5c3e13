//! Lifecycle events around a send attempt.
//!
//! Events are short-lived value objects dispatched synchronously to listeners
//! registered on an [`EventDispatcher`]. Listeners run in registration order;
//! a pre-send listener can veto a channel attempt via [`PreSendEvent::cancel`].

use serde_json::Value;

use crate::types::{Notification, NotificationResult, Recipient};

/// Dispatched before a channel attempt. Cancelling skips the channel entirely.
pub struct PreSendEvent<'a> {
    pub notification: &'a Notification,
    pub recipient: &'a Recipient,
    pub channel: &'a str,
    cancelled: bool,
}

impl<'a> PreSendEvent<'a> {
    pub fn new(notification: &'a Notification, recipient: &'a Recipient, channel: &'a str) -> Self {
        Self {
            notification,
            recipient,
            channel,
            cancelled: false,
        }
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Dispatched after a successful channel attempt.
pub struct SentEvent<'a> {
    pub notification: &'a Notification,
    pub recipient: &'a Recipient,
    pub result: &'a NotificationResult,
}

impl<'a> SentEvent<'a> {
    pub fn new(
        notification: &'a Notification,
        recipient: &'a Recipient,
        result: &'a NotificationResult,
    ) -> Self {
        Self {
            notification,
            recipient,
            result,
        }
    }
}

/// Dispatched after a failed channel attempt.
pub struct FailedEvent<'a> {
    pub notification: &'a Notification,
    pub recipient: &'a Recipient,
    pub result: &'a NotificationResult,
}

impl<'a> FailedEvent<'a> {
    pub fn new(
        notification: &'a Notification,
        recipient: &'a Recipient,
        result: &'a NotificationResult,
    ) -> Self {
        Self {
            notification,
            recipient,
            result,
        }
    }
}

/// Parsed `"action:id:extra"` callback data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackData {
    pub action: String,
    pub id: Option<i64>,
    pub extra: Option<String>,
}

/// A Telegram inline-keyboard button click received via webhook.
///
/// A listener should call `set_handled(true)` and optionally set a response
/// text; unhandled callbacks are answered with a generic fallback.
pub struct TelegramCallbackEvent {
    callback_query_id: String,
    callback_data: String,
    chat_id: String,
    message_id: i64,
    from: Value,
    raw_update: Value,
    handled: bool,
    response_text: String,
    show_alert: bool,
}

impl TelegramCallbackEvent {
    pub fn new(
        callback_query_id: impl Into<String>,
        callback_data: impl Into<String>,
        chat_id: impl Into<String>,
        message_id: i64,
        from: Value,
        raw_update: Value,
    ) -> Self {
        Self {
            callback_query_id: callback_query_id.into(),
            callback_data: callback_data.into(),
            chat_id: chat_id.into(),
            message_id,
            from,
            raw_update,
            handled: false,
            response_text: String::new(),
            show_alert: false,
        }
    }

    pub fn callback_query_id(&self) -> &str {
        &self.callback_query_id
    }

    /// The callback data from the button, e.g. `"publish:123"`.
    pub fn callback_data(&self) -> &str {
        &self.callback_data
    }

    pub fn parse_callback_data(&self) -> CallbackData {
        let mut parts = self.callback_data.splitn(3, ':');
        let action = parts.next().unwrap_or_default().to_string();
        let id = parts.next().and_then(|p| p.parse().ok());
        let extra = parts.next().map(str::to_string);
        CallbackData { action, id, extra }
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    pub fn message_id(&self) -> i64 {
        self.message_id
    }

    /// The Telegram user who clicked the button.
    pub fn from(&self) -> &Value {
        &self.from
    }

    pub fn raw_update(&self) -> &Value {
        &self.raw_update
    }

    pub fn set_handled(&mut self, handled: bool) {
        self.handled = handled;
    }

    pub fn is_handled(&self) -> bool {
        self.handled
    }

    /// Response text shown to the user (toast or alert, max 200 chars).
    pub fn set_response_text(&mut self, text: impl Into<String>) {
        self.response_text = text.into();
    }

    pub fn response_text(&self) -> &str {
        &self.response_text
    }

    pub fn set_show_alert(&mut self, show_alert: bool) {
        self.show_alert = show_alert;
    }

    pub fn show_alert(&self) -> bool {
        self.show_alert
    }
}

/// A plain text message received via the Telegram webhook.
pub struct TelegramMessageEvent {
    chat_id: String,
    user_id: String,
    text: String,
    message_id: i64,
    from: Value,
    reply_to_message_id: Option<i64>,
    raw_update: Value,
    handled: bool,
}

impl TelegramMessageEvent {
    pub fn new(
        chat_id: impl Into<String>,
        user_id: impl Into<String>,
        text: impl Into<String>,
        message_id: i64,
        from: Value,
        reply_to_message_id: Option<i64>,
        raw_update: Value,
    ) -> Self {
        Self {
            chat_id: chat_id.into(),
            user_id: user_id.into(),
            text: text.into(),
            message_id,
            from,
            reply_to_message_id,
            raw_update,
            handled: false,
        }
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn message_id(&self) -> i64 {
        self.message_id
    }

    pub fn from(&self) -> &Value {
        &self.from
    }

    pub fn reply_to_message_id(&self) -> Option<i64> {
        self.reply_to_message_id
    }

    pub fn raw_update(&self) -> &Value {
        &self.raw_update
    }

    pub fn set_handled(&mut self, handled: bool) {
        self.handled = handled;
    }

    pub fn is_handled(&self) -> bool {
        self.handled
    }

    /// Username or first name of the sender, for reply prompts.
    pub fn sender_name(&self) -> &str {
        self.from["username"]
            .as_str()
            .or_else(|| self.from["first_name"].as_str())
            .unwrap_or("user")
    }
}

type PreSendListener = Box<dyn for<'a> Fn(&mut PreSendEvent<'a>) + Send + Sync>;
type SentListener = Box<dyn for<'a> Fn(&SentEvent<'a>) + Send + Sync>;
type FailedListener = Box<dyn for<'a> Fn(&FailedEvent<'a>) + Send + Sync>;
type TelegramCallbackListener = Box<dyn Fn(&mut TelegramCallbackEvent) + Send + Sync>;
type TelegramMessageListener = Box<dyn Fn(&mut TelegramMessageEvent) + Send + Sync>;

/// Explicit listener registry, built at composition time and read-only after.
#[derive(Default)]
pub struct EventDispatcher {
    pre_send: Vec<PreSendListener>,
    sent: Vec<SentListener>,
    failed: Vec<FailedListener>,
    telegram_callback: Vec<TelegramCallbackListener>,
    telegram_message: Vec<TelegramMessageListener>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_pre_send(
        &mut self,
        listener: impl for<'a> Fn(&mut PreSendEvent<'a>) + Send + Sync + 'static,
    ) {
        self.pre_send.push(Box::new(listener));
    }

    pub fn on_sent(&mut self, listener: impl for<'a> Fn(&SentEvent<'a>) + Send + Sync + 'static) {
        self.sent.push(Box::new(listener));
    }

    pub fn on_failed(
        &mut self,
        listener: impl for<'a> Fn(&FailedEvent<'a>) + Send + Sync + 'static,
    ) {
        self.failed.push(Box::new(listener));
    }

    pub fn on_telegram_callback(
        &mut self,
        listener: impl Fn(&mut TelegramCallbackEvent) + Send + Sync + 'static,
    ) {
        self.telegram_callback.push(Box::new(listener));
    }

    pub fn on_telegram_message(
        &mut self,
        listener: impl Fn(&mut TelegramMessageEvent) + Send + Sync + 'static,
    ) {
        self.telegram_message.push(Box::new(listener));
    }

    pub fn dispatch_pre_send(&self, event: &mut PreSendEvent<'_>) {
        for listener in &self.pre_send {
            listener(event);
        }
    }

    pub fn dispatch_sent(&self, event: &SentEvent<'_>) {
        for listener in &self.sent {
            listener(event);
        }
    }

    pub fn dispatch_failed(&self, event: &FailedEvent<'_>) {
        for listener in &self.failed {
            listener(event);
        }
    }

    pub fn dispatch_telegram_callback(&self, event: &mut TelegramCallbackEvent) {
        for listener in &self.telegram_callback {
            listener(event);
        }
    }

    pub fn dispatch_telegram_message(&self, event: &mut TelegramMessageEvent) {
        for listener in &self.telegram_message {
            listener(event);
        }
    }
}
