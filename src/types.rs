use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Notification priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

/// A notification to be sent through one or more channels.
///
/// Built once by the caller and never mutated; channel-specific hints (for
/// example a `url` for Telegram link buttons) go into `metadata`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub content: String,

    /// Template name for custom rendering (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// Template context variables
    #[serde(default)]
    pub context: HashMap<String, serde_json::Value>,

    /// Channel names to deliver through; empty means the service defaults apply
    #[serde(default)]
    pub channels: Vec<String>,

    #[serde(default)]
    pub priority: NotificationPriority,

    /// Channel-specific hints
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,

    /// Hint that delivery should go through a queue; not enforced here
    #[serde(default, rename = "async")]
    pub r#async: bool,
}

impl Notification {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            template: None,
            context: HashMap::new(),
            channels: Vec::new(),
            priority: NotificationPriority::Normal,
            metadata: HashMap::new(),
            r#async: false,
        }
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn with_channels<I, S>(mut self, channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.channels = channels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_priority(mut self, priority: NotificationPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_async(mut self, r#async: bool) -> Self {
        self.r#async = r#async;
        self
    }
}

/// Notification recipient with per-channel addresses.
///
/// Missing identifiers are not a model error; a channel that needs an absent
/// identifier reports a failed result instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipient {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram_chat_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub discord_webhook: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub slack_webhook: Option<String>,

    /// User ID for in-app notifications
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,

    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_locale() -> String {
    "en".to_string()
}

impl Default for Recipient {
    fn default() -> Self {
        Self {
            email: None,
            telegram_chat_id: None,
            discord_webhook: None,
            slack_webhook: None,
            user_id: None,
            locale: default_locale(),
        }
    }
}

impl Recipient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_telegram_chat_id(mut self, chat_id: impl Into<String>) -> Self {
        self.telegram_chat_id = Some(chat_id.into());
        self
    }

    pub fn with_discord_webhook(mut self, webhook: impl Into<String>) -> Self {
        self.discord_webhook = Some(webhook.into());
        self
    }

    pub fn with_slack_webhook(mut self, webhook: impl Into<String>) -> Self {
        self.slack_webhook = Some(webhook.into());
        self
    }

    pub fn with_user_id(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Uniform channel-specific identifier lookup, so the orchestrator never
    /// needs to know recipient field names.
    pub fn channel_identifier(&self, channel: &str) -> Option<String> {
        match channel {
            "email" => self.email.clone(),
            "telegram" => self.telegram_chat_id.clone(),
            "discord" => self.discord_webhook.clone(),
            "slack" => self.slack_webhook.clone(),
            "in_app" => self.user_id.map(|id| id.to_string()),
            _ => None,
        }
    }
}

/// Outcome status of one channel attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Success,
    Failed,
    Queued,
}

/// Immutable result of one channel's send attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResult {
    pub channel: String,
    pub status: ResultStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Provider details, e.g. message ids or per-chat outcomes
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl NotificationResult {
    pub fn success(channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            status: ResultStatus::Success,
            message: Some(message.into()),
            metadata: HashMap::new(),
        }
    }

    pub fn failed(channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            status: ResultStatus::Failed,
            message: Some(message.into()),
            metadata: HashMap::new(),
        }
    }

    pub fn queued(channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            status: ResultStatus::Queued,
            message: Some(message.into()),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == ResultStatus::Success
    }

    pub fn is_failed(&self) -> bool {
        self.status == ResultStatus::Failed
    }

    pub fn is_queued(&self) -> bool {
        self.status == ResultStatus::Queued
    }
}
