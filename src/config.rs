use serde::Deserialize;

use crate::error::NotificationError;
use crate::types::NotificationPriority;

/// Top-level notification configuration, consumed once at composition time to
/// construct channel instances. Validated up front; never re-checked per send.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub email: EmailConfig,
    pub telegram: TelegramConfig,

    /// Channels used when a notification names none
    pub default_channels: Vec<String>,

    pub default_priority: NotificationPriority,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            email: EmailConfig::default(),
            telegram: TelegramConfig::default(),
            default_channels: vec!["email".to_string()],
            default_priority: NotificationPriority::Normal,
        }
    }
}

impl NotificationConfig {
    pub fn validate(&self) -> Result<(), NotificationError> {
        self.email.validate()?;
        self.telegram.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub enabled: bool,
    pub from: String,
    pub from_name: String,
    pub smtp_host: String,
    pub smtp_port: Option<u16>,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    pub fn validate(&self) -> Result<(), NotificationError> {
        if self.enabled && self.from.is_empty() {
            return Err(NotificationError::InvalidConfig(
                "email channel enabled without a from address".into(),
            ));
        }
        if self.enabled && self.smtp_host.is_empty() {
            return Err(NotificationError::InvalidConfig(
                "email channel enabled without an SMTP host".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub enabled: bool,
    pub bot_token: String,

    /// Chats a notification fans out to when the recipient has no explicit
    /// chat id
    pub chat_ids: Vec<String>,

    pub disable_preview: bool,

    /// Shared secret expected in the webhook's secret-token header
    pub webhook_secret: Option<String>,
}

impl TelegramConfig {
    pub fn validate(&self) -> Result<(), NotificationError> {
        if self.enabled && self.bot_token.is_empty() {
            return Err(NotificationError::InvalidConfig(
                "telegram channel enabled without a bot token".into(),
            ));
        }
        Ok(())
    }
}
