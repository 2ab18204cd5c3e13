use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Channel \"{0}\" not found or not configured")]
    ChannelNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Invalid webhook payload: {0}")]
    InvalidWebhookPayload(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl NotificationError {
    /// Stable tag recorded in failed-result metadata.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ChannelNotFound(_) => "channel_not_found",
            Self::InvalidConfig(_) => "invalid_config",
            Self::SendFailed(_) => "send_failed",
            Self::TemplateNotFound(_) => "template_not_found",
            Self::InvalidWebhookPayload(_) => "invalid_webhook_payload",
            Self::Internal(_) => "internal",
        }
    }

    /// The underlying message without the variant prefix, for result messages
    /// where the provider's own wording should survive unchanged.
    pub fn detail(&self) -> String {
        match self {
            Self::ChannelNotFound(msg)
            | Self::InvalidConfig(msg)
            | Self::SendFailed(msg)
            | Self::TemplateNotFound(msg)
            | Self::InvalidWebhookPayload(msg)
            | Self::Internal(msg) => msg.clone(),
        }
    }
}
