use std::sync::Arc;

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType,
    transport::smtp::authentication::Credentials,
};

use super::Channel;
use crate::config::EmailConfig;
use crate::error::NotificationError;
use crate::templates::TemplateRenderer;
use crate::types::{Notification, NotificationResult, Recipient};

/// Outbound email, ready for a transport.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Mail transport seam. The channel only ever constructs a message and hands
/// it over; a transport error is a failed result, never an escaping fault.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotificationError>;
}

/// Production [`Mailer`] over lettre's async SMTP transport.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn from_config(config: &EmailConfig) -> Result<Self, NotificationError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| NotificationError::InvalidConfig(e.to_string()))?
            .port(config.smtp_port.unwrap_or(587));

        if let (Some(username), Some(password)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotificationError> {
        let email = Message::builder()
            .from(message.from.parse().map_err(|e| {
                NotificationError::InvalidConfig(format!("Invalid from address: {e}"))
            })?)
            .to(message.to.parse().map_err(|e| {
                NotificationError::SendFailed(format!("Invalid recipient address: {e}"))
            })?)
            .subject(message.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(message.html_body.clone())
            .map_err(|e| NotificationError::SendFailed(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| NotificationError::SendFailed(e.to_string()))?;
        Ok(())
    }
}

/// Email notification channel.
pub struct EmailChannel {
    mailer: Arc<dyn Mailer>,
    renderer: Option<Arc<TemplateRenderer>>,
    from: String,
    from_name: String,
}

impl EmailChannel {
    pub fn new(mailer: Arc<dyn Mailer>, config: &EmailConfig) -> Self {
        Self {
            mailer,
            renderer: None,
            from: config.from.clone(),
            from_name: config.from_name.clone(),
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<TemplateRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    fn sender(&self) -> String {
        if self.from_name.is_empty() {
            self.from.clone()
        } else {
            format!("{} <{}>", self.from_name, self.from)
        }
    }

    /// Render the body through the template renderer when the notification
    /// names a registered template; otherwise fall back to the raw content.
    fn render_body(&self, notification: &Notification) -> String {
        if let (Some(renderer), Some(template)) = (&self.renderer, &notification.template)
            && let Ok(rendered) = renderer.render_notification(template, notification)
        {
            return rendered.html_body.unwrap_or(rendered.body);
        }
        notification.content.clone()
    }
}

#[async_trait]
impl Channel for EmailChannel {
    fn name(&self) -> &'static str {
        "email"
    }

    fn is_configured(&self) -> bool {
        !self.from.is_empty()
    }

    fn retry_priority(&self) -> i32 {
        100
    }

    async fn do_send(
        &self,
        notification: &Notification,
        recipient: &Recipient,
    ) -> Result<NotificationResult, NotificationError> {
        let Some(to) = recipient.email.as_deref() else {
            return Ok(NotificationResult::failed(
                self.name(),
                "Recipient has no email address",
            ));
        };

        let message = EmailMessage {
            from: self.sender(),
            to: to.to_string(),
            subject: notification.title.clone(),
            html_body: self.render_body(notification),
        };

        match self.mailer.send(&message).await {
            Ok(()) => Ok(NotificationResult::success(
                self.name(),
                format!("Email sent to {to}"),
            )),
            Err(e) => Ok(NotificationResult::failed(
                self.name(),
                format!("Failed to send email: {}", e.detail()),
            )
            .with_metadata("error_kind", e.kind())),
        }
    }
}
