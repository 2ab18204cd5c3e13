//! Multi-channel notification dispatch.
//!
//! Given a [`Notification`] and a [`Recipient`], the [`NotificationService`]
//! resolves each requested channel through the [`ChannelRegistry`], gives a
//! pre-send listener the chance to veto the attempt, invokes the channel, and
//! collects one [`NotificationResult`] per attempt. Channel failures are
//! isolated: no channel or transport error ever escapes the send loop.
//!
//! # Composition
//!
//! ```
//! use std::sync::Arc;
//! use notify_dispatch::{
//!     Channel, ChannelRegistry, EventDispatcher, Notification, NotificationConfig,
//!     NotificationService, Recipient, TelegramApi, TelegramChannel,
//! };
//!
//! # async fn compose() {
//! let config = NotificationConfig::default();
//! config.validate().unwrap();
//!
//! let telegram = TelegramChannel::new(Arc::new(TelegramApi::new(config.telegram.clone())));
//! let channels: Vec<Arc<dyn Channel>> = vec![Arc::new(telegram)];
//! let registry = Arc::new(ChannelRegistry::new(channels));
//!
//! let mut dispatcher = EventDispatcher::new();
//! dispatcher.on_pre_send(|event| {
//!     if event.notification.title.is_empty() {
//!         event.cancel();
//!     }
//! });
//!
//! let service = NotificationService::new(registry, Arc::new(dispatcher))
//!     .with_default_channels(config.default_channels.clone());
//!
//! let results = service
//!     .send(&Notification::new("Deploy", "done"), &Recipient::new())
//!     .await;
//! # let _ = results;
//! # }
//! ```

pub mod channel;
pub mod config;
pub mod error;
pub mod events;
pub mod service;
pub mod telegram;
pub mod templates;
pub mod types;

pub use channel::{
    Channel, ChannelRegistry, EmailChannel, EmailMessage, Mailer, SmtpMailer, TelegramChannel,
};
pub use config::{EmailConfig, NotificationConfig, TelegramConfig};
pub use error::NotificationError;
pub use events::{
    CallbackData, EventDispatcher, FailedEvent, PreSendEvent, SentEvent, TelegramCallbackEvent,
    TelegramMessageEvent,
};
pub use service::NotificationService;
pub use telegram::{
    TelegramApi, TelegramButton, TelegramResponse, TelegramWebhookHandler, escape_markdown,
    html_to_markdown,
};
pub use templates::{RenderedContent, Template, TemplateRenderer};
pub use types::{
    Notification, NotificationPriority, NotificationResult, Recipient, ResultStatus,
};
