//! Telegram Bot API wrapper, inline keyboards, markup helpers, and the
//! webhook update adapter.

pub mod api;
pub mod button;
pub mod markdown;
pub mod webhook;

pub use api::{DEFAULT_API_BASE, TelegramApi, TelegramResponse};
pub use button::{TelegramButton, inline_keyboard};
pub use markdown::{escape_markdown, html_to_markdown};
pub use webhook::TelegramWebhookHandler;
