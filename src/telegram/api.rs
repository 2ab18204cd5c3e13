use std::path::Path;

use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde_json::{Value, json};
use tracing::{debug, error};

use super::button::{TelegramButton, inline_keyboard};
use crate::config::TelegramConfig;
use crate::error::NotificationError;

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Bot API caption limit (characters)
const CAPTION_LIMIT: usize = 1024;
/// answerCallbackQuery text limit (characters)
const CALLBACK_TEXT_LIMIT: usize = 200;

/// Successful Bot API call outcome.
#[derive(Debug, Clone)]
pub struct TelegramResponse {
    pub message_id: Option<i64>,
    pub result: Value,
}

/// Thin wrapper over the Telegram Bot API.
///
/// Every method posts JSON (or multipart for file uploads) to
/// `{base}/bot{token}/{method}` and interprets the standard response envelope:
/// HTTP 200 with `ok: true` is a success carrying `result.message_id` when
/// present; anything else is a failure carrying `description`.
pub struct TelegramApi {
    http: Client,
    config: TelegramConfig,
    api_base: String,
}

impl TelegramApi {
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            http: Client::new(),
            config,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Override the API host, for tests against a local mock server.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.config.enabled && !self.config.bot_token.is_empty()
    }

    /// Chat ids a notification fans out to when the recipient names none.
    pub fn chat_ids(&self) -> &[String] {
        &self.config.chat_ids
    }

    /// Send a text message, optionally with an inline keyboard.
    pub async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        buttons: &[TelegramButton],
        layout: &[Vec<usize>],
    ) -> Result<TelegramResponse, NotificationError> {
        let mut payload = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "Markdown",
            "disable_web_page_preview": self.config.disable_preview,
        });
        if !buttons.is_empty() {
            payload["reply_markup"] = inline_keyboard(buttons, layout);
        }
        self.call("sendMessage", payload).await
    }

    /// Send a photo by URL, file id, or local path (uploaded as multipart).
    pub async fn send_photo(
        &self,
        chat_id: &str,
        photo: &str,
        caption: &str,
        buttons: &[TelegramButton],
        layout: &[Vec<usize>],
    ) -> Result<TelegramResponse, NotificationError> {
        if is_local_file_path(photo) {
            return self
                .send_photo_upload(chat_id, photo, caption, buttons, layout)
                .await;
        }

        let mut payload = json!({
            "chat_id": chat_id,
            "photo": photo,
            "parse_mode": "Markdown",
        });
        if !caption.is_empty() {
            payload["caption"] = json!(truncate_chars(caption, CAPTION_LIMIT));
        }
        if !buttons.is_empty() {
            payload["reply_markup"] = inline_keyboard(buttons, layout);
        }
        self.call("sendPhoto", payload).await
    }

    async fn send_photo_upload(
        &self,
        chat_id: &str,
        file_path: &str,
        caption: &str,
        buttons: &[TelegramButton],
        layout: &[Vec<usize>],
    ) -> Result<TelegramResponse, NotificationError> {
        if !self.is_configured() {
            return Err(NotificationError::InvalidConfig(
                "Telegram is not configured".into(),
            ));
        }

        let bytes = tokio::fs::read(file_path)
            .await
            .map_err(|_| NotificationError::SendFailed(format!("File not found: {file_path}")))?;
        let file_name = Path::new(file_path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".to_string());

        let mut form = Form::new()
            .text("chat_id", chat_id.to_string())
            .text("parse_mode", "Markdown")
            .part("photo", Part::bytes(bytes).file_name(file_name));
        if !caption.is_empty() {
            form = form.text("caption", truncate_chars(caption, CAPTION_LIMIT));
        }
        if !buttons.is_empty() {
            form = form.text("reply_markup", inline_keyboard(buttons, layout).to_string());
        }

        let response = self
            .http
            .post(self.method_url("sendPhoto"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!(method = "sendPhoto", error = %e, "Telegram API request failed");
                NotificationError::SendFailed(e.to_string())
            })?;
        self.process_response("sendPhoto", response).await
    }

    /// Answer a callback query (button click) with a toast or alert popup.
    pub async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: &str,
        show_alert: bool,
    ) -> Result<TelegramResponse, NotificationError> {
        self.call(
            "answerCallbackQuery",
            json!({
                "callback_query_id": callback_query_id,
                "text": truncate_chars(text, CALLBACK_TEXT_LIMIT),
                "show_alert": show_alert,
            }),
        )
        .await
    }

    /// Replace a message's inline keyboard; empty buttons remove it.
    pub async fn edit_message_reply_markup(
        &self,
        chat_id: &str,
        message_id: i64,
        buttons: &[TelegramButton],
        layout: &[Vec<usize>],
    ) -> Result<TelegramResponse, NotificationError> {
        let mut payload = json!({
            "chat_id": chat_id,
            "message_id": message_id,
        });
        payload["reply_markup"] = if buttons.is_empty() {
            json!({ "inline_keyboard": [] })
        } else {
            inline_keyboard(buttons, layout)
        };
        self.call("editMessageReplyMarkup", payload).await
    }

    /// Edit the caption of a photo message.
    pub async fn edit_message_caption(
        &self,
        chat_id: &str,
        message_id: i64,
        caption: &str,
        buttons: &[TelegramButton],
        layout: &[Vec<usize>],
    ) -> Result<TelegramResponse, NotificationError> {
        let mut payload = json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "caption": truncate_chars(caption, CAPTION_LIMIT),
            "parse_mode": "Markdown",
        });
        if !buttons.is_empty() {
            payload["reply_markup"] = inline_keyboard(buttons, layout);
        }
        self.call("editMessageCaption", payload).await
    }

    /// Delete a message. The Bot API restricts which messages a bot may
    /// delete (own messages, or any with can_delete_messages in groups).
    pub async fn delete_message(
        &self,
        chat_id: &str,
        message_id: i64,
    ) -> Result<TelegramResponse, NotificationError> {
        self.call(
            "deleteMessage",
            json!({ "chat_id": chat_id, "message_id": message_id }),
        )
        .await
    }

    /// Send a sticker by file id.
    pub async fn send_sticker(
        &self,
        chat_id: &str,
        sticker: &str,
    ) -> Result<TelegramResponse, NotificationError> {
        self.call(
            "sendSticker",
            json!({ "chat_id": chat_id, "sticker": sticker }),
        )
        .await
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.config.bot_token, method)
    }

    async fn call(&self, method: &str, payload: Value) -> Result<TelegramResponse, NotificationError> {
        if !self.is_configured() {
            return Err(NotificationError::InvalidConfig(
                "Telegram is not configured".into(),
            ));
        }

        let response = self
            .http
            .post(self.method_url(method))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(method, error = %e, "Telegram API request failed");
                NotificationError::SendFailed(e.to_string())
            })?;
        self.process_response(method, response).await
    }

    async fn process_response(
        &self,
        method: &str,
        response: reqwest::Response,
    ) -> Result<TelegramResponse, NotificationError> {
        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| NotificationError::SendFailed(e.to_string()))?;

        if status.is_success() && body["ok"].as_bool() == Some(true) {
            debug!(method, "Telegram API call succeeded");
            return Ok(TelegramResponse {
                message_id: body["result"]["message_id"].as_i64(),
                result: body["result"].clone(),
            });
        }

        let description = body["description"]
            .as_str()
            .unwrap_or("Unknown Telegram API error")
            .to_string();
        error!(method, status = %status, error = %description, "Telegram API error");
        Err(NotificationError::SendFailed(description))
    }
}

fn is_local_file_path(photo: &str) -> bool {
    // URLs and file ids never start with a path separator or drive letter
    let looks_like_path = photo.starts_with('/')
        || (photo.len() > 2
            && photo.as_bytes()[1] == b':'
            && photo.chars().next().is_some_and(|c| c.is_ascii_alphabetic()));
    looks_like_path && Path::new(photo).exists()
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> TelegramConfig {
        TelegramConfig {
            enabled: true,
            bot_token: "123:abc".to_string(),
            chat_ids: vec![],
            disable_preview: false,
            webhook_secret: None,
        }
    }

    fn api(server: &MockServer) -> TelegramApi {
        TelegramApi::new(test_config()).with_api_base(server.uri())
    }

    #[tokio::test]
    async fn test_send_message_extracts_message_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .and(body_partial_json(serde_json::json!({
                "chat_id": "42",
                "parse_mode": "Markdown"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": { "message_id": 99 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = api(&server).send_message("42", "hello", &[], &[]).await.unwrap();
        assert_eq!(response.message_id, Some(99));
    }

    #[tokio::test]
    async fn test_send_message_includes_keyboard() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .and(body_partial_json(serde_json::json!({
                "reply_markup": {
                    "inline_keyboard": [[{ "text": "Go", "url": "https://example.com" }]]
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": { "message_id": 1 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let buttons = [TelegramButton::url("Go", "https://example.com")];
        api(&server)
            .send_message("42", "hello", &buttons, &[])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_api_error_carries_description() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "ok": false,
                "description": "Bad Request: chat not found"
            })))
            .mount(&server)
            .await;

        let err = api(&server)
            .send_message("42", "hello", &[], &[])
            .await
            .unwrap_err();
        assert_eq!(err.detail(), "Bad Request: chat not found");
    }

    #[tokio::test]
    async fn test_api_error_without_description() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/deleteMessage"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let err = api(&server).delete_message("42", 7).await.unwrap_err();
        assert_eq!(err.detail(), "Unknown Telegram API error");
    }

    #[tokio::test]
    async fn test_ok_false_with_http_200_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendSticker"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": false,
                "description": "STICKER_INVALID"
            })))
            .mount(&server)
            .await;

        let err = api(&server).send_sticker("42", "bogus").await.unwrap_err();
        assert_eq!(err.detail(), "STICKER_INVALID");
    }

    #[tokio::test]
    async fn test_edit_reply_markup_removes_keyboard_when_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/editMessageReplyMarkup"))
            .and(body_partial_json(serde_json::json!({
                "chat_id": "42",
                "message_id": 7,
                "reply_markup": { "inline_keyboard": [] }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": {}
            })))
            .expect(1)
            .mount(&server)
            .await;

        api(&server)
            .edit_message_reply_markup("42", 7, &[], &[])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_send_photo_uploads_local_file() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendPhoto"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": { "message_id": 5 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"not really a jpeg").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let response = api(&server)
            .send_photo("42", &path, "caption", &[], &[])
            .await
            .unwrap();
        assert_eq!(response.message_id, Some(5));
    }

    #[tokio::test]
    async fn test_send_photo_by_url_posts_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendPhoto"))
            .and(body_partial_json(serde_json::json!({
                "chat_id": "42",
                "photo": "https://example.com/a.jpg",
                "caption": "hi"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": { "message_id": 6 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        api(&server)
            .send_photo("42", "https://example.com/a.jpg", "hi", &[], &[])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unconfigured_api_refuses_calls() {
        let api = TelegramApi::new(TelegramConfig::default());
        let err = api.send_message("42", "hello", &[], &[]).await.unwrap_err();
        assert!(matches!(err, NotificationError::InvalidConfig(_)));
    }

    #[test]
    fn test_truncate_chars_is_boundary_safe() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("ab", 10), "ab");
    }

    #[test]
    fn test_local_file_path_detection() {
        assert!(!is_local_file_path("https://example.com/a.jpg"));
        assert!(!is_local_file_path("AgACAgQAAxkBAAIB")); // file id
        assert!(!is_local_file_path("/nonexistent/file.jpg")); // path but absent
    }
}
