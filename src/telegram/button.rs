use serde_json::{Value, json};

/// Inline keyboard button.
///
/// Two variants: a callback button that triggers a `callback_query` with
/// custom data, and a URL button that opens a link.
#[derive(Debug, Clone)]
pub struct TelegramButton {
    text: String,
    callback_data: Option<String>,
    url: Option<String>,
}

impl TelegramButton {
    /// Callback button; `data` is echoed back on click (max 64 bytes per the
    /// Bot API).
    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: Some(data.into()),
            url: None,
        }
    }

    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: None,
            url: Some(url.into()),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_callback(&self) -> bool {
        self.callback_data.is_some()
    }

    pub fn is_url(&self) -> bool {
        self.url.is_some()
    }

    /// Bot API representation.
    pub fn to_json(&self) -> Value {
        match &self.callback_data {
            Some(data) => json!({ "text": self.text, "callback_data": data }),
            None => json!({ "text": self.text, "url": self.url }),
        }
    }
}

/// Build an `inline_keyboard` reply markup from buttons and a layout matrix.
///
/// The layout lists button indices per row, e.g. `[[0, 1], [2]]` puts two
/// buttons on the first row and one on the second. An empty layout puts all
/// buttons on a single row; out-of-range indices are skipped.
pub fn inline_keyboard(buttons: &[TelegramButton], layout: &[Vec<usize>]) -> Value {
    if buttons.is_empty() {
        return json!({ "inline_keyboard": [] });
    }

    let keyboard: Vec<Vec<Value>> = if layout.is_empty() {
        vec![buttons.iter().map(TelegramButton::to_json).collect()]
    } else {
        layout
            .iter()
            .map(|row| {
                row.iter()
                    .filter_map(|&index| buttons.get(index))
                    .map(TelegramButton::to_json)
                    .collect::<Vec<_>>()
            })
            .filter(|row: &Vec<Value>| !row.is_empty())
            .collect()
    };

    json!({ "inline_keyboard": keyboard })
}
