//! Pure string transforms for Telegram's legacy "Markdown" (v1) dialect.

use std::sync::LazyLock;

use regex::Regex;

// Markdown v1 only treats `_ * ` [` as markup; escaping anything else would
// render the backslashes literally.
static MARKDOWN_SPECIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([_*`\[])").expect("valid regex"));

static BOLD_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(?:strong|b)>(.*?)</(?:strong|b)>").expect("valid regex"));
static ITALIC_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(?:em|i)>(.*?)</(?:em|i)>").expect("valid regex"));
static PARAGRAPH_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</p>\s*").expect("valid regex"));
static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid regex"));
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));
static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Escape literal markup-significant characters for Markdown v1.
///
/// Escapes exactly `_`, `*`, `` ` `` and `[`.
pub fn escape_markdown(text: &str) -> String {
    MARKDOWN_SPECIAL.replace_all(text, r"\$1").into_owned()
}

/// Convert simple HTML to Telegram Markdown v1.
///
/// `<strong>`/`<b>` become `*bold*`, `<em>`/`<i>` become `_italic_`, `</p>`
/// becomes a paragraph break, `<br>` a newline; any remaining tags are
/// stripped and runs of blank lines collapsed.
pub fn html_to_markdown(html: &str) -> String {
    let text = BOLD_TAG.replace_all(html, "*$1*");
    let text = ITALIC_TAG.replace_all(&text, "_${1}_");
    let text = PARAGRAPH_CLOSE.replace_all(&text, "\n\n");
    let text = LINE_BREAK.replace_all(&text, "\n");
    let text = ANY_TAG.replace_all(&text, "");
    let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");
    text.trim().to_string()
}
