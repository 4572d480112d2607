//! Markup for the result region.
//!
//! Model output is interpolated as-is; no HTML escaping is applied.

use regex::Regex;
use std::fmt::Write as _;

use crate::core::models::SummaryRequest;

static BOLD_RE: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"\*\*(.+?)\*\*")
        .unwrap_or_else(|_| Regex::new(r"$^").expect("fallback regex compiles"))
});

/// Converts generated text to markup: blank-line separated blocks become
/// paragraphs, remaining newlines become line breaks and `**bold**` becomes
/// `<strong>`.
#[must_use]
pub fn text_to_html(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n");
    normalized
        .split("\n\n")
        .map(|block| block.trim_matches('\n'))
        .filter(|block| !block.trim().is_empty())
        .map(|block| {
            let with_breaks = block.replace('\n', "<br>");
            let emphasized = BOLD_RE.replace_all(&with_breaks, "<strong>$1</strong>");
            format!("<p>{emphasized}</p>")
        })
        .collect()
}

/// Full markup for a successful summary.
#[must_use]
pub fn render_summary(request: &SummaryRequest, text: &str) -> String {
    format!(
        "<h3>{title} by {author}</h3>\n\
         <p><strong>Summary through Chapter {chapter}</strong></p>\n\
         <hr>\n\
         <div class=\"summary-body\">{body}</div>",
        title = request.title,
        author = request.author,
        chapter = request.chapter,
        body = text_to_html(text),
    )
}

/// Inline error markup followed by the endpoint's troubleshooting checklist.
#[must_use]
pub fn render_error(message: &str, tips: &[&str]) -> String {
    let mut out = format!("<div class=\"error\"><strong>Error:</strong> {message}");
    if !tips.is_empty() {
        out.push_str("<br><br>Please check the following:<ul>");
        for tip in tips {
            let _ = write!(out, "<li>{tip}</li>");
        }
        out.push_str("</ul>");
    }
    out.push_str("</div>");
    out
}
