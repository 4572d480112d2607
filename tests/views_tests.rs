use booksum::core::models::SummaryRequest;
use booksum::views::{render_error, render_summary, text_to_html};

fn dune() -> SummaryRequest {
    SummaryRequest {
        title: "Dune".to_string(),
        author: "Frank Herbert".to_string(),
        chapter: 5,
    }
}

#[test]
fn test_summary_markup_has_heading_label_and_body() {
    let html = render_summary(&dune(), "Paul discovers...\nJessica worries.");

    assert!(html.contains("<h3>Dune by Frank Herbert</h3>"));
    assert!(html.contains("<strong>Summary through Chapter 5</strong>"));
    assert!(html.contains("<hr>"));
    assert!(html.contains("<p>Paul discovers...<br>Jessica worries.</p>"));
}

#[test]
fn test_rendering_is_idempotent() {
    let text = "**Story So Far**\nPaul arrives.\n\n**Themes**\nPower.";
    assert_eq!(render_summary(&dune(), text), render_summary(&dune(), text));
}

#[test]
fn test_model_text_is_not_escaped() {
    // Model output is interpolated verbatim.
    assert_eq!(text_to_html("<em>x</em>"), "<p><em>x</em></p>");
}

#[test]
fn test_error_markup_lists_troubleshooting() {
    let html = render_error("invalid x-api-key", &["Check your key", "Check credits"]);

    assert!(html.starts_with("<div class=\"error\">"));
    assert!(html.contains("<strong>Error:</strong> invalid x-api-key"));
    assert!(html.contains("<li>Check your key</li><li>Check credits</li>"));
    assert!(html.ends_with("</div>"));
}

#[test]
fn test_error_markup_without_tips() {
    let html = render_error("boom", &[]);
    assert_eq!(html, "<div class=\"error\"><strong>Error:</strong> boom</div>");
}
