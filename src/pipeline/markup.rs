//! Input-format detection and markup preparation.
//!
//! HTML is handed to the browser verbatim. Plain text is wrapped in a fixed
//! HTML page after escaping, so that text like `<script>` prints as the
//! literal characters instead of becoming part of the document structure.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Extensions (lower-case, no dot) loaded as HTML.
pub const MARKUP_EXTENSIONS: &[&str] = &["html", "htm"];

/// Extensions (lower-case, no dot) wrapped in the text template.
pub const TEXT_EXTENSIONS: &[&str] = &["txt"];

/// The two input kinds the converter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputFormat {
    /// Plain text, wrapped in [`TEXT_TEMPLATE_HEAD`] / [`TEXT_TEMPLATE_TAIL`].
    Text,
    /// HTML, loaded as-is.
    Markup,
}

impl InputFormat {
    /// Detect the format from the path's extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        if MARKUP_EXTENSIONS.contains(&ext.as_str()) {
            Some(InputFormat::Markup)
        } else if TEXT_EXTENSIONS.contains(&ext.as_str()) {
            Some(InputFormat::Text)
        } else {
            None
        }
    }
}

/// Opening half of the text template, up to and including `<pre>`.
pub const TEXT_TEMPLATE_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Text to PDF</title>
  <style>
    body {
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
      line-height: 1.6;
      max-width: 800px;
      margin: 20px;
      padding: 20px;
    }
    pre {
      white-space: pre-wrap;
      word-wrap: break-word;
    }
  </style>
</head>
<body>
  <pre>"#;

/// Closing half of the text template.
pub const TEXT_TEMPLATE_TAIL: &str = "</pre>\n</body>\n</html>\n";

/// Produce the markup the browser should load for `content`.
pub fn prepare(format: InputFormat, content: &str) -> String {
    match format {
        InputFormat::Markup => content.to_string(),
        InputFormat::Text => wrap_text(content),
    }
}

/// Wrap plain text in the fixed template.
pub fn wrap_text(content: &str) -> String {
    let escaped = escape_text(content);
    let mut html =
        String::with_capacity(TEXT_TEMPLATE_HEAD.len() + escaped.len() + TEXT_TEMPLATE_TAIL.len());
    html.push_str(TEXT_TEMPLATE_HEAD);
    html.push_str(&escaped);
    html.push_str(TEXT_TEMPLATE_TAIL);
    html
}

/// Escape the characters that would otherwise open or close markup.
///
/// `&` goes first so existing entities in the text print literally too.
pub fn escape_text(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for ch in content.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_formats_case_insensitively() {
        assert_eq!(InputFormat::from_path(Path::new("a.html")), Some(InputFormat::Markup));
        assert_eq!(InputFormat::from_path(Path::new("a.HTM")), Some(InputFormat::Markup));
        assert_eq!(InputFormat::from_path(Path::new("notes.TXT")), Some(InputFormat::Text));
        assert_eq!(InputFormat::from_path(Path::new("report.docx")), None);
        assert_eq!(InputFormat::from_path(Path::new("Makefile")), None);
        assert_eq!(InputFormat::from_path(Path::new(".html")), None);
    }

    #[test]
    fn script_tag_is_escaped() {
        let html = wrap_text("before <script>alert(1)</script> after");
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn ampersand_escaped_before_angle_brackets() {
        assert_eq!(escape_text("a &lt; b"), "a &amp;lt; b");
        assert_eq!(escape_text("x > y & z"), "x &gt; y &amp; z");
    }

    #[test]
    fn whitespace_survives_wrapping() {
        let text = "col1\tcol2\n  indented\n\n";
        let html = wrap_text(text);
        assert!(html.contains("<pre>col1\tcol2\n  indented\n\n</pre>"));
    }

    #[test]
    fn markup_passes_through_unchanged() {
        let src = "<h1>Title</h1><p>a &amp; b</p>";
        assert_eq!(prepare(InputFormat::Markup, src), src);
    }

    #[test]
    fn template_pins_layout() {
        let html = wrap_text("");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("max-width: 800px"));
        assert!(html.contains("white-space: pre-wrap"));
        assert!(html.contains(r#"<meta charset="utf-8">"#));
    }
}
