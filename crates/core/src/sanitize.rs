//! HTML sanitization of survey text.
//!
//! Pure string-level escaping with no rendering-environment dependency.
//! Escaping happens exactly once, when the submission document is
//! assembled; stored documents are never re-sanitized.

/// Neutralize HTML-significant characters so the value can be embedded
/// into markup without executing as markup.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
