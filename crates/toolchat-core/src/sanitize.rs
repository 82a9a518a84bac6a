//! Literal-text helpers for the two rendering media.
//!
//! - [`html_escape`]: escape HTML special characters so text is never parsed as markup.
//! - [`terminal_safe`]: neutralize control characters so text can never drive the terminal.

/// Escape HTML special characters for safe embedding in HTML documents.
pub fn html_escape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

/// Replace control characters with visible stand-ins.
///
/// C0 controls become their Unicode "control picture" (ESC shows as `␛`), DEL becomes
/// `␡` and C1 controls become U+FFFD. Newlines are kept, tabs expand to four spaces and
/// carriage returns are dropped so CRLF text renders as plain lines.
pub fn terminal_safe(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => result.push('\n'),
            '\r' => {}
            '\t' => result.push_str("    "),
            '\u{7f}' => result.push('\u{2421}'),
            c if (c as u32) < 0x20 => {
                result.push(char::from_u32(0x2400 + c as u32).unwrap_or('\u{fffd}'))
            }
            c if ('\u{80}'..='\u{9f}').contains(&c) => result.push('\u{fffd}'),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape("\"quoted\""), "&quot;quoted&quot;");
        assert_eq!(html_escape("it's"), "it&#39;s");
    }

    #[test]
    fn test_html_escape_leaves_plain_text() {
        assert_eq!(html_escape("What is 2+2?"), "What is 2+2?");
    }

    #[test]
    fn test_terminal_safe_neutralizes_escape_sequences() {
        let hostile = "\x1b[2J\x1b]0;pwned\x07hello";
        let safe = terminal_safe(hostile);
        assert!(!safe.contains('\x1b'));
        assert!(!safe.contains('\x07'));
        assert!(safe.starts_with("␛[2J"));
        assert!(safe.ends_with("hello"));
    }

    #[test]
    fn test_terminal_safe_keeps_layout_characters() {
        assert_eq!(terminal_safe("a\r\nb\tc"), "a\nb    c");
    }

    #[test]
    fn test_terminal_safe_c1_and_del() {
        assert_eq!(terminal_safe("x\u{9b}y\u{7f}"), "x\u{fffd}y\u{2421}");
    }

    #[test]
    fn test_terminal_safe_leaves_markup_literal() {
        assert_eq!(terminal_safe("<script>alert(1)</script>"), "<script>alert(1)</script>");
    }
}
