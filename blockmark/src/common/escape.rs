//! Escaping helpers shared by the builder and the serializer.
//!
//! Markdown escaping only covers the characters that the serializer can emit
//! ambiguously from plain text: `_`, `*`, `` ` `` and `\`. Everything else is
//! passed through untouched; a full CommonMark escaper is out of scope.

/// Characters that are backslash-escaped when plain text is written as Markdown.
pub const MARKDOWN_SPECIAL: &[char] = &['_', '*', '`', '\\'];

/// Backslash-escape every Markdown-significant character in `text`.
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if MARKDOWN_SPECIAL.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Remove the backslash in front of Markdown-significant characters.
///
/// Backslashes before any other character are kept, which mirrors how
/// CommonMark treats them.
pub fn unescape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(&next) = chars.peek() {
                if MARKDOWN_SPECIAL.contains(&next) {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(ch);
    }
    out
}

/// Escape `&`, `<`, `>` and `"` for use in HTML text or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape `|` so that a rendered cell can't be mistaken for a cell boundary.
pub fn escape_pipes(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Length of the longest run of `needle` in `text`.
pub fn longest_run(text: &str, needle: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for ch in text.chars() {
        if ch == needle {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}
