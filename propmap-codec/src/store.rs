//! Writer side of the codec: comment header, timestamp and escaped records.

use std::fmt::Write as _;

use chrono::Utc;

/// Format of the timestamp line written after the comment.
pub const TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S UTC %Y";

/// Options controlling [`Properties::store`](crate::Properties::store).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Write a `#<timestamp>` line after the comment.
    pub timestamp: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { timestamp: true }
    }
}

impl StoreOptions {
    /// Options producing reproducible output (no timestamp line).
    pub fn without_timestamp() -> Self {
        Self { timestamp: false }
    }
}

fn push_unicode_escape(out: &mut String, c: char) {
    let mut buf = [0u16; 2];
    for unit in c.encode_utf16(&mut buf) {
        let _ = write!(out, "\\u{:04X}", unit);
    }
}

fn is_printable_ascii(c: char) -> bool {
    (' '..='~').contains(&c)
}

/// Renders the comment block, one `#` line per comment line.
///
/// Continuation lines that already start with `#` or `!` are kept as they are.
pub(crate) fn render_comment(out: &mut String, comment: &str) {
    if comment.is_empty() {
        out.push_str("#\n");
        return;
    }
    for (i, line) in comment.lines().enumerate() {
        if i == 0 || !(line.starts_with('#') || line.starts_with('!')) {
            out.push('#');
        }
        for c in line.chars() {
            if is_printable_ascii(c) {
                out.push(c);
            } else {
                push_unicode_escape(out, c);
            }
        }
        out.push('\n');
    }
}

pub(crate) fn render_timestamp(out: &mut String) {
    let _ = writeln!(out, "#{}", Utc::now().format(TIMESTAMP_FORMAT));
}

/// Escapes a key (`escape_all_spaces = true`) or a value (leading space only).
pub(crate) fn escape(out: &mut String, text: &str, escape_all_spaces: bool) {
    for (i, c) in text.chars().enumerate() {
        match c {
            ' ' if escape_all_spaces || i == 0 => out.push_str("\\ "),
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0C' => out.push_str("\\f"),
            '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            c if is_printable_ascii(c) => out.push(c),
            c => push_unicode_escape(out, c),
        }
    }
}
