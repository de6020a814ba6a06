//! Reader side of the codec: logical lines, key/value split, unescaping.

use crate::error::{CodecError, CodecResult};

/// Whitespace as understood by the properties grammar.
fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0C')
}

/// Splits text into natural lines, accepting `\n`, `\r` and `\r\n` terminators.
fn natural_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let bytes = text.as_bytes();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                start = i + 1;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if start < bytes.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// A line continues when it ends in an odd number of backslashes.
fn continues(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// Parses `text` and hands every `(key, value)` record to `sink` in document order.
pub(crate) fn parse_records<F>(text: &str, mut sink: F) -> CodecResult<()>
where
    F: FnMut(String, String),
{
    let lines = natural_lines(text);
    let mut index = 0;

    while index < lines.len() {
        let line_no = index + 1;
        let first = lines[index].trim_start_matches(is_blank);
        index += 1;

        if first.is_empty() || first.starts_with('#') || first.starts_with('!') {
            continue;
        }

        let mut logical = first.to_string();
        while continues(&logical) {
            logical.pop();
            let Some(next) = lines.get(index) else {
                break;
            };
            logical.push_str(next.trim_start_matches(is_blank));
            index += 1;
        }

        let (key, value) = split_record(&logical, line_no)?;
        sink(key, value);
    }
    Ok(())
}

/// Splits one logical line into an unescaped key and value.
fn split_record(logical: &str, line: usize) -> CodecResult<(String, String)> {
    let chars: Vec<char> = logical.chars().collect();
    let mut key_end = chars.len();
    let mut value_start = chars.len();
    let mut has_separator = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if !escaped && (c == '=' || c == ':') {
            key_end = i;
            value_start = i + 1;
            has_separator = true;
            break;
        }
        if !escaped && is_blank(c) {
            key_end = i;
            value_start = i + 1;
            break;
        }
        escaped = c == '\\' && !escaped;
    }

    while value_start < chars.len() {
        let c = chars[value_start];
        if is_blank(c) {
            value_start += 1;
        } else if !has_separator && (c == '=' || c == ':') {
            has_separator = true;
            value_start += 1;
        } else {
            break;
        }
    }

    let key = unescape(&chars[..key_end], line)?;
    let value = unescape(&chars[value_start..], line)?;
    Ok((key, value))
}

/// Resolves backslash escapes. `\uXXXX` sequences are UTF-16 code units and
/// may form surrogate pairs.
fn unescape(chars: &[char], line: usize) -> CodecResult<String> {
    let mut units: Vec<u16> = Vec::with_capacity(chars.len());
    let mut buf = [0u16; 2];
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        i += 1;
        if c != '\\' {
            units.extend_from_slice(c.encode_utf16(&mut buf));
            continue;
        }
        let Some(&escaped) = chars.get(i) else {
            break;
        };
        i += 1;
        let decoded = match escaped {
            't' => '\t',
            'n' => '\n',
            'r' => '\r',
            'f' => '\x0C',
            'u' => {
                let digits = chars.get(i..i + 4).ok_or(CodecError::MalformedEscape { line })?;
                let mut unit: u16 = 0;
                for d in digits {
                    let nibble = d.to_digit(16).ok_or(CodecError::MalformedEscape { line })?;
                    unit = (unit << 4) | nibble as u16;
                }
                i += 4;
                units.push(unit);
                continue;
            }
            other => other,
        };
        units.extend_from_slice(decoded.encode_utf16(&mut buf));
    }

    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .map_err(|_| CodecError::UnpairedSurrogate { line })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_lines_accept_all_terminators() {
        assert_eq!(natural_lines("a\nb\r\nc\rd"), vec!["a", "b", "c", "d"]);
        assert_eq!(natural_lines("a\n\nb\n"), vec!["a", "", "b"]);
    }

    #[test]
    fn continuation_needs_odd_backslashes() {
        assert!(continues("a=b\\"));
        assert!(!continues("a=b\\\\"));
        assert!(continues("a=b\\\\\\"));
        assert!(!continues("a=b"));
    }

    #[test]
    fn split_on_whitespace_then_separator() {
        let (k, v) = split_record("key   =  value", 1).unwrap();
        assert_eq!(k, "key");
        assert_eq!(v, "value");
    }

    #[test]
    fn only_one_separator_is_consumed() {
        let (k, v) = split_record("key==value", 1).unwrap();
        assert_eq!(k, "key");
        assert_eq!(v, "=value");
    }

    #[test]
    fn unescape_surrogate_pair() {
        let chars: Vec<char> = "\\uD83D\\uDE00".chars().collect();
        assert_eq!(unescape(&chars, 1).unwrap(), "\u{1F600}");
    }

    #[test]
    fn unescape_rejects_short_unicode_escape() {
        let chars: Vec<char> = "\\u12".chars().collect();
        assert!(matches!(
            unescape(&chars, 7),
            Err(CodecError::MalformedEscape { line: 7 })
        ));
    }
}
