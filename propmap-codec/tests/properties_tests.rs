use pretty_assertions::assert_eq;
use propmap_codec::{CodecError, Properties, StoreOptions};
use proptest::prelude::*;

// ── Parsing ──────────────────────────────────────────────────────

#[test]
fn parse_simple_records() {
    let props = Properties::parse("a=1\nb = 2\nc:3\nd 4\n").unwrap();
    assert_eq!(props.len(), 4);
    assert_eq!(props.get("a"), Some("1"));
    assert_eq!(props.get("b"), Some("2"));
    assert_eq!(props.get("c"), Some("3"));
    assert_eq!(props.get("d"), Some("4"));
}

#[test]
fn parse_skips_comments_and_blank_lines() {
    let text = "# comment\n! other comment\n\n   \n  # indented comment\nkey=value\n";
    let props = Properties::parse(text).unwrap();
    assert_eq!(props.len(), 1);
    assert_eq!(props.get("key"), Some("value"));
}

#[test]
fn parse_key_without_value() {
    let props = Properties::parse("lonely\n").unwrap();
    assert_eq!(props.get("lonely"), Some(""));
}

#[test]
fn parse_line_continuation() {
    let text = "fruits=apple, \\\n    banana, \\\n    cherry\n";
    let props = Properties::parse(text).unwrap();
    assert_eq!(props.get("fruits"), Some("apple, banana, cherry"));
}

#[test]
fn parse_escaped_backslash_does_not_continue() {
    let props = Properties::parse("path=C:\\\\\nnext=1\n").unwrap();
    assert_eq!(props.get("path"), Some("C:\\"));
    assert_eq!(props.get("next"), Some("1"));
}

#[test]
fn parse_escapes() {
    let props = Properties::parse("k\\ ey=t\\tn\\nu\\u00E4\\=x\n").unwrap();
    assert_eq!(props.get("k ey"), Some("t\tn\nuä=x"));
}

#[test]
fn parse_crlf_and_cr_line_endings() {
    let props = Properties::parse("a=1\r\nb=2\rc=3").unwrap();
    assert_eq!(props.get("a"), Some("1"));
    assert_eq!(props.get("b"), Some("2"));
    assert_eq!(props.get("c"), Some("3"));
}

#[test]
fn parse_duplicate_keys_last_wins() {
    let props = Properties::parse("a=first\na=second\n").unwrap();
    assert_eq!(props.len(), 1);
    assert_eq!(props.get("a"), Some("second"));
}

#[test]
fn parse_malformed_unicode_escape_reports_line() {
    let err = Properties::parse("ok=1\nbad=\\u00G1\n").unwrap_err();
    assert!(matches!(err, CodecError::MalformedEscape { line: 2 }));
}

#[test]
fn load_from_reader() {
    let props = Properties::load("Customer.dan.name=Daniel\n".as_bytes()).unwrap();
    assert_eq!(props.get("Customer.dan.name"), Some("Daniel"));
}

#[test]
fn load_latin1_bytes() {
    let props = Properties::load(&b"Customer.dan.name=J\xFCrgen\n"[..]).unwrap();
    assert_eq!(props.get("Customer.dan.name"), Some("J\u{fc}rgen"));
}

#[test]
fn load_prefers_utf8_when_valid() {
    let props = Properties::load("name=J\u{fc}rgen\n".as_bytes()).unwrap();
    assert_eq!(props.get("name"), Some("Jürgen"));
}

// ── Storing ──────────────────────────────────────────────────────

#[test]
fn store_empty_comment_writes_bare_marker() {
    let mut props = Properties::new();
    props.set("a", "1");
    let text = props.to_text(Some(""), &StoreOptions::without_timestamp());
    assert_eq!(text, "#\na=1\n");
}

#[test]
fn store_writes_comment_and_sorted_records() {
    let mut props = Properties::new();
    props.set("b", "2");
    props.set("a", "1");
    let text = props.to_text(Some("header"), &StoreOptions::without_timestamp());
    assert_eq!(text, "#header\na=1\nb=2\n");
}

#[test]
fn store_writes_timestamp_line() {
    let mut props = Properties::new();
    props.set("a", "1");
    let text = props.to_text(Some("header"), &StoreOptions::default());
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "#header");
    assert!(lines[1].starts_with('#'));
    assert!(lines[1].ends_with(&chrono::Utc::now().format("%Y").to_string()));
    assert_eq!(lines[2], "a=1");
}

#[test]
fn store_to_writer() {
    let mut props = Properties::new();
    props.set("x", "y");
    let mut out = Vec::new();
    props
        .store(&mut out, None, &StoreOptions::without_timestamp())
        .unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "x=y\n");
}

#[test]
fn collect_and_iterate() {
    let props: Properties = vec![
        ("b".to_string(), "2".to_string()),
        ("a".to_string(), "1".to_string()),
    ]
    .into_iter()
    .collect();
    let keys: Vec<&str> = props.keys().collect();
    assert_eq!(keys, vec!["a", "b"]);
    let pairs: Vec<(&str, &str)> = props.iter().collect();
    assert_eq!(pairs, vec![("a", "1"), ("b", "2")]);
}

// ── Round trip ───────────────────────────────────────────────────

proptest! {
    /// Anything stored parses back to the same record set.
    #[test]
    fn stored_text_parses_back(
        entries in prop::collection::btree_map(".{0,12}", ".{0,24}", 0..12),
    ) {
        let props: Properties = entries.into_iter().collect();
        let text = props.to_text(Some("round trip\nsecond line"), &StoreOptions::default());
        let parsed = Properties::parse(&text).unwrap();
        prop_assert_eq!(parsed, props);
    }
}
