//! The in-memory record set exchanged with the text format.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::io::{Read, Write};

use crate::error::CodecResult;
use crate::parse::parse_records;
use crate::store::{StoreOptions, escape, render_comment, render_timestamp};

/// A flat `key -> value` record set.
///
/// Keys are unique; setting an existing key replaces its value, so duplicate
/// records in a source document resolve to the last one. Iteration is in key
/// order, which keeps stored output stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    /// Creates an empty record set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses properties text.
    pub fn parse(text: &str) -> CodecResult<Self> {
        let mut properties = Self::new();
        parse_records(text, |key, value| {
            properties.set(key, value);
        })?;
        Ok(properties)
    }

    /// Reads the whole source and parses it.
    ///
    /// The bytes are decoded as UTF-8 when valid, otherwise as ISO-8859-1,
    /// so every byte sequence is readable. Stored documents are pure ASCII
    /// and decode the same either way.
    pub fn load<R: Read>(mut reader: R) -> CodecResult<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => latin1(e.as_bytes()),
        };
        Self::parse(&text)
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Stores `value` under `key`, returning the replaced value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Renders the document: comment, optional timestamp, then one line per record.
    pub fn to_text(&self, comment: Option<&str>, options: &StoreOptions) -> String {
        let mut out = String::new();
        if let Some(comment) = comment {
            render_comment(&mut out, comment);
        }
        if options.timestamp {
            render_timestamp(&mut out);
        }
        for (key, value) in &self.entries {
            escape(&mut out, key, true);
            out.push('=');
            escape(&mut out, value, false);
            out.push('\n');
        }
        out
    }

    /// Writes the document to `writer` in a single call and flushes it.
    pub fn store<W: Write>(
        &self,
        mut writer: W,
        comment: Option<&str>,
        options: &StoreOptions,
    ) -> CodecResult<()> {
        let text = self.to_text(comment, options);
        writer.write_all(text.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

impl Extend<(String, String)> for Properties {
    fn extend<I: IntoIterator<Item = (String, String)>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl FromIterator<(String, String)> for Properties {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Properties {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
