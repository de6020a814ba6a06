//! Ready-made [`Converter`] implementations.

use std::fmt::Display;
use std::marker::PhantomData;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::converter::Converter;
use crate::error::ConversionError;

/// UTC timestamps as RFC 3339 text, e.g. `2024-05-01T12:30:00+00:00`.
///
/// Offsets other than UTC are accepted on input and normalized.
#[derive(Debug, Default, Clone, Copy)]
pub struct Rfc3339;

impl Converter for Rfc3339 {
    type Value = DateTime<Utc>;

    fn serialize(&self, value: &DateTime<Utc>) -> Result<String, ConversionError> {
        Ok(value.to_rfc3339())
    }

    fn deserialize(&self, text: &str) -> Result<DateTime<Utc>, ConversionError> {
        DateTime::parse_from_rfc3339(text)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| ConversionError::new(format!("invalid RFC 3339 timestamp '{text}': {e}")))
    }
}

/// A list stored as one comma-separated value. The empty string is the empty list.
///
/// Items whose text is empty or contains `,` cannot be represented and are
/// rejected on serialization.
pub struct CommaSeparated<V>(PhantomData<fn() -> V>);

impl<V> Default for CommaSeparated<V> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<V> std::fmt::Debug for CommaSeparated<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CommaSeparated<{}>", std::any::type_name::<V>())
    }
}

impl<V> Converter for CommaSeparated<V>
where
    V: Display + FromStr + 'static,
    V::Err: Display,
{
    type Value = Vec<V>;

    fn serialize(&self, value: &Vec<V>) -> Result<String, ConversionError> {
        let mut items = Vec::with_capacity(value.len());
        for item in value {
            let text = item.to_string();
            if text.is_empty() || text.contains(',') {
                return Err(ConversionError::new(format!(
                    "list item '{text}' cannot be written comma-separated"
                )));
            }
            items.push(text);
        }
        Ok(items.join(","))
    }

    fn deserialize(&self, text: &str) -> Result<Vec<V>, ConversionError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        text.split(',')
            .map(|item| {
                item.parse::<V>().map_err(|e| {
                    ConversionError::new(format!(
                        "cannot parse list item '{item}' as {}: {e}",
                        std::any::type_name::<V>()
                    ))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn rfc3339_round_trip() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let text = Rfc3339.serialize(&at).unwrap();
        assert_eq!(text, "2024-05-01T12:30:00+00:00");
        assert_eq!(Rfc3339.deserialize(&text).unwrap(), at);
    }

    #[test]
    fn rfc3339_normalizes_offset() {
        let parsed = Rfc3339.deserialize("2024-05-01T14:30:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap());
    }

    #[test]
    fn rfc3339_rejects_garbage() {
        assert!(Rfc3339.deserialize("yesterday").is_err());
    }

    #[test]
    fn comma_separated_lists() {
        let conv = CommaSeparated::<u32>::default();
        assert_eq!(conv.serialize(&vec![1, 2, 3]).unwrap(), "1,2,3");
        assert_eq!(conv.deserialize("1,2,3").unwrap(), vec![1, 2, 3]);
        assert_eq!(conv.serialize(&Vec::new()).unwrap(), "");
        assert!(conv.deserialize("").unwrap().is_empty());
        assert!(conv.deserialize("1,x").is_err());
    }

    #[test]
    fn comma_separated_rejects_unrepresentable_items() {
        let conv = CommaSeparated::<String>::default();
        assert!(conv.serialize(&vec!["a,b".to_string()]).is_err());
        assert!(conv.serialize(&vec![String::new()]).is_err());
    }
}
