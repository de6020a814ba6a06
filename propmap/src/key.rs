//! Record keys of the form `root.instance.field`.
//!
//! The instance segment never contains `.`; everything after the first `.`
//! following the root is the field key, dots included.

use thiserror::Error;

use crate::error::PropmapError;

/// Reason a key inside a root namespace could not be split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("missing instance name")]
    MissingInstanceName,
    #[error("missing field name")]
    MissingFieldName,
}

impl KeyError {
    /// Attaches the offending key and type.
    pub fn into_error(self, key: &str, type_name: &str) -> PropmapError {
        let key = key.to_string();
        let type_name = type_name.to_string();
        match self {
            Self::MissingInstanceName => PropmapError::MissingInstanceName { key, type_name },
            Self::MissingFieldName => PropmapError::MissingFieldName { key, type_name },
        }
    }
}

/// The instance and field segments of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyKey<'a> {
    pub instance: &'a str,
    pub field: &'a str,
}

impl<'a> PropertyKey<'a> {
    /// Splits the part of a key that follows `root.`.
    pub fn parse(rest: &'a str) -> Result<Self, KeyError> {
        let Some((instance, field)) = rest.split_once('.') else {
            return Err(KeyError::MissingInstanceName);
        };
        if instance.is_empty() {
            return Err(KeyError::MissingInstanceName);
        }
        if field.is_empty() {
            return Err(KeyError::MissingFieldName);
        }
        Ok(Self { instance, field })
    }

    /// Parses `key` if it lies in the namespace of `root`.
    ///
    /// Returns `None` for keys outside the namespace.
    pub fn parse_in(root: &str, key: &'a str) -> Option<Result<Self, KeyError>> {
        let rest = key.strip_prefix(root)?.strip_prefix('.')?;
        Some(Self::parse(rest))
    }

    /// Builds `root.instance.field`.
    pub fn compose(root: &str, instance: &str, field: &str) -> String {
        let mut key = String::with_capacity(root.len() + instance.len() + field.len() + 2);
        key.push_str(root);
        key.push('.');
        key.push_str(instance);
        key.push('.');
        key.push_str(field);
        key
    }
}

/// Whether `name` can be written as the instance segment of a key.
pub fn is_valid_instance_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_first_dot() {
        let key = PropertyKey::parse("dan.address.city").unwrap();
        assert_eq!(key.instance, "dan");
        assert_eq!(key.field, "address.city");
    }

    #[test]
    fn rejects_missing_segments() {
        assert_eq!(PropertyKey::parse("dan"), Err(KeyError::MissingInstanceName));
        assert_eq!(PropertyKey::parse(".name"), Err(KeyError::MissingInstanceName));
        assert_eq!(PropertyKey::parse("dan."), Err(KeyError::MissingFieldName));
        assert_eq!(PropertyKey::parse(""), Err(KeyError::MissingInstanceName));
    }

    #[test]
    fn parse_in_filters_namespace() {
        assert!(PropertyKey::parse_in("Customer", "Order.a.b").is_none());
        assert!(PropertyKey::parse_in("Customer", "Customers.a.b").is_none());
        assert!(PropertyKey::parse_in("Customer", "Customer").is_none());
        assert_eq!(
            PropertyKey::parse_in("Customer", "Customer.dan.name"),
            Some(Ok(PropertyKey { instance: "dan", field: "name" }))
        );
    }

    #[test]
    fn compose_joins_with_dots() {
        assert_eq!(PropertyKey::compose("Customer", "dan", "name"), "Customer.dan.name");
    }

    #[test]
    fn instance_names() {
        assert!(is_valid_instance_name("dan"));
        assert!(is_valid_instance_name("0"));
        assert!(!is_valid_instance_name(""));
        assert!(!is_valid_instance_name("a.b"));
    }
}
