//! Shared fixtures for mapping tests.

#![allow(dead_code)]

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use propmap::{CommaSeparated, Marshaller, PropertyObject, PropmapConfig, Rfc3339, Unmarshaller};

#[derive(Debug, Clone, Default, PartialEq, PropertyObject)]
pub struct Customer {
    #[property]
    pub name: String,
    #[property]
    pub phone: i64,
}

impl Customer {
    pub fn new(name: &str, phone: i64) -> Self {
        Self {
            name: name.to_string(),
            phone,
        }
    }
}

/// Renamed root and keys, a converter field and an unmapped field.
#[derive(Debug, Clone, Default, PartialEq, PropertyObject)]
#[property_root(name = "cfg")]
pub struct Configuration {
    #[property(name = "listen.port")]
    pub port: u16,
    #[property(name = "hosts", converter = CommaSeparated<String>)]
    pub allowed_hosts: Vec<String>,
    #[property(converter = Rfc3339)]
    pub updated: DateTime<Utc>,
    pub scratch: Option<String>,
}

/// Config that writes no timestamp line, for byte-exact assertions.
pub fn stable_config() -> PropmapConfig {
    PropmapConfig {
        timestamp: false,
        ..PropmapConfig::default()
    }
}

pub fn customers() -> HashMap<String, Customer> {
    HashMap::from([
        ("dan".to_string(), Customer::new("Daniel", 987)),
        ("eve".to_string(), Customer::new("Eve", 123)),
    ])
}

/// Marshals `objects` and returns the written text.
pub fn marshal_text<T: PropertyObject>(objects: &HashMap<String, T>, comment: &str) -> String {
    let mut marshaller = Marshaller::with_config(Vec::new(), stable_config());
    marshaller.marshal(objects, comment).unwrap();
    String::from_utf8(marshaller.close().unwrap()).unwrap()
}

pub fn unmarshaller(text: &str) -> Unmarshaller {
    Unmarshaller::load(text.as_bytes()).unwrap()
}
