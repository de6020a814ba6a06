//! Bidirectional mapping between flat properties records and typed objects.
//!
//! Every object of type `T` is stored as one record per mapped field, keyed
//! `root.instance.field`:
//!
//! ```text
//! Customer.dan.name=Daniel
//! Customer.dan.tel=555-0100
//! ```
//!
//! The root defaults to the type name and the field key to the field name;
//! both can be overridden. Fields are converted with `Display` / `FromStr` or
//! with a [`Converter`].
//!
//! ```
//! use std::collections::HashMap;
//! use propmap::{Marshaller, PropertyObject, PropmapConfig, Unmarshaller};
//!
//! #[derive(Debug, Default, PartialEq, PropertyObject)]
//! struct Customer {
//!     #[property]
//!     name: String,
//!     #[property(name = "tel")]
//!     phone: String,
//! }
//!
//! let mut customers = HashMap::new();
//! customers.insert("dan".to_string(), Customer { name: "Daniel".into(), phone: "555-0100".into() });
//!
//! let config = PropmapConfig { timestamp: false, ..PropmapConfig::default() };
//! let mut marshaller = Marshaller::with_config(Vec::new(), config);
//! marshaller.marshal(&customers, "customers").unwrap();
//! let bytes = marshaller.close().unwrap();
//!
//! let unmarshaller = Unmarshaller::load(bytes.as_slice()).unwrap();
//! assert_eq!(unmarshaller.unmarshal::<Customer>().unwrap(), customers);
//! ```

extern crate self as propmap;

pub mod config;
pub mod converter;
pub mod converters;
pub mod descriptor;
pub mod error;
pub mod instance;
pub mod key;
pub mod marshal;
pub mod schema;
pub mod session;
pub mod unmarshal;

pub use config::{DEFAULT_COMMENT, PropmapConfig};
pub use converter::{Converter, ConverterCache};
pub use converters::{CommaSeparated, Rfc3339};
pub use descriptor::{FieldDescriptor, PropertyObject, TypeDescriptor};
pub use error::{ConversionError, PropmapError, PropmapResult};
pub use instance::{ObjectType, PropertyInstance};
pub use key::{KeyError, PropertyKey};
pub use marshal::Marshaller;
pub use schema::{FieldSchema, TypeSchema};
pub use session::Session;
pub use unmarshal::Unmarshaller;

pub use propmap_codec::{CodecError, Properties, StoreOptions};

#[cfg(feature = "derive")]
pub use propmap_derive::PropertyObject;
