//! Line-based key/value text codec for propmap.
//!
//! Reads and writes the classic `.properties` layout:
//! - one `key=value` record per logical line (`:` or whitespace also separate key and value)
//! - `#` and `!` comment lines, blank lines ignored
//! - trailing-backslash line continuation
//! - `\t \n \r \f \uXXXX` escapes
//!
//! The codec knows nothing about the `root.instance.field` key grammar; keys
//! and values are opaque strings. Every document produced by
//! [`Properties::store`] parses back into the same map.

mod error;
mod parse;
mod properties;
mod store;

pub use error::{CodecError, CodecResult};
pub use properties::Properties;
pub use store::{StoreOptions, TIMESTAMP_FORMAT};
