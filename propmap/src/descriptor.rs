//! Static description of a mappable type: its name, optional root override
//! and the fields that take part in mapping.
//!
//! Descriptors are usually produced by `#[derive(PropertyObject)]`, but can
//! be written by hand with the builder methods:
//!
//! ```
//! use propmap::{FieldDescriptor, PropertyObject, TypeDescriptor};
//!
//! #[derive(Default)]
//! struct Endpoint {
//!     host: String,
//!     port: u16,
//! }
//!
//! impl PropertyObject for Endpoint {
//!     fn descriptor() -> TypeDescriptor<Self> {
//!         TypeDescriptor::named("Endpoint")
//!             .root("endpoint")
//!             .field(FieldDescriptor::new("host", |e: &Self| &e.host, |e: &mut Self, v| e.host = v))
//!             .field(FieldDescriptor::new("port", |e: &Self| &e.port, |e: &mut Self, v| e.port = v))
//!     }
//! }
//! ```

use std::fmt::{self, Display};
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::Arc;

use crate::converter::{Converter, ConverterCache};
use crate::error::ConversionError;

/// A type that can be mapped to and from properties records.
///
/// Unmarshalling creates instances through [`Default`] and fills them field by
/// field, so every mappable type needs a zero-argument constructor.
pub trait PropertyObject: Default + Send + Sync + 'static {
    fn descriptor() -> TypeDescriptor<Self>;
}

/// Reads a field as text and writes text back into a field.
pub(crate) trait FieldAccessor<T>: Send + Sync {
    fn read(&self, object: &T, converters: &ConverterCache) -> Result<String, ConversionError>;

    fn write(
        &self,
        object: &mut T,
        text: &str,
        converters: &ConverterCache,
    ) -> Result<(), ConversionError>;
}

struct TextAccessor<V, G, S> {
    get: G,
    set: S,
    _value: PhantomData<fn() -> V>,
}

impl<T, V, G, S> FieldAccessor<T> for TextAccessor<V, G, S>
where
    V: Display + FromStr,
    V::Err: Display,
    G: Fn(&T) -> &V + Send + Sync,
    S: Fn(&mut T, V) + Send + Sync,
{
    fn read(&self, object: &T, _converters: &ConverterCache) -> Result<String, ConversionError> {
        Ok((self.get)(object).to_string())
    }

    fn write(
        &self,
        object: &mut T,
        text: &str,
        _converters: &ConverterCache,
    ) -> Result<(), ConversionError> {
        let value = text.parse::<V>().map_err(|e| {
            ConversionError::new(format!(
                "cannot parse '{text}' as {}: {e}",
                std::any::type_name::<V>()
            ))
        })?;
        (self.set)(object, value);
        Ok(())
    }
}

struct ConvertedAccessor<C, G, S> {
    get: G,
    set: S,
    _converter: PhantomData<fn() -> C>,
}

impl<T, C, G, S> FieldAccessor<T> for ConvertedAccessor<C, G, S>
where
    C: Converter + Default,
    G: Fn(&T) -> &C::Value + Send + Sync,
    S: Fn(&mut T, C::Value) + Send + Sync,
{
    fn read(&self, object: &T, converters: &ConverterCache) -> Result<String, ConversionError> {
        converters.get_or_init::<C>().serialize((self.get)(object))
    }

    fn write(
        &self,
        object: &mut T,
        text: &str,
        converters: &ConverterCache,
    ) -> Result<(), ConversionError> {
        let value = converters.get_or_init::<C>().deserialize(text)?;
        (self.set)(object, value);
        Ok(())
    }
}

/// One mapped field of `T`.
pub struct FieldDescriptor<T> {
    name: &'static str,
    key: Option<String>,
    converter: Option<&'static str>,
    pub(crate) accessor: Arc<dyn FieldAccessor<T>>,
}

impl<T: 'static> FieldDescriptor<T> {
    /// A field converted with `Display` / `FromStr`.
    pub fn new<V, G, S>(name: &'static str, get: G, set: S) -> Self
    where
        V: Display + FromStr + 'static,
        V::Err: Display,
        G: Fn(&T) -> &V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        Self {
            name,
            key: None,
            converter: None,
            accessor: Arc::new(TextAccessor {
                get,
                set,
                _value: PhantomData,
            }),
        }
    }

    /// A field converted with the converter `C`.
    pub fn with_converter<C, G, S>(name: &'static str, get: G, set: S) -> Self
    where
        C: Converter + Default,
        G: Fn(&T) -> &C::Value + Send + Sync + 'static,
        S: Fn(&mut T, C::Value) + Send + Sync + 'static,
    {
        Self {
            name,
            key: None,
            converter: Some(std::any::type_name::<C>()),
            accessor: Arc::new(ConvertedAccessor::<C, G, S> {
                get,
                set,
                _converter: PhantomData,
            }),
        }
    }

    /// Overrides the external key. A blank override keeps the field name.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

impl<T> FieldDescriptor<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn key_override(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Type name of the converter, if the field uses one.
    pub fn converter(&self) -> Option<&'static str> {
        self.converter
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("converter", &self.converter)
            .finish()
    }
}

/// Name, optional root override and ordered fields of a mappable type.
pub struct TypeDescriptor<T> {
    type_name: &'static str,
    root: Option<String>,
    fields: Vec<FieldDescriptor<T>>,
}

impl<T: 'static> TypeDescriptor<T> {
    /// A descriptor named after the Rust type (last path segment, no generics).
    pub fn new() -> Self {
        Self::named(simple_type_name::<T>())
    }

    pub fn named(type_name: &'static str) -> Self {
        Self {
            type_name,
            root: None,
            fields: Vec::new(),
        }
    }

    /// Overrides the root namespace. A blank override keeps the type name.
    pub fn root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn field(mut self, field: FieldDescriptor<T>) -> Self {
        self.fields.push(field);
        self
    }
}

impl<T: 'static> Default for TypeDescriptor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TypeDescriptor<T> {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn root_override(&self) -> Option<&str> {
        self.root.as_deref()
    }

    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    pub(crate) fn into_parts(self) -> (&'static str, Option<String>, Vec<FieldDescriptor<T>>) {
        (self.type_name, self.root, self.fields)
    }
}

impl<T> fmt::Debug for TypeDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_name", &self.type_name)
            .field("root", &self.root)
            .field("fields", &self.fields)
            .finish()
    }
}

/// `a::b::Customer<x::Y>` -> `Customer`
pub(crate) fn simple_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    mod nested {
        pub struct Wrapper<T>(pub T);
    }

    #[test]
    fn simple_names_drop_path_and_generics() {
        assert_eq!(simple_type_name::<String>(), "String");
        assert_eq!(simple_type_name::<nested::Wrapper<u8>>(), "Wrapper");
        assert_eq!(simple_type_name::<u32>(), "u32");
    }

    #[derive(Default)]
    struct Point {
        x: i32,
    }

    #[test]
    fn text_accessor_reads_and_writes() {
        let field = FieldDescriptor::new("x", |p: &Point| &p.x, |p: &mut Point, v| p.x = v);
        let cache = ConverterCache::new();
        let mut point = Point::default();
        field.accessor.write(&mut point, "-7", &cache).unwrap();
        assert_eq!(point.x, -7);
        assert_eq!(field.accessor.read(&point, &cache).unwrap(), "-7");
        assert!(field.accessor.write(&mut point, "seven", &cache).is_err());
    }

    #[test]
    fn builder_keeps_declaration_order() {
        let descriptor = TypeDescriptor::<Point>::new()
            .root("pt")
            .field(FieldDescriptor::new("x", |p: &Point| &p.x, |p: &mut Point, v| p.x = v).key("ex"))
            .field(FieldDescriptor::new("y", |p: &Point| &p.x, |p: &mut Point, v| p.x = v));
        assert_eq!(descriptor.type_name(), "Point");
        assert_eq!(descriptor.root_override(), Some("pt"));
        let names: Vec<_> = descriptor.fields().iter().map(FieldDescriptor::name).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(descriptor.fields()[0].key_override(), Some("ex"));
    }
}
