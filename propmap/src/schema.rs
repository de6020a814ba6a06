//! Resolved mapping schema: root name plus the external key of every field.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::converter::ConverterCache;
use crate::descriptor::{FieldAccessor, PropertyObject, TypeDescriptor};
use crate::error::{ConversionError, PropmapError, PropmapResult};

/// A field together with the external key it is stored under.
pub struct FieldSchema<T> {
    name: &'static str,
    key: String,
    converter: Option<&'static str>,
    accessor: Arc<dyn FieldAccessor<T>>,
}

impl<T> FieldSchema<T> {
    /// Field name as declared on the type.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// External key segment (override or field name).
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn converter(&self) -> Option<&'static str> {
        self.converter
    }

    pub(crate) fn read(&self, object: &T, converters: &ConverterCache) -> Result<String, ConversionError> {
        self.accessor.read(object, converters)
    }

    pub(crate) fn write(
        &self,
        object: &mut T,
        text: &str,
        converters: &ConverterCache,
    ) -> Result<(), ConversionError> {
        self.accessor.write(object, text, converters)
    }
}

impl<T> fmt::Debug for FieldSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSchema")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("converter", &self.converter)
            .finish()
    }
}

/// Everything the mapper needs to know about `T`.
pub struct TypeSchema<T> {
    type_name: &'static str,
    root_name: String,
    prefix: String,
    fields: Vec<FieldSchema<T>>,
    index: HashMap<String, usize>,
}

impl<T: PropertyObject> TypeSchema<T> {
    /// Resolves the schema of `T` from its descriptor.
    pub fn resolve() -> PropmapResult<Self> {
        Self::from_descriptor(T::descriptor())
    }
}

impl<T> TypeSchema<T> {
    /// Resolves a schema from an explicit descriptor.
    ///
    /// Blank root and key overrides fall back to the type and field names.
    /// Two fields resolving to the same key fail with
    /// [`PropmapError::DuplicateField`].
    pub fn from_descriptor(descriptor: TypeDescriptor<T>) -> PropmapResult<Self> {
        let (type_name, root, descriptors) = descriptor.into_parts();
        let root_name = non_blank(root.as_deref()).unwrap_or(type_name).to_string();

        let mut fields = Vec::with_capacity(descriptors.len());
        let mut index = HashMap::with_capacity(descriptors.len());
        for field in descriptors {
            let key = non_blank(field.key_override()).unwrap_or(field.name()).to_string();
            match index.entry(key.clone()) {
                Entry::Occupied(_) => {
                    return Err(PropmapError::DuplicateField {
                        key,
                        type_name: type_name.to_string(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(fields.len());
                }
            }
            trace!(type_name, field = field.name(), key = %key, "resolved field key");
            fields.push(FieldSchema {
                name: field.name(),
                key,
                converter: field.converter(),
                accessor: field.accessor,
            });
        }

        let prefix = format!("{root_name}.");
        Ok(Self {
            type_name,
            root_name,
            prefix,
            fields,
            index,
        })
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Namespace of the type's records.
    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    /// `root_name` followed by `.`; every in-namespace key starts with it.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldSchema<T>] {
        &self.fields
    }

    /// Looks up a field by external key.
    pub fn field(&self, key: &str) -> Option<&FieldSchema<T>> {
        self.index.get(key).map(|&i| &self.fields[i])
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<T> fmt::Debug for TypeSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeSchema")
            .field("type_name", &self.type_name)
            .field("root_name", &self.root_name)
            .field("fields", &self.fields)
            .finish()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
