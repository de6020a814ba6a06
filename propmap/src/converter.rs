//! Pluggable string conversion for individual fields.
//!
//! A field without a converter goes through [`Display`](std::fmt::Display) and
//! [`FromStr`](std::str::FromStr). A field that names a converter goes through
//! that converter's [`serialize`](Converter::serialize) and
//! [`deserialize`](Converter::deserialize) instead. Converter instances are
//! created once per type through [`Default`] and shared through the
//! [`ConverterCache`] of a session.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::ConversionError;

/// Bidirectional text conversion for one value type.
///
/// Implementations should satisfy `deserialize(serialize(v)) == v` for every
/// value they accept.
pub trait Converter: Send + Sync + 'static {
    type Value;

    fn serialize(&self, value: &Self::Value) -> Result<String, ConversionError>;

    fn deserialize(&self, text: &str) -> Result<Self::Value, ConversionError>;
}

/// Shared converter instances keyed by converter type.
#[derive(Default)]
pub struct ConverterCache {
    instances: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl ConverterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached instance of `C`, creating it on first use.
    pub fn get_or_init<C: Converter + Default>(&self) -> Arc<C> {
        let id = TypeId::of::<C>();
        {
            let instances = self.instances.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(existing) = instances.get(&id) {
                if let Ok(converter) = Arc::clone(existing).downcast::<C>() {
                    return converter;
                }
            }
        }

        let mut instances = self.instances.write().unwrap_or_else(PoisonError::into_inner);
        let entry = instances
            .entry(id)
            .or_insert_with(|| Arc::new(C::default()) as Arc<dyn Any + Send + Sync>);
        Arc::clone(entry)
            .downcast::<C>()
            .unwrap_or_else(|_| Arc::new(C::default()))
    }

    /// Number of converter types instantiated so far.
    pub fn len(&self) -> usize {
        self.instances.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.instances
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl std::fmt::Debug for ConverterCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverterCache")
            .field("len", &self.len())
            .finish()
    }
}
