//! Per-handle caches: resolved schemas, converter instances and the
//! anonymous instance counter.
//!
//! Every [`Marshaller`](crate::Marshaller) and
//! [`Unmarshaller`](crate::Unmarshaller) owns one session. All state sits
//! behind locks or atomics, so a session can be shared across threads.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::converter::{Converter, ConverterCache};
use crate::descriptor::PropertyObject;
use crate::error::PropmapResult;
use crate::schema::TypeSchema;

type ErasedSchema = Arc<dyn Any + Send + Sync>;

#[derive(Default)]
pub struct Session {
    schemas: RwLock<HashMap<TypeId, ErasedSchema>>,
    converters: ConverterCache,
    next_instance: AtomicU64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the schema of `T`, resolving and caching it on first use.
    ///
    /// Failed resolutions are not cached.
    pub fn resolve<T: PropertyObject>(&self) -> PropmapResult<Arc<TypeSchema<T>>> {
        let id = TypeId::of::<T>();
        if let Some(schema) = self.cached::<T>(id) {
            return Ok(schema);
        }

        let resolved = Arc::new(TypeSchema::<T>::resolve()?);
        debug!(
            type_name = resolved.type_name(),
            root = resolved.root_name(),
            fields = resolved.len(),
            "resolved schema"
        );

        let mut schemas = self.schemas.write().unwrap_or_else(PoisonError::into_inner);
        let entry = schemas
            .entry(id)
            .or_insert_with(|| Arc::clone(&resolved) as ErasedSchema);
        Ok(Arc::clone(entry).downcast::<TypeSchema<T>>().unwrap_or(resolved))
    }

    fn cached<T: PropertyObject>(&self, id: TypeId) -> Option<Arc<TypeSchema<T>>> {
        let schemas = self.schemas.read().unwrap_or_else(PoisonError::into_inner);
        schemas
            .get(&id)
            .and_then(|schema| Arc::clone(schema).downcast::<TypeSchema<T>>().ok())
    }

    /// Returns the shared instance of converter `C`.
    pub fn converter<C: Converter + Default>(&self) -> Arc<C> {
        self.converters.get_or_init::<C>()
    }

    pub fn converters(&self) -> &ConverterCache {
        &self.converters
    }

    /// Next name for an object that was given none: `"0"`, `"1"`, ...
    ///
    /// Unique for the lifetime of the session, across threads.
    pub fn next_instance_name(&self) -> String {
        self.next_instance.fetch_add(1, Ordering::Relaxed).to_string()
    }

    /// Number of schemas currently cached.
    pub fn cached_schemas(&self) -> usize {
        self.schemas.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Drops every cached schema and converter. The instance counter keeps
    /// counting so names stay unique.
    pub fn clear(&self) {
        let schemas = {
            let mut schemas = self.schemas.write().unwrap_or_else(PoisonError::into_inner);
            let count = schemas.len();
            schemas.clear();
            count
        };
        let converters = self.converters.len();
        self.converters.clear();
        debug!(schemas, converters, "session caches cleared");
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("schemas", &self.cached_schemas())
            .field("converters", &self.converters)
            .field("next_instance", &self.next_instance.load(Ordering::Relaxed))
            .finish()
    }
}
