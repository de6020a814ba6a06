//! Properties records -> named objects.

use std::collections::{HashMap, HashSet};
use std::io::Read;

use propmap_codec::Properties;
use tracing::debug;

use crate::descriptor::PropertyObject;
use crate::error::{PropmapError, PropmapResult};
use crate::instance::{ObjectType, PropertyInstance};
use crate::key::PropertyKey;
use crate::session::Session;

/// Reads typed objects out of a loaded record set.
///
/// The source is read once, in [`load`](Self::load); every `unmarshal` call
/// works on the in-memory records and may be repeated for different types.
#[derive(Debug)]
pub struct Unmarshaller {
    properties: Properties,
    session: Session,
}

impl Unmarshaller {
    /// Reads and decodes the whole source.
    pub fn load<R: Read>(reader: R) -> PropmapResult<Self> {
        let properties = Properties::load(reader)?;
        debug!(records = properties.len(), "loaded properties");
        Ok(Self::from_properties(properties))
    }

    pub fn from_properties(properties: Properties) -> Self {
        Self {
            properties,
            session: Session::new(),
        }
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Builds one `T` per instance name found under the root of `T`.
    ///
    /// Records outside the root are ignored. A record inside the root that
    /// is malformed, names an unknown field or fails conversion aborts the
    /// call.
    pub fn unmarshal<T: PropertyObject>(&self) -> PropmapResult<HashMap<String, T>> {
        unmarshal_records::<T>(&self.session, &self.properties)
    }

    /// Unmarshals several types, tagging each object with its type.
    ///
    /// Stops at the first type that fails.
    pub fn unmarshal_many(&self, types: &[ObjectType]) -> PropmapResult<HashSet<PropertyInstance>> {
        let mut instances = HashSet::new();
        for object_type in types {
            instances.extend(object_type.extract(&self.session, &self.properties)?);
        }
        Ok(instances)
    }

    /// Drops the session caches and hands back the records.
    pub fn close(self) -> Properties {
        self.session.clear();
        self.properties
    }
}

pub(crate) fn unmarshal_records<T: PropertyObject>(
    session: &Session,
    properties: &Properties,
) -> PropmapResult<HashMap<String, T>> {
    let schema = session.resolve::<T>()?;
    let converters = session.converters();
    let prefix = schema.prefix();
    let mut objects: HashMap<String, T> = HashMap::new();

    for (key, value) in properties.iter() {
        let Some(rest) = key.strip_prefix(prefix) else {
            continue;
        };
        let parsed =
            PropertyKey::parse(rest).map_err(|e| e.into_error(key, schema.type_name()))?;
        let field = schema
            .field(parsed.field)
            .ok_or_else(|| PropmapError::NoSuchField {
                key: key.to_string(),
                type_name: schema.type_name().to_string(),
            })?;

        let object = objects.entry(parsed.instance.to_string()).or_default();
        field
            .write(object, value, converters)
            .map_err(|source| PropmapError::Conversion {
                key: key.to_string(),
                type_name: schema.type_name().to_string(),
                field: field.name().to_string(),
                source,
            })?;
    }

    debug!(
        type_name = schema.type_name(),
        root = schema.root_name(),
        instances = objects.len(),
        "unmarshalled objects"
    );
    Ok(objects)
}
