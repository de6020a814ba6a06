//! Type-tagged objects returned by the multi-type unmarshal.

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

use propmap_codec::Properties;

use crate::descriptor::PropertyObject;
use crate::error::PropmapResult;
use crate::session::Session;
use crate::unmarshal::unmarshal_records;

type Extract = fn(&Session, &Properties) -> PropmapResult<Vec<PropertyInstance>>;

/// Handle to a mappable type, used to request several types at once from
/// [`Unmarshaller::unmarshal_many`](crate::Unmarshaller::unmarshal_many).
#[derive(Clone, Copy)]
pub struct ObjectType {
    type_id: TypeId,
    type_name: &'static str,
    extract: Extract,
}

impl ObjectType {
    pub fn of<T: PropertyObject>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            extract: extract_instances::<T>,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn extract(
        &self,
        session: &Session,
        properties: &Properties,
    ) -> PropmapResult<Vec<PropertyInstance>> {
        (self.extract)(session, properties)
    }
}

impl PartialEq for ObjectType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ObjectType {}

impl Hash for ObjectType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectType").field(&self.type_name).finish()
    }
}

fn extract_instances<T: PropertyObject>(
    session: &Session,
    properties: &Properties,
) -> PropmapResult<Vec<PropertyInstance>> {
    let objects = unmarshal_records::<T>(session, properties)?;
    Ok(objects
        .into_iter()
        .map(|(name, object)| PropertyInstance::new(name, object))
        .collect())
}

/// An object together with its type and instance name.
///
/// Two instances are equal when type and instance name are equal; the
/// object itself does not take part.
pub struct PropertyInstance {
    type_id: TypeId,
    type_name: &'static str,
    instance_name: String,
    object: Box<dyn Any + Send + Sync>,
}

impl PropertyInstance {
    pub fn new<T: PropertyObject>(instance_name: impl Into<String>, object: T) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            instance_name: instance_name.into(),
            object: Box::new(object),
        }
    }

    /// Tags every entry of a name-keyed map.
    pub fn from_map<T: PropertyObject>(objects: HashMap<String, T>) -> HashSet<Self> {
        objects
            .into_iter()
            .map(|(name, object)| Self::new(name, object))
            .collect()
    }

    /// Collects the instances of type `T` into a name-keyed map, skipping
    /// instances of other types.
    pub fn into_map<T: PropertyObject>(
        instances: impl IntoIterator<Item = Self>,
    ) -> HashMap<String, T> {
        instances
            .into_iter()
            .filter_map(|instance| {
                let name = instance.instance_name.clone();
                instance.into_object::<T>().ok().map(|object| (name, object))
            })
            .collect()
    }

    pub fn instance_name(&self) -> &str {
        &self.instance_name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn object_type_is(&self, object_type: &ObjectType) -> bool {
        self.type_id == object_type.type_id()
    }

    pub fn is<T: PropertyObject>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    pub fn downcast_ref<T: PropertyObject>(&self) -> Option<&T> {
        self.object.downcast_ref::<T>()
    }

    pub fn downcast_mut<T: PropertyObject>(&mut self) -> Option<&mut T> {
        self.object.downcast_mut::<T>()
    }

    /// Unwraps the object, handing the instance back if it is not a `T`.
    pub fn into_object<T: PropertyObject>(self) -> Result<T, Self> {
        if !self.is::<T>() {
            return Err(self);
        }
        let Self {
            type_id,
            type_name,
            instance_name,
            object,
        } = self;
        match object.downcast::<T>() {
            Ok(object) => Ok(*object),
            Err(object) => Err(Self {
                type_id,
                type_name,
                instance_name,
                object,
            }),
        }
    }
}

impl PartialEq for PropertyInstance {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.instance_name == other.instance_name
    }
}

impl Eq for PropertyInstance {}

impl Hash for PropertyInstance {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
        self.instance_name.hash(state);
    }
}

impl fmt::Debug for PropertyInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyInstance")
            .field("type_name", &self.type_name)
            .field("instance_name", &self.instance_name)
            .finish_non_exhaustive()
    }
}
