//! Target-system client seam.

use indexmap::IndexMap;

use crate::error::{BoxError, Error, Result};
use crate::manifest::{Manifest, ResourceId};
use crate::value::Value;

/// Client reads and writes live objects in the target system.
pub trait Client {
    /// Fetches the live object, or None if it does not exist.
    fn get(&self, id: &ResourceId) -> Result<Option<Value>, BoxError>;

    /// Creates an object that does not exist yet.
    fn create(&mut self, id: &ResourceId, object: &Value) -> Result<(), BoxError>;

    /// Replaces an existing object.
    fn update(&mut self, id: &ResourceId, object: &Value) -> Result<(), BoxError>;

    /// Deletes an object. Returns false if there was nothing to delete.
    fn delete(&mut self, id: &ResourceId) -> Result<bool, BoxError>;
}

/// MemoryClient keeps live objects in memory, in creation order.
#[derive(Debug, Clone, Default)]
pub struct MemoryClient {
    objects: IndexMap<ResourceId, Value>,
}

impl MemoryClient {
    /// Creates an empty client.
    pub fn new() -> Self {
        MemoryClient {
            objects: IndexMap::new(),
        }
    }

    /// Creates a client holding a copy of every resource in `manifest`.
    pub fn from_manifest(manifest: &Manifest) -> Result<Self> {
        let mut client = MemoryClient::new();
        for (id, resource) in manifest.identities()?.into_iter().zip(manifest.iter()) {
            client.objects.insert(id, resource.to_value());
        }
        Ok(client)
    }

    /// Stores an object directly, bypassing create/update.
    pub fn insert(&mut self, id: ResourceId, object: Value) {
        self.objects.insert(id, object);
    }

    /// Returns the stored object.
    pub fn object(&self, id: &ResourceId) -> Option<&Value> {
        self.objects.get(id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResourceId, &Value)> {
        self.objects.iter()
    }
}

impl Client for MemoryClient {
    fn get(&self, id: &ResourceId) -> Result<Option<Value>, BoxError> {
        Ok(self.objects.get(id).cloned())
    }

    fn create(&mut self, id: &ResourceId, object: &Value) -> Result<(), BoxError> {
        if self.objects.contains_key(id) {
            return Err(format!("{} already exists", id).into());
        }
        self.objects.insert(id.clone(), object.clone());
        Ok(())
    }

    fn update(&mut self, id: &ResourceId, object: &Value) -> Result<(), BoxError> {
        match self.objects.get_mut(id) {
            Some(existing) => {
                *existing = object.clone();
                Ok(())
            }
            None => Err(format!("{} not found", id).into()),
        }
    }

    fn delete(&mut self, id: &ResourceId) -> Result<bool, BoxError> {
        Ok(self.objects.shift_remove(id).is_some())
    }
}

/// Wraps a client failure with the resource it concerned.
pub(crate) fn client_error(id: &ResourceId) -> impl FnOnce(BoxError) -> Error + '_ {
    move |source| Error::client(id, source)
}
