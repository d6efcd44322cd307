//! The ordered resource collection.

use std::io::Read;

use tracing::debug;

use crate::error::{DecodeError, Error, Result};

use super::loader::{self, Decoder, YamlDecoder};
use super::predicates::Predicate;
use super::transform::Transformer;
use super::{Resource, ResourceId};

/// Manifest is an ordered collection of resources loaded from one source.
///
/// The order is the order of the documents in the source and is the order in
/// which resources get applied. Nothing here reorders it: [`Manifest::filter`]
/// and [`Manifest::transform`] return new manifests and keep relative order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    resources: Vec<Resource>,
}

impl Manifest {
    /// Creates an empty manifest.
    pub fn new() -> Self {
        Manifest {
            resources: Vec::new(),
        }
    }

    /// Creates a manifest from resources, keeping their order.
    pub fn from_resources(resources: Vec<Resource>) -> Self {
        Manifest { resources }
    }

    /// Loads a manifest from multi-document text using `decoder`.
    pub fn from_str_with<D>(text: &str, decoder: &D) -> Result<Self, DecodeError>
    where
        D: Decoder + ?Sized,
    {
        loader::load(text, decoder)
    }

    /// Loads a manifest from multi-document YAML.
    pub fn from_yaml(text: &str) -> Result<Self, DecodeError> {
        loader::load(text, &YamlDecoder)
    }

    /// Reads `reader` to the end and loads the documents it holds.
    pub fn from_reader<R, D>(mut reader: R, decoder: &D) -> Result<Self>
    where
        R: Read,
        D: Decoder + ?Sized,
    {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(loader::load(&text, decoder)?)
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Returns the first resource, in source order, with the given identity.
    ///
    /// None is the normal "not present" answer. Resources whose identity
    /// cannot be derived are never returned.
    pub fn find(
        &self,
        api_version: &str,
        kind: &str,
        namespace: &str,
        name: &str,
    ) -> Option<&Resource> {
        self.resources
            .iter()
            .find(|r| r.matches(api_version, kind, namespace, name))
    }

    /// Looks up a resource by a full identity.
    pub fn find_id(&self, id: &ResourceId) -> Option<&Resource> {
        self.find(&id.api_version, &id.kind, &id.namespace, &id.name)
    }

    /// Returns the identity of every resource in order.
    ///
    /// Fails on the first resource whose identity cannot be derived.
    pub fn identities(&self) -> Result<Vec<ResourceId>> {
        self.resources
            .iter()
            .enumerate()
            .map(|(index, r)| r.identity().map_err(|e| Error::identity(index + 1, e)))
            .collect()
    }

    /// Returns a manifest holding the resources accepted by every predicate.
    ///
    /// With no predicates every resource is kept. The documents are shared
    /// with `self`, not copied.
    pub fn filter(&self, predicates: &[Predicate]) -> Manifest {
        self.filter_by(|r| predicates.iter().all(|p| p(r)))
    }

    /// Returns a manifest holding the resources accepted by `predicate`.
    pub fn filter_by<F>(&self, predicate: F) -> Manifest
    where
        F: Fn(&Resource) -> bool,
    {
        Manifest {
            resources: self
                .resources
                .iter()
                .filter(|&r| predicate(r))
                .cloned()
                .collect(),
        }
    }

    /// Returns a manifest with the resources of `self` followed by those of
    /// `other`.
    pub fn append(&self, other: &Manifest) -> Manifest {
        Manifest {
            resources: self
                .resources
                .iter()
                .chain(other.resources.iter())
                .cloned()
                .collect(),
        }
    }

    /// Returns a manifest of transformed deep copies of every resource.
    ///
    /// Transformers run in order on each copy. `self` is never modified.
    pub fn transform(&self, transformers: &[Transformer]) -> Result<Manifest> {
        let mut resources = Vec::with_capacity(self.resources.len());
        for (index, resource) in self.resources.iter().enumerate() {
            let mut doc = resource.to_value();
            for transformer in transformers {
                transformer(&mut doc).map_err(|source| Error::Transform {
                    position: index + 1,
                    source,
                })?;
            }
            resources.push(Resource::new(doc));
        }
        debug!(
            resources = resources.len(),
            transformers = transformers.len(),
            "transformed manifest"
        );
        Ok(Manifest { resources })
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a Resource;
    type IntoIter = std::slice::Iter<'a, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.iter()
    }
}

impl IntoIterator for Manifest {
    type Item = Resource;
    type IntoIter = std::vec::IntoIter<Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.into_iter()
    }
}

impl FromIterator<Resource> for Manifest {
    fn from_iter<T: IntoIterator<Item = Resource>>(iter: T) -> Self {
        Manifest {
            resources: iter.into_iter().collect(),
        }
    }
}
