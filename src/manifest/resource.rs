//! Resource identity and the resource handle stored in a manifest.

use std::fmt;
use std::sync::Arc;

use crate::error::IdentityError;
use crate::value::{Map, Value};

/// ResourceId addresses a resource in the target system.
///
/// Two resources are the same resource iff all four fields are equal. The
/// namespace is compared literally; an empty namespace means cluster-scoped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId {
    pub api_version: String,
    pub kind: String,
    pub namespace: String,
    pub name: String,
}

impl ResourceId {
    /// Creates a new ResourceId.
    pub fn new(
        api_version: impl Into<String>,
        kind: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        ResourceId {
            api_version: api_version.into(),
            kind: kind.into(),
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Returns the API group, empty for the core group (`v1`).
    pub fn group(&self) -> &str {
        group_of(&self.api_version)
    }

    /// Returns the version part of the API version.
    pub fn version(&self) -> &str {
        version_of(&self.api_version)
    }

    /// Returns true if the resource is cluster-scoped.
    pub fn is_cluster_scoped(&self) -> bool {
        self.namespace.is_empty()
    }
}

/// Splits an `apiVersion` into its group and version.
///
/// Core-group versions such as `v1` have an empty group.
pub fn split_api_version(api_version: &str) -> (&str, &str) {
    api_version.rsplit_once('/').unwrap_or(("", api_version))
}

/// Returns the API group of `api_version`, empty for the core group.
pub fn group_of(api_version: &str) -> &str {
    split_api_version(api_version).0
}

/// Returns the version part of `api_version`.
pub fn version_of(api_version: &str) -> &str {
    split_api_version(api_version).1
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ", self.api_version, self.kind)?;
        if !self.namespace.is_empty() {
            write!(f, "{}/", self.namespace)?;
        }
        write!(f, "{}", self.name)
    }
}

/// Resource is a shared, read-only handle to one decoded document.
///
/// Cloning a Resource is cheap; clones point at the same document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    doc: Arc<Value>,
}

impl Resource {
    /// Wraps a decoded document.
    pub fn new(doc: Value) -> Self {
        Resource { doc: Arc::new(doc) }
    }

    /// Returns the underlying document tree.
    pub fn value(&self) -> &Value {
        &self.doc
    }

    /// Returns an owned deep copy of the document tree.
    pub fn to_value(&self) -> Value {
        self.doc.as_ref().clone()
    }

    /// Returns the document root as a map.
    pub fn as_map(&self) -> Result<&Map, IdentityError> {
        self.doc.as_map().ok_or(IdentityError::NotAMap {
            found: self.doc.type_name(),
        })
    }

    /// Returns true if both handles point at the same document tree.
    pub fn ptr_eq(&self, other: &Resource) -> bool {
        Arc::ptr_eq(&self.doc, &other.doc)
    }

    pub fn api_version(&self) -> &str {
        self.doc.get_str(&["apiVersion"]).unwrap_or("")
    }

    pub fn kind(&self) -> &str {
        self.doc.get_str(&["kind"]).unwrap_or("")
    }

    pub fn namespace(&self) -> &str {
        self.doc.get_str(&["metadata", "namespace"]).unwrap_or("")
    }

    pub fn name(&self) -> &str {
        self.doc.get_str(&["metadata", "name"]).unwrap_or("")
    }

    /// Returns the `metadata.labels` map, if any.
    pub fn labels(&self) -> Option<&Map> {
        self.doc
            .get_path(&["metadata", "labels"])
            .and_then(Value::as_map)
    }

    /// Returns a single label value.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels()?.get(key)?.as_str()
    }

    /// Derives the resource's identity.
    ///
    /// `apiVersion`, `kind` and `metadata.name` must be present as non-empty
    /// strings; `metadata.namespace` defaults to empty.
    pub fn identity(&self) -> Result<ResourceId, IdentityError> {
        self.as_map()?;
        Ok(ResourceId {
            api_version: required_str(&self.doc, &["apiVersion"], "apiVersion")?.to_string(),
            kind: required_str(&self.doc, &["kind"], "kind")?.to_string(),
            namespace: self.namespace().to_string(),
            name: required_str(&self.doc, &["metadata", "name"], "metadata.name")?.to_string(),
        })
    }

    /// Returns true if the resource has exactly the given identity.
    ///
    /// Resources without a derivable identity never match.
    pub fn matches(&self, api_version: &str, kind: &str, namespace: &str, name: &str) -> bool {
        self.identity().is_ok_and(|id| {
            id.api_version == api_version
                && id.kind == kind
                && id.namespace == namespace
                && id.name == name
        })
    }
}

fn required_str<'a>(
    doc: &'a Value,
    path: &[&str],
    field: &'static str,
) -> Result<&'a str, IdentityError> {
    doc.get_str(path)
        .filter(|s| !s.is_empty())
        .ok_or(IdentityError::MissingField { field })
}

impl From<Value> for Resource {
    fn from(doc: Value) -> Self {
        Resource::new(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::from_yaml;

    fn resource(yaml: &str) -> Resource {
        Resource::new(from_yaml(yaml).unwrap())
    }

    #[test]
    fn test_split_api_version() {
        assert_eq!(split_api_version("apps/v1"), ("apps", "v1"));
        assert_eq!(split_api_version("v1"), ("", "v1"));
        assert_eq!(group_of("rbac.authorization.k8s.io/v1"), "rbac.authorization.k8s.io");
        assert_eq!(version_of("batch/v1beta1"), "v1beta1");

        let id = ResourceId::new("networking.k8s.io/v1", "Ingress", "prod", "web");
        assert_eq!(id.group(), group_of(&id.api_version));
        assert_eq!(id.version(), version_of(&id.api_version));
    }

    #[test]
    fn test_identity() {
        let r = resource("apiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: web\n  namespace: prod\n");
        assert_eq!(
            r.identity(),
            Ok(ResourceId::new("apps/v1", "Deployment", "prod", "web"))
        );
    }

    #[test]
    fn test_identity_defaults_namespace() {
        let r = resource("apiVersion: v1\nkind: Namespace\nmetadata:\n  name: prod\n");
        let id = r.identity().unwrap();
        assert_eq!(id.namespace, "");
        assert!(id.is_cluster_scoped());
    }

    #[test]
    fn test_identity_missing_fields() {
        let no_kind = resource("apiVersion: v1\nmetadata:\n  name: x\n");
        assert_eq!(
            no_kind.identity(),
            Err(IdentityError::MissingField { field: "kind" })
        );

        let no_name = resource("apiVersion: v1\nkind: Service\nspec: {}\n");
        assert_eq!(
            no_name.identity(),
            Err(IdentityError::MissingField { field: "metadata.name" })
        );

        let empty_version = resource("apiVersion: ''\nkind: Service\nmetadata:\n  name: x\n");
        assert_eq!(
            empty_version.identity(),
            Err(IdentityError::MissingField { field: "apiVersion" })
        );

        let numeric_name = resource("apiVersion: v1\nkind: Service\nmetadata:\n  name: 42\n");
        assert!(numeric_name.identity().is_err());
    }

    #[test]
    fn test_identity_not_a_map() {
        let r = Resource::new(Value::List(vec![]));
        assert_eq!(r.identity(), Err(IdentityError::NotAMap { found: "list" }));
        assert_eq!(r.kind(), "");
    }

    #[test]
    fn test_group_version() {
        let id = ResourceId::new("networking.k8s.io/v1", "Ingress", "", "web");
        assert_eq!(id.group(), "networking.k8s.io");
        assert_eq!(id.version(), "v1");

        let core = ResourceId::new("v1", "ConfigMap", "", "cfg");
        assert_eq!(core.group(), "");
        assert_eq!(core.version(), "v1");
    }

    #[test]
    fn test_display() {
        let id = ResourceId::new("apps/v1", "Deployment", "prod", "web");
        assert_eq!(id.to_string(), "apps/v1/Deployment prod/web");
        let cluster = ResourceId::new("v1", "Namespace", "", "prod");
        assert_eq!(cluster.to_string(), "v1/Namespace prod");
    }

    #[test]
    fn test_labels() {
        let r = resource("metadata:\n  labels:\n    app: web\n    tier: 3\n");
        assert_eq!(r.label("app"), Some("web"));
        assert_eq!(r.label("tier"), None);
        assert_eq!(r.label("missing"), None);
        assert_eq!(r.labels().map(Map::len), Some(2));
    }

    #[test]
    fn test_clone_shares_document() {
        let r = resource("kind: A\n");
        let copy = r.clone();
        assert!(r.ptr_eq(&copy));
        assert!(!r.ptr_eq(&Resource::new(r.to_value())));
    }
}
