//! Transformers rewrite copies of resources before they are applied.

use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::error::BoxError;
use crate::value::{Map, Value};

/// Transformer edits one document in place.
pub type Transformer = Box<dyn Fn(&mut Value) -> Result<(), BoxError> + Send + Sync>;

/// Kinds that never live in a namespace.
static CLUSTER_SCOPED_KINDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "APIService",
        "ClusterRole",
        "ClusterRoleBinding",
        "CustomResourceDefinition",
        "MutatingWebhookConfiguration",
        "Namespace",
        "Node",
        "PersistentVolume",
        "PriorityClass",
        "StorageClass",
        "ValidatingWebhookConfiguration",
    ]
    .into_iter()
    .collect()
});

/// Returns true for kinds known to be cluster-scoped.
pub fn is_cluster_scoped_kind(kind: &str) -> bool {
    CLUSTER_SCOPED_KINDS.contains(kind)
}

/// Sets `metadata.namespace` on every namespaced resource.
///
/// Resources of a cluster-scoped kind keep their metadata. A
/// `ClusterRoleBinding` instead has the namespace of each `ServiceAccount`
/// subject rewritten, so the binding follows the accounts it grants to.
pub fn inject_namespace(namespace: impl Into<String>) -> Transformer {
    let namespace = namespace.into();
    Box::new(move |doc: &mut Value| -> Result<(), BoxError> {
        let kind = doc.get_str(&["kind"]).unwrap_or("").to_owned();
        if kind == "ClusterRoleBinding" {
            if let Some(map) = doc.as_map_mut() {
                set_subject_namespaces(map, &namespace);
            }
            return Ok(());
        }
        if is_cluster_scoped_kind(&kind) {
            return Ok(());
        }
        let found = doc.type_name();
        let map = doc
            .as_map_mut()
            .ok_or_else(|| format!("cannot set namespace on a {}", found))?;
        map.set_path(&["metadata", "namespace"], Value::String(namespace.clone()));
        Ok(())
    })
}

fn set_subject_namespaces(binding: &mut Map, namespace: &str) {
    let Some(Value::List(subjects)) = binding.get_mut("subjects") else {
        return;
    };
    for subject in subjects.iter_mut().filter_map(Value::as_map_mut) {
        if subject.get("kind").and_then(Value::as_str) == Some("ServiceAccount") {
            subject.set("namespace", Value::String(namespace.to_owned()));
        }
    }
}

/// Sets the label `key=value` on every resource.
pub fn inject_label(key: impl Into<String>, value: impl Into<String>) -> Transformer {
    let key = key.into();
    let value = value.into();
    Box::new(move |doc: &mut Value| -> Result<(), BoxError> {
        let found = doc.type_name();
        let map = doc
            .as_map_mut()
            .ok_or_else(|| format!("cannot set label on a {}", found))?;
        map.set_path(&["metadata", "labels", key.as_str()], Value::String(value.clone()));
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::from_yaml;

    #[test]
    fn test_inject_namespace() {
        let mut doc = from_yaml("kind: Service\nmetadata:\n  name: web\n").unwrap();
        inject_namespace("prod")(&mut doc).unwrap();
        assert_eq!(doc.get_str(&["metadata", "namespace"]), Some("prod"));
        assert_eq!(doc.get_str(&["metadata", "name"]), Some("web"));
    }

    #[test]
    fn test_inject_namespace_skips_cluster_scoped() {
        let mut doc = from_yaml("kind: ClusterRole\nmetadata:\n  name: admin\n").unwrap();
        let before = doc.clone();
        inject_namespace("prod")(&mut doc).unwrap();
        assert_eq!(doc, before);
    }

    #[test]
    fn test_inject_namespace_rewrites_binding_subjects() {
        let mut doc = from_yaml(
            r#"
kind: ClusterRoleBinding
metadata:
  name: controller
roleRef:
  kind: ClusterRole
  name: controller
subjects:
  - kind: ServiceAccount
    name: controller
    namespace: default
  - kind: ServiceAccount
    name: webhook
  - kind: User
    name: alice
"#,
        )
        .unwrap();
        inject_namespace("prod")(&mut doc).unwrap();

        assert_eq!(doc.get_path(&["metadata", "namespace"]), None);
        let subjects = doc.get_path(&["subjects"]).and_then(Value::as_list).unwrap();
        let namespaces: Vec<Option<&str>> = subjects
            .iter()
            .map(|s| s.get_str(&["namespace"]))
            .collect();
        assert_eq!(namespaces, vec![Some("prod"), Some("prod"), None]);
    }

    #[test]
    fn test_inject_label() {
        let mut doc = from_yaml("kind: Service\n").unwrap();
        inject_label("team", "core")(&mut doc).unwrap();
        assert_eq!(doc.get_str(&["metadata", "labels", "team"]), Some("core"));
    }

    #[test]
    fn test_transformers_reject_non_maps() {
        let mut doc = Value::List(vec![]);
        assert!(inject_label("a", "b")(&mut doc).is_err());
        assert!(inject_namespace("prod")(&mut doc).is_err());
    }
}
