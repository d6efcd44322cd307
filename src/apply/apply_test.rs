//! Tests for apply and delete orchestration.

#[cfg(test)]
mod tests {
    use crate::apply::{apply, delete, ApplyOptions, Client, MemoryClient, Outcome};
    use crate::error::{BoxError, Error};
    use crate::fieldpath::Path;
    use crate::manifest::{Manifest, ResourceId};
    use crate::value::{from_yaml, Value};
    use pretty_assertions::assert_eq;

    const DESIRED: &str = r#"
apiVersion: v1
kind: Namespace
metadata:
  name: prod
---
apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
  namespace: prod
spec:
  replicas: 3
---
apiVersion: v1
kind: Service
metadata:
  name: web
  namespace: prod
spec:
  ports:
  - port: 80
"#;

    fn namespace_id() -> ResourceId {
        ResourceId::new("v1", "Namespace", "", "prod")
    }

    fn deployment_id() -> ResourceId {
        ResourceId::new("apps/v1", "Deployment", "prod", "web")
    }

    fn service_id() -> ResourceId {
        ResourceId::new("v1", "Service", "prod", "web")
    }

    /// Client that records every call and can be told to fail.
    #[derive(Default)]
    struct RecordingClient {
        inner: MemoryClient,
        calls: Vec<String>,
        fail_on_update: bool,
    }

    impl Client for RecordingClient {
        fn get(&self, id: &ResourceId) -> Result<Option<Value>, BoxError> {
            self.inner.get(id)
        }

        fn create(&mut self, id: &ResourceId, object: &Value) -> Result<(), BoxError> {
            self.calls.push(format!("create {}", id.kind));
            self.inner.create(id, object)
        }

        fn update(&mut self, id: &ResourceId, object: &Value) -> Result<(), BoxError> {
            if self.fail_on_update {
                return Err("connection refused".into());
            }
            self.calls.push(format!("update {}", id.kind));
            self.inner.update(id, object)
        }

        fn delete(&mut self, id: &ResourceId) -> Result<bool, BoxError> {
            self.calls.push(format!("delete {}", id.kind));
            self.inner.delete(id)
        }
    }

    #[test]
    fn test_apply_creates_in_source_order() {
        let manifest = Manifest::from_yaml(DESIRED).unwrap();
        let mut client = RecordingClient::default();

        let report = apply(&manifest, &mut client, &ApplyOptions::new()).unwrap();

        assert_eq!(
            client.calls,
            vec!["create Namespace", "create Deployment", "create Service"]
        );
        assert_eq!(report.created(), 3);
        assert_eq!(report.summary(), "3 created, 0 updated, 0 unchanged");
        assert_eq!(
            client.inner.object(&deployment_id()),
            Some(manifest.resources()[1].value())
        );
    }

    #[test]
    fn test_apply_twice_is_a_no_op() {
        let manifest = Manifest::from_yaml(DESIRED).unwrap();
        let mut client = RecordingClient::default();
        apply(&manifest, &mut client, &ApplyOptions::new()).unwrap();
        client.calls.clear();

        let report = apply(&manifest, &mut client, &ApplyOptions::new()).unwrap();

        assert!(client.calls.is_empty());
        assert_eq!(report.unchanged(), 3);
        assert!(!report.has_changes());
    }

    #[test]
    fn test_apply_merges_onto_live_objects() {
        let manifest = Manifest::from_yaml(DESIRED).unwrap();
        let mut client = RecordingClient::default();
        client.inner.insert(
            namespace_id(),
            from_yaml("apiVersion: v1\nkind: Namespace\nmetadata:\n  name: prod\n  uid: ns-1\nstatus:\n  phase: Active\n").unwrap(),
        );
        client.inner.insert(
            deployment_id(),
            from_yaml("apiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: web\n  namespace: prod\n  uid: d-1\nspec:\n  replicas: 1\n  paused: false\nstatus:\n  readyReplicas: 1\n").unwrap(),
        );

        let report = apply(&manifest, &mut client, &ApplyOptions::new()).unwrap();

        assert_eq!(
            report.entries,
            vec![
                (namespace_id(), Outcome::Unchanged),
                (
                    deployment_id(),
                    Outcome::Updated(vec![Path::from_fields(["spec", "replicas"])])
                ),
                (service_id(), Outcome::Created),
            ]
        );
        assert_eq!(client.calls, vec!["update Deployment", "create Service"]);

        let live = client.inner.object(&deployment_id()).unwrap();
        assert_eq!(live.get_path(&["spec", "replicas"]), Some(&Value::Int(3)));
        assert_eq!(live.get_path(&["spec", "paused"]), Some(&Value::Bool(false)));
        assert_eq!(live.get_str(&["metadata", "uid"]), Some("d-1"));
        assert_eq!(
            live.get_path(&["status", "readyReplicas"]),
            Some(&Value::Int(1))
        );

        // desired documents are untouched by the merge
        assert_eq!(
            manifest.resources()[1].value(),
            &from_yaml("apiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: web\n  namespace: prod\nspec:\n  replicas: 3\n").unwrap()
        );
    }

    #[test]
    fn test_apply_dry_run_writes_nothing() {
        let manifest = Manifest::from_yaml(DESIRED).unwrap();
        let mut client = RecordingClient::default();
        client.inner.insert(
            deployment_id(),
            from_yaml("apiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: web\n  namespace: prod\nspec:\n  replicas: 1\n").unwrap(),
        );

        let report = apply(&manifest, &mut client, &ApplyOptions::new().dry_run(true)).unwrap();

        assert!(client.calls.is_empty());
        assert_eq!(report.created(), 2);
        assert_eq!(report.updated(), 1);
        assert_eq!(report.summary(), "2 created, 1 updated, 0 unchanged (dry run)");
        assert_eq!(
            client
                .inner
                .object(&deployment_id())
                .and_then(|v| v.get_path(&["spec", "replicas"])),
            Some(&Value::Int(1))
        );
    }

    #[test]
    fn test_apply_stops_on_unaddressable_resource() {
        let manifest = Manifest::from_yaml("apiVersion: v1\nkind: A\nmetadata:\n  name: a\n---\nkind: B\n").unwrap();
        let mut client = RecordingClient::default();

        let err = apply(&manifest, &mut client, &ApplyOptions::new()).unwrap_err();

        assert!(matches!(err, Error::Identity { position: 2, .. }));
        assert_eq!(client.calls, vec!["create A"]);
    }

    #[test]
    fn test_apply_rejects_non_map_live_object() {
        let manifest = Manifest::from_yaml(DESIRED).unwrap();
        let mut client = MemoryClient::new();
        client.insert(namespace_id(), Value::String("garbage".into()));

        let err = apply(&manifest, &mut client, &ApplyOptions::new()).unwrap_err();

        match err {
            Error::LiveNotMap { id, found } => {
                assert_eq!(id, namespace_id());
                assert_eq!(found, "string");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_apply_wraps_client_errors() {
        let manifest = Manifest::from_yaml(DESIRED).unwrap();
        let mut client = RecordingClient {
            fail_on_update: true,
            ..Default::default()
        };
        client.inner.insert(
            namespace_id(),
            from_yaml("apiVersion: v1\nkind: Namespace\nmetadata:\n  name: other\n").unwrap(),
        );

        let err = apply(&manifest, &mut client, &ApplyOptions::new()).unwrap_err();

        assert_eq!(
            err.to_string(),
            "request for v1/Namespace prod failed: connection refused"
        );
    }

    #[test]
    fn test_delete_in_reverse_order() {
        let manifest = Manifest::from_yaml(DESIRED).unwrap();
        let mut client = RecordingClient::default();
        client.inner = MemoryClient::from_manifest(&manifest.filter_by(|r| r.kind() != "Service")).unwrap();

        let report = delete(&manifest, &mut client, &ApplyOptions::new()).unwrap();

        assert_eq!(
            client.calls,
            vec!["delete Service", "delete Deployment", "delete Namespace"]
        );
        assert_eq!(
            report.entries,
            vec![
                (service_id(), Outcome::Absent),
                (deployment_id(), Outcome::Deleted),
                (namespace_id(), Outcome::Deleted),
            ]
        );
        assert_eq!(report.summary(), "2 deleted, 1 absent");
        assert!(client.inner.is_empty());
    }

    #[test]
    fn test_delete_dry_run() {
        let manifest = Manifest::from_yaml(DESIRED).unwrap();
        let mut client = RecordingClient {
            inner: MemoryClient::from_manifest(&manifest).unwrap(),
            ..Default::default()
        };

        let report = delete(&manifest, &mut client, &ApplyOptions::new().dry_run(true)).unwrap();

        assert!(client.calls.is_empty());
        assert_eq!(report.deleted(), 3);
        assert_eq!(client.inner.len(), 3);
    }

    #[test]
    fn test_memory_client_create_and_update_guards() {
        let mut client = MemoryClient::new();
        let object = Value::Map(Default::default());
        assert!(client.update(&service_id(), &object).is_err());
        client.create(&service_id(), &object).unwrap();
        assert!(client.create(&service_id(), &object).is_err());
        assert!(client.delete(&service_id()).unwrap());
        assert!(!client.delete(&service_id()).unwrap());
    }
}
