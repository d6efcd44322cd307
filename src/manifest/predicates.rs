//! Filter predicates.
//!
//! A predicate looks at one resource and says whether it belongs in a
//! filtered manifest. Passing several predicates to [`Manifest::filter`]
//! keeps only the resources all of them accept.
//!
//! [`Manifest::filter`]: super::Manifest::filter

use super::{group_of, Resource};

/// Predicate is a pure test over one resource.
pub type Predicate = Box<dyn Fn(&Resource) -> bool + Send + Sync>;

/// Matches resources in `namespace`. An empty string matches cluster-scoped
/// resources.
pub fn by_namespace(namespace: impl Into<String>) -> Predicate {
    let namespace = namespace.into();
    Box::new(move |r: &Resource| r.namespace() == namespace)
}

/// Matches resources with the given name.
pub fn by_name(name: impl Into<String>) -> Predicate {
    let name = name.into();
    Box::new(move |r: &Resource| r.name() == name)
}

/// Matches resources of the given kind, in any API group.
pub fn by_kind(kind: impl Into<String>) -> Predicate {
    let kind = kind.into();
    Box::new(move |r: &Resource| r.kind() == kind)
}

/// Matches resources with the given `apiVersion`, e.g. `apps/v1`.
pub fn by_api_version(api_version: impl Into<String>) -> Predicate {
    let api_version = api_version.into();
    Box::new(move |r: &Resource| r.api_version() == api_version)
}

/// Matches resources with the given `apiVersion` and kind.
pub fn by_gvk(api_version: impl Into<String>, kind: impl Into<String>) -> Predicate {
    let api_version = api_version.into();
    let kind = kind.into();
    Box::new(move |r: &Resource| r.api_version() == api_version && r.kind() == kind)
}

/// Matches resources whose API group is `group` (empty for the core group),
/// in any version.
pub fn by_group(group: impl Into<String>) -> Predicate {
    let group = group.into();
    Box::new(move |r: &Resource| group_of(r.api_version()) == group)
}

/// Matches resources carrying the label `key=value`.
pub fn by_label(key: impl Into<String>, value: impl Into<String>) -> Predicate {
    let key = key.into();
    let value = value.into();
    Box::new(move |r: &Resource| r.label(&key) == Some(value.as_str()))
}

/// Matches resources rejected by every one of `predicates`.
pub fn none_of(predicates: Vec<Predicate>) -> Predicate {
    Box::new(move |r: &Resource| !predicates.iter().any(|p| p(r)))
}

/// Matches resources accepted by at least one of `predicates`.
pub fn any_of(predicates: Vec<Predicate>) -> Predicate {
    Box::new(move |r: &Resource| predicates.iter().any(|p| p(r)))
}

/// Matches resources accepted by all of `predicates`.
pub fn all_of(predicates: Vec<Predicate>) -> Predicate {
    Box::new(move |r: &Resource| predicates.iter().all(|p| p(r)))
}
