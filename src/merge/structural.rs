//! Two-way, desired-wins structural merge.
//!
//! For every key of the desired map:
//!
//! - missing in live: a deep copy of the desired value is inserted;
//! - map in both: the two maps are merged recursively;
//! - anything else (scalars, lists, or a type mismatch): live is replaced
//!   with a deep copy of desired unless the two are already equal.
//!
//! Lists are compared and replaced as a unit. Position-by-position merging
//! would pair up unrelated entries (ports, containers, rules) and is never
//! done here.

use crate::fieldpath::Path;
use crate::value::{Map, Value};

/// Merges `desired` onto `live` in place and reports whether `live` changed.
///
/// `desired` is only read. Every value copied into `live` is an owned deep
/// copy, so later edits to `desired` never show up in `live`.
pub fn merge_into(desired: &Map, live: &mut Map) -> bool {
    merge_map(desired, live, &mut Path::new(), &mut |_: &Path| {})
}

/// Same as [`merge_into`], but returns the path of every field of `live`
/// that was inserted or replaced, in the order they were visited.
///
/// An empty result means `live` was not modified.
pub fn merge_into_with_changes(desired: &Map, live: &mut Map) -> Vec<Path> {
    let mut changes = Vec::new();
    merge_map(desired, live, &mut Path::new(), &mut |path: &Path| {
        changes.push(path.clone())
    });
    changes
}

fn merge_map(
    desired: &Map,
    live: &mut Map,
    path: &mut Path,
    on_change: &mut dyn FnMut(&Path),
) -> bool {
    let mut changed = false;
    for (key, desired_value) in desired.iter() {
        path.push(key.as_str());
        changed |= merge_field(key, desired_value, live, path, on_change);
        path.pop();
    }
    changed
}

fn merge_field(
    key: &str,
    desired_value: &Value,
    live: &mut Map,
    path: &mut Path,
    on_change: &mut dyn FnMut(&Path),
) -> bool {
    match (desired_value, live.get_mut(key)) {
        (_, None) => {
            live.set(key, desired_value.clone());
            on_change(path);
            true
        }
        (Value::Map(desired_child), Some(Value::Map(live_child))) => {
            merge_map(desired_child, live_child, path, on_change)
        }
        (_, Some(live_value)) if *live_value == *desired_value => false,
        (_, Some(live_value)) => {
            *live_value = desired_value.clone();
            on_change(path);
            true
        }
    }
}
