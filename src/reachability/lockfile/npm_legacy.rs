//! npm lockfile v1: a recursive `dependencies` tree.

use super::version::resolved_version;
use crate::reachability::domain::{DependencyScope, RawEdge, ROOT_SENTINEL};
use serde_json::{Map, Value};

/// Walks the tree depth-first with an explicit stack, one edge per entry.
/// Top-level entries hang off the root; nested entries off their container.
pub fn collect_raw_edges(dependencies: &Map<String, Value>) -> Vec<RawEdge> {
    let mut edges = Vec::new();
    let mut stack: Vec<(&str, &Map<String, Value>, u32)> = vec![(ROOT_SENTINEL, dependencies, 1)];

    while let Some((parent, entries, depth)) = stack.pop() {
        for (name, entry) in entries {
            let version = resolved_version(entry.get("version").and_then(Value::as_str));
            edges.push(RawEdge::new(
                parent,
                name.as_str(),
                version,
                entry_scope(entry),
                Some(depth),
            ));

            if let Some(nested) = entry.get("dependencies").and_then(Value::as_object) {
                stack.push((name.as_str(), nested, depth + 1));
            }
        }
    }

    edges
}

fn entry_scope(entry: &Value) -> DependencyScope {
    let flag = |key: &str| entry.get(key).and_then(Value::as_bool) == Some(true);
    if flag("dev") {
        DependencyScope::Dev
    } else if flag("optional") {
        DependencyScope::Optional
    } else {
        DependencyScope::Runtime
    }
}
