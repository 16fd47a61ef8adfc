//! npm lockfile v2/v3: the flat `packages` map keyed by `node_modules` path.

use super::version::resolved_version;
use crate::reachability::domain::{DependencyScope, RawEdge, ROOT_SENTINEL};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Dependency fields read from the project's own entry (key `""`)
const ROOT_DEPENDENCY_FIELDS: [(&str, DependencyScope); 4] = [
    ("dependencies", DependencyScope::Runtime),
    ("devDependencies", DependencyScope::Dev),
    ("optionalDependencies", DependencyScope::Optional),
    ("peerDependencies", DependencyScope::Peer),
];

/// Installed packages only expand `dependencies`; a node without it is a leaf
const INSTALLED_DEPENDENCY_FIELDS: [(&str, DependencyScope); 1] =
    [("dependencies", DependencyScope::Runtime)];

const NODE_MODULES_SEGMENT: &str = "/node_modules/";

struct WorkItem {
    path: String,
    name: String,
    depth: u32,
}

/// Collects raw edges from a `packages` map.
///
/// Returns `None` when the map has no root entry, so the caller can fall back
/// to the legacy `dependencies` tree.
pub fn collect_raw_edges(packages: &Map<String, Value>) -> Option<Vec<RawEdge>> {
    let root = packages.get("")?.as_object()?;

    let mut edges = Vec::new();
    let mut stack = Vec::new();
    let mut expanded: HashSet<String> = HashSet::new();
    expanded.insert(String::new());

    emit_dependencies(
        packages,
        root,
        "",
        ROOT_SENTINEL,
        0,
        &ROOT_DEPENDENCY_FIELDS,
        &mut edges,
        &mut stack,
        &mut expanded,
    );

    while let Some(item) = stack.pop() {
        let Some(entry) = packages.get(&item.path).and_then(Value::as_object) else {
            continue;
        };
        emit_dependencies(
            packages,
            entry,
            &item.path,
            &item.name,
            item.depth,
            &INSTALLED_DEPENDENCY_FIELDS,
            &mut edges,
            &mut stack,
            &mut expanded,
        );
    }

    Some(edges)
}

#[allow(clippy::too_many_arguments)]
fn emit_dependencies(
    packages: &Map<String, Value>,
    entry: &Map<String, Value>,
    node_path: &str,
    parent_name: &str,
    depth: u32,
    fields: &[(&str, DependencyScope)],
    edges: &mut Vec<RawEdge>,
    stack: &mut Vec<WorkItem>,
    expanded: &mut HashSet<String>,
) {
    for (field, declared_scope) in fields {
        let Some(dependencies) = entry.get(*field).and_then(Value::as_object) else {
            continue;
        };

        for (name, spec) in dependencies {
            let resolved_path =
                resolve_package_path(packages, node_path, name).map(|p| follow_link(packages, p));
            let resolved_entry = resolved_path
                .as_deref()
                .and_then(|p| packages.get(p))
                .and_then(Value::as_object);

            let version_candidate = match resolved_entry {
                Some(target) => target.get("version").and_then(Value::as_str),
                None => spec.as_str(),
            };
            let scope = refine_scope(*declared_scope, resolved_entry);

            edges.push(RawEdge::new(
                parent_name,
                name.as_str(),
                resolved_version(version_candidate),
                scope,
                Some(depth + 1),
            ));

            if let Some(path) = resolved_path {
                if expanded.insert(path.clone()) {
                    stack.push(WorkItem {
                        path,
                        name: name.clone(),
                        depth: depth + 1,
                    });
                }
            }
        }
    }
}

/// Node.js resolution: look in the requesting package's own `node_modules`,
/// then each ancestor's, ending at the top-level `node_modules/<name>`.
fn resolve_package_path(packages: &Map<String, Value>, from: &str, name: &str) -> Option<String> {
    let mut current = from;
    loop {
        let candidate = if current.is_empty() {
            format!("node_modules/{}", name)
        } else {
            format!("{}/node_modules/{}", current, name)
        };
        if packages.contains_key(&candidate) {
            return Some(candidate);
        }
        if current.is_empty() {
            return None;
        }
        current = parent_path(current);
    }
}

/// `node_modules/a/node_modules/b` -> `node_modules/a`; anything shallower -> `""`
fn parent_path(path: &str) -> &str {
    match path.rfind(NODE_MODULES_SEGMENT) {
        Some(index) => &path[..index],
        None => "",
    }
}

/// Workspace symlinks (`"link": true`) point at the real package entry
fn follow_link(packages: &Map<String, Value>, path: String) -> String {
    let target = packages
        .get(&path)
        .filter(|entry| entry.get("link").and_then(Value::as_bool) == Some(true))
        .and_then(|entry| entry.get("resolved"))
        .and_then(Value::as_str)
        .filter(|resolved| packages.contains_key(*resolved));

    match target {
        Some(resolved) => resolved.to_string(),
        None => path,
    }
}

/// peer/optional flags on the installed entry win; `dev` only narrows runtime
fn refine_scope(declared: DependencyScope, entry: Option<&Map<String, Value>>) -> DependencyScope {
    let Some(entry) = entry else {
        return declared;
    };
    let flag = |key: &str| entry.get(key).and_then(Value::as_bool) == Some(true);

    if flag("peer") {
        DependencyScope::Peer
    } else if flag("optional") {
        DependencyScope::Optional
    } else if flag("dev") && declared == DependencyScope::Runtime {
        DependencyScope::Dev
    } else {
        declared
    }
}
