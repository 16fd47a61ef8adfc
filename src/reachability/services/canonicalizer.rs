use crate::reachability::domain::identity::dependency_id;
use crate::reachability::domain::{DependencyEdge, DependencyScope, RawEdge};
use crate::reachability::lockfile::LockfileMeta;
use chrono::Utc;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Turns raw parser tuples into the canonical edge list.
///
/// Duplicates by `(parent, child, version, scope)` collapse onto their first
/// occurrence; the survivors are sorted by `(parent, child, version nulls-last,
/// scope)` so the output does not depend on traversal order.
pub fn canonicalize(
    raw_edges: Vec<RawEdge>,
    meta: &LockfileMeta,
    default_source_file: &str,
) -> Vec<DependencyEdge> {
    let mut seen: HashSet<(String, String, Option<String>, DependencyScope)> = HashSet::new();
    let mut unique: Vec<RawEdge> = raw_edges
        .into_iter()
        .filter(|edge| {
            seen.insert((
                edge.parent.clone(),
                edge.child.clone(),
                edge.version.clone(),
                edge.scope,
            ))
        })
        .collect();

    unique.sort_by(compare_raw_edges);

    let created_at = meta.created_at.unwrap_or_else(Utc::now);
    let source_file = normalize_source_file(meta.source_file.as_deref(), default_source_file);

    unique
        .into_iter()
        .map(|edge| DependencyEdge {
            dependency_id: dependency_id(
                &meta.repo,
                &meta.build_id,
                &edge.parent,
                &edge.child,
                edge.version.as_deref(),
                edge.scope.as_str(),
            ),
            repo: meta.repo.clone(),
            build_id: meta.build_id.clone(),
            runtime_flag: edge.scope.is_runtime(),
            parent: edge.parent,
            child: edge.child,
            version: edge.version,
            scope: edge.scope,
            source_file: source_file.clone(),
            created_at,
            depth: edge.depth,
        })
        .collect()
}

fn compare_raw_edges(a: &RawEdge, b: &RawEdge) -> Ordering {
    a.parent
        .cmp(&b.parent)
        .then_with(|| a.child.cmp(&b.child))
        .then_with(|| compare_versions_nulls_last(a.version.as_deref(), b.version.as_deref()))
        .then_with(|| a.scope.as_str().cmp(b.scope.as_str()))
}

fn compare_versions_nulls_last(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Workspace-relative POSIX form of a lockfile path.
///
/// `C:\repo\.\package-lock.json` style prefixes are removed; an empty result
/// falls back to `default_file`.
pub fn normalize_source_file(path: Option<&str>, default_file: &str) -> String {
    let Some(path) = path else {
        return default_file.to_string();
    };

    let mut normalized = path.trim().replace('\\', "/");

    let bytes = normalized.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        normalized.replace_range(..2, "");
    }

    let mut rest = normalized.as_str();
    loop {
        if let Some(stripped) = rest.strip_prefix("./") {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix('/') {
            rest = stripped;
        } else {
            break;
        }
    }

    if rest.is_empty() || rest == "." {
        default_file.to_string()
    } else {
        rest.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn meta() -> LockfileMeta {
        LockfileMeta::new("acme/web", "build-1")
    }

    fn raw(parent: &str, child: &str, version: Option<&str>, scope: DependencyScope) -> RawEdge {
        RawEdge::new(parent, child, version.map(str::to_string), scope, None)
    }

    #[test]
    fn test_duplicates_collapse_to_first_occurrence() {
        let mut first = raw("a", "b", Some("1.0.0"), DependencyScope::Runtime);
        first.depth = Some(2);
        let mut second = raw("a", "b", Some("1.0.0"), DependencyScope::Runtime);
        second.depth = Some(5);

        let edges = canonicalize(vec![first, second], &meta(), "package-lock.json");
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].depth, Some(2));
    }

    #[test]
    fn test_scope_and_version_are_part_of_the_key() {
        let edges = canonicalize(
            vec![
                raw("a", "b", Some("1.0.0"), DependencyScope::Runtime),
                raw("a", "b", Some("1.0.0"), DependencyScope::Dev),
                raw("a", "b", None, DependencyScope::Runtime),
            ],
            &meta(),
            "package-lock.json",
        );
        assert_eq!(edges.len(), 3);
    }

    #[test]
    fn test_sort_order_nulls_last() {
        let edges = canonicalize(
            vec![
                raw("b", "x", Some("1.0.0"), DependencyScope::Runtime),
                raw("a", "y", None, DependencyScope::Runtime),
                raw("a", "y", Some("2.0.0"), DependencyScope::Runtime),
                raw("a", "y", Some("10.0.0"), DependencyScope::Runtime),
                raw("a", "x", Some("1.0.0"), DependencyScope::Runtime),
                raw("a", "x", Some("1.0.0"), DependencyScope::Dev),
            ],
            &meta(),
            "package-lock.json",
        );
        let keys: Vec<(&str, &str, Option<&str>, &str)> = edges
            .iter()
            .map(|e| (e.parent.as_str(), e.child.as_str(), e.version.as_deref(), e.scope.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("a", "x", Some("1.0.0"), "dev"),
                ("a", "x", Some("1.0.0"), "runtime"),
                ("a", "y", Some("10.0.0"), "runtime"),
                ("a", "y", Some("2.0.0"), "runtime"),
                ("a", "y", None, "runtime"),
                ("b", "x", Some("1.0.0"), "runtime"),
            ]
        );
    }

    #[test]
    fn test_dependency_id_independent_of_created_at() {
        let early = meta().with_created_at(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
        let late = meta().with_created_at(Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap());
        let edge = || vec![raw("__root__", "a", Some("1.0.0"), DependencyScope::Runtime)];

        let first = canonicalize(edge(), &early, "package-lock.json");
        let second = canonicalize(edge(), &late, "package-lock.json");
        assert_ne!(first[0].created_at, second[0].created_at);
        assert_eq!(first[0].dependency_id, second[0].dependency_id);
    }

    #[test]
    fn test_runtime_flag_follows_scope() {
        let edges = canonicalize(
            vec![
                raw("a", "b", None, DependencyScope::Runtime),
                raw("a", "c", None, DependencyScope::Peer),
            ],
            &meta(),
            "yarn.lock",
        );
        assert!(edges[0].runtime_flag);
        assert!(!edges[1].runtime_flag);
        assert_eq!(edges[0].source_file, "yarn.lock");
    }

    #[test]
    fn test_normalize_source_file() {
        assert_eq!(
            normalize_source_file(Some("C:\\work\\repo\\package-lock.json"), "package-lock.json"),
            "work/repo/package-lock.json"
        );
        assert_eq!(
            normalize_source_file(Some("./apps/web/yarn.lock"), "yarn.lock"),
            "apps/web/yarn.lock"
        );
        assert_eq!(
            normalize_source_file(Some("//srv/package-lock.json"), "package-lock.json"),
            "srv/package-lock.json"
        );
        assert_eq!(normalize_source_file(Some("./"), "yarn.lock"), "yarn.lock");
        assert_eq!(normalize_source_file(Some(""), "package-lock.json"), "package-lock.json");
        assert_eq!(normalize_source_file(None, "yarn.lock"), "yarn.lock");
    }
}
