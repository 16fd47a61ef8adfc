//! Deterministic identities for edges and verdicts.
//!
//! An identity is the SHA-256 of the compact JSON serialization of the
//! identity fields. `serde_json::Map` keeps keys ordered, so the same logical
//! fields always serialize to the same bytes regardless of insertion order.

use serde_json::{json, Value};
use sha2::{Digest, Sha256};

/// Hash any JSON value into a lowercase hex digest
pub fn stable_hash(value: &Value) -> String {
    let canonical = value.to_string();
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

/// Identity of a dependency edge. `createdAt` and `depth` are not hashed.
pub fn dependency_id(
    repo: &str,
    build_id: &str,
    parent: &str,
    child: &str,
    version: Option<&str>,
    scope: &str,
) -> String {
    stable_hash(&json!({
        "repo": repo,
        "buildId": build_id,
        "parent": parent,
        "child": child,
        "version": version,
        "scope": scope,
    }))
}

/// Identity of a reachability verdict: a function of the question, not the answer.
pub fn reachability_id(
    repo: &str,
    build_id: &str,
    finding_id: &str,
    target_package: &str,
    target_version: Option<&str>,
    analysis_version: &str,
) -> String {
    stable_hash(&json!({
        "repo": repo,
        "buildId": build_id,
        "findingId": finding_id,
        "targetPackage": target_package,
        "targetVersion": target_version,
        "analysisVersion": analysis_version,
    }))
}
