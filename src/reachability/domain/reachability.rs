use super::dependency_edge::DependencyEdge;
use crate::shared::error::ReachabilityComputeError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Analysis version stamped on results when the caller does not supply one
pub const DEFAULT_ANALYSIS_VERSION: &str = "1.0";

/// Coarse verdict of a reachability computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReachabilityStatus {
    Reachable,
    Unreachable,
    InsufficientData,
}

impl ReachabilityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReachabilityStatus::Reachable => "REACHABLE",
            ReachabilityStatus::Unreachable => "UNREACHABLE",
            ReachabilityStatus::InsufficientData => "INSUFFICIENT_DATA",
        }
    }
}

impl fmt::Display for ReachabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fine-grained reason narrowing a [`ReachabilityStatus`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReachabilityReason {
    PathFound,
    NoPath,
    TargetNotPresent,
    VersionMismatch,
    EmptyGraph,
    NoRoot,
    MissingVersionContext,
    UnsupportedGraphShape,
}

impl ReachabilityReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReachabilityReason::PathFound => "PATH_FOUND",
            ReachabilityReason::NoPath => "NO_PATH",
            ReachabilityReason::TargetNotPresent => "TARGET_NOT_PRESENT",
            ReachabilityReason::VersionMismatch => "VERSION_MISMATCH",
            ReachabilityReason::EmptyGraph => "EMPTY_GRAPH",
            ReachabilityReason::NoRoot => "NO_ROOT",
            ReachabilityReason::MissingVersionContext => "MISSING_VERSION_CONTEXT",
            ReachabilityReason::UnsupportedGraphShape => "UNSUPPORTED_GRAPH_SHAPE",
        }
    }

    /// The status every reason belongs to
    pub fn status(&self) -> ReachabilityStatus {
        match self {
            ReachabilityReason::PathFound => ReachabilityStatus::Reachable,
            ReachabilityReason::NoPath
            | ReachabilityReason::TargetNotPresent
            | ReachabilityReason::VersionMismatch => ReachabilityStatus::Unreachable,
            ReachabilityReason::EmptyGraph
            | ReachabilityReason::NoRoot
            | ReachabilityReason::MissingVersionContext
            | ReachabilityReason::UnsupportedGraphShape => ReachabilityStatus::InsufficientData,
        }
    }
}

impl fmt::Display for ReachabilityReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a verdict was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReachabilityMethod {
    Graph,
    Heuristic,
    Unavailable,
}

impl fmt::Display for ReachabilityMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReachabilityMethod::Graph => write!(f, "graph"),
            ReachabilityMethod::Heuristic => write!(f, "heuristic"),
            ReachabilityMethod::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// The subset of an edge the classifier looks at, kept lenient so that
/// partially malformed edges from untyped callers can be counted and skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeRecord {
    pub parent: Option<String>,
    pub child: Option<String>,
    pub version: Option<String>,
    pub runtime_flag: bool,
}

impl EdgeRecord {
    /// Reads an edge out of arbitrary JSON. Never fails; unusable fields become `None`.
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            parent: text("parent"),
            child: text("child"),
            version: text("version"),
            runtime_flag: value.get("runtimeFlag") == Some(&Value::Bool(true)),
        }
    }
}

impl From<&DependencyEdge> for EdgeRecord {
    fn from(edge: &DependencyEdge) -> Self {
        Self {
            parent: Some(edge.parent.clone()),
            child: Some(edge.child.clone()),
            version: edge.version.clone(),
            runtime_flag: edge.runtime_flag,
        }
    }
}

/// The question asked of the classifier for one finding.
///
/// `dependency_edges` is shared so one edge list can serve every finding of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReachabilityInput {
    pub finding_id: String,
    pub repo: String,
    pub build_id: String,
    pub target_package: String,
    pub target_version: Option<String>,
    pub dependency_edges: Arc<[EdgeRecord]>,
    pub analysis_version: Option<String>,
}

impl ReachabilityInput {
    pub fn new(
        finding_id: impl Into<String>,
        repo: impl Into<String>,
        build_id: impl Into<String>,
        target_package: impl Into<String>,
        dependency_edges: &[DependencyEdge],
    ) -> Self {
        Self {
            finding_id: finding_id.into(),
            repo: repo.into(),
            build_id: build_id.into(),
            target_package: target_package.into(),
            target_version: None,
            dependency_edges: dependency_edges.iter().map(EdgeRecord::from).collect(),
            analysis_version: None,
        }
    }

    pub fn with_target_version(mut self, target_version: Option<String>) -> Self {
        self.target_version = target_version;
        self
    }

    pub fn with_analysis_version(mut self, analysis_version: Option<String>) -> Self {
        self.analysis_version = analysis_version;
        self
    }

    /// Builds an input from untyped JSON (camelCase keys).
    ///
    /// # Errors
    /// `INVALID_INPUT` when the value is not an object, a required string is
    /// missing or blank, or `dependencyEdges` is not an array. A non-string
    /// `targetVersion` or `analysisVersion` is read as absent.
    pub fn from_json(value: &Value) -> Result<Self, ReachabilityComputeError> {
        let object = value.as_object().ok_or_else(|| {
            ReachabilityComputeError::invalid_input("reachability input must be a JSON object")
        })?;

        let edges = match object.get("dependencyEdges") {
            Some(Value::Array(items)) => items.iter().map(EdgeRecord::from_value).collect(),
            _ => {
                return Err(ReachabilityComputeError::invalid_input(
                    "dependencyEdges must be an array",
                ))
            }
        };

        Ok(Self {
            finding_id: required_string(object, "findingId")?,
            repo: required_string(object, "repo")?,
            build_id: required_string(object, "buildId")?,
            target_package: required_string(object, "targetPackage")?,
            target_version: optional_string(object, "targetVersion"),
            dependency_edges: edges,
            analysis_version: optional_string(object, "analysisVersion"),
        })
    }

    /// Checks the caller contract without looking at the edges' content.
    pub fn validate(&self) -> Result<(), ReachabilityComputeError> {
        for (field, value) in [
            ("findingId", &self.finding_id),
            ("repo", &self.repo),
            ("buildId", &self.build_id),
            ("targetPackage", &self.target_package),
        ] {
            if value.trim().is_empty() {
                return Err(ReachabilityComputeError::invalid_input(format!(
                    "{} must be a non-empty string",
                    field
                )));
            }
        }
        Ok(())
    }

    /// Package name the question is about, trimmed
    pub fn normalized_target_package(&self) -> &str {
        self.target_package.trim()
    }

    /// Requested version, with blank strings treated as absent
    pub fn normalized_target_version(&self) -> Option<&str> {
        self.target_version
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    pub fn effective_analysis_version(&self) -> &str {
        self.analysis_version
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_ANALYSIS_VERSION)
    }
}

fn required_string(
    object: &Map<String, Value>,
    key: &str,
) -> Result<String, ReachabilityComputeError> {
    match object.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        _ => Err(ReachabilityComputeError::invalid_input(format!(
            "{} must be a non-empty string",
            key
        ))),
    }
}

fn optional_string(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Final verdict for one finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReachabilityResult {
    pub reachability_id: String,
    pub finding_id: String,
    pub repo: String,
    pub build_id: String,
    pub target_package: String,
    pub target_version: Option<String>,
    pub reachable: bool,
    pub confidence: f64,
    pub confidence_score: f64,
    pub evidence_path: Vec<String>,
    pub method: ReachabilityMethod,
    pub status: ReachabilityStatus,
    pub reason: ReachabilityReason,
    pub analysis_version: String,
    pub computed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_json() -> Value {
        json!({
            "findingId": "F-1",
            "repo": "acme/web",
            "buildId": "b-7",
            "targetPackage": "lodash",
            "targetVersion": "4.17.20",
            "dependencyEdges": [
                {"parent": "__root__", "child": "lodash", "version": "4.17.20", "runtimeFlag": true}
            ]
        })
    }

    #[test]
    fn test_from_json_valid() {
        let input = ReachabilityInput::from_json(&valid_json()).unwrap();
        assert_eq!(input.finding_id, "F-1");
        assert_eq!(input.target_version.as_deref(), Some("4.17.20"));
        assert_eq!(input.dependency_edges.len(), 1);
        assert!(input.dependency_edges[0].runtime_flag);
        assert_eq!(input.effective_analysis_version(), "1.0");
    }

    #[test]
    fn test_from_json_rejects_non_array_edges() {
        let mut value = valid_json();
        value["dependencyEdges"] = json!({"parent": "__root__"});
        let err = ReachabilityInput::from_json(&value).unwrap_err();
        assert_eq!(err.code.as_str(), "INVALID_INPUT");
        assert!(err.message.contains("dependencyEdges"));
    }

    #[test]
    fn test_from_json_rejects_blank_required_field() {
        let mut value = valid_json();
        value["repo"] = json!("   ");
        let err = ReachabilityInput::from_json(&value).unwrap_err();
        assert!(err.message.contains("repo"));
    }

    #[test]
    fn test_from_json_non_string_optional_fields_are_absent() {
        let mut value = valid_json();
        value["targetVersion"] = json!(4);
        value["analysisVersion"] = json!({"major": 2});
        let input = ReachabilityInput::from_json(&value).unwrap();
        assert_eq!(input.target_version, None);
        assert_eq!(input.analysis_version, None);
        assert_eq!(input.effective_analysis_version(), "1.0");
    }

    #[test]
    fn test_target_package_is_trimmed() {
        let input = ReachabilityInput::new("F-1", "r", "b", "  qs\t", &[]);
        assert_eq!(input.normalized_target_package(), "qs");
    }

    #[test]
    fn test_edge_record_runtime_flag_must_be_literal_true() {
        let truthy = EdgeRecord::from_value(&json!({"parent": "a", "child": "b", "runtimeFlag": "true"}));
        assert!(!truthy.runtime_flag);
        let numeric = EdgeRecord::from_value(&json!({"parent": "a", "child": "b", "runtimeFlag": 1}));
        assert!(!numeric.runtime_flag);
    }

    #[test]
    fn test_edge_record_from_malformed_value() {
        let record = EdgeRecord::from_value(&json!({"parent": 3, "child": null}));
        assert!(record.parent.is_none());
        assert!(record.child.is_none());
        let record = EdgeRecord::from_value(&json!("not an edge"));
        assert_eq!(record, EdgeRecord::default());
    }

    #[test]
    fn test_blank_target_version_is_absent() {
        let input = ReachabilityInput::new("F-1", "r", "b", "pkg", &[])
            .with_target_version(Some("  ".to_string()));
        assert_eq!(input.normalized_target_version(), None);
    }

    #[test]
    fn test_reason_status_mapping() {
        assert_eq!(ReachabilityReason::PathFound.status(), ReachabilityStatus::Reachable);
        assert_eq!(ReachabilityReason::VersionMismatch.status(), ReachabilityStatus::Unreachable);
        assert_eq!(
            ReachabilityReason::MissingVersionContext.status(),
            ReachabilityStatus::InsufficientData
        );
    }

    #[test]
    fn test_status_and_reason_serialization() {
        assert_eq!(
            serde_json::to_string(&ReachabilityStatus::InsufficientData).unwrap(),
            "\"INSUFFICIENT_DATA\""
        );
        assert_eq!(
            serde_json::to_string(&ReachabilityReason::UnsupportedGraphShape).unwrap(),
            "\"UNSUPPORTED_GRAPH_SHAPE\""
        );
        assert_eq!(
            serde_json::to_string(&ReachabilityMethod::Unavailable).unwrap(),
            "\"unavailable\""
        );
    }
}
