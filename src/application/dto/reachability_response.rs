use crate::reachability::domain::{DependencyEdge, ReachabilityResult, ReachabilityStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

pub const TOOL_NAME: &str = "argus-reach";

/// Run-level facts stamped on every report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    /// `urn:uuid:<v4>` identifying this run
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub tool_name: String,
    pub tool_version: String,
    pub repo: String,
    pub build_id: String,
    pub analysis_version: String,
    /// Workspace-relative lockfile path
    pub lockfile: String,
    pub edge_count: usize,
}

impl ReportMetadata {
    pub fn new(
        repo: impl Into<String>,
        build_id: impl Into<String>,
        analysis_version: impl Into<String>,
        lockfile: impl Into<String>,
        edge_count: usize,
    ) -> Self {
        Self {
            run_id: format!("urn:uuid:{}", Uuid::new_v4()),
            generated_at: Utc::now(),
            tool_name: TOOL_NAME.to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            repo: repo.into(),
            build_id: build_id.into(),
            analysis_version: analysis_version.into(),
            lockfile: lockfile.into(),
            edge_count,
        }
    }
}

/// Verdict tally, keyed by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub reachable: usize,
    pub unreachable: usize,
    pub insufficient_data: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.reachable + self.unreachable + self.insufficient_data
    }
}

/// ReachabilityResponse - Internal response DTO from the analysis use case
///
/// Formatters turn this into JSON or Markdown; `main` reads it for the exit code.
#[derive(Debug, Clone)]
pub struct ReachabilityResponse {
    pub metadata: ReportMetadata,
    /// Canonical edge list parsed from the lockfile
    pub edges: Vec<DependencyEdge>,
    /// None = edge-dump mode, Some(vec) = findings were analyzed
    pub results: Option<Vec<ReachabilityResult>>,
    /// Findings dropped through `ignore_findings`
    pub ignored_count: usize,
    /// Whether formatters should render `edges`
    pub include_edges: bool,
}

impl ReachabilityResponse {
    pub fn new(
        metadata: ReportMetadata,
        edges: Vec<DependencyEdge>,
        results: Option<Vec<ReachabilityResult>>,
        ignored_count: usize,
        include_edges: bool,
    ) -> Self {
        Self {
            metadata,
            edges,
            results,
            ignored_count,
            include_edges,
        }
    }

    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for result in self.results.iter().flatten() {
            match result.status {
                ReachabilityStatus::Reachable => counts.reachable += 1,
                ReachabilityStatus::Unreachable => counts.unreachable += 1,
                ReachabilityStatus::InsufficientData => counts.insufficient_data += 1,
            }
        }
        counts
    }

    /// Used to determine exit code for CI integration
    pub fn has_reachable_findings(&self) -> bool {
        self.results
            .iter()
            .flatten()
            .any(|result| result.reachable)
    }

    pub fn runtime_edge_count(&self) -> usize {
        self.edges.iter().filter(|edge| edge.runtime_flag).count()
    }
}
