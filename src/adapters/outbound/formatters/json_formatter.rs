use crate::application::dto::{ReachabilityResponse, ReportMetadata, StatusCounts};
use crate::ports::outbound::ReachabilityFormatter;
use crate::reachability::domain::{DependencyEdge, ReachabilityResult};
use crate::shared::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    metadata: &'a ReportMetadata,
    summary: Summary,
    #[serde(skip_serializing_if = "Option::is_none")]
    results: Option<&'a [ReachabilityResult]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    edges: Option<&'a [DependencyEdge]>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Summary {
    #[serde(flatten)]
    counts: StatusCounts,
    findings: usize,
    ignored: usize,
    edges: usize,
    runtime_edges: usize,
}

/// JsonFormatter adapter producing the machine-readable report
///
/// Results keep the field names of [`ReachabilityResult`] so downstream
/// consumers can index them directly. In edge-dump mode `results` is omitted
/// and `edges` is always present.
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReachabilityFormatter for JsonFormatter {
    fn format(&self, response: &ReachabilityResponse) -> Result<String> {
        let counts = response.status_counts();
        let show_edges = response.include_edges || response.results.is_none();

        let report = Report {
            metadata: &response.metadata,
            summary: Summary {
                counts,
                findings: counts.total(),
                ignored: response.ignored_count,
                edges: response.edges.len(),
                runtime_edges: response.runtime_edge_count(),
            },
            results: response.results.as_deref(),
            edges: show_edges.then_some(response.edges.as_slice()),
        };

        let mut json = serde_json::to_string_pretty(&report)
            .map_err(|e| anyhow::anyhow!("Failed to serialize reachability report: {}", e))?;
        json.push('\n');
        Ok(json)
    }
}
