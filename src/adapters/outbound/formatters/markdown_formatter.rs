use crate::application::dto::{ReachabilityResponse, ReportMetadata};
use crate::ports::outbound::ReachabilityFormatter;
use crate::reachability::domain::{DependencyEdge, ReachabilityResult, ReachabilityStatus};
use crate::shared::Result;

/// Markdown table header for verdicts
const RESULTS_TABLE_HEADER: &str = "| Finding | Package | Version | Status | Reason | Path length |\n";

/// Markdown table separator line for verdicts
const RESULTS_TABLE_SEPARATOR: &str = "|---------|---------|---------|--------|--------|-------------|\n";

/// Markdown table header for edges
const EDGES_TABLE_HEADER: &str = "| Parent | Child | Version | Scope | Depth |\n";

/// Markdown table separator line for edges
const EDGES_TABLE_SEPARATOR: &str = "|--------|-------|---------|-------|-------|\n";

/// MarkdownFormatter adapter for a human-readable reachability report
///
/// Sections: run metadata, verdict summary, verdict table, evidence paths of
/// reachable findings, and the edge list when requested.
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Escapes pipe characters and newlines for safe Markdown table rendering
    fn escape_markdown_table_cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }

    fn status_badge(status: ReachabilityStatus) -> &'static str {
        match status {
            ReachabilityStatus::Reachable => "🔴 REACHABLE",
            ReachabilityStatus::Unreachable => "🟢 UNREACHABLE",
            ReachabilityStatus::InsufficientData => "⚪ INSUFFICIENT_DATA",
        }
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper methods for rendering sections
impl MarkdownFormatter {
    fn render_header(&self, output: &mut String, metadata: &ReportMetadata) {
        output.push_str("# Dependency Reachability Report\n\n");
        output.push_str(&format!("- **Repository:** {}\n", metadata.repo));
        output.push_str(&format!("- **Build:** {}\n", metadata.build_id));
        output.push_str(&format!("- **Lockfile:** `{}`\n", metadata.lockfile));
        output.push_str(&format!(
            "- **Analysis version:** {}\n",
            metadata.analysis_version
        ));
        output.push_str(&format!(
            "- **Generated:** {} by {} {}\n",
            metadata.generated_at.to_rfc3339(),
            metadata.tool_name,
            metadata.tool_version
        ));
        output.push_str(&format!("- **Run:** {}\n\n", metadata.run_id));
    }

    fn render_summary(&self, output: &mut String, response: &ReachabilityResponse) {
        let counts = response.status_counts();
        output.push_str("## Summary\n\n");
        output.push_str("| Metric | Count |\n|--------|-------|\n");
        output.push_str(&format!("| Findings analyzed | {} |\n", counts.total()));
        output.push_str(&format!("| Reachable | {} |\n", counts.reachable));
        output.push_str(&format!("| Unreachable | {} |\n", counts.unreachable));
        output.push_str(&format!(
            "| Insufficient data | {} |\n",
            counts.insufficient_data
        ));
        if response.ignored_count > 0 {
            output.push_str(&format!("| Ignored | {} |\n", response.ignored_count));
        }
        output.push_str(&format!(
            "| Dependency edges | {} ({} runtime) |\n\n",
            response.edges.len(),
            response.runtime_edge_count()
        ));
    }

    fn render_results(&self, output: &mut String, results: &[ReachabilityResult]) {
        output.push_str("## Findings\n\n");
        if results.is_empty() {
            output.push_str("No findings to analyze.\n\n");
            return;
        }

        output.push_str(RESULTS_TABLE_HEADER);
        output.push_str(RESULTS_TABLE_SEPARATOR);
        for result in results {
            let path_length = if result.evidence_path.is_empty() {
                "-".to_string()
            } else {
                // the root sentinel is not a hop
                (result.evidence_path.len() - 1).to_string()
            };
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                Self::escape_markdown_table_cell(&result.finding_id),
                Self::escape_markdown_table_cell(&result.target_package),
                Self::escape_markdown_table_cell(result.target_version.as_deref().unwrap_or("any")),
                Self::status_badge(result.status),
                result.reason.as_str(),
                path_length
            ));
        }
        output.push('\n');
    }

    fn render_evidence(&self, output: &mut String, results: &[ReachabilityResult]) {
        let reachable: Vec<&ReachabilityResult> =
            results.iter().filter(|result| result.reachable).collect();
        if reachable.is_empty() {
            return;
        }

        output.push_str("## Evidence Paths\n\n");
        output.push_str("Shortest runtime path from the project root to each reachable package.\n\n");
        for result in reachable {
            output.push_str(&format!(
                "### {} ({})\n\n",
                result.finding_id, result.target_package
            ));
            output.push_str("```text\n");
            output.push_str(&result.evidence_path.join(" → "));
            output.push_str("\n```\n\n");
        }
    }

    fn render_edges(&self, output: &mut String, edges: &[DependencyEdge]) {
        output.push_str("## Dependency Edges\n\n");
        if edges.is_empty() {
            output.push_str("The lockfile produced no dependency edges.\n\n");
            return;
        }

        output.push_str(EDGES_TABLE_HEADER);
        output.push_str(EDGES_TABLE_SEPARATOR);
        for edge in edges {
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                Self::escape_markdown_table_cell(&edge.parent),
                Self::escape_markdown_table_cell(&edge.child),
                Self::escape_markdown_table_cell(edge.version.as_deref().unwrap_or("-")),
                edge.scope,
                edge.depth.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
            ));
        }
        output.push('\n');
    }
}

impl ReachabilityFormatter for MarkdownFormatter {
    fn format(&self, response: &ReachabilityResponse) -> Result<String> {
        let mut output = String::new();

        self.render_header(&mut output, &response.metadata);
        self.render_summary(&mut output, response);

        if let Some(results) = &response.results {
            self.render_results(&mut output, results);
            self.render_evidence(&mut output, results);
        }

        if response.include_edges || response.results.is_none() {
            self.render_edges(&mut output, &response.edges);
        }

        Ok(output)
    }
}
