use crate::application::dto::{ReachabilityRequest, ReachabilityResponse, ReportMetadata};
use crate::ports::outbound::{FindingsReader, LockfileReader, LockfileSource, ProgressReporter};
use crate::reachability::domain::{
    DependencyEdge, EdgeRecord, Finding, ReachabilityInput, ReachabilityResult,
};
use crate::reachability::services::normalize_source_file;
use crate::reachability::{compute_reachability, parse_lockfile_with_manifest, LockfileMeta};
use crate::shared::error::ReachError;
use crate::shared::Result;
use rayon::prelude::*;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// Findings classified in parallel between two progress updates
const BATCH_SIZE: usize = 64;

/// AnalyzeReachabilityUseCase - Core use case for reachability analysis
///
/// Reads a lockfile, turns it into canonical edges and, when a findings file
/// is given, classifies every finding against those edges.
///
/// # Type Parameters
/// * `LR` - LockfileReader implementation
/// * `FR` - FindingsReader implementation
/// * `PR` - ProgressReporter implementation
pub struct AnalyzeReachabilityUseCase<LR, FR, PR> {
    lockfile_reader: LR,
    findings_reader: FR,
    progress_reporter: PR,
}

impl<LR, FR, PR> AnalyzeReachabilityUseCase<LR, FR, PR>
where
    LR: LockfileReader,
    FR: FindingsReader,
    PR: ProgressReporter,
{
    /// Creates a new AnalyzeReachabilityUseCase with injected dependencies
    pub fn new(lockfile_reader: LR, findings_reader: FR, progress_reporter: PR) -> Self {
        Self {
            lockfile_reader,
            findings_reader,
            progress_reporter,
        }
    }

    /// Executes the analysis
    ///
    /// # Errors
    /// Returns an error if the lockfile or findings cannot be read or parsed.
    /// Ambiguous dependency data is never an error; it shows up as
    /// `INSUFFICIENT_DATA` verdicts.
    pub fn execute(&self, request: ReachabilityRequest) -> Result<ReachabilityResponse> {
        // Step 1: Locate and read the lockfile
        let source = self.read_lockfile(&request)?;

        // Step 2: Parse it into canonical edges
        let edges = self.parse_edges(&request, &source)?;

        // Step 3: Classify findings, unless this is an edge dump
        let (results, ignored_count) = match &request.findings_path {
            None => (None, 0),
            Some(findings_path) => {
                let findings = self.read_findings(findings_path)?;
                let (kept, ignored_count) = self.apply_ignore_list(findings, &request);
                let results = self.classify_findings(&request, &edges, kept)?;
                (Some(results), ignored_count)
            }
        };

        // Step 4: Build the response
        let metadata = ReportMetadata::new(
            request.repo.as_str(),
            request.build_id.as_str(),
            request.analysis_version.as_str(),
            normalize_source_file(Some(&source.source_file), &source.source_file),
            edges.len(),
        );
        Ok(ReachabilityResponse::new(
            metadata,
            edges,
            results,
            ignored_count,
            request.include_edges,
        ))
    }

    fn read_lockfile(&self, request: &ReachabilityRequest) -> Result<LockfileSource> {
        let location = request
            .lockfile_path
            .as_deref()
            .unwrap_or(&request.project_path);
        self.progress_reporter
            .report(&format!("📖 Loading lockfile from: {}", location.display()));

        self.lockfile_reader
            .read_lockfile(&request.project_path, request.lockfile_path.as_deref())
    }

    /// Parses the lockfile, seeding yarn root edges from the manifest when one
    /// was found next to it
    fn parse_edges(
        &self,
        request: &ReachabilityRequest,
        source: &LockfileSource,
    ) -> Result<Vec<DependencyEdge>> {
        let manifest = match source.manifest.as_deref() {
            None => None,
            Some(text) => match serde_json::from_str::<Value>(text) {
                Ok(value) => Some(value),
                Err(e) => {
                    self.progress_reporter.report_error(&format!(
                        "⚠️  Warning: Ignoring unparseable package.json next to {}: {}",
                        source.source_file, e
                    ));
                    None
                }
            },
        };

        let meta = LockfileMeta::new(request.repo.as_str(), request.build_id.as_str())
            .with_source_file(source.source_file.as_str());
        let edges = parse_lockfile_with_manifest(source.content.as_str(), manifest.as_ref(), &meta)
            .map_err(|e| ReachError::LockfileParseError {
                path: source.path.clone(),
                details: e.to_string(),
            })?;

        if edges.is_empty() {
            self.progress_reporter.report_error(
                "⚠️  Warning: The lockfile produced no dependency edges (unsupported lockfile version or empty project).",
            );
        } else {
            let runtime = edges.iter().filter(|edge| edge.runtime_flag).count();
            self.progress_reporter.report(&format!(
                "✅ Parsed {} dependency edge(s) ({} runtime)",
                edges.len(),
                runtime
            ));
        }

        Ok(edges)
    }

    fn read_findings(&self, path: &Path) -> Result<Vec<Finding>> {
        self.progress_reporter
            .report(&format!("📥 Loading findings from: {}", path.display()));
        let findings = self.findings_reader.read_findings(path)?;
        self.progress_reporter
            .report(&format!("✅ Loaded {} finding(s)", findings.len()));
        Ok(findings)
    }

    /// Drops ignored findings and warns about ignore entries that matched nothing
    fn apply_ignore_list(
        &self,
        findings: Vec<Finding>,
        request: &ReachabilityRequest,
    ) -> (Vec<Finding>, usize) {
        if request.ignored_findings.is_empty() {
            return (findings, 0);
        }

        let (ignored, kept): (Vec<Finding>, Vec<Finding>) = findings
            .into_iter()
            .partition(|finding| request.ignored_findings.contains(finding.finding_id()));

        if !ignored.is_empty() {
            self.progress_reporter.report(&format!(
                "🚫 Ignored {} finding(s) based on ignore_findings",
                ignored.len()
            ));
        }

        let seen: HashSet<&str> = ignored.iter().map(Finding::finding_id).collect();
        let mut unmatched: Vec<&String> = request
            .ignored_findings
            .iter()
            .filter(|id| !seen.contains(id.as_str()))
            .collect();
        unmatched.sort();
        for id in unmatched {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: Ignored finding '{}' does not appear in the findings file.",
                id
            ));
        }

        (kept, ignored.len())
    }

    /// Classifies findings in parallel, `BATCH_SIZE` at a time
    fn classify_findings(
        &self,
        request: &ReachabilityRequest,
        edges: &[DependencyEdge],
        findings: Vec<Finding>,
    ) -> Result<Vec<ReachabilityResult>> {
        let total = findings.len();
        if total == 0 {
            self.progress_reporter
                .report_completion("✅ No findings to analyze");
            return Ok(Vec::new());
        }

        self.progress_reporter
            .report(&format!("🔎 Computing reachability for {} finding(s)...", total));

        let records: Arc<[EdgeRecord]> = edges.iter().map(EdgeRecord::from).collect();
        let mut results = Vec::with_capacity(total);

        for chunk in findings.chunks(BATCH_SIZE) {
            let batch = chunk
                .par_iter()
                .map(|finding| compute_reachability(&Self::input_for(request, finding, &records)))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            results.extend(batch);
            self.progress_reporter.report_progress(
                results.len(),
                total,
                chunk.last().map(Finding::package),
            );
        }

        let reachable = results.iter().filter(|r| r.reachable).count();
        self.progress_reporter.report_completion(&format!(
            "✅ Reachability analysis complete: {} of {} finding(s) reachable",
            reachable, total
        ));

        Ok(results)
    }

    fn input_for(
        request: &ReachabilityRequest,
        finding: &Finding,
        records: &Arc<[EdgeRecord]>,
    ) -> ReachabilityInput {
        ReachabilityInput {
            finding_id: finding.finding_id().to_string(),
            repo: request.repo.clone(),
            build_id: request.build_id.clone(),
            target_package: finding.package().to_string(),
            target_version: finding.version().map(str::to_string),
            dependency_edges: Arc::clone(records),
            analysis_version: Some(request.analysis_version.clone()),
        }
    }
}
