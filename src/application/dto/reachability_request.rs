use crate::reachability::domain::DEFAULT_ANALYSIS_VERSION;
use std::collections::HashSet;
use std::path::PathBuf;

/// ReachabilityRequest - Internal request DTO for the analysis use case
///
/// Built by the CLI after merging flags with the config file.
#[derive(Debug, Clone)]
pub struct ReachabilityRequest {
    /// Project directory searched for a lockfile
    pub project_path: PathBuf,
    /// Explicit lockfile, overriding discovery in `project_path`
    pub lockfile_path: Option<PathBuf>,
    /// Findings document; `None` runs in edge-dump mode
    pub findings_path: Option<PathBuf>,
    pub repo: String,
    pub build_id: String,
    pub analysis_version: String,
    /// Finding ids excluded from analysis
    pub ignored_findings: HashSet<String>,
    /// Whether the report carries the full edge list
    pub include_edges: bool,
}

impl ReachabilityRequest {
    pub fn new(project_path: PathBuf, repo: impl Into<String>, build_id: impl Into<String>) -> Self {
        Self {
            project_path,
            lockfile_path: None,
            findings_path: None,
            repo: repo.into(),
            build_id: build_id.into(),
            analysis_version: DEFAULT_ANALYSIS_VERSION.to_string(),
            ignored_findings: HashSet::new(),
            include_edges: false,
        }
    }

    pub fn with_lockfile(mut self, lockfile_path: Option<PathBuf>) -> Self {
        self.lockfile_path = lockfile_path;
        self
    }

    pub fn with_findings(mut self, findings_path: Option<PathBuf>) -> Self {
        self.findings_path = findings_path;
        self
    }

    pub fn with_analysis_version(mut self, analysis_version: impl Into<String>) -> Self {
        self.analysis_version = analysis_version.into();
        self
    }

    pub fn with_ignored_findings<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_findings = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_include_edges(mut self, include_edges: bool) -> Self {
        self.include_edges = include_edges;
        self
    }

    /// Edge-dump mode: no findings to classify
    pub fn is_edge_dump(&self) -> bool {
        self.findings_path.is_none()
    }
}
