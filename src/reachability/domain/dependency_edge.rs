use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parent value denoting the project's own manifest
pub const ROOT_SENTINEL: &str = "__root__";

/// Declared scope of a dependency relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyScope {
    Runtime,
    Dev,
    Test,
    Peer,
    Optional,
    Unknown,
}

impl DependencyScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyScope::Runtime => "runtime",
            DependencyScope::Dev => "dev",
            DependencyScope::Test => "test",
            DependencyScope::Peer => "peer",
            DependencyScope::Optional => "optional",
            DependencyScope::Unknown => "unknown",
        }
    }

    pub fn is_runtime(&self) -> bool {
        matches!(self, DependencyScope::Runtime)
    }
}

impl fmt::Display for DependencyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dialect-neutral tuple emitted by every lockfile parser before canonicalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEdge {
    pub parent: String,
    pub child: String,
    pub version: Option<String>,
    pub scope: DependencyScope,
    pub depth: Option<u32>,
}

impl RawEdge {
    pub fn new(
        parent: impl Into<String>,
        child: impl Into<String>,
        version: Option<String>,
        scope: DependencyScope,
        depth: Option<u32>,
    ) -> Self {
        Self {
            parent: parent.into(),
            child: child.into(),
            version,
            scope,
            depth,
        }
    }
}

/// One canonical parent→child relationship as declared in a lockfile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyEdge {
    pub dependency_id: String,
    pub repo: String,
    pub build_id: String,
    pub parent: String,
    pub child: String,
    pub version: Option<String>,
    pub scope: DependencyScope,
    pub runtime_flag: bool,
    pub source_file: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
}

impl DependencyEdge {
    pub fn is_root_edge(&self) -> bool {
        self.parent == ROOT_SENTINEL
    }
}
