//! argus-reach - dependency-graph reachability for vulnerability findings
//!
//! This library decides whether a vulnerable npm/yarn package is reachable at
//! runtime from the project root, following hexagonal architecture and
//! Domain-Driven Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`reachability`): Lockfile parsing, canonical edges and the
//!   shortest-path classifier. Pure and I/O free.
//! - **Application Layer** (`application`): Use cases, DTOs and factories
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use argus_reach::prelude::*;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<()> {
//! // Create adapters
//! let lockfile_reader = FileSystemReader::new();
//! let findings_reader = FileSystemReader::new();
//! let progress_reporter = StderrProgressReporter::new();
//!
//! // Create use case
//! let use_case =
//!     AnalyzeReachabilityUseCase::new(lockfile_reader, findings_reader, progress_reporter);
//!
//! // Execute
//! let request = ReachabilityRequest::new(PathBuf::from("."), "acme/web", "build-42")
//!     .with_findings(Some(PathBuf::from("findings.json")));
//! let response = use_case.execute(request)?;
//!
//! // Format output
//! let output = JsonFormatter::new().format(&response)?;
//! println!("{}", output);
//! # Ok(())
//! # }
//! ```
//!
//! The core can also be used without any I/O:
//!
//! ```
//! use argus_reach::reachability::domain::{ReachabilityInput, ReachabilityStatus};
//! use argus_reach::reachability::{compute_reachability, parse_lockfile, LockfileMeta};
//!
//! let lockfile = r#"{
//!     "lockfileVersion": 3,
//!     "packages": {
//!         "": {"dependencies": {"express": "^4.18.0"}},
//!         "node_modules/express": {"version": "4.18.2", "dependencies": {"qs": "6.11.0"}},
//!         "node_modules/qs": {"version": "6.11.0"}
//!     }
//! }"#;
//! let edges = parse_lockfile(lockfile, &LockfileMeta::new("acme/web", "b-1")).unwrap();
//! let input = ReachabilityInput::new("GHSA-qs", "acme/web", "b-1", "qs", &edges);
//! let result = compute_reachability(&input).unwrap();
//!
//! assert_eq!(result.status, ReachabilityStatus::Reachable);
//! assert_eq!(result.evidence_path, vec!["__root__", "express@4.18.2", "qs@6.11.0"]);
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod ports;
pub mod reachability;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemReader, FileSystemWriter, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::{JsonFormatter, MarkdownFormatter};
    pub use crate::application::dto::{
        OutputFormat, ReachabilityRequest, ReachabilityResponse, ReportMetadata,
    };
    pub use crate::application::use_cases::AnalyzeReachabilityUseCase;
    pub use crate::ports::outbound::{
        FindingsReader, LockfileReader, LockfileSource, OutputPresenter, ProgressReporter,
        ReachabilityFormatter,
    };
    pub use crate::reachability::domain::{
        DependencyEdge, DependencyScope, EdgeRecord, Finding, ReachabilityInput,
        ReachabilityReason, ReachabilityResult, ReachabilityStatus,
    };
    pub use crate::reachability::{
        compute_reachability, compute_reachability_json, parse_lockfile,
        parse_lockfile_with_manifest, LockfileMeta,
    };
    pub use crate::shared::Result;
}
