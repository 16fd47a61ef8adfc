//! Core reachability engine.
//!
//! - [`lockfile`]: npm and yarn lockfiles to canonical [`domain::DependencyEdge`]s
//! - [`services`]: canonicalization, graph construction and the shortest-path classifier
//! - [`domain`]: value types and identity hashing
//!
//! Everything here is pure: no I/O and no shared state.

pub mod domain;
pub mod lockfile;
pub mod services;

pub use lockfile::{parse_lockfile, parse_lockfile_with_manifest, LockfileMeta};
pub use services::{compute_reachability, compute_reachability_json};
