pub mod canonicalizer;
pub mod classifier;
pub mod graph_builder;

pub use canonicalizer::{canonicalize, normalize_source_file};
pub use classifier::{classify, compute_reachability, compute_reachability_json, Classification};
pub use graph_builder::{ReachabilityGraph, TokenIndex};
