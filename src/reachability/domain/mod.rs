pub mod dependency_edge;
pub mod finding;
pub mod identity;
pub mod reachability;

pub use dependency_edge::{DependencyEdge, DependencyScope, RawEdge, ROOT_SENTINEL};
pub use finding::Finding;
pub use reachability::{
    EdgeRecord, ReachabilityInput, ReachabilityMethod, ReachabilityReason, ReachabilityResult,
    ReachabilityStatus, DEFAULT_ANALYSIS_VERSION,
};
