//! Shortest-path reachability classifier.
//!
//! Each call is a pure decision tree over the caller's edges: every early exit
//! maps to a fixed `(status, reason)` pair and only a found path yields
//! `REACHABLE`. Malformed calls are errors; ambiguous data never is.

use super::graph_builder::{normalize_edges, NodeId, ReachabilityGraph, TokenIndex, ROOT_NODE};
use crate::reachability::domain::identity::reachability_id;
use crate::reachability::domain::{
    ReachabilityInput, ReachabilityMethod, ReachabilityReason, ReachabilityResult,
    ReachabilityStatus, ROOT_SENTINEL,
};
use crate::shared::error::ReachabilityComputeError;
use chrono::Utc;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Outcome of the decision tree before identity and timestamps are attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub reason: ReachabilityReason,
    pub evidence_path: Vec<String>,
}

impl Classification {
    fn verdict(reason: ReachabilityReason) -> Self {
        Self {
            reason,
            evidence_path: Vec::new(),
        }
    }
}

/// Computes the reachability verdict for one finding.
///
/// # Errors
/// `INVALID_INPUT` when a required string field is blank.
pub fn compute_reachability(
    input: &ReachabilityInput,
) -> Result<ReachabilityResult, ReachabilityComputeError> {
    input.validate()?;
    let classification = classify(input);
    Ok(assemble(input, classification))
}

/// Same as [`compute_reachability`] for untyped JSON input.
///
/// # Errors
/// `INVALID_INPUT` when the value does not have the input's shape.
pub fn compute_reachability_json(
    value: &Value,
) -> Result<ReachabilityResult, ReachabilityComputeError> {
    let input = ReachabilityInput::from_json(value)?;
    compute_reachability(&input)
}

/// Runs the decision tree on already validated input.
pub fn classify(input: &ReachabilityInput) -> Classification {
    let usable = normalize_edges(&input.dependency_edges);
    if !input.dependency_edges.is_empty() && usable.is_empty() {
        return Classification::verdict(ReachabilityReason::UnsupportedGraphShape);
    }

    let runtime: Vec<_> = usable.into_iter().filter(|edge| edge.runtime).collect();
    if runtime.is_empty() {
        return Classification::verdict(ReachabilityReason::EmptyGraph);
    }

    if !runtime.iter().any(|edge| edge.parent == ROOT_SENTINEL) {
        return Classification::verdict(ReachabilityReason::NoRoot);
    }

    let index = TokenIndex::build(&runtime);
    let Some(candidates) = index.tokens_for(input.normalized_target_package()) else {
        return Classification::verdict(ReachabilityReason::TargetNotPresent);
    };

    let targets: HashSet<NodeId> = match input.normalized_target_version() {
        None => candidates.iter().copied().collect(),
        Some(requested) => {
            let matching: HashSet<NodeId> = candidates
                .iter()
                .copied()
                .filter(|id| index.version(*id) == Some(requested))
                .collect();
            if matching.is_empty() {
                let version_blind = candidates.iter().all(|id| index.version(*id).is_none());
                return Classification::verdict(if version_blind {
                    ReachabilityReason::MissingVersionContext
                } else {
                    ReachabilityReason::VersionMismatch
                });
            }
            matching
        }
    };

    let graph = index.into_graph(&runtime);
    match shortest_path(&graph, &targets) {
        Some(path) => Classification {
            reason: ReachabilityReason::PathFound,
            evidence_path: path.iter().map(|id| graph.label(*id).to_string()).collect(),
        },
        None if graph.has_unresolved_parents() => {
            Classification::verdict(ReachabilityReason::UnsupportedGraphShape)
        }
        None => Classification::verdict(ReachabilityReason::NoPath),
    }
}

#[derive(Debug, Clone)]
struct BestPath {
    nodes: Vec<NodeId>,
    key: String,
}

/// Level-synchronous BFS from the root.
///
/// A node's best path is fixed by the first level that reaches it; within that
/// level the smallest `>`-joined path string wins. The search stops at the
/// first level containing a target, returning that level's smallest path.
fn shortest_path(graph: &ReachabilityGraph, targets: &HashSet<NodeId>) -> Option<Vec<NodeId>> {
    let mut best: HashMap<NodeId, BestPath> = HashMap::new();
    best.insert(
        ROOT_NODE,
        BestPath {
            nodes: vec![ROOT_NODE],
            key: graph.label(ROOT_NODE).to_string(),
        },
    );
    let mut frontier = vec![ROOT_NODE];

    while !frontier.is_empty() {
        let mut next: BTreeSet<NodeId> = BTreeSet::new();

        for node in &frontier {
            let Some(current) = best.get(node).cloned() else {
                continue;
            };
            for &neighbor in graph.neighbors(*node) {
                let key = format!("{}>{}", current.key, graph.label(neighbor));
                let improves = match best.get(&neighbor) {
                    None => true,
                    Some(existing) => next.contains(&neighbor) && key < existing.key,
                };
                if improves {
                    let mut nodes = current.nodes.clone();
                    nodes.push(neighbor);
                    best.insert(neighbor, BestPath { nodes, key });
                    next.insert(neighbor);
                }
            }
        }

        let winner = next
            .iter()
            .filter(|id| targets.contains(id))
            .filter_map(|id| best.get(id))
            .min_by(|a, b| a.key.cmp(&b.key));
        if let Some(found) = winner {
            return Some(found.nodes.clone());
        }

        frontier = next.into_iter().collect();
    }

    None
}

/// Attaches identity, confidence and method to a classification.
fn assemble(input: &ReachabilityInput, classification: Classification) -> ReachabilityResult {
    let status = classification.reason.status();
    let graph_backed = status != ReachabilityStatus::InsufficientData;
    let confidence = if graph_backed { 1.0 } else { 0.0 };
    let method = if graph_backed {
        ReachabilityMethod::Graph
    } else {
        ReachabilityMethod::Unavailable
    };
    let target_package = input.normalized_target_package();
    let target_version = input.normalized_target_version();
    let analysis_version = input.effective_analysis_version();

    ReachabilityResult {
        reachability_id: reachability_id(
            &input.repo,
            &input.build_id,
            &input.finding_id,
            target_package,
            target_version,
            analysis_version,
        ),
        finding_id: input.finding_id.clone(),
        repo: input.repo.clone(),
        build_id: input.build_id.clone(),
        target_package: target_package.to_string(),
        target_version: target_version.map(str::to_string),
        reachable: status == ReachabilityStatus::Reachable,
        confidence,
        confidence_score: confidence,
        evidence_path: classification.evidence_path,
        method,
        status,
        reason: classification.reason,
        analysis_version: analysis_version.to_string(),
        computed_at: Utc::now(),
    }
}
