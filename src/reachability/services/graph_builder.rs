use crate::reachability::domain::{EdgeRecord, ROOT_SENTINEL};
use std::collections::{BTreeSet, HashMap};

/// Index of a token in the arena
pub type NodeId = usize;

/// The synthetic root always occupies the first arena slot
pub const ROOT_NODE: NodeId = 0;

/// Placeholder used in token labels for unversioned packages
const NULL_VERSION: &str = "null";

/// An edge that survived boundary normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    pub parent: String,
    pub child: String,
    pub version: Option<String>,
    pub runtime: bool,
}

/// Keeps edges with a non-blank parent and child; trims names and versions.
pub fn normalize_edges(records: &[EdgeRecord]) -> Vec<GraphEdge> {
    records
        .iter()
        .filter_map(|record| {
            let parent = non_blank(record.parent.as_deref())?;
            let child = non_blank(record.child.as_deref())?;
            Some(GraphEdge {
                parent: parent.to_string(),
                child: child.to_string(),
                version: non_blank(record.version.as_deref()).map(str::to_string),
                runtime: record.runtime_flag,
            })
        })
        .collect()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// `name@version` label, with the literal `null` for unversioned packages
pub fn token_label(name: &str, version: Option<&str>) -> String {
    format!("{}@{}", name, version.unwrap_or(NULL_VERSION))
}

#[derive(Debug, Clone)]
struct Token {
    label: String,
    version: Option<String>,
}

/// Arena of `(name, version)` tokens plus the name→token-set index.
///
/// Same-named packages resolved at different versions get distinct tokens, so
/// they stay distinct graph nodes.
#[derive(Debug, Clone)]
pub struct TokenIndex {
    tokens: Vec<Token>,
    ids: HashMap<String, NodeId>,
    by_name: HashMap<String, BTreeSet<NodeId>>,
}

impl TokenIndex {
    /// Interns every child of `edges` as a token
    pub fn build(edges: &[GraphEdge]) -> Self {
        let mut index = Self {
            tokens: vec![Token {
                label: ROOT_SENTINEL.to_string(),
                version: None,
            }],
            ids: HashMap::new(),
            by_name: HashMap::new(),
        };
        index.ids.insert(ROOT_SENTINEL.to_string(), ROOT_NODE);

        for edge in edges {
            let id = index.intern(&edge.child, edge.version.as_deref());
            index.by_name.entry(edge.child.clone()).or_default().insert(id);
        }
        index
    }

    fn intern(&mut self, name: &str, version: Option<&str>) -> NodeId {
        let label = token_label(name, version);
        if let Some(&id) = self.ids.get(&label) {
            return id;
        }
        let id = self.tokens.len();
        self.tokens.push(Token {
            label: label.clone(),
            version: version.map(str::to_string),
        });
        self.ids.insert(label, id);
        id
    }

    /// All tokens known for a package name
    pub fn tokens_for(&self, name: &str) -> Option<&BTreeSet<NodeId>> {
        self.by_name.get(name)
    }

    pub fn label(&self, id: NodeId) -> &str {
        &self.tokens[id].label
    }

    pub fn version(&self, id: NodeId) -> Option<&str> {
        self.tokens[id].version.as_deref()
    }

    /// Wires `edges` into an adjacency list rooted at [`ROOT_NODE`].
    ///
    /// Root edges attach to the root; every other edge fans out from each token
    /// of its parent name. Parent names with no token are collected as
    /// unresolved instead of being dropped silently.
    pub fn into_graph(self, edges: &[GraphEdge]) -> ReachabilityGraph {
        let mut adjacency: Vec<BTreeSet<NodeId>> = vec![BTreeSet::new(); self.tokens.len()];
        let mut unresolved_parents = BTreeSet::new();

        for edge in edges {
            let label = token_label(&edge.child, edge.version.as_deref());
            let Some(&child) = self.ids.get(&label) else {
                continue;
            };

            if edge.parent == ROOT_SENTINEL {
                adjacency[ROOT_NODE].insert(child);
                continue;
            }

            match self.by_name.get(&edge.parent) {
                Some(parents) => {
                    for &parent in parents {
                        adjacency[parent].insert(child);
                    }
                }
                None => {
                    unresolved_parents.insert(edge.parent.clone());
                }
            }
        }

        let adjacency = adjacency
            .into_iter()
            .map(|neighbors| {
                let mut sorted: Vec<NodeId> = neighbors.into_iter().collect();
                sorted.sort_by(|a, b| self.tokens[*a].label.cmp(&self.tokens[*b].label));
                sorted
            })
            .collect();

        ReachabilityGraph {
            index: self,
            adjacency,
            unresolved_parents,
        }
    }
}

/// Runtime dependency graph over tokens
#[derive(Debug, Clone)]
pub struct ReachabilityGraph {
    index: TokenIndex,
    adjacency: Vec<Vec<NodeId>>,
    unresolved_parents: BTreeSet<String>,
}

impl ReachabilityGraph {
    /// Successors of `id`, deduplicated and sorted by token label
    pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
        &self.adjacency[id]
    }

    pub fn label(&self, id: NodeId) -> &str {
        self.index.label(id)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Parent names referenced by edges but never seen as a child
    pub fn unresolved_parents(&self) -> &BTreeSet<String> {
        &self.unresolved_parents
    }

    pub fn has_unresolved_parents(&self) -> bool {
        !self.unresolved_parents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(parent: &str, child: &str, version: Option<&str>) -> GraphEdge {
        GraphEdge {
            parent: parent.to_string(),
            child: child.to_string(),
            version: version.map(str::to_string),
            runtime: true,
        }
    }

    fn labels(graph: &ReachabilityGraph, id: NodeId) -> Vec<&str> {
        graph.neighbors(id).iter().map(|n| graph.label(*n)).collect()
    }

    #[test]
    fn test_normalize_edges_skips_unusable() {
        let records = vec![
            EdgeRecord {
                parent: Some("a".to_string()),
                child: Some(" b ".to_string()),
                version: Some(" ".to_string()),
                runtime_flag: true,
            },
            EdgeRecord {
                parent: None,
                child: Some("c".to_string()),
                version: None,
                runtime_flag: true,
            },
            EdgeRecord {
                parent: Some("a".to_string()),
                child: Some("".to_string()),
                version: None,
                runtime_flag: true,
            },
        ];
        let edges = normalize_edges(&records);
        assert_eq!(edges, vec![edge("a", "b", None)]);
    }

    #[test]
    fn test_token_label() {
        assert_eq!(token_label("lodash", Some("4.17.21")), "lodash@4.17.21");
        assert_eq!(token_label("@scope/pkg", None), "@scope/pkg@null");
    }

    #[test]
    fn test_same_name_different_versions_are_distinct_tokens() {
        let edges = vec![
            edge(ROOT_SENTINEL, "a", Some("1.0.0")),
            edge("a", "shared", Some("1.0.0")),
            edge(ROOT_SENTINEL, "shared", Some("2.0.0")),
        ];
        let index = TokenIndex::build(&edges);
        let shared = index.tokens_for("shared").unwrap();
        assert_eq!(shared.len(), 2);
        let versions: BTreeSet<Option<&str>> = shared.iter().map(|id| index.version(*id)).collect();
        assert!(versions.contains(&Some("1.0.0")));
        assert!(versions.contains(&Some("2.0.0")));
    }

    #[test]
    fn test_parent_fans_out_from_every_version() {
        let edges = vec![
            edge(ROOT_SENTINEL, "a", Some("1.0.0")),
            edge(ROOT_SENTINEL, "a", Some("2.0.0")),
            edge("a", "b", Some("1.0.0")),
        ];
        let graph = TokenIndex::build(&edges).into_graph(&edges);

        assert_eq!(labels(&graph, ROOT_NODE), vec!["a@1.0.0", "a@2.0.0"]);
        for a in graph.neighbors(ROOT_NODE).to_vec() {
            assert_eq!(labels(&graph, a), vec!["b@1.0.0"]);
        }
        assert!(!graph.has_unresolved_parents());
    }

    #[test]
    fn test_adjacency_sorted_by_label_and_deduplicated() {
        let edges = vec![
            edge(ROOT_SENTINEL, "zeta", None),
            edge(ROOT_SENTINEL, "alpha", Some("1.0.0")),
            edge(ROOT_SENTINEL, "zeta", None),
            edge(ROOT_SENTINEL, "mid", Some("0.1.0")),
        ];
        let graph = TokenIndex::build(&edges).into_graph(&edges);
        assert_eq!(
            labels(&graph, ROOT_NODE),
            vec!["alpha@1.0.0", "mid@0.1.0", "zeta@null"]
        );
        assert_eq!(graph.node_count(), 4);
    }

    #[test]
    fn test_unknown_parent_is_recorded() {
        let edges = vec![
            edge(ROOT_SENTINEL, "a", Some("1.0.0")),
            edge("orphan", "b", Some("1.0.0")),
        ];
        let graph = TokenIndex::build(&edges).into_graph(&edges);
        assert!(graph.has_unresolved_parents());
        assert!(graph.unresolved_parents().contains("orphan"));
    }
}
