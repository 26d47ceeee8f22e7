//! The identity graph.
//!
//! A directed multigraph over entity ids. Nodes live in a `petgraph` arena and
//! are addressed by stable integer handles; the entity id is kept in a side
//! map for external lookups. Edges are tagged either as relationships from
//! ingestion or as potential identity matches.
//!
//! The graph is built incrementally (see [`builder`]) and then queried by the
//! read-only algorithms in [`analytics`]. It is not meant to be mutated
//! concurrently: callers that shard matching build one graph per shard.

pub mod analytics;
pub mod builder;

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind};
use crate::jurisdiction::SecrecyList;
use crate::matching::MatchType;

pub use analytics::{BridgeScore, Exposure, HubScore, SanctionPath, SanctionPaths};
pub use builder::BuildReport;

/// Relationship label carried by match edges.
pub const POTENTIAL_MATCH: &str = "potential_match";

/// How a node came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeOrigin {
    /// Added from an entity record.
    Entity,
    /// Auto-created for an edge endpoint never added as an entity.
    Placeholder,
    /// Derived registry-side party of a match edge.
    Synthetic,
}

/// Snapshot of the entity attributes used by analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeAttributes {
    /// External key of the node.
    pub entity_id: String,
    /// Entity classification; `Unknown` for placeholders.
    pub kind: EntityKind,
    /// Registration jurisdiction code.
    pub jurisdiction: Option<String>,
    /// Whether the entity is on a sanctions list.
    pub is_sanctioned: bool,
    /// Human-readable caption; may be empty.
    pub display_name: String,
    /// How the node was created.
    pub origin: NodeOrigin,
}

impl NodeAttributes {
    /// Snapshot of an entity record.
    #[must_use]
    pub fn from_entity(entity: &Entity) -> Self {
        Self {
            entity_id: entity.entity_id.clone(),
            kind: entity.kind,
            jurisdiction: entity.jurisdiction_code().map(str::to_string),
            is_sanctioned: entity.is_sanctioned(),
            display_name: entity.display_name.clone(),
            origin: NodeOrigin::Entity,
        }
    }

    /// Unsanctioned node of unknown kind for a dangling reference.
    #[must_use]
    pub fn placeholder(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            kind: EntityKind::Unknown,
            jurisdiction: None,
            is_sanctioned: false,
            display_name: String::new(),
            origin: NodeOrigin::Placeholder,
        }
    }
}

/// Edge label: a relationship or a potential identity match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "edge", rename_all = "snake_case")]
pub enum EdgeKind {
    /// Ownership, directorship, kinship and similar links.
    Relationship {
        /// Label such as `owned_by`.
        relationship_type: String,
    },
    /// Sanctioned entity to registry party.
    Match {
        /// Match confidence in [0, 100].
        confidence: f64,
        /// Strategy that produced the match.
        match_type: MatchType,
    },
}

impl EdgeKind {
    /// Relationship label; match edges report [`POTENTIAL_MATCH`].
    #[must_use]
    pub fn relationship_type(&self) -> &str {
        match self {
            Self::Relationship { relationship_type } => relationship_type,
            Self::Match { .. } => POTENTIAL_MATCH,
        }
    }

    /// Returns true for match edges.
    #[must_use]
    pub const fn is_match(&self) -> bool {
        matches!(self, Self::Match { .. })
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relationship { relationship_type } => write!(f, "{relationship_type}"),
            Self::Match {
                confidence,
                match_type,
            } => write!(f, "{POTENTIAL_MATCH}({match_type}, {confidence:.1})"),
        }
    }
}

/// Directed identity multigraph.
#[derive(Debug, Clone, Default)]
pub struct IdentityGraph {
    graph: DiGraph<NodeAttributes, EdgeKind>,
    index: HashMap<String, NodeIndex>,
}

impl IdentityGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges, parallel edges included.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns true if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Stable handle of a node.
    #[must_use]
    pub fn handle(&self, entity_id: &str) -> Option<NodeIndex> {
        self.index.get(entity_id).copied()
    }

    /// Returns true if a node exists for `entity_id`.
    #[must_use]
    pub fn contains(&self, entity_id: &str) -> bool {
        self.index.contains_key(entity_id)
    }

    /// Attributes of a node.
    #[must_use]
    pub fn node(&self, entity_id: &str) -> Option<&NodeAttributes> {
        self.handle(entity_id).map(|idx| &self.graph[idx])
    }

    /// Attributes by handle.
    #[must_use]
    pub fn node_at(&self, handle: NodeIndex) -> Option<&NodeAttributes> {
        self.graph.node_weight(handle)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeAttributes> {
        self.graph.node_weights()
    }

    /// All edges as `(source id, target id, label)` in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &EdgeKind)> {
        self.graph.edge_references().map(|e| {
            (
                self.graph[e.source()].entity_id.as_str(),
                self.graph[e.target()].entity_id.as_str(),
                e.weight(),
            )
        })
    }

    /// Edges from `source` to `target`, parallel edges included.
    #[must_use]
    pub fn edges_between(&self, source: &str, target: &str) -> Vec<&EdgeKind> {
        let (Some(a), Some(b)) = (self.handle(source), self.handle(target)) else {
            return Vec::new();
        };
        self.graph.edges_connecting(a, b).map(|e| e.weight()).collect()
    }

    /// Number of sanctioned nodes.
    #[must_use]
    pub fn sanctioned_count(&self) -> usize {
        self.graph.node_weights().filter(|n| n.is_sanctioned).count()
    }

    pub(crate) fn inner(&self) -> &DiGraph<NodeAttributes, EdgeKind> {
        &self.graph
    }

    /// Overview statistics.
    #[must_use]
    pub fn summary(&self, secrecy: &SecrecyList) -> GraphSummary {
        let mut summary = GraphSummary {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            ..GraphSummary::default()
        };

        for node in self.graph.node_weights() {
            if node.is_sanctioned {
                summary.sanctioned_count += 1;
            }
            match node.origin {
                NodeOrigin::Placeholder => summary.placeholder_count += 1,
                NodeOrigin::Synthetic => summary.synthetic_count += 1,
                NodeOrigin::Entity => {}
            }
            *summary.nodes_by_kind.entry(node.kind).or_default() += 1;

            if node.kind == EntityKind::Company {
                if let Some(jur) = node.jurisdiction.as_deref() {
                    if secrecy.contains(jur) {
                        *summary
                            .secrecy_companies
                            .entry(crate::jurisdiction::canonical_code(jur))
                            .or_default() += 1;
                    }
                }
            }
        }

        for edge in self.graph.edge_weights() {
            *summary
                .edges_by_type
                .entry(edge.relationship_type().to_string())
                .or_default() += 1;
        }

        summary
    }
}

/// Overview statistics of an identity graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSummary {
    /// Total nodes.
    pub node_count: usize,
    /// Total edges, parallel edges included.
    pub edge_count: usize,
    /// Nodes flagged as sanctioned.
    pub sanctioned_count: usize,
    /// Nodes created for dangling references.
    pub placeholder_count: usize,
    /// Nodes created for registry-side match targets.
    pub synthetic_count: usize,
    /// Node count per entity kind.
    pub nodes_by_kind: BTreeMap<EntityKind, usize>,
    /// Edge count per relationship label.
    pub edges_by_type: BTreeMap<String, usize>,
    /// Company nodes registered in a secrecy jurisdiction, by code.
    pub secrecy_companies: BTreeMap<String, usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relationship::RelationshipEdge;

    #[test]
    fn edge_kind_labels() {
        let rel = EdgeKind::Relationship {
            relationship_type: "owned_by".to_string(),
        };
        let m = EdgeKind::Match {
            confidence: 97.0,
            match_type: MatchType::FuzzyName,
        };
        assert_eq!(rel.relationship_type(), "owned_by");
        assert_eq!(m.relationship_type(), POTENTIAL_MATCH);
        assert!(m.is_match());
        assert!(!rel.is_match());
        assert_eq!(m.to_string(), "potential_match(fuzzy_name, 97.0)");
    }

    #[test]
    fn summary_counts() {
        let mut graph = IdentityGraph::new();
        graph.add_entities(&[
            Entity::new("s", EntityKind::Person).sanctioned(),
            Entity::new("c1", EntityKind::Company).with_jurisdiction("VG"),
            Entity::new("c2", EntityKind::Company).with_jurisdiction("gb"),
        ]);
        graph.add_relationships(&[
            RelationshipEdge::new("c1", "s", "owned_by"),
            RelationshipEdge::new("c2", "ghost", "owned_by"),
        ]);

        let summary = graph.summary(&SecrecyList::default());
        assert_eq!(summary.node_count, 4);
        assert_eq!(summary.edge_count, 2);
        assert_eq!(summary.sanctioned_count, 1);
        assert_eq!(summary.placeholder_count, 1);
        assert_eq!(summary.nodes_by_kind.get(&EntityKind::Company), Some(&2));
        assert_eq!(summary.edges_by_type.get("owned_by"), Some(&2));
        assert_eq!(summary.secrecy_companies.get("vg"), Some(&1));
        assert!(!summary.secrecy_companies.contains_key("gb"));
    }

    #[test]
    fn lookups_on_empty_graph() {
        let graph = IdentityGraph::new();
        assert!(graph.is_empty());
        assert!(graph.node("x").is_none());
        assert!(graph.edges_between("a", "b").is_empty());
        assert_eq!(graph.sanctioned_count(), 0);
    }
}
