//! Incremental construction of an [`IdentityGraph`].
//!
//! Each call mutates the graph in place and returns a [`BuildReport`] so that
//! ingestion problems (edges pointing at entities that were never added, ids
//! inserted twice) are visible without halting the pipeline.

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::entity::{Entity, EntityKind};
use crate::graph::{EdgeKind, IdentityGraph, NodeAttributes, NodeOrigin};
use crate::matching::MatchRecord;
use crate::relationship::RelationshipEdge;

/// Diagnostics for one builder call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    /// Nodes created from entity records.
    pub nodes_added: usize,
    /// Ids that were already present as entity nodes and got overwritten.
    pub nodes_overwritten: Vec<String>,
    /// Placeholder or synthetic nodes replaced by a real entity record.
    pub placeholders_resolved: usize,
    /// Edges added.
    pub edges_added: usize,
    /// Dangling references: ids auto-created for an edge endpoint.
    pub placeholder_nodes: Vec<String>,
    /// Registry-side match targets created from match records.
    pub synthetic_nodes: Vec<String>,
}

impl BuildReport {
    /// Folds another report into this one.
    pub fn merge(&mut self, other: Self) {
        self.nodes_added += other.nodes_added;
        self.nodes_overwritten.extend(other.nodes_overwritten);
        self.placeholders_resolved += other.placeholders_resolved;
        self.edges_added += other.edges_added;
        self.placeholder_nodes.extend(other.placeholder_nodes);
        self.synthetic_nodes.extend(other.synthetic_nodes);
    }

    /// Number of dangling references recovered with a placeholder.
    #[must_use]
    pub fn dangling_references(&self) -> usize {
        self.placeholder_nodes.len()
    }

    /// Returns true if nothing was overwritten and no reference dangled.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.nodes_overwritten.is_empty() && self.placeholder_nodes.is_empty()
    }
}

impl IdentityGraph {
    /// Upserts one node per entity, keyed by `entity_id`.
    ///
    /// A second insertion of the same id replaces the stored attributes
    /// (last write wins) and is reported in
    /// [`BuildReport::nodes_overwritten`]. Placeholder and synthetic nodes are
    /// upgraded in place.
    ///
    /// An entity with both a jurisdiction and a registration number is also
    /// reachable under [`Entity::corporate_key`]. A synthetic node already
    /// created under that key becomes the entity's node, so match edges land
    /// on the same node whichever of the two is added first.
    pub fn add_entities(&mut self, entities: &[Entity]) -> BuildReport {
        let mut report = BuildReport::default();

        for entity in entities {
            let attrs = NodeAttributes::from_entity(entity);
            let corporate_key = entity.corporate_key();
            let existing = self.index.get(&entity.entity_id).copied().or_else(|| {
                corporate_key
                    .as_ref()
                    .and_then(|key| self.index.get(key).copied())
                    .filter(|idx| self.graph[*idx].origin != NodeOrigin::Entity)
            });

            let idx = match existing {
                None => {
                    let idx = self.graph.add_node(attrs);
                    report.nodes_added += 1;
                    idx
                }
                Some(idx) => {
                    let existing = &mut self.graph[idx];
                    if existing.origin == NodeOrigin::Entity {
                        if existing.is_sanctioned != attrs.is_sanctioned {
                            warn!(
                                entity_id = %entity.entity_id,
                                was = existing.is_sanctioned,
                                now = attrs.is_sanctioned,
                                "sanctioned flag changed by re-insertion"
                            );
                        } else {
                            debug!(entity_id = %entity.entity_id, "entity re-inserted");
                        }
                        report.nodes_overwritten.push(entity.entity_id.clone());
                    } else {
                        report.placeholders_resolved += 1;
                    }
                    *existing = attrs;
                    idx
                }
            };

            self.index.insert(entity.entity_id.clone(), idx);
            if let Some(key) = corporate_key {
                self.alias(key, idx);
            }
        }

        if !report.nodes_overwritten.is_empty() {
            warn!(
                count = report.nodes_overwritten.len(),
                "duplicate entity ids overwritten"
            );
        }
        debug!(
            nodes_added = report.nodes_added,
            resolved = report.placeholders_resolved,
            "entities added"
        );
        report
    }

    /// Adds one directed edge per relationship.
    ///
    /// Endpoints that were never added become unsanctioned placeholders and
    /// are listed in [`BuildReport::placeholder_nodes`]. Edges are never
    /// de-duplicated.
    pub fn add_relationships(&mut self, edges: &[RelationshipEdge]) -> BuildReport {
        let mut report = BuildReport::default();

        for edge in edges {
            let source = self.ensure_node(&edge.source_id, &mut report);
            let target = self.ensure_node(&edge.target_id, &mut report);
            self.graph.add_edge(
                source,
                target,
                EdgeKind::Relationship {
                    relationship_type: edge.relationship_type.clone(),
                },
            );
            report.edges_added += 1;
        }

        if !report.placeholder_nodes.is_empty() {
            warn!(
                dangling = report.placeholder_nodes.len(),
                "relationships reference entities that were never added"
            );
        }
        debug!(edges_added = report.edges_added, "relationships added");
        report
    }

    /// Adds a `potential_match` edge from each sanctioned entity to the
    /// registry-side party.
    ///
    /// The target is keyed by [`MatchRecord::corporate_node_id`], which also
    /// resolves to the registry entity's own node once that entity is added.
    /// When neither the key nor the registry entity id is known, a synthetic
    /// company node is created from the record's target name and
    /// jurisdiction. A missing source is a dangling reference.
    pub fn add_matches(&mut self, matches: &[MatchRecord]) -> BuildReport {
        let mut report = BuildReport::default();

        for record in matches {
            let source = self.ensure_node(&record.source_entity_id, &mut report);
            let target = self.ensure_synthetic(record, &mut report);
            self.graph.add_edge(
                source,
                target,
                EdgeKind::Match {
                    confidence: record.confidence_score,
                    match_type: record.match_type,
                },
            );
            report.edges_added += 1;
        }

        if !report.placeholder_nodes.is_empty() {
            warn!(
                dangling = report.placeholder_nodes.len(),
                "match records reference sanctioned entities that were never added"
            );
        }
        info!(
            edges_added = report.edges_added,
            synthetic = report.synthetic_nodes.len(),
            "match edges added"
        );
        report
    }

    fn ensure_node(&mut self, entity_id: &str, report: &mut BuildReport) -> NodeIndex {
        if let Some(idx) = self.index.get(entity_id) {
            return *idx;
        }
        debug!(entity_id, "creating placeholder node");
        let idx = self.graph.add_node(NodeAttributes::placeholder(entity_id));
        self.index.insert(entity_id.to_string(), idx);
        report.placeholder_nodes.push(entity_id.to_string());
        idx
    }

    fn ensure_synthetic(&mut self, record: &MatchRecord, report: &mut BuildReport) -> NodeIndex {
        let node_id = record.corporate_node_id();
        if let Some(idx) = self.index.get(&node_id) {
            return *idx;
        }
        if let Some(idx) = self.index.get(&record.target_entity_id).copied() {
            self.alias(node_id, idx);
            return idx;
        }
        let idx = self.graph.add_node(NodeAttributes {
            entity_id: node_id.clone(),
            kind: EntityKind::Company,
            jurisdiction: record.target_jurisdiction.clone(),
            is_sanctioned: false,
            display_name: record.target_name.clone(),
            origin: NodeOrigin::Synthetic,
        });
        self.index.insert(node_id.clone(), idx);
        report.synthetic_nodes.push(node_id);
        idx
    }

    /// Registers an extra lookup key for a node. An existing key keeps its
    /// node.
    fn alias(&mut self, key: String, idx: NodeIndex) {
        match self.index.get(&key) {
            None => {
                self.index.insert(key, idx);
            }
            Some(other) if *other != idx => {
                debug!(key = %key, "corporate key already bound to another node");
            }
            Some(_) => {}
        }
    }
}
