//! Lazy enumeration of chains from sanctioned nodes to clean companies.

use petgraph::graph::NodeIndex;
use petgraph::Direction;
use serde::{Deserialize, Serialize};

use crate::entity::EntityKind;
use crate::graph::analytics::distinct_neighbors;
use crate::graph::IdentityGraph;

/// Fewest edges in a reported chain; direct links show up in exposure scores.
pub const MIN_PATH_EDGES: usize = 2;

/// A simple directed path, by entity id, from a sanctioned node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SanctionPath {
    /// Entity ids from the sanctioned source to the company.
    pub nodes: Vec<String>,
}

impl SanctionPath {
    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// The sanctioned start node.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.nodes.first().map(String::as_str)
    }

    /// The clean company at the end.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.nodes.last().map(String::as_str)
    }
}

#[derive(Debug)]
struct Frame {
    node: usize,
    children: Vec<usize>,
    next: usize,
}

/// Single-pass iterator over [`SanctionPath`]s.
///
/// Depth-first from each sanctioned node in insertion order. Successor lists
/// are computed when a node is entered, so nothing is materialized up front.
#[derive(Debug)]
pub struct SanctionPaths<'g> {
    graph: &'g IdentityGraph,
    max_depth: usize,
    roots: Vec<usize>,
    next_root: usize,
    stack: Vec<Frame>,
    on_path: Vec<bool>,
}

impl<'g> SanctionPaths<'g> {
    fn new(graph: &'g IdentityGraph, max_depth: usize) -> Self {
        let inner = graph.inner();
        let roots = if max_depth < MIN_PATH_EDGES {
            Vec::new()
        } else {
            inner
                .node_indices()
                .filter(|idx| inner[*idx].is_sanctioned)
                .map(NodeIndex::index)
                .collect()
        };
        Self {
            graph,
            max_depth,
            roots,
            next_root: 0,
            stack: Vec::new(),
            on_path: vec![false; inner.node_count()],
        }
    }

    fn enter(&mut self, node: usize) {
        let children = distinct_neighbors(
            self.graph.inner(),
            NodeIndex::new(node),
            Direction::Outgoing,
        );
        self.on_path[node] = true;
        self.stack.push(Frame {
            node,
            children,
            next: 0,
        });
    }

    fn leave(&mut self) {
        if let Some(frame) = self.stack.pop() {
            self.on_path[frame.node] = false;
        }
    }

    fn is_target(&self, node: usize) -> bool {
        let attrs = &self.graph.inner()[NodeIndex::new(node)];
        !attrs.is_sanctioned && attrs.kind == EntityKind::Company
    }

    fn current_path(&self) -> SanctionPath {
        let inner = self.graph.inner();
        SanctionPath {
            nodes: self
                .stack
                .iter()
                .map(|f| inner[NodeIndex::new(f.node)].entity_id.clone())
                .collect(),
        }
    }
}

impl Iterator for SanctionPaths<'_> {
    type Item = SanctionPath;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let depth = self.stack.len();
            let Some(top) = self.stack.last_mut() else {
                let root = *self.roots.get(self.next_root)?;
                self.next_root += 1;
                self.enter(root);
                continue;
            };

            // A path of `depth` nodes has `depth - 1` edges.
            if depth > self.max_depth || top.next >= top.children.len() {
                self.leave();
                continue;
            }

            let child = top.children[top.next];
            top.next += 1;
            if self.on_path[child] {
                continue;
            }

            self.enter(child);
            if self.stack.len() > MIN_PATH_EDGES && self.is_target(child) {
                return Some(self.current_path());
            }
        }
    }
}

impl IdentityGraph {
    /// Simple paths from sanctioned nodes to unsanctioned companies, following
    /// edge direction, with between [`MIN_PATH_EDGES`] and `max_depth` edges.
    ///
    /// One-edge paths are never emitted, whatever `max_depth` is: a company
    /// directly linked to a sanctioned node is reported through
    /// [`IdentityGraph::sanctions_exposure`] instead. The sequence is produced
    /// lazily and cannot be restarted.
    #[must_use]
    pub fn sanction_paths(&self, max_depth: usize) -> SanctionPaths<'_> {
        SanctionPaths::new(self, max_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use crate::relationship::RelationshipEdge;

    fn ids(path: &SanctionPath) -> Vec<&str> {
        path.nodes.iter().map(String::as_str).collect()
    }

    fn s_c1_c2() -> IdentityGraph {
        let mut graph = IdentityGraph::new();
        graph.add_entities(&[
            Entity::new("S", EntityKind::Person).sanctioned(),
            Entity::new("C1", EntityKind::Company),
            Entity::new("C2", EntityKind::Company),
        ]);
        graph.add_relationships(&[
            RelationshipEdge::new("S", "C1", "owns"),
            RelationshipEdge::new("C1", "C2", "owns"),
        ]);
        graph
    }

    #[test]
    fn two_hop_chain_is_found() {
        let graph = s_c1_c2();
        let paths: Vec<_> = graph.sanction_paths(4).collect();
        assert_eq!(paths.len(), 1);
        assert_eq!(ids(&paths[0]), vec!["S", "C1", "C2"]);
        assert_eq!(paths[0].edge_count(), 2);
        assert_eq!(paths[0].source(), Some("S"));
        assert_eq!(paths[0].target(), Some("C2"));
    }

    #[test]
    fn direct_links_are_never_paths() {
        let mut graph = IdentityGraph::new();
        graph.add_entities(&[
            Entity::new("S", EntityKind::Person).sanctioned(),
            Entity::new("C", EntityKind::Company),
        ]);
        graph.add_relationships(&[RelationshipEdge::new("S", "C", "owns")]);

        for depth in 1..=10 {
            assert_eq!(graph.sanction_paths(depth).count(), 0, "depth {depth}");
        }
        assert_eq!(graph.sanctions_exposure()["C"].min_distance, 1);
    }

    #[test]
    fn depth_one_yields_nothing() {
        assert_eq!(s_c1_c2().sanction_paths(1).count(), 0);
        assert_eq!(s_c1_c2().sanction_paths(0).count(), 0);
    }

    #[test]
    fn depth_bounds_path_length() {
        let mut graph = s_c1_c2();
        graph.add_entities(&[Entity::new("C3", EntityKind::Company)]);
        graph.add_relationships(&[RelationshipEdge::new("C2", "C3", "owns")]);

        let two: Vec<_> = graph.sanction_paths(2).collect();
        assert_eq!(two.len(), 1);
        let three: Vec<_> = graph.sanction_paths(3).map(|p| p.edge_count()).collect();
        assert_eq!(three, vec![2, 3]);
    }

    #[test]
    fn cycles_do_not_repeat_nodes() {
        let mut graph = s_c1_c2();
        graph.add_relationships(&[
            RelationshipEdge::new("C2", "C1", "owns"),
            RelationshipEdge::new("C2", "S", "owns"),
        ]);
        for path in graph.sanction_paths(6) {
            let mut seen = path.nodes.clone();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), path.nodes.len());
        }
        assert_eq!(graph.sanction_paths(6).count(), 1);
    }

    #[test]
    fn non_company_and_sanctioned_ends_are_skipped() {
        let mut graph = IdentityGraph::new();
        graph.add_entities(&[
            Entity::new("S", EntityKind::Person).sanctioned(),
            Entity::new("P", EntityKind::Person),
            Entity::new("V", EntityKind::Vessel),
            Entity::new("S2", EntityKind::Company).sanctioned(),
        ]);
        graph.add_relationships(&[
            RelationshipEdge::new("S", "P", "associate_of"),
            RelationshipEdge::new("P", "V", "owns"),
            RelationshipEdge::new("P", "S2", "owns"),
        ]);
        assert_eq!(graph.sanction_paths(4).count(), 0);
    }

    #[test]
    fn parallel_edges_do_not_duplicate_paths() {
        let mut graph = s_c1_c2();
        graph.add_relationships(&[RelationshipEdge::new("S", "C1", "owns")]);
        assert_eq!(graph.sanction_paths(4).count(), 1);
    }

    #[test]
    fn iterator_is_single_pass() {
        let graph = s_c1_c2();
        let mut paths = graph.sanction_paths(4);
        assert!(paths.next().is_some());
        assert!(paths.next().is_none());
        assert!(paths.next().is_none());
    }

    #[test]
    fn no_sanctioned_nodes_yields_nothing() {
        let mut graph = IdentityGraph::new();
        graph.add_relationships(&[
            RelationshipEdge::new("a", "b", "owns"),
            RelationshipEdge::new("b", "c", "owns"),
        ]);
        assert_eq!(graph.sanction_paths(4).count(), 0);
        assert_eq!(IdentityGraph::new().sanction_paths(4).count(), 0);
    }
}
