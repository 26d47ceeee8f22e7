//! Read-only structural metrics over an [`IdentityGraph`](crate::graph::IdentityGraph).
//!
//! Every query returns an empty result on an empty graph, and the
//! sanctions-centred queries return an empty result when no node is
//! sanctioned. Unreachable pairs are skipped, never reported as errors.

mod betweenness;
mod community;
mod exposure;
mod hubs;
mod paths;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::graph::{EdgeKind, NodeAttributes};

pub use betweenness::BridgeScore;
pub use community::DEFAULT_RESOLUTION;
pub use exposure::Exposure;
pub use hubs::HubScore;
pub use paths::{SanctionPath, SanctionPaths, MIN_PATH_EDGES};

/// Distinct neighbours of `node` in `direction`, ascending by handle.
///
/// Parallel edges collapse and self loops are dropped.
pub(crate) fn distinct_neighbors(
    graph: &DiGraph<NodeAttributes, EdgeKind>,
    node: NodeIndex,
    direction: Direction,
) -> Vec<usize> {
    let mut out: Vec<usize> = graph
        .neighbors_directed(node, direction)
        .filter(|n| *n != node)
        .map(NodeIndex::index)
        .collect();
    out.sort_unstable();
    out.dedup();
    out
}

/// Distinct-neighbour lists for every node, indexed by handle.
pub(crate) fn adjacency(
    graph: &DiGraph<NodeAttributes, EdgeKind>,
    direction: Direction,
) -> Vec<Vec<usize>> {
    graph
        .node_indices()
        .map(|n| distinct_neighbors(graph, n, direction))
        .collect()
}

/// Descending by score, then ascending by id.
pub(crate) fn rank_desc(a: (f64, &str), b: (f64, &str)) -> std::cmp::Ordering {
    b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, EntityKind};
    use crate::graph::IdentityGraph;
    use crate::relationship::RelationshipEdge;

    #[test]
    fn neighbours_collapse_parallel_edges_and_self_loops() {
        let mut graph = IdentityGraph::new();
        graph.add_entities(&[
            Entity::new("a", EntityKind::Company),
            Entity::new("b", EntityKind::Company),
        ]);
        graph.add_relationships(&[
            RelationshipEdge::new("a", "b", "owns"),
            RelationshipEdge::new("a", "b", "owns"),
            RelationshipEdge::new("a", "a", "owns"),
        ]);
        let out = adjacency(graph.inner(), Direction::Outgoing);
        assert_eq!(out, vec![vec![1], vec![]]);
        let incoming = adjacency(graph.inner(), Direction::Incoming);
        assert_eq!(incoming, vec![vec![], vec![0]]);
    }

    #[test]
    fn ranking_breaks_ties_by_id() {
        let mut items = vec![(1.0, "b"), (2.0, "z"), (1.0, "a")];
        items.sort_by(|x, y| rank_desc(*x, *y));
        assert_eq!(items, vec![(2.0, "z"), (1.0, "a"), (1.0, "b")]);
    }
}
