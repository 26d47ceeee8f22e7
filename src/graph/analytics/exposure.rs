//! Sanctions exposure of unsanctioned nodes.

use std::collections::{BTreeMap, VecDeque};

use petgraph::graph::NodeIndex;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::analytics::adjacency;
use crate::graph::IdentityGraph;

/// Proximity of a node to the sanctioned set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Exposure {
    /// Shortest distance to any sanctioned node in either direction.
    pub min_distance: usize,
    /// Distinct sanctioned nodes one edge away, either direction.
    pub direct_sanctioned_neighbor_count: usize,
    /// `(1 / min_distance) * (1 + direct_sanctioned_neighbor_count)`.
    pub risk_score: f64,
}

impl Exposure {
    #[allow(clippy::cast_precision_loss)]
    fn new(min_distance: usize, direct: usize) -> Self {
        Self {
            min_distance,
            direct_sanctioned_neighbor_count: direct,
            risk_score: (1.0 / min_distance as f64) * (1.0 + direct as f64),
        }
    }
}

/// Multi-source BFS distances over `adj`.
fn distances_from(sources: &[usize], adj: &[Vec<usize>]) -> Vec<Option<usize>> {
    let mut dist = vec![None; adj.len()];
    let mut queue = VecDeque::with_capacity(sources.len());
    for &s in sources {
        dist[s] = Some(0);
        queue.push_back(s);
    }
    while let Some(v) = queue.pop_front() {
        let next = dist[v].map_or(0, |d| d + 1);
        for &w in &adj[v] {
            if dist[w].is_none() {
                dist[w] = Some(next);
                queue.push_back(w);
            }
        }
    }
    dist
}

impl IdentityGraph {
    /// Exposure of every unsanctioned node that can reach, or be reached
    /// from, a sanctioned node.
    ///
    /// Distances are measured both along edge direction (sanctioned to node)
    /// and against it (node to sanctioned); the smaller one counts. Nodes with
    /// no such path are omitted, so a graph without sanctioned nodes yields an
    /// empty map.
    #[must_use]
    pub fn sanctions_exposure(&self) -> BTreeMap<String, Exposure> {
        let graph = self.inner();
        let sanctioned: Vec<usize> = graph
            .node_indices()
            .filter(|idx| graph[*idx].is_sanctioned)
            .map(|idx| idx.index())
            .collect();
        if sanctioned.is_empty() {
            debug!("no sanctioned nodes; exposure is empty");
            return BTreeMap::new();
        }

        let outgoing = adjacency(graph, Direction::Outgoing);
        let incoming = adjacency(graph, Direction::Incoming);
        let downstream = distances_from(&sanctioned, &outgoing);
        let upstream = distances_from(&sanctioned, &incoming);

        let mut exposure = BTreeMap::new();
        for idx in graph.node_indices() {
            let node = &graph[idx];
            if node.is_sanctioned {
                continue;
            }
            let i = idx.index();
            let min_distance = match (downstream[i], upstream[i]) {
                (Some(a), Some(b)) => a.min(b),
                (Some(d), None) | (None, Some(d)) => d,
                (None, None) => continue,
            };

            let mut direct: Vec<usize> = outgoing[i]
                .iter()
                .chain(&incoming[i])
                .copied()
                .filter(|j| graph[NodeIndex::new(*j)].is_sanctioned)
                .collect();
            direct.sort_unstable();
            direct.dedup();

            exposure.insert(node.entity_id.clone(), Exposure::new(min_distance, direct.len()));
        }

        debug!(
            sanctioned = sanctioned.len(),
            exposed = exposure.len(),
            "exposure scoring complete"
        );
        exposure
    }
}
