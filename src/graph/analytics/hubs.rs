//! Hub detection by degree centrality.

use petgraph::Direction;
use serde::{Deserialize, Serialize};

use crate::graph::IdentityGraph;

/// Degree metrics of one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubScore {
    /// Node key.
    pub entity_id: String,
    /// `(in_degree + out_degree) / (n - 1)`.
    pub degree_centrality: f64,
    /// Incoming edges, parallel edges included.
    pub in_degree: usize,
    /// Outgoing edges, parallel edges included.
    pub out_degree: usize,
}

impl IdentityGraph {
    /// The `top_n` nodes by degree centrality.
    ///
    /// Parallel edges each count toward the degree. Ties are broken by
    /// `entity_id` ascending.
    #[must_use]
    pub fn hubs(&self, top_n: usize) -> Vec<HubScore> {
        let graph = self.inner();
        let n = graph.node_count();
        if n == 0 || top_n == 0 {
            return Vec::new();
        }

        #[allow(clippy::cast_precision_loss)]
        let scale = if n > 1 { 1.0 / (n - 1) as f64 } else { 0.0 };

        let mut scores: Vec<HubScore> = graph
            .node_indices()
            .map(|idx| {
                let in_degree = graph.edges_directed(idx, Direction::Incoming).count();
                let out_degree = graph.edges_directed(idx, Direction::Outgoing).count();
                #[allow(clippy::cast_precision_loss)]
                let degree_centrality = (in_degree + out_degree) as f64 * scale;
                HubScore {
                    entity_id: graph[idx].entity_id.clone(),
                    degree_centrality,
                    in_degree,
                    out_degree,
                }
            })
            .collect();

        scores.sort_by(|a, b| {
            (b.in_degree + b.out_degree)
                .cmp(&(a.in_degree + a.out_degree))
                .then_with(|| a.entity_id.cmp(&b.entity_id))
        });
        scores.truncate(top_n);
        scores
    }
}
