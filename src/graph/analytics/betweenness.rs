//! Bridge detection by betweenness centrality (Brandes).

use std::collections::VecDeque;

use petgraph::Direction;
use serde::{Deserialize, Serialize};

use crate::graph::analytics::{adjacency, rank_desc};
use crate::graph::IdentityGraph;

/// Betweenness of one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeScore {
    /// Node key.
    pub entity_id: String,
    /// Fraction of shortest paths between other pairs that pass through the node.
    pub betweenness: f64,
}

impl IdentityGraph {
    /// Normalized betweenness of every node, indexed by handle.
    ///
    /// Shortest paths follow edge direction over distinct successors, so
    /// parallel edges do not multiply path counts. Scores are scaled by
    /// `1 / ((n - 1)(n - 2))` when `n > 2`. Runs in `O(V * E)`.
    #[must_use]
    pub fn betweenness_centrality(&self) -> Vec<f64> {
        let graph = self.inner();
        let n = graph.node_count();
        let adj = adjacency(graph, Direction::Outgoing);
        let mut centrality = vec![0.0_f64; n];

        let mut order: Vec<usize> = Vec::with_capacity(n);
        let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut sigma = vec![0.0_f64; n];
        let mut dist: Vec<Option<usize>> = vec![None; n];
        let mut delta = vec![0.0_f64; n];
        let mut queue = VecDeque::new();

        for s in 0..n {
            order.clear();
            for p in &mut preds {
                p.clear();
            }
            sigma.fill(0.0);
            dist.fill(None);
            delta.fill(0.0);

            sigma[s] = 1.0;
            dist[s] = Some(0);
            queue.push_back(s);

            while let Some(v) = queue.pop_front() {
                order.push(v);
                let dv = dist[v].unwrap_or_default();
                for &w in &adj[v] {
                    if dist[w].is_none() {
                        dist[w] = Some(dv + 1);
                        queue.push_back(w);
                    }
                    if dist[w] == Some(dv + 1) {
                        sigma[w] += sigma[v];
                        preds[w].push(v);
                    }
                }
            }

            while let Some(w) = order.pop() {
                for &v in &preds[w] {
                    delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
                }
                if w != s {
                    centrality[w] += delta[w];
                }
            }
        }

        if n > 2 {
            #[allow(clippy::cast_precision_loss)]
            let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
            for c in &mut centrality {
                *c *= scale;
            }
        }
        centrality
    }

    /// The `top_n` nodes by betweenness, ties broken by `entity_id` ascending.
    #[must_use]
    pub fn bridges(&self, top_n: usize) -> Vec<BridgeScore> {
        if top_n == 0 || self.is_empty() {
            return Vec::new();
        }
        let graph = self.inner();
        let mut scores: Vec<BridgeScore> = self
            .betweenness_centrality()
            .into_iter()
            .zip(graph.node_weights())
            .map(|(betweenness, node)| BridgeScore {
                entity_id: node.entity_id.clone(),
                betweenness,
            })
            .collect();
        scores.sort_by(|a, b| {
            rank_desc(
                (a.betweenness, a.entity_id.as_str()),
                (b.betweenness, b.entity_id.as_str()),
            )
        });
        scores.truncate(top_n);
        scores
    }
}
