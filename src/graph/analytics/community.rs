//! Community detection by deterministic Louvain modularity optimization.
//!
//! The directed multigraph is projected onto a simple undirected graph with
//! unit weights (parallel and opposite edges collapse, self loops are
//! dropped). Nodes are visited in a permutation derived from a caller-supplied
//! seed, so identical input and seed always give identical communities.

use std::collections::BTreeMap;

use blake3::Hasher;
use tracing::debug;

use crate::graph::IdentityGraph;

/// Modularity resolution used by [`IdentityGraph::communities`].
pub const DEFAULT_RESOLUTION: f64 = 1.0;

const MIN_GAIN: f64 = 1e-12;

/// Weighted undirected graph for one Louvain level.
#[derive(Debug, Clone)]
struct Level {
    /// Neighbour lists, excluding self.
    adj: Vec<Vec<(usize, f64)>>,
    /// Self-loop weight per node.
    loops: Vec<f64>,
}

impl Level {
    fn len(&self) -> usize {
        self.adj.len()
    }

    fn degree(&self, i: usize) -> f64 {
        self.adj[i].iter().map(|(_, w)| w).sum::<f64>() + 2.0 * self.loops[i]
    }

    fn total_weight(&self) -> f64 {
        (0..self.len()).map(|i| self.degree(i)).sum::<f64>() / 2.0
    }

    /// Collapses each community into one node.
    fn aggregate(&self, membership: &[usize], count: usize) -> Self {
        let mut weights: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); count];
        let mut loops = vec![0.0; count];

        for (i, neighbours) in self.adj.iter().enumerate() {
            let ci = membership[i];
            loops[ci] += self.loops[i];
            for &(j, w) in neighbours {
                let cj = membership[j];
                if ci == cj {
                    // Each internal edge is seen from both ends.
                    loops[ci] += w / 2.0;
                } else {
                    *weights[ci].entry(cj).or_default() += w;
                }
            }
        }

        Self {
            adj: weights.into_iter().map(|m| m.into_iter().collect()).collect(),
            loops,
        }
    }
}

fn visit_key(seed: u64, key: &[u8]) -> u64 {
    let mut hasher = Hasher::new();
    hasher.update(&seed.to_le_bytes());
    hasher.update(key);
    let hash = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

/// Local-moving phase. Returns per-node community and whether any node moved.
fn local_moves(level: &Level, order: &[usize], resolution: f64) -> (Vec<usize>, bool) {
    let n = level.len();
    let m2 = 2.0 * level.total_weight();
    let mut community: Vec<usize> = (0..n).collect();
    if m2 <= 0.0 {
        return (community, false);
    }

    let degree: Vec<f64> = (0..n).map(|i| level.degree(i)).collect();
    let mut total: Vec<f64> = degree.clone();
    let mut any_move = false;

    // Scratch: weight from the current node to each community.
    let mut links = vec![0.0_f64; n];
    let mut touched: Vec<usize> = Vec::new();

    loop {
        let mut moved = false;
        for &i in order {
            let current = community[i];
            let k_i = degree[i];

            for &(j, w) in &level.adj[i] {
                let c = community[j];
                if !touched.contains(&c) {
                    touched.push(c);
                }
                links[c] += w;
            }

            total[current] -= k_i;
            let gain = |c: usize, links: &[f64]| links[c] - resolution * total[c] * k_i / m2;

            let mut best = current;
            let mut best_gain = gain(current, &links);
            for &c in &touched {
                let g = gain(c, &links);
                if g > best_gain + MIN_GAIN {
                    best = c;
                    best_gain = g;
                }
            }

            total[best] += k_i;
            if best != current {
                community[i] = best;
                moved = true;
                any_move = true;
            }

            for c in touched.drain(..) {
                links[c] = 0.0;
            }
        }
        if !moved {
            break;
        }
    }

    (community, any_move)
}

/// Renumbers community labels densely, in order of lowest member index.
fn compact(labels: &[usize]) -> (Vec<usize>, usize) {
    let mut remap: BTreeMap<usize, usize> = BTreeMap::new();
    let compacted = labels
        .iter()
        .map(|label| {
            let next = remap.len();
            *remap.entry(*label).or_insert(next)
        })
        .collect();
    (compacted, remap.len())
}

impl IdentityGraph {
    /// Partitions nodes into communities with [`DEFAULT_RESOLUTION`].
    ///
    /// Community ids are dense integers numbered by the first-inserted member
    /// of each community. Isolated nodes form their own communities.
    #[must_use]
    pub fn communities(&self, seed: u64) -> BTreeMap<String, usize> {
        self.communities_with_resolution(seed, DEFAULT_RESOLUTION)
    }

    /// Louvain partition at a custom modularity resolution.
    #[must_use]
    pub fn communities_with_resolution(&self, seed: u64, resolution: f64) -> BTreeMap<String, usize> {
        let graph = self.inner();
        let n = graph.node_count();
        if n == 0 {
            return BTreeMap::new();
        }

        let mut level = self.undirected_projection();

        let mut order: Vec<usize> = (0..n).collect();
        let keys: Vec<u64> = graph
            .node_weights()
            .map(|node| visit_key(seed, node.entity_id.as_bytes()))
            .collect();
        order.sort_by_key(|&i| (keys[i], i));

        // Community of every original node.
        let mut membership: Vec<usize> = (0..n).collect();
        let mut depth = 0usize;

        loop {
            let (labels, moved) = local_moves(&level, &order, resolution);
            if !moved {
                break;
            }
            let (labels, count) = compact(&labels);
            for m in &mut membership {
                *m = labels[*m];
            }
            level = level.aggregate(&labels, count);
            order = (0..count).collect();
            depth += 1;
        }

        let (membership, count) = compact(&membership);
        debug!(nodes = n, communities = count, levels = depth, "community detection complete");

        graph
            .node_weights()
            .zip(membership)
            .map(|(node, c)| (node.entity_id.clone(), c))
            .collect()
    }

    /// Modularity of a partition on the undirected projection.
    ///
    /// Nodes missing from `partition` are treated as singletons. Returns 0 for
    /// graphs without edges.
    #[must_use]
    pub fn modularity(&self, partition: &BTreeMap<String, usize>) -> f64 {
        let level = self.undirected_projection();
        let m = level.total_weight();
        if m <= 0.0 {
            return 0.0;
        }

        // Nodes outside the partition get a label of their own.
        let labels: Vec<(bool, usize)> = self
            .inner()
            .node_weights()
            .enumerate()
            .map(|(i, node)| partition.get(&node.entity_id).map_or((false, i), |c| (true, *c)))
            .collect();

        let mut internal = 0.0;
        let mut totals: BTreeMap<(bool, usize), f64> = BTreeMap::new();
        for i in 0..level.len() {
            internal += level.adj[i]
                .iter()
                .filter(|(j, _)| labels[*j] == labels[i])
                .map(|(_, w)| w)
                .sum::<f64>();
            *totals.entry(labels[i]).or_default() += level.degree(i);
        }
        let m2 = 2.0 * m;
        internal / m2 - totals.values().map(|t| t * t).sum::<f64>() / (m2 * m2)
    }

    fn undirected_projection(&self) -> Level {
        let graph = self.inner();
        let n = graph.node_count();
        let mut neighbours: Vec<Vec<usize>> = vec![Vec::new(); n];
        for edge in graph.raw_edges() {
            let (a, b) = (edge.source().index(), edge.target().index());
            if a != b {
                neighbours[a].push(b);
                neighbours[b].push(a);
            }
        }
        let adj = neighbours
            .into_iter()
            .map(|mut list| {
                list.sort_unstable();
                list.dedup();
                list.into_iter().map(|j| (j, 1.0)).collect()
            })
            .collect();
        Level {
            adj,
            loops: vec![0.0; n],
        }
    }
}
