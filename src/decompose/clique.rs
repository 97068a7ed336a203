//! Maximal-clique enumeration under a weight relaxation

use std::collections::{BTreeSet, HashMap, HashSet};

use petgraph::stable_graph::NodeIndex;
use petgraph::EdgeType;
use statrs::statistics::Statistics;

use crate::graph::{Network, NodeId};

/// Geometric mean of the network's edge weights, the per-round relaxation
/// threshold used by the clique-based community variants. 0 if the network
/// has no edges or the mean is not finite.
pub fn relaxation_threshold<N: NodeId, Ty: EdgeType>(
    network: &Network<N, Ty>,
    weight: Option<&str>,
) -> f64 {
    let weights = network.edge_weights(weight);
    if weights.is_empty() {
        return 0.0;
    }
    let mean = weights.iter().copied().geometric_mean();
    if mean.is_finite() {
        mean
    } else {
        0.0
    }
}

/// Maximal cliques of the undirected view of the network, restricted to
/// edges whose weight is admissible under `max_weight` (inclusive).
/// Bron-Kerbosch with pivoting; self-loops are ignored.
pub fn maximal_cliques<N: NodeId, Ty: EdgeType>(
    network: &Network<N, Ty>,
    max_weight: Option<f64>,
    weight: Option<&str>,
) -> Vec<BTreeSet<N>> {
    let index_order: Vec<NodeIndex> = network.node_indices().collect();
    let n = index_order.len();
    if n == 0 {
        return Vec::new();
    }
    let local: HashMap<NodeIndex, usize> = index_order
        .iter()
        .enumerate()
        .map(|(pos, &ix)| (ix, pos))
        .collect();

    // admissible undirected adjacency
    let mut adjacency: Vec<HashSet<usize>> = vec![HashSet::new(); n];
    for (s, t, attrs) in network.edge_index_triples() {
        if s == t {
            continue;
        }
        if let Some(cap) = max_weight {
            if crate::graph::attr_value(attrs, weight) > cap {
                continue;
            }
        }
        let (a, b) = (local[&s], local[&t]);
        adjacency[a].insert(b);
        adjacency[b].insert(a);
    }

    let mut found: Vec<Vec<usize>> = Vec::new();
    let mut current = Vec::new();
    bron_kerbosch(
        &adjacency,
        &mut current,
        (0..n).collect(),
        BTreeSet::new(),
        &mut found,
    );

    found
        .into_iter()
        .map(|clique| {
            clique
                .into_iter()
                .map(|v| network.node_id(index_order[v]).clone())
                .collect()
        })
        .collect()
}

fn bron_kerbosch(
    adjacency: &[HashSet<usize>],
    current: &mut Vec<usize>,
    mut candidates: BTreeSet<usize>,
    mut excluded: BTreeSet<usize>,
    found: &mut Vec<Vec<usize>>,
) {
    if candidates.is_empty() && excluded.is_empty() {
        found.push(current.clone());
        return;
    }

    // pivot on the node covering the most candidates
    let pivot = candidates
        .iter()
        .chain(excluded.iter())
        .copied()
        .max_by_key(|&u| candidates.iter().filter(|v| adjacency[u].contains(*v)).count())
        .expect("candidates or excluded is non-empty");

    let branch: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|v| !adjacency[pivot].contains(v))
        .collect();
    for v in branch {
        let next_candidates = candidates
            .iter()
            .copied()
            .filter(|u| adjacency[v].contains(u))
            .collect();
        let next_excluded = excluded
            .iter()
            .copied()
            .filter(|u| adjacency[v].contains(u))
            .collect();
        current.push(v);
        bron_kerbosch(adjacency, current, next_candidates, next_excluded, found);
        current.pop();
        candidates.remove(&v);
        excluded.insert(v);
    }
}
