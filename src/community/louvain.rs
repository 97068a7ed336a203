//! Louvain modularity optimization
//!
//! Multi-level greedy modularity optimization (Blondel et al. 2008):
//! local node moves until no gain, then aggregation of communities into a
//! meta-graph, repeated while modularity keeps improving by more than the
//! merge threshold. Edges are treated as undirected; reciprocal directed
//! pairs and parallel edges have their weights summed. Node order is the
//! deterministic insertion order, so repeated runs agree.

use std::collections::HashMap;

use petgraph::EdgeType;

use crate::graph::network::attr_value;
use crate::graph::{Network, NodeId};

/// Louvain partition of the network. `resolution` is the gamma scaling of
/// the null model; `threshold` is the minimum modularity gain required to
/// keep aggregating.
pub fn louvain_communities<N: NodeId, Ty: EdgeType>(
    network: &Network<N, Ty>,
    weight: Option<&str>,
    resolution: f64,
    threshold: f64,
) -> HashMap<N, usize> {
    let order: Vec<_> = network.node_indices().collect();
    let n = order.len();
    if n == 0 {
        return HashMap::new();
    }
    let position: HashMap<_, usize> = order
        .iter()
        .enumerate()
        .map(|(pos, &ix)| (ix, pos))
        .collect();

    // undirected weighted edge list, parallel and reciprocal edges summed
    let mut edge_weights: HashMap<(usize, usize), f64> = HashMap::new();
    let mut self_loops = vec![0.0; n];
    for (s, t, attrs) in network.edge_index_triples() {
        let w = attr_value(attrs, weight);
        let (a, b) = (position[&s], position[&t]);
        if a == b {
            self_loops[a] += w;
        } else {
            let key = if a < b { (a, b) } else { (b, a) };
            *edge_weights.entry(key).or_insert(0.0) += w;
        }
    }
    let mut edges: Vec<(usize, usize, f64)> = edge_weights
        .into_iter()
        .map(|((a, b), w)| (a, b, w))
        .collect();
    edges.sort_by(|x, y| (x.0, x.1).cmp(&(y.0, y.1)));

    let mut current_n = n;
    let mut current_edges = edges;
    let mut current_self_loops = self_loops;
    let mut mapping_stack: Vec<Vec<Vec<usize>>> = Vec::new();
    let mut prev_modularity = f64::NEG_INFINITY;

    loop {
        let (partition, improved) = local_moving(
            current_n,
            &current_edges,
            &current_self_loops,
            resolution,
        );
        if !improved {
            break;
        }

        let now = modularity_weighted(
            current_n,
            &current_edges,
            &current_self_loops,
            &partition,
            resolution,
        );
        if now - prev_modularity < threshold {
            break;
        }
        prev_modularity = now;
        log::debug!(
            "louvain level: {} meta-nodes, modularity {:.6}",
            current_n,
            now
        );

        let (new_edges, new_self_loops, node_mapping) =
            aggregate(&current_edges, &current_self_loops, &partition);
        if node_mapping.len() == current_n {
            break;
        }

        mapping_stack.push(node_mapping.clone());
        current_n = node_mapping.len();
        current_edges = new_edges;
        current_self_loops = new_self_loops;
    }

    // expand the meta-partition back down to the original nodes
    let mut result: Vec<usize> = (0..current_n).collect();
    while let Some(mapping) = mapping_stack.pop() {
        result = expand_partition(&result, &mapping);
    }

    // contiguous ids in first-appearance order
    let mut relabel: HashMap<usize, usize> = HashMap::new();
    let mut labels = HashMap::with_capacity(n);
    for (pos, &ix) in order.iter().enumerate() {
        let next = relabel.len();
        let id = *relabel.entry(result[pos]).or_insert(next);
        labels.insert(network.node_id(ix).clone(), id);
    }
    labels
}

/// Phase 1: greedy local moves. Returns (communities, improved).
fn local_moving(
    n: usize,
    edges: &[(usize, usize, f64)],
    self_loops: &[f64],
    resolution: f64,
) -> (Vec<usize>, bool) {
    const MAX_SWEEPS: usize = 100;

    let mut adjacency: Vec<HashMap<usize, f64>> = vec![HashMap::new(); n];
    for &(i, j, w) in edges {
        *adjacency[i].entry(j).or_insert(0.0) += w;
        *adjacency[j].entry(i).or_insert(0.0) += w;
    }

    let m: f64 = edges.iter().map(|(_, _, w)| w).sum::<f64>() + self_loops.iter().sum::<f64>();
    if m == 0.0 {
        return ((0..n).collect(), false);
    }

    let mut degrees = vec![0.0; n];
    for &(i, j, w) in edges {
        degrees[i] += w;
        degrees[j] += w;
    }
    for (i, &sl) in self_loops.iter().enumerate() {
        degrees[i] += 2.0 * sl;
    }

    let mut communities: Vec<usize> = (0..n).collect();
    let mut community_degrees = degrees.clone();
    let mut any_improved = false;

    for _ in 0..MAX_SWEEPS {
        let mut improved = false;

        for node in 0..n {
            let current = communities[node];
            let ki = degrees[node];
            community_degrees[current] -= ki;

            // weight toward each neighboring community, deterministic order
            let mut neighbor_weights: Vec<(usize, f64)> = Vec::new();
            let mut slot: HashMap<usize, usize> = HashMap::new();
            let mut neighbors: Vec<(&usize, &f64)> = adjacency[node].iter().collect();
            neighbors.sort_by_key(|(&neighbor, _)| neighbor);
            for (&neighbor, &w) in neighbors {
                let community = communities[neighbor];
                match slot.get(&community) {
                    Some(&at) => neighbor_weights[at].1 += w,
                    None => {
                        slot.insert(community, neighbor_weights.len());
                        neighbor_weights.push((community, w));
                    }
                }
            }

            let mut best_community = current;
            let mut best_gain = 0.0;
            for &(target, ki_in) in &neighbor_weights {
                let sigma_tot = community_degrees[target];
                let gain = ki_in / m - resolution * sigma_tot * ki / (2.0 * m * m);
                if gain > best_gain {
                    best_gain = gain;
                    best_community = target;
                }
            }

            if best_community != current {
                communities[node] = best_community;
                community_degrees[best_community] += ki;
                improved = true;
                any_improved = true;
            } else {
                community_degrees[current] += ki;
            }
        }

        if !improved {
            break;
        }
    }

    (communities, any_improved)
}

/// Modularity of a partition of the working (undirected) edge list:
/// sum over communities of L_c / m - gamma * (D_c / 2m)^2
fn modularity_weighted(
    n: usize,
    edges: &[(usize, usize, f64)],
    self_loops: &[f64],
    communities: &[usize],
    resolution: f64,
) -> f64 {
    let m: f64 = edges.iter().map(|(_, _, w)| w).sum::<f64>() + self_loops.iter().sum::<f64>();
    if m == 0.0 {
        return 0.0;
    }

    let mut degrees = vec![0.0; n];
    for &(i, j, w) in edges {
        degrees[i] += w;
        degrees[j] += w;
    }
    for (i, &sl) in self_loops.iter().enumerate() {
        degrees[i] += 2.0 * sl;
    }

    let mut internal: HashMap<usize, f64> = HashMap::new();
    let mut community_degrees: HashMap<usize, f64> = HashMap::new();
    for &(i, j, w) in edges {
        if communities[i] == communities[j] {
            *internal.entry(communities[i]).or_insert(0.0) += w;
        }
    }
    for (i, &sl) in self_loops.iter().enumerate() {
        *internal.entry(communities[i]).or_insert(0.0) += sl;
    }
    for node in 0..n {
        *community_degrees.entry(communities[node]).or_insert(0.0) += degrees[node];
    }

    community_degrees
        .iter()
        .map(|(community, &dc)| {
            let lc = internal.get(community).copied().unwrap_or(0.0);
            lc / m - resolution * (dc / (2.0 * m)).powi(2)
        })
        .sum()
}

/// Phase 2: collapse communities into meta-nodes.
/// Returns (new edges, new self-loops, meta-node to original mapping).
fn aggregate(
    edges: &[(usize, usize, f64)],
    self_loops: &[f64],
    communities: &[usize],
) -> (Vec<(usize, usize, f64)>, Vec<f64>, Vec<Vec<usize>>) {
    let mut unique: Vec<usize> = communities.to_vec();
    unique.sort_unstable();
    unique.dedup();
    let renumber: HashMap<usize, usize> = unique
        .iter()
        .enumerate()
        .map(|(new, &old)| (old, new))
        .collect();
    let n_new = unique.len();

    let mut new_to_old: Vec<Vec<usize>> = vec![Vec::new(); n_new];
    for (node, &community) in communities.iter().enumerate() {
        new_to_old[renumber[&community]].push(node);
    }

    let mut new_edge_weights: HashMap<(usize, usize), f64> = HashMap::new();
    let mut new_self_loops = vec![0.0; n_new];
    for &(i, j, w) in edges {
        let ci = renumber[&communities[i]];
        let cj = renumber[&communities[j]];
        if ci == cj {
            new_self_loops[ci] += w;
        } else {
            let key = if ci < cj { (ci, cj) } else { (cj, ci) };
            *new_edge_weights.entry(key).or_insert(0.0) += w;
        }
    }
    for (i, &sl) in self_loops.iter().enumerate() {
        new_self_loops[renumber[&communities[i]]] += sl;
    }

    let mut new_edges: Vec<(usize, usize, f64)> = new_edge_weights
        .into_iter()
        .map(|((i, j), w)| (i, j, w))
        .collect();
    new_edges.sort_by(|x, y| (x.0, x.1).cmp(&(y.0, y.1)));

    (new_edges, new_self_loops, new_to_old)
}

/// Expand a partition of the aggregated level down one level
fn expand_partition(partition: &[usize], mapping: &[Vec<usize>]) -> Vec<usize> {
    let original = mapping.iter().flatten().copied().max().unwrap_or(0);
    let mut result = vec![0; original + 1];
    for (meta, members) in mapping.iter().enumerate() {
        for &node in members {
            result[node] = partition[meta];
        }
    }
    result
}
