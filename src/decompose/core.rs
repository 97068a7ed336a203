//! Core-number computation and k-core extraction
//!
//! The unweighted decomposition is the linear-time bucket peeling of
//! Batagelj and Zaversnik ("An O(m) Algorithm for Cores Decomposition of
//! Networks", 2003). The weighted variant peels by repeatedly fixing the
//! smallest-degree node and re-sorting, which is quadratic but exact and
//! fine for the zone-sized networks this crate targets.

use std::collections::HashMap;

use petgraph::stable_graph::NodeIndex;
use petgraph::EdgeType;

use crate::error::{AnalyzerError, Result};
use crate::graph::network::attr_value;
use crate::graph::{Network, NodeId};

fn ensure_simple<N: NodeId, Ty: EdgeType>(network: &Network<N, Ty>) -> Result<()> {
    let loops = network.self_loop_count();
    if loops > 0 {
        return Err(AnalyzerError::InvalidGraph(format!(
            "{loops} self-loop(s) present; core numbers require a simple graph"
        )));
    }
    if network.has_parallel_edges() {
        return Err(AnalyzerError::InvalidGraph(
            "parallel edges present; core numbers require a simple graph".to_string(),
        ));
    }
    Ok(())
}

/// Core number of every node.
///
/// A k-core is a maximal subgraph whose nodes all have degree >= k within
/// it; the core number of a node is the largest k of a k-core containing
/// it. For directed networks the degree is in-degree + out-degree.
///
/// Fails with [`AnalyzerError::InvalidGraph`] on self-loops or parallel
/// edges, before any computation.
pub fn core_number<N: NodeId, Ty: EdgeType>(network: &Network<N, Ty>) -> Result<HashMap<N, usize>> {
    ensure_simple(network)?;

    let index_order: Vec<NodeIndex> = network.node_indices().collect();
    let n = index_order.len();
    let local: HashMap<NodeIndex, usize> = index_order
        .iter()
        .enumerate()
        .map(|(pos, &ix)| (ix, pos))
        .collect();
    let degrees: Vec<usize> = index_order
        .iter()
        .map(|&ix| network.degree_at(ix, None) as usize)
        .collect();

    // Nodes in non-decreasing degree order
    let mut nodes: Vec<usize> = (0..n).collect();
    nodes.sort_by_key(|&v| degrees[v]);

    // bin_boundaries[d] = first position of a node with degree >= d
    let mut bin_boundaries = vec![0usize];
    let mut current_degree = 0;
    for (pos, &v) in nodes.iter().enumerate() {
        if degrees[v] > current_degree {
            for _ in 0..(degrees[v] - current_degree) {
                bin_boundaries.push(pos);
            }
            current_degree = degrees[v];
        }
    }

    let mut node_pos = vec![0usize; n];
    for (pos, &v) in nodes.iter().enumerate() {
        node_pos[v] = pos;
    }

    // The initial guess for the core number of a node is its degree
    let mut core = degrees;
    let mut neighbors: Vec<Vec<usize>> = index_order
        .iter()
        .map(|&ix| {
            network
                .all_neighbors_at(ix)
                .into_iter()
                .map(|jx| local[&jx])
                .collect()
        })
        .collect();

    for i in 0..n {
        let v = nodes[i];
        for u in neighbors[v].clone() {
            if core[u] > core[v] {
                // drop one occurrence of v from u's list and move u one bin down
                if let Some(p) = neighbors[u].iter().position(|&x| x == v) {
                    neighbors[u].swap_remove(p);
                }
                let pos = node_pos[u];
                let bin_start = bin_boundaries[core[u]];
                node_pos[u] = bin_start;
                node_pos[nodes[bin_start]] = pos;
                nodes.swap(bin_start, pos);
                bin_boundaries[core[u]] += 1;
                core[u] -= 1;
            }
        }
    }

    Ok((0..n)
        .map(|v| (network.node_id(index_order[v]).clone(), core[v]))
        .collect())
}

/// Weighted core number of every node.
///
/// Initialized from the weighted degree; each peeling round fixes the
/// smallest-degree node at its current degree, then reduces every
/// neighbor's degree by the connecting edge's weight, floored at the fixed
/// value, and stably re-sorts the remaining nodes (equal degrees keep
/// their relative order).
pub fn core_number_weighted<N: NodeId, Ty: EdgeType>(
    network: &Network<N, Ty>,
    weight: &str,
) -> Result<HashMap<N, f64>> {
    ensure_simple(network)?;

    let index_order: Vec<NodeIndex> = network.node_indices().collect();
    let n = index_order.len();
    let local: HashMap<NodeIndex, usize> = index_order
        .iter()
        .enumerate()
        .map(|(pos, &ix)| (ix, pos))
        .collect();

    let mut degrees: Vec<f64> = index_order
        .iter()
        .map(|&ix| network.degree_at(ix, Some(weight)))
        .collect();

    let mut nodes: Vec<usize> = (0..n).collect();
    nodes.sort_by(|&a, &b| degrees[a].total_cmp(&degrees[b]));

    let mut cores = vec![0.0f64; n];
    for i in 0..n {
        let u = nodes[i];
        cores[u] = degrees[u];
        for (other, attrs) in network.incident_edges_at(index_order[u]) {
            let w = local[&other];
            if cores[u] < degrees[w] {
                degrees[w] = (degrees[w] - attr_value(attrs, Some(weight))).max(cores[u]);
            }
        }
        nodes[i + 1..].sort_by(|&a, &b| degrees[a].total_cmp(&degrees[b]));
    }

    Ok((0..n)
        .map(|v| (network.node_id(index_order[v]).clone(), cores[v]))
        .collect())
}

/// K-core subgraph: the subgraph induced by nodes with core number >= k.
///
/// `k` defaults to the arithmetic mean of all core numbers. `core` may
/// carry precomputed core numbers for the network; otherwise they are
/// computed here, weighted iff `weight` names an edge attribute. Node and
/// edge attributes are copied to the subgraph; the input is untouched.
pub fn k_core<N: NodeId, Ty: EdgeType>(
    network: &Network<N, Ty>,
    k: Option<f64>,
    core: Option<&HashMap<N, f64>>,
    weight: Option<&str>,
) -> Result<Network<N, Ty>> {
    let computed;
    let core = match core {
        Some(existing) => existing,
        None => {
            computed = match weight {
                Some(attr) => core_number_weighted(network, attr)?,
                None => core_number(network)?
                    .into_iter()
                    .map(|(node, value)| (node, value as f64))
                    .collect(),
            };
            &computed
        }
    };
    if core.is_empty() {
        return Ok(Network::new());
    }

    let threshold = match k {
        Some(value) => value,
        None => core.values().sum::<f64>() / core.len() as f64,
    };
    log::debug!(
        "extracting {}-core from {} nodes",
        threshold,
        network.node_count()
    );

    let keep: Vec<&N> = network
        .nodes()
        .filter(|node| core.get(*node).copied().unwrap_or(0.0) >= threshold)
        .collect();
    Ok(network.subgraph(keep))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{DirectedNetwork, UndirectedNetwork};

    fn clique_with_tail() -> UndirectedNetwork<u32> {
        // triangle 1-2-3 plus a pendant node 4 hanging off 1
        let mut net = UndirectedNetwork::new();
        net.add_weighted_edge(1, 2, "weight", 1.0);
        net.add_weighted_edge(2, 3, "weight", 1.0);
        net.add_weighted_edge(3, 1, "weight", 1.0);
        net.add_weighted_edge(1, 4, "weight", 1.0);
        net
    }

    #[test]
    fn triangle_with_pendant_cores() {
        let cores = core_number(&clique_with_tail()).unwrap();
        assert_eq!(cores[&1], 2);
        assert_eq!(cores[&2], 2);
        assert_eq!(cores[&3], 2);
        assert_eq!(cores[&4], 1);
    }

    #[test]
    fn directed_cores_use_total_degree() {
        let mut net = DirectedNetwork::new();
        net.add_weighted_edge("a", "b", "weight", 1.0);
        net.add_weighted_edge("b", "c", "weight", 1.0);
        net.add_weighted_edge("c", "a", "weight", 1.0);

        let cores = core_number(&net).unwrap();
        assert!(cores.values().all(|&c| c == 2));
    }

    #[test]
    fn self_loop_is_rejected() {
        let mut net = UndirectedNetwork::new();
        net.add_weighted_edge(1, 2, "weight", 1.0);
        net.add_weighted_edge(2, 2, "weight", 1.0);

        assert!(matches!(
            core_number(&net),
            Err(AnalyzerError::InvalidGraph(_))
        ));
        assert!(matches!(
            core_number_weighted(&net, "weight"),
            Err(AnalyzerError::InvalidGraph(_))
        ));
    }

    #[test]
    fn weighted_triangle_cores_equal_two() {
        let mut net = UndirectedNetwork::new();
        net.add_weighted_edge(1, 2, "weight", 1.0);
        net.add_weighted_edge(2, 3, "weight", 1.0);
        net.add_weighted_edge(3, 1, "weight", 1.0);

        let cores = core_number_weighted(&net, "weight").unwrap();
        for value in cores.values() {
            assert!((value - 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn k_core_defaults_to_mean_core_number() {
        // mean core of the tailed triangle is 1.75, so only the triangle stays
        let net = clique_with_tail();
        let main = k_core(&net, None, None, None).unwrap();
        assert_eq!(main.node_count(), 3);
        assert!(!main.contains_node(&4));
    }

    #[test]
    fn k_core_respects_precomputed_cores() {
        let net = clique_with_tail();
        let fake: HashMap<u32, f64> =
            [(1, 5.0), (2, 0.0), (3, 5.0), (4, 0.0)].into_iter().collect();
        let sub = k_core(&net, Some(4.0), Some(&fake), None).unwrap();
        assert_eq!(sub.node_count(), 2);
        assert!(sub.contains_node(&1) && sub.contains_node(&3));
    }
}
