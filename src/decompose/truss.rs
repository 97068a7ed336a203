//! Support-weighted k-truss extraction

use std::collections::HashMap;

use itertools::Itertools;
use petgraph::stable_graph::NodeIndex;
use petgraph::EdgeType;

use crate::graph::{Network, NodeId, UndirectedNetwork};

/// Weighted k-truss of a network.
///
/// The support of an edge {u, v} is the number of apex nodes c adjacent to
/// both endpoints whose wedge passes the admissibility test
/// weight(c, u) + weight(c, v) <= w. Edges with support >= k - 2 are
/// retained. The result is an undirected network carrying the original
/// weight attribute; nodes left without a retained edge are dropped.
/// Self-loops close no triangle and are ignored.
pub fn weighted_k_truss<N: NodeId, Ty: EdgeType>(
    network: &Network<N, Ty>,
    k: usize,
    w: f64,
    weight: Option<&str>,
) -> UndirectedNetwork<N> {
    let pair = |a: NodeIndex, b: NodeIndex| if a <= b { (a, b) } else { (b, a) };

    // one support slot per unordered endpoint pair with at least one edge
    let mut support: HashMap<(NodeIndex, NodeIndex), usize> = HashMap::new();
    let mut pair_order: Vec<(NodeIndex, NodeIndex)> = Vec::new();
    for (s, t, _) in network.edge_index_triples() {
        if s == t {
            continue;
        }
        let key = pair(s, t);
        if !support.contains_key(&key) {
            support.insert(key, 0);
            pair_order.push(key);
        }
    }

    // count admissible wedges closed at each apex node
    for apex in network.node_indices() {
        let mut adjacent: Vec<NodeIndex> = network
            .all_neighbors_at(apex)
            .into_iter()
            .filter(|&other| other != apex)
            .collect();
        adjacent.sort_unstable();
        adjacent.dedup();

        for (u, v) in adjacent.iter().copied().tuple_combinations() {
            let Some(count) = support.get_mut(&pair(u, v)) else {
                continue;
            };
            let wedge_u = network.edge_value_at(apex, u, weight).unwrap_or(1.0);
            let wedge_v = network.edge_value_at(apex, v, weight).unwrap_or(1.0);
            if wedge_u + wedge_v <= w {
                *count += 1;
            }
        }
    }

    let min_support = k.saturating_sub(2);
    let mut truss = UndirectedNetwork::new();
    for key in pair_order {
        if support[&key] < min_support {
            continue;
        }
        let (a, b) = key;
        let value = network.edge_value_at(a, b, weight).unwrap_or(1.0);
        truss.add_weighted_edge(
            network.node_id(a).clone(),
            network.node_id(b).clone(),
            weight.unwrap_or("weight"),
            value,
        );
    }
    log::debug!(
        "k-truss retained {} of {} edges (k={}, w={})",
        truss.edge_count(),
        network.edge_count(),
        k,
        w
    );
    truss
}
