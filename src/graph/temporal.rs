//! Hour-of-day network families and the undirected conversion

use std::collections::BTreeMap;
use std::collections::HashMap;

use crate::graph::network::{attr_value, DirectedNetwork, NodeId, UndirectedNetwork};

/// One directed network per hour of day (0-23)
pub type HourlyNetworks<N> = BTreeMap<u8, DirectedNetwork<N>>;

/// Convert a directed network to an undirected one, averaging the named
/// attribute over the directed edges present between each endpoint pair
/// (sum divided by the number of directed edges, 1 or 2).
///
/// Every node is preserved, including isolated ones.
pub fn to_undirected_mean<N: NodeId>(
    network: &DirectedNetwork<N>,
    attr: &str,
) -> UndirectedNetwork<N> {
    let mut undirected = UndirectedNetwork::new();
    for node in network.nodes() {
        undirected.add_node(node.clone());
    }

    // accumulate (sum, directed edge count) per unordered endpoint pair
    let mut sums: HashMap<(N, N), (f64, usize)> = HashMap::new();
    let mut pair_order: Vec<(N, N)> = Vec::new();
    for (u, v, attrs) in network.edges() {
        let key = if u <= v {
            (u.clone(), v.clone())
        } else {
            (v.clone(), u.clone())
        };
        let value = attr_value(attrs, Some(attr));
        match sums.get_mut(&key) {
            Some(entry) => {
                entry.0 += value;
                entry.1 += 1;
            }
            None => {
                pair_order.push(key.clone());
                sums.insert(key, (value, 1));
            }
        }
    }

    for key in pair_order {
        let (sum, count) = sums[&key];
        let (u, v) = key;
        undirected.add_weighted_edge(u, v, attr, sum / count as f64);
    }
    undirected
}
