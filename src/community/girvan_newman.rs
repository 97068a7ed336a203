//! Girvan-Newman divisive partitioning

use std::collections::HashMap;

use petgraph::EdgeType;

use crate::centrality::edge_betweenness_centrality;
use crate::community::DisjointSets;
use crate::error::Result;
use crate::graph::{Network, NodeId};

/// Girvan-Newman partition: repeatedly remove the edge of maximum weighted
/// edge betweenness (recomputed after every removal) until the connected
/// component count has increased `k - 1` times or no edges remain, then
/// label the components in discovery order. Components use weak
/// connectivity on directed networks. This returns the partition at that
/// specific cut depth, not the modularity-optimal cut.
pub fn girvan_newman_communities<N: NodeId, Ty: EdgeType>(
    network: &Network<N, Ty>,
    weight: Option<&str>,
    k: usize,
) -> Result<HashMap<N, usize>> {
    let mut working = network.clone();
    let mut component_count = components(&working).len();
    let mut splits_left = k.saturating_sub(1);
    log::debug!(
        "girvan-newman: {} components to start, targeting {} more split(s)",
        component_count,
        splits_left
    );

    while splits_left > 0 && working.edge_count() > 0 {
        let scores = edge_betweenness_centrality(&working, weight);
        // max betweenness; ties break toward the smallest endpoint pair
        let best = scores
            .into_iter()
            .max_by(|(ka, va), (kb, vb)| va.total_cmp(vb).then_with(|| kb.cmp(ka)));
        let Some(((u, v), _)) = best else {
            break;
        };
        working.remove_edge(&u, &v);

        let now = components(&working).len();
        if now > component_count {
            component_count = now;
            splits_left -= 1;
        }
    }

    let mut labels = HashMap::with_capacity(network.node_count());
    for (id, members) in components(&working).into_iter().enumerate() {
        for node in members {
            labels.insert(node, id);
        }
    }
    Ok(labels)
}

/// Connected components (ignoring edge direction), ordered by first node
fn components<N: NodeId, Ty: EdgeType>(network: &Network<N, Ty>) -> Vec<Vec<N>> {
    let order: Vec<_> = network.node_indices().collect();
    let n = order.len();
    let position: HashMap<_, usize> = order
        .iter()
        .enumerate()
        .map(|(pos, &ix)| (ix, pos))
        .collect();

    let mut sets = DisjointSets::new(n);
    for (s, t, _) in network.edge_index_triples() {
        sets.union(position[&s], position[&t]);
    }

    let mut grouped: HashMap<usize, Vec<N>> = HashMap::new();
    let mut roots: Vec<usize> = Vec::new();
    for (pos, &ix) in order.iter().enumerate() {
        let root = sets.find(pos);
        if !grouped.contains_key(&root) {
            roots.push(root);
            grouped.insert(root, Vec::new());
        }
        grouped
            .get_mut(&root)
            .expect("group was just inserted")
            .push(network.node_id(ix).clone());
    }
    roots
        .into_iter()
        .map(|root| grouped.remove(&root).unwrap_or_default())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::UndirectedNetwork;

    #[test]
    fn bridge_is_cut_first() {
        // two triangles joined by the bridge 2-3
        let mut net = UndirectedNetwork::new();
        for (u, v) in [(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3), (2, 3)] {
            net.add_weighted_edge(u, v, "weight", 1.0);
        }

        let labels = girvan_newman_communities(&net, Some("weight"), 2).unwrap();
        assert_eq!(labels.len(), 6);
        assert_eq!(labels[&0], labels[&1]);
        assert_eq!(labels[&0], labels[&2]);
        assert_eq!(labels[&3], labels[&4]);
        assert_eq!(labels[&3], labels[&5]);
        assert_ne!(labels[&0], labels[&3]);
    }

    #[test]
    fn k_of_one_returns_current_components() {
        let mut net = UndirectedNetwork::new();
        net.add_weighted_edge("a", "b", "weight", 1.0);
        net.add_weighted_edge("c", "d", "weight", 1.0);

        let labels = girvan_newman_communities(&net, None, 1).unwrap();
        assert_eq!(labels[&"a"], labels[&"b"]);
        assert_eq!(labels[&"c"], labels[&"d"]);
        assert_ne!(labels[&"a"], labels[&"c"]);
    }

    #[test]
    fn runs_out_of_edges_gracefully() {
        let mut net = UndirectedNetwork::new();
        net.add_weighted_edge(1, 2, "weight", 1.0);

        // asking for more communities than edges can produce
        let labels = girvan_newman_communities(&net, None, 5).unwrap();
        assert_eq!(labels.len(), 2);
        assert_ne!(labels[&1], labels[&2]);
    }
}
