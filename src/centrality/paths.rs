//! Shortest-path plumbing shared by the centrality measures

use std::collections::HashMap;

use petgraph::stable_graph::NodeIndex;
use petgraph::visit::{EdgeRef, Reversed};
use petgraph::EdgeType;

use crate::graph::network::attr_value;
use crate::graph::{Network, NodeId};

/// Dense local view of a network: node order, reverse lookup and the
/// successor lists (all incident edges on undirected networks) used by the
/// iterative algorithms.
pub(crate) struct LocalView {
    pub order: Vec<NodeIndex>,
    pub successors: Vec<Vec<(usize, f64)>>,
}

pub(crate) fn local_view<N: NodeId, Ty: EdgeType>(
    network: &Network<N, Ty>,
    weight: Option<&str>,
) -> LocalView {
    let order: Vec<NodeIndex> = network.node_indices().collect();
    let position: HashMap<NodeIndex, usize> = order
        .iter()
        .enumerate()
        .map(|(pos, &ix)| (ix, pos))
        .collect();

    let successors = order
        .iter()
        .map(|&ix| {
            if network.is_directed() {
                network
                    .raw_graph()
                    .edges(ix)
                    .map(|e| (position[&e.target()], attr_value(e.weight(), weight)))
                    .collect()
            } else {
                network
                    .raw_graph()
                    .edges(ix)
                    .map(|e| {
                        let other = if e.source() == ix { e.target() } else { e.source() };
                        (position[&other], attr_value(e.weight(), weight))
                    })
                    .collect()
            }
        })
        .collect();

    LocalView { order, successors }
}

/// Shortest-path lengths from `source` to every reachable node. With
/// `incoming` set the paths run against edge direction (distances from all
/// nodes able to reach `source`); on undirected networks the flag is
/// irrelevant. `weight` of `None` counts hops.
pub(crate) fn shortest_path_lengths<N: NodeId, Ty: EdgeType>(
    network: &Network<N, Ty>,
    source: NodeIndex,
    weight: Option<&str>,
    incoming: bool,
) -> HashMap<NodeIndex, f64> {
    if incoming && network.is_directed() {
        petgraph::algo::dijkstra(Reversed(network.raw_graph()), source, None, |e| {
            attr_value(e.weight(), weight)
        })
    } else {
        petgraph::algo::dijkstra(network.raw_graph(), source, None, |e| {
            attr_value(e.weight(), weight)
        })
    }
}
