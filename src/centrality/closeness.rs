//! Closeness centrality

use std::collections::HashMap;

use petgraph::EdgeType;

use crate::centrality::paths::shortest_path_lengths;
use crate::config::CentralityParams;
use crate::error::Result;
use crate::graph::{Network, NodeId};

/// Closeness centrality of every node: the reciprocal average
/// shortest-path distance in the Wasserman-Faust improved form
/// ((r - 1) / (n - 1)) * ((r - 1) / total distance) over the r nodes able
/// to reach the target, which keeps disconnected graphs comparable.
/// Directed networks use incoming distances. Nodes nothing can reach
/// score 0.
pub fn closeness_centrality<N: NodeId, Ty: EdgeType>(
    network: &Network<N, Ty>,
    params: &CentralityParams,
) -> Result<HashMap<N, f64>> {
    let weight = params.weight.as_deref();
    let n = network.node_count();

    let mut raw = HashMap::with_capacity(n);
    for index in network.node_indices() {
        let lengths = shortest_path_lengths(network, index, weight, true);
        let reached = lengths.len();
        let total: f64 = lengths.values().sum();

        let score = if total > 0.0 && n > 1 {
            let fraction = (reached - 1) as f64 / (n - 1) as f64;
            (reached - 1) as f64 / total * fraction
        } else {
            0.0
        };
        raw.insert(network.node_id(index).clone(), score);
    }

    if params.normalize {
        super::normalize_metric(&raw)
    } else {
        Ok(raw)
    }
}
