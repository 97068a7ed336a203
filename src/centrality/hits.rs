//! Weighted HITS hub and authority scores
//!
//! Power-iteration computation of Kleinberg's hubs and authorities,
//! generalized so that each step sums neighbor scores multiplied by the
//! connecting edge's weight. Authorities estimate a node's value from its
//! incoming links, hubs from its outgoing links; on undirected networks
//! the two roles coincide. The eigenvector calculation has no general
//! convergence guarantee, hence the iteration cap.

use std::collections::HashMap;

use petgraph::EdgeType;

use crate::centrality::paths::local_view;
use crate::config::{CentralityParams, HitsParams};
use crate::error::{AnalyzerError, Result};
use crate::graph::{Network, NodeId};

/// Hub and authority scores for every node.
///
/// Hub scores start uniform, or from `start` re-normalized to sum to 1
/// (nodes missing from `start` begin at 0; an all-zero start falls back to
/// uniform). Each iteration recomputes authorities from hubs over incoming
/// weighted edges, hubs from authorities over outgoing weighted edges,
/// scales both vectors by their maximum element, and stops once the L1
/// change in hub scores drops below `params.tol`. Exhausting
/// `params.max_iter` fails with
/// [`AnalyzerError::PowerIterationNotConverged`]. With `params.normalized`
/// both final vectors are rescaled to sum to 1.
///
/// Fails with [`AnalyzerError::InvalidGraph`] on parallel edges.
pub fn weighted_hits<N: NodeId, Ty: EdgeType>(
    network: &Network<N, Ty>,
    weight: Option<&str>,
    start: Option<&HashMap<N, f64>>,
    params: &HitsParams,
) -> Result<(HashMap<N, f64>, HashMap<N, f64>)> {
    if network.has_parallel_edges() {
        return Err(AnalyzerError::InvalidGraph(
            "hits is not defined for graphs with parallel edges".to_string(),
        ));
    }
    // outgoing weighted adjacency (all incident edges when undirected)
    let view = local_view(network, weight);
    let order = &view.order;
    let successors = &view.successors;
    let n = order.len();
    if n == 0 {
        return Ok((HashMap::new(), HashMap::new()));
    }

    let mut hubs = match start {
        Some(given) => {
            let mut h: Vec<f64> = order
                .iter()
                .map(|&ix| given.get(network.node_id(ix)).copied().unwrap_or(0.0))
                .collect();
            let total: f64 = h.iter().sum();
            if total == 0.0 {
                vec![1.0 / n as f64; n]
            } else {
                for value in &mut h {
                    *value /= total;
                }
                h
            }
        }
        None => vec![1.0 / n as f64; n],
    };
    let mut authorities = vec![0.0; n];
    let mut converged = false;

    for _ in 0..params.max_iter {
        let last = hubs.clone();
        authorities = vec![0.0; n];
        hubs = vec![0.0; n];

        // a = h^T * W, then h = W * a
        for i in 0..n {
            for &(j, w) in &successors[i] {
                authorities[j] += last[i] * w;
            }
        }
        for i in 0..n {
            for &(j, w) in &successors[i] {
                hubs[i] += authorities[j] * w;
            }
        }

        rescale_by_max(&mut hubs);
        rescale_by_max(&mut authorities);

        let err: f64 = hubs.iter().zip(&last).map(|(a, b)| (a - b).abs()).sum();
        if err < params.tol {
            converged = true;
            break;
        }
    }
    if !converged {
        return Err(AnalyzerError::PowerIterationNotConverged {
            max_iter: params.max_iter,
        });
    }

    if params.normalized {
        rescale_by_sum(&mut hubs);
        rescale_by_sum(&mut authorities);
    }

    let to_map = |values: Vec<f64>| {
        order
            .iter()
            .zip(values)
            .map(|(&ix, value)| (network.node_id(ix).clone(), value))
            .collect::<HashMap<N, f64>>()
    };
    Ok((to_map(hubs), to_map(authorities)))
}

/// HITS with the engine's shared options; the `normalize` flag requests
/// the pair's sum-to-1 scaling
pub fn hits_centrality<N: NodeId, Ty: EdgeType>(
    network: &Network<N, Ty>,
    params: &CentralityParams,
) -> Result<(HashMap<N, f64>, HashMap<N, f64>)> {
    let hits_params = HitsParams {
        normalized: params.normalize,
        ..HitsParams::default()
    };
    weighted_hits(network, params.weight.as_deref(), None, &hits_params)
}

fn rescale_by_max(values: &mut [f64]) {
    let max = values.iter().copied().fold(0.0f64, f64::max);
    if max > 0.0 {
        for value in values {
            *value /= max;
        }
    }
}

fn rescale_by_sum(values: &mut [f64]) {
    let total: f64 = values.iter().sum();
    if total > 0.0 {
        for value in values {
            *value /= total;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{DirectedNetwork, UndirectedNetwork};

    fn unit_path() -> UndirectedNetwork<u32> {
        let mut net = UndirectedNetwork::new();
        net.add_weighted_edge(0, 1, "weight", 1.0);
        net.add_weighted_edge(1, 2, "weight", 1.0);
        net.add_weighted_edge(2, 3, "weight", 1.0);
        net
    }

    #[test]
    fn path_graph_converges_and_normalizes() {
        let (hubs, authorities) =
            weighted_hits(&unit_path(), Some("weight"), None, &HitsParams::default()).unwrap();

        let hub_sum: f64 = hubs.values().sum();
        let auth_sum: f64 = authorities.values().sum();
        assert!((hub_sum - 1.0).abs() < 1e-9);
        assert!((auth_sum - 1.0).abs() < 1e-9);
        // inner nodes dominate the endpoints
        assert!(authorities[&1] > authorities[&0]);
        assert!(authorities[&2] > authorities[&3]);
    }

    #[test]
    fn parallel_edges_are_rejected() {
        let mut net = DirectedNetwork::new();
        net.add_weighted_edge(0, 1, "weight", 1.0);
        net.add_weighted_edge(0, 1, "weight", 2.0);

        assert!(matches!(
            weighted_hits(&net, Some("weight"), None, &HitsParams::default()),
            Err(AnalyzerError::InvalidGraph(_))
        ));
    }

    #[test]
    fn heavier_edges_attract_authority() {
        let mut net = DirectedNetwork::new();
        net.add_weighted_edge(0, 1, "weight", 3.0);
        net.add_weighted_edge(0, 2, "weight", 1.0);
        net.add_weighted_edge(1, 0, "weight", 1.0);
        net.add_weighted_edge(2, 0, "weight", 1.0);

        let (_, authorities) =
            weighted_hits(&net, Some("weight"), None, &HitsParams::default()).unwrap();
        assert!(authorities[&1] > authorities[&2]);
    }

    #[test]
    fn start_vector_is_renormalized() {
        let start: HashMap<u32, f64> = [(0, 2.0), (1, 2.0), (2, 2.0), (3, 2.0)]
            .into_iter()
            .collect();
        let (hubs, _) = weighted_hits(
            &unit_path(),
            Some("weight"),
            Some(&start),
            &HitsParams::default(),
        )
        .unwrap();
        let sum: f64 = hubs.values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn edgeless_network_converges_to_zero_scores() {
        let mut net = UndirectedNetwork::new();
        net.add_node(1u32);
        net.add_node(2);

        let (hubs, authorities) =
            weighted_hits(&net, None, None, &HitsParams::default()).unwrap();
        assert!(hubs.values().all(|&v| v == 0.0));
        assert!(authorities.values().all(|&v| v == 0.0));
    }
}
