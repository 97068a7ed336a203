//! PageRank centrality

use std::collections::HashMap;

use petgraph::EdgeType;

use crate::centrality::paths::local_view;
use crate::config::{CentralityParams, PageRankParams};
use crate::error::{AnalyzerError, Result};
use crate::graph::{Network, NodeId};

/// PageRank scores by power iteration: uniform teleport, dangling mass
/// redistributed uniformly, out-weight-normalized transition matrix.
/// Undirected edges are walked in both directions. Converges when the L1
/// change drops below `node_count * tol`; exhausting `max_iter` fails with
/// [`AnalyzerError::PowerIterationNotConverged`].
pub fn pagerank<N: NodeId, Ty: EdgeType>(
    network: &Network<N, Ty>,
    weight: Option<&str>,
    params: &PageRankParams,
) -> Result<HashMap<N, f64>> {
    let view = local_view(network, weight);
    let n = view.order.len();
    if n == 0 {
        return Ok(HashMap::new());
    }

    let out_weight: Vec<f64> = view
        .successors
        .iter()
        .map(|edges| edges.iter().map(|&(_, w)| w).sum())
        .collect();

    let damping = params.damping;
    let teleport = (1.0 - damping) / n as f64;
    let mut scores = vec![1.0 / n as f64; n];

    for _ in 0..params.max_iter {
        let last = scores;
        scores = vec![teleport; n];

        let dangling: f64 = (0..n)
            .filter(|&i| out_weight[i] == 0.0)
            .map(|i| last[i])
            .sum();
        let dangling_share = damping * dangling / n as f64;

        for i in 0..n {
            if out_weight[i] == 0.0 {
                continue;
            }
            let push = damping * last[i] / out_weight[i];
            for &(j, w) in &view.successors[i] {
                scores[j] += push * w;
            }
        }
        for value in &mut scores {
            *value += dangling_share;
        }

        let err: f64 = scores
            .iter()
            .zip(&last)
            .map(|(a, b)| (a - b).abs())
            .sum();
        if err < n as f64 * params.tol {
            return Ok(view
                .order
                .iter()
                .zip(scores)
                .map(|(&ix, value)| (network.node_id(ix).clone(), value))
                .collect());
        }
    }

    Err(AnalyzerError::PowerIterationNotConverged {
        max_iter: params.max_iter,
    })
}

/// PageRank with the engine's shared options (default damping schedule,
/// optional min-max normalization)
pub fn pagerank_centrality<N: NodeId, Ty: EdgeType>(
    network: &Network<N, Ty>,
    params: &CentralityParams,
) -> Result<HashMap<N, f64>> {
    let raw = pagerank(network, params.weight.as_deref(), &PageRankParams::default())?;
    if params.normalize {
        super::normalize_metric(&raw)
    } else {
        Ok(raw)
    }
}
