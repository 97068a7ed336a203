//! Centrality measures over weighted networks

pub mod betweenness;
pub mod closeness;
pub mod hits;
pub mod pagerank;
pub(crate) mod paths;

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use petgraph::EdgeType;
use serde::{Deserialize, Serialize};

use crate::config::CentralityParams;
use crate::error::{AnalyzerError, Result};
use crate::graph::{Network, NodeId};

pub use betweenness::{betweenness_centrality, edge_betweenness_centrality};
pub use closeness::closeness_centrality;
pub use hits::{hits_centrality, weighted_hits};
pub use pagerank::{pagerank, pagerank_centrality};

/// Metrics the engine knows how to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CentralityMetric {
    InDegree,
    OutDegree,
    Betweenness,
    Closeness,
    PageRank,
    Hits,
}

/// Static catalog consulted by name-based dispatch
pub const CENTRALITY_METRICS: [CentralityMetric; 6] = [
    CentralityMetric::InDegree,
    CentralityMetric::OutDegree,
    CentralityMetric::Betweenness,
    CentralityMetric::Closeness,
    CentralityMetric::PageRank,
    CentralityMetric::Hits,
];

impl CentralityMetric {
    pub fn name(&self) -> &'static str {
        match self {
            Self::InDegree => "in_degree",
            Self::OutDegree => "out_degree",
            Self::Betweenness => "betweenness",
            Self::Closeness => "closeness",
            Self::PageRank => "pagerank",
            Self::Hits => "hits",
        }
    }

    /// Catalog lookup; fails fast with
    /// [`AnalyzerError::UnsupportedMetric`] before any computation
    pub fn from_name(name: &str) -> Result<Self> {
        CENTRALITY_METRICS
            .into_iter()
            .find(|metric| metric.name() == name)
            .ok_or_else(|| AnalyzerError::UnsupportedMetric(name.to_string()))
    }
}

impl FromStr for CentralityMetric {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

/// Scores produced by one metric; HITS yields a hub/authority pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CentralityScores<N: NodeId> {
    Scores(HashMap<N, f64>),
    HubsAuthorities {
        hubs: HashMap<N, f64>,
        authorities: HashMap<N, f64>,
    },
}

/// Route a catalog entry to its computation
pub fn compute_centrality<N: NodeId, Ty: EdgeType>(
    network: &Network<N, Ty>,
    metric: CentralityMetric,
    params: &CentralityParams,
) -> Result<CentralityScores<N>> {
    log::info!(
        "computing {} centrality for {} nodes",
        metric.name(),
        network.node_count()
    );
    match metric {
        CentralityMetric::InDegree => Ok(CentralityScores::Scores(in_degree_centrality(
            network, params,
        )?)),
        CentralityMetric::OutDegree => Ok(CentralityScores::Scores(out_degree_centrality(
            network, params,
        )?)),
        CentralityMetric::Betweenness => Ok(CentralityScores::Scores(betweenness_centrality(
            network, params,
        )?)),
        CentralityMetric::Closeness => Ok(CentralityScores::Scores(closeness_centrality(
            network, params,
        )?)),
        CentralityMetric::PageRank => Ok(CentralityScores::Scores(pagerank_centrality(
            network, params,
        )?)),
        CentralityMetric::Hits => {
            let (hubs, authorities) = hits_centrality(network, params)?;
            Ok(CentralityScores::HubsAuthorities { hubs, authorities })
        }
    }
}

/// In-degree of every node (weighted sums when `params.weight` is set)
pub fn in_degree_centrality<N: NodeId, Ty: EdgeType>(
    network: &Network<N, Ty>,
    params: &CentralityParams,
) -> Result<HashMap<N, f64>> {
    let weight = params.weight.as_deref();
    let raw: HashMap<N, f64> = network
        .nodes()
        .map(|node| (node.clone(), network.in_degree(node, weight)))
        .collect();
    if params.normalize {
        normalize_metric(&raw)
    } else {
        Ok(raw)
    }
}

/// Out-degree of every node (weighted sums when `params.weight` is set)
pub fn out_degree_centrality<N: NodeId, Ty: EdgeType>(
    network: &Network<N, Ty>,
    params: &CentralityParams,
) -> Result<HashMap<N, f64>> {
    let weight = params.weight.as_deref();
    let raw: HashMap<N, f64> = network
        .nodes()
        .map(|node| (node.clone(), network.out_degree(node, weight)))
        .collect();
    if params.normalize {
        normalize_metric(&raw)
    } else {
        Ok(raw)
    }
}

/// Min-max scale a metric map onto [0, 1] over its own value range.
/// A zero-width range is [`AnalyzerError::DegenerateRange`]; an empty map
/// stays empty.
pub fn normalize_metric<N: NodeId>(metric: &HashMap<N, f64>) -> Result<HashMap<N, f64>> {
    if metric.is_empty() {
        return Ok(HashMap::new());
    }
    let min = metric.values().copied().fold(f64::INFINITY, f64::min);
    let max = metric.values().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(max > min) {
        return Err(AnalyzerError::DegenerateRange);
    }
    Ok(metric
        .iter()
        .map(|(node, &value)| (node.clone(), (value - min) / (max - min)))
        .collect())
}

/// Min-max scale a family of metric maps (one per hour of day) against the
/// family-wide value range, keeping the maps comparable to each other
pub fn normalize_metric_group<N: NodeId>(
    groups: &BTreeMap<u8, HashMap<N, f64>>,
) -> Result<BTreeMap<u8, HashMap<N, f64>>> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for metric in groups.values() {
        for &value in metric.values() {
            min = min.min(value);
            max = max.max(value);
        }
    }
    if groups.values().all(|metric| metric.is_empty()) {
        return Ok(groups.clone());
    }
    if !(max > min) {
        return Err(AnalyzerError::DegenerateRange);
    }
    Ok(groups
        .iter()
        .map(|(&hour, metric)| {
            let scaled = metric
                .iter()
                .map(|(node, &value)| (node.clone(), (value - min) / (max - min)))
                .collect();
            (hour, scaled)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{DirectedNetwork, UndirectedNetwork};

    #[test]
    fn degree_centrality_follows_direction() {
        let mut net = DirectedNetwork::new();
        net.add_weighted_edge("a", "b", "weight", 2.0);
        net.add_weighted_edge("a", "c", "weight", 3.0);
        net.add_weighted_edge("b", "c", "weight", 1.0);

        let params = CentralityParams::raw(Some("weight"));
        let ins = in_degree_centrality(&net, &params).unwrap();
        let outs = out_degree_centrality(&net, &params).unwrap();
        assert_eq!(ins[&"c"], 4.0);
        assert_eq!(ins[&"a"], 0.0);
        assert_eq!(outs[&"a"], 5.0);
    }

    #[test]
    fn normalize_maps_range_to_unit_interval() {
        let metric: HashMap<&str, f64> = [("a", 2.0), ("b", 6.0), ("c", 4.0)]
            .into_iter()
            .collect();
        let scaled = normalize_metric(&metric).unwrap();
        assert_eq!(scaled[&"a"], 0.0);
        assert_eq!(scaled[&"b"], 1.0);
        assert_eq!(scaled[&"c"], 0.5);
    }

    #[test]
    fn degenerate_range_is_rejected() {
        let metric: HashMap<&str, f64> = [("a", 1.0), ("b", 1.0)].into_iter().collect();
        assert_eq!(normalize_metric(&metric), Err(AnalyzerError::DegenerateRange));
    }

    #[test]
    fn unknown_metric_name_fails_fast() {
        assert!(matches!(
            CentralityMetric::from_name("eigenvector"),
            Err(AnalyzerError::UnsupportedMetric(_))
        ));
        assert_eq!(
            CentralityMetric::from_name("pagerank").unwrap(),
            CentralityMetric::PageRank
        );
    }

    #[test]
    fn group_normalization_shares_one_range() {
        let mut groups: BTreeMap<u8, HashMap<&str, f64>> = BTreeMap::new();
        groups.insert(0, [("a", 0.0), ("b", 2.0)].into_iter().collect());
        groups.insert(1, [("a", 4.0)].into_iter().collect());

        let scaled = normalize_metric_group(&groups).unwrap();
        assert_eq!(scaled[&0][&"b"], 0.5);
        assert_eq!(scaled[&1][&"a"], 1.0);
    }

    #[test]
    fn dispatch_covers_the_catalog() {
        let mut net = UndirectedNetwork::new();
        net.add_weighted_edge(0u32, 1, "weight", 1.0);
        net.add_weighted_edge(1, 2, "weight", 1.0);

        for metric in CENTRALITY_METRICS {
            let out = compute_centrality(&net, metric, &CentralityParams::raw(Some("weight")));
            assert!(out.is_ok(), "{} failed: {:?}", metric.name(), out.err());
        }
    }
}
