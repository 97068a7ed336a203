//! Weighted modularity scoring

use std::collections::HashMap;

use petgraph::EdgeType;

use crate::error::{AnalyzerError, Result};
use crate::graph::network::attr_value;
use crate::graph::{Network, NodeId};

/// Weighted modularity Q of a node-to-community assignment.
///
/// Undirected: Q = sum_c [ L_c / m - (D_c / 2m)^2 ], with L_c the weight
/// inside community c (self-loops once) and D_c its total weighted degree
/// (self-loops twice). Directed: Q = sum_c [ L_c / m - out_c * in_c / m^2 ].
///
/// The assignment must cover exactly the network's node set, otherwise
/// [`AnalyzerError::InvalidPartition`]. An edgeless network scores 0.
pub fn modularity<N: NodeId, Ty: EdgeType>(
    network: &Network<N, Ty>,
    assignment: &HashMap<N, usize>,
    weight: Option<&str>,
) -> Result<f64> {
    for node in network.nodes() {
        if !assignment.contains_key(node) {
            return Err(AnalyzerError::InvalidPartition(format!(
                "node {node:?} has no community"
            )));
        }
    }
    if assignment.len() != network.node_count() {
        return Err(AnalyzerError::InvalidPartition(
            "assignment references nodes outside the graph".to_string(),
        ));
    }

    let m = network.total_edge_weight(weight);
    if m == 0.0 {
        return Ok(0.0);
    }

    // internal weight per community
    let mut internal: HashMap<usize, f64> = HashMap::new();
    for (u, v, attrs) in network.edges() {
        if assignment[u] == assignment[v] {
            *internal.entry(assignment[u]).or_insert(0.0) += attr_value(attrs, weight);
        }
    }

    let q = if network.is_directed() {
        let mut out_degree: HashMap<usize, f64> = HashMap::new();
        let mut in_degree: HashMap<usize, f64> = HashMap::new();
        for node in network.nodes() {
            let community = assignment[node];
            *out_degree.entry(community).or_insert(0.0) += network.out_degree(node, weight);
            *in_degree.entry(community).or_insert(0.0) += network.in_degree(node, weight);
        }
        assignment
            .values()
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .map(|community| {
                let lc = internal.get(community).copied().unwrap_or(0.0);
                let outs = out_degree.get(community).copied().unwrap_or(0.0);
                let ins = in_degree.get(community).copied().unwrap_or(0.0);
                lc / m - outs * ins / (m * m)
            })
            .sum()
    } else {
        let mut degree: HashMap<usize, f64> = HashMap::new();
        for node in network.nodes() {
            *degree.entry(assignment[node]).or_insert(0.0) += network.degree(node, weight);
        }
        assignment
            .values()
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .map(|community| {
                let lc = internal.get(community).copied().unwrap_or(0.0);
                let dc = degree.get(community).copied().unwrap_or(0.0);
                lc / m - (dc / (2.0 * m)).powi(2)
            })
            .sum()
    };
    Ok(q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{DirectedNetwork, UndirectedNetwork};

    #[test]
    fn two_disjoint_edges_score_one_half() {
        let mut net = UndirectedNetwork::new();
        net.add_weighted_edge("a", "b", "weight", 1.0);
        net.add_weighted_edge("c", "d", "weight", 1.0);

        let assignment: HashMap<&str, usize> =
            [("a", 0), ("b", 0), ("c", 1), ("d", 1)].into_iter().collect();
        let q = modularity(&net, &assignment, Some("weight")).unwrap();
        assert!((q - 0.5).abs() < 1e-12);
    }

    #[test]
    fn single_community_scores_zero() {
        let mut net = UndirectedNetwork::new();
        net.add_weighted_edge(1, 2, "weight", 3.0);
        net.add_weighted_edge(2, 3, "weight", 3.0);

        let assignment: HashMap<u32, usize> = [(1, 0), (2, 0), (3, 0)].into_iter().collect();
        let q = modularity(&net, &assignment, Some("weight")).unwrap();
        assert!(q.abs() < 1e-12);
    }

    #[test]
    fn directed_formula_uses_in_and_out_degrees() {
        // 0 -> 1 and 2 -> 3, split into the matching communities
        let mut net = DirectedNetwork::new();
        net.add_weighted_edge(0, 1, "weight", 1.0);
        net.add_weighted_edge(2, 3, "weight", 1.0);

        let assignment: HashMap<u32, usize> =
            [(0, 0), (1, 0), (2, 1), (3, 1)].into_iter().collect();
        let q = modularity(&net, &assignment, Some("weight")).unwrap();
        assert!((q - 0.5).abs() < 1e-12);
    }

    #[test]
    fn incomplete_assignment_is_rejected() {
        let mut net = UndirectedNetwork::new();
        net.add_weighted_edge(1, 2, "weight", 1.0);

        let assignment: HashMap<u32, usize> = [(1, 0)].into_iter().collect();
        assert!(matches!(
            modularity(&net, &assignment, Some("weight")),
            Err(AnalyzerError::InvalidPartition(_))
        ));

        let stranger: HashMap<u32, usize> =
            [(1, 0), (2, 0), (9, 1)].into_iter().collect();
        assert!(matches!(
            modularity(&net, &stranger, Some("weight")),
            Err(AnalyzerError::InvalidPartition(_))
        ));
    }
}
