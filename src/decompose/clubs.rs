//! Relaxed k-clique (k-club) search

use std::collections::{BTreeSet, HashSet};

use petgraph::stable_graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::EdgeType;

use crate::graph::network::attr_value;
use crate::graph::{Network, NodeId};

/// Maximal node sets whose induced subgraph has weighted diameter <= k.
///
/// Candidate sets grow from single-node seeds through an explicit worklist,
/// adding one external neighbor at a time; each expansion produces a new
/// set and candidates are deduplicated by their canonical sorted key. A set
/// is finalized as a club when no expansion keeps the diameter within
/// bound. Exponential in the worst case; meant for the small residual
/// graphs the peeling partitioner hands it.
pub fn k_clubs<N: NodeId, Ty: EdgeType>(
    network: &Network<N, Ty>,
    k: f64,
    weight: Option<&str>,
) -> Vec<BTreeSet<N>> {
    let mut clubs: Vec<BTreeSet<N>> = Vec::new();
    let mut worklist: Vec<BTreeSet<NodeIndex>> = Vec::new();
    let mut visited: HashSet<Vec<NodeIndex>> = HashSet::new();

    for seed in network.node_indices() {
        let set = BTreeSet::from([seed]);
        if visited.insert(canonical_key(&set)) {
            worklist.push(set);
        }
    }

    while let Some(set) = worklist.pop() {
        if !diameter_within(network, &set, k, weight) {
            continue;
        }
        let mut expandable = false;
        for &member in &set {
            for neighbor in network.all_neighbors_at(member) {
                if set.contains(&neighbor) {
                    continue;
                }
                // grow a fresh set; the candidate under test stays intact
                let mut candidate = set.clone();
                candidate.insert(neighbor);
                if diameter_within(network, &candidate, k, weight) {
                    expandable = true;
                    if visited.insert(canonical_key(&candidate)) {
                        worklist.push(candidate);
                    }
                }
            }
        }
        if !expandable {
            clubs.push(
                set.iter()
                    .map(|&index| network.node_id(index).clone())
                    .collect(),
            );
        }
    }
    clubs
}

fn canonical_key(set: &BTreeSet<NodeIndex>) -> Vec<NodeIndex> {
    set.iter().copied().collect()
}

/// Whether the induced subgraph on `set` has weighted diameter <= k.
/// An unreachable pair means the diameter is unbounded.
fn diameter_within<N: NodeId, Ty: EdgeType>(
    network: &Network<N, Ty>,
    set: &BTreeSet<NodeIndex>,
    k: f64,
    weight: Option<&str>,
) -> bool {
    let members: Vec<&N> = set.iter().map(|&index| network.node_id(index)).collect();
    let induced = network.subgraph(members);

    for source in induced.node_indices() {
        let lengths = petgraph::algo::dijkstra(induced.raw_graph(), source, None, |e| {
            attr_value(e.weight(), weight)
        });
        if lengths.len() < induced.node_count() {
            return false;
        }
        if lengths.values().any(|&d| d > k) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::UndirectedNetwork;

    fn path_of_three() -> UndirectedNetwork<&'static str> {
        let mut net = UndirectedNetwork::new();
        net.add_weighted_edge("a", "b", "weight", 1.0);
        net.add_weighted_edge("b", "c", "weight", 1.0);
        net
    }

    #[test]
    fn whole_path_is_the_two_club() {
        let clubs = k_clubs(&path_of_three(), 2.0, Some("weight"));
        assert_eq!(clubs.len(), 1);
        assert_eq!(clubs[0], BTreeSet::from(["a", "b", "c"]));
    }

    #[test]
    fn unit_diameter_yields_the_edges() {
        let mut clubs = k_clubs(&path_of_three(), 1.0, Some("weight"));
        clubs.sort();
        assert_eq!(
            clubs,
            vec![BTreeSet::from(["a", "b"]), BTreeSet::from(["b", "c"])]
        );
    }

    #[test]
    fn isolated_node_is_its_own_club() {
        let mut net = UndirectedNetwork::new();
        net.add_node("x");
        let clubs = k_clubs(&net, 1.0, None);
        assert_eq!(clubs, vec![BTreeSet::from(["x"])]);
    }
}
