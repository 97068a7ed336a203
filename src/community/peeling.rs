//! Peeling-based community partitioning
//!
//! One generic repeat-and-remove driver turns any "find one structure"
//! extractor (k-core, k-truss, k-club, relaxed clique percolation) into a
//! full node-to-community labeling: extract, label, remove, repeat until
//! the residual graph yields nothing, then sweep the leftovers into a
//! final noise community.

use std::collections::HashMap;

use petgraph::EdgeType;

use crate::community::DisjointSets;
use crate::decompose::{k_clubs, k_core, maximal_cliques, relaxation_threshold, weighted_k_truss};
use crate::error::{AnalyzerError, Result};
use crate::graph::{Network, NodeId};

/// Generic peeling driver. The extractor receives the residual graph and
/// returns the node sets of the structures found this round; an empty
/// result or [`AnalyzerError::NoValidStructure`] terminates the loop.
/// Structures are labeled in discovery order starting at 0 (within a round
/// a later structure wins any overlap) and their nodes removed; every node
/// still unclaimed at the end receives the next id as the residual
/// community. The output covers every original node exactly once.
pub fn peel_communities<N, Ty, F>(network: &Network<N, Ty>, mut extract: F) -> Result<HashMap<N, usize>>
where
    N: NodeId,
    Ty: EdgeType,
    F: FnMut(&Network<N, Ty>) -> Result<Vec<Vec<N>>>,
{
    let mut working = network.clone();
    let mut labels: HashMap<N, usize> = HashMap::with_capacity(network.node_count());
    let mut next_id = 0usize;

    while working.node_count() > 0 {
        let structures = match extract(&working) {
            Ok(found) => found,
            Err(AnalyzerError::NoValidStructure) => break,
            Err(other) => return Err(other),
        };
        let structures: Vec<Vec<N>> = structures
            .into_iter()
            .filter(|nodes| !nodes.is_empty())
            .collect();
        if structures.is_empty() {
            break;
        }

        for nodes in structures {
            log::debug!("community {} claims {} node(s)", next_id, nodes.len());
            for node in nodes {
                working.remove_node(&node);
                labels.insert(node, next_id);
            }
            next_id += 1;
        }
    }

    // everything never claimed lands in one residual community
    let leftover = working.node_count();
    for node in working.nodes() {
        labels.insert(node.clone(), next_id);
    }
    log::info!(
        "peeled {} nodes into {} communities ({} residual)",
        network.node_count(),
        if leftover > 0 { next_id + 1 } else { next_id },
        leftover
    );
    Ok(labels)
}

/// Communities from repeated k-core extraction. `k` of `None` re-derives
/// the threshold each round as the residual graph's mean core number.
pub fn k_core_communities<N: NodeId, Ty: EdgeType>(
    network: &Network<N, Ty>,
    k: Option<f64>,
    weight: Option<&str>,
) -> Result<HashMap<N, usize>> {
    peel_communities(network, |working| {
        let core = k_core(working, k, None, weight)?;
        Ok(vec![core.nodes().cloned().collect()])
    })
}

/// Communities from repeated k-truss extraction
pub fn k_truss_communities<N: NodeId, Ty: EdgeType>(
    network: &Network<N, Ty>,
    k: usize,
    w: f64,
    weight: Option<&str>,
) -> Result<HashMap<N, usize>> {
    peel_communities(network, |working| {
        let truss = weighted_k_truss(working, k, w, weight);
        Ok(vec![truss.nodes().cloned().collect()])
    })
}

/// Communities from repeatedly extracting the largest k-club
pub fn k_club_communities<N: NodeId, Ty: EdgeType>(
    network: &Network<N, Ty>,
    k: f64,
    weight: Option<&str>,
) -> Result<HashMap<N, usize>> {
    peel_communities(network, |working| {
        let clubs = k_clubs(working, k, weight);
        Ok(clubs
            .into_iter()
            .max_by_key(|club| club.len())
            .map(|club| vec![club.into_iter().collect()])
            .unwrap_or_default())
    })
}

/// Communities from relaxed clique percolation: per round, maximal cliques
/// of size >= k among edges admissible under the geometric-mean relaxation
/// threshold, merged when they share k - 1 nodes.
pub fn clique_percolation_communities<N: NodeId, Ty: EdgeType>(
    network: &Network<N, Ty>,
    k: usize,
    weight: Option<&str>,
) -> Result<HashMap<N, usize>> {
    peel_communities(network, |working| {
        let relaxation = relaxation_threshold(working, weight);
        Ok(percolate(working, k, relaxation, weight))
    })
}

/// One percolation round over the residual graph
fn percolate<N: NodeId, Ty: EdgeType>(
    network: &Network<N, Ty>,
    k: usize,
    relaxation: f64,
    weight: Option<&str>,
) -> Vec<Vec<N>> {
    let cliques: Vec<Vec<N>> = maximal_cliques(network, Some(relaxation), weight)
        .into_iter()
        .filter(|clique| clique.len() >= k)
        .map(|clique| clique.into_iter().collect())
        .collect();
    if cliques.is_empty() {
        return Vec::new();
    }

    // adjacent cliques (sharing at least k - 1 nodes) percolate together
    let mut sets = DisjointSets::new(cliques.len());
    let min_overlap = k.saturating_sub(1);
    for i in 0..cliques.len() {
        for j in (i + 1)..cliques.len() {
            let overlap = cliques[i]
                .iter()
                .filter(|node| cliques[j].contains(*node))
                .count();
            if overlap >= min_overlap {
                sets.union(i, j);
            }
        }
    }

    let mut grouped: HashMap<usize, Vec<N>> = HashMap::new();
    let mut group_order: Vec<usize> = Vec::new();
    for (i, clique) in cliques.into_iter().enumerate() {
        let root = sets.find(i);
        if !grouped.contains_key(&root) {
            group_order.push(root);
            grouped.insert(root, Vec::new());
        }
        let members = grouped.get_mut(&root).expect("group was just inserted");
        for node in clique {
            if !members.contains(&node) {
                members.push(node);
            }
        }
    }
    group_order
        .into_iter()
        .map(|root| grouped.remove(&root).unwrap_or_default())
        .collect()
}
