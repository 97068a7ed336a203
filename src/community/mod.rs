//! Community detection and partition scoring

pub mod girvan_newman;
pub mod louvain;
pub mod modularity;
pub mod peeling;

use std::str::FromStr;

use petgraph::EdgeType;
use serde::{Deserialize, Serialize};

use crate::config::CommunityParams;
use crate::error::{AnalyzerError, Result};
use crate::graph::{Network, NodeId};

use std::collections::HashMap;

pub use girvan_newman::girvan_newman_communities;
pub use louvain::louvain_communities;
pub use modularity::modularity;
pub use peeling::{
    clique_percolation_communities, k_club_communities, k_core_communities, k_truss_communities,
    peel_communities,
};

/// Union-Find over dense local ids, used for component grouping and for
/// merging overlapping cliques during percolation
pub(crate) struct DisjointSets {
    /// Parent pointers (parent[i] = parent of node i)
    parent: Vec<usize>,

    /// Rank/size of each set (for union by rank)
    rank: Vec<usize>,
}

impl DisjointSets {
    pub(crate) fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![1; size],
        }
    }

    /// Find the root of the set containing x with path compression
    pub(crate) fn find(&mut self, x: usize) -> usize {
        let px = self.parent[x];
        if px != x {
            self.parent[x] = self.find(px);
        }
        self.parent[x]
    }

    /// Union the sets containing x and y
    pub(crate) fn union(&mut self, x: usize, y: usize) {
        let root_x = self.find(x);
        let root_y = self.find(y);
        if root_x == root_y {
            return;
        }

        // attach the smaller tree under the root of the larger one
        if self.rank[root_x] > self.rank[root_y] {
            self.parent[root_y] = root_x;
            self.rank[root_x] += self.rank[root_y];
        } else {
            self.parent[root_x] = root_y;
            self.rank[root_y] += self.rank[root_x];
        }
    }
}

/// Algorithms the community layer knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommunityAlgorithm {
    GirvanNewman,
    KCore,
    KTruss,
    KClub,
    CliquePercolation,
    Louvain,
}

/// Static catalog consulted by name-based dispatch
pub const COMMUNITY_ALGORITHMS: [CommunityAlgorithm; 6] = [
    CommunityAlgorithm::GirvanNewman,
    CommunityAlgorithm::KCore,
    CommunityAlgorithm::KTruss,
    CommunityAlgorithm::KClub,
    CommunityAlgorithm::CliquePercolation,
    CommunityAlgorithm::Louvain,
];

impl CommunityAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Self::GirvanNewman => "girvan_newman",
            Self::KCore => "k_core",
            Self::KTruss => "k_truss",
            Self::KClub => "k_club",
            Self::CliquePercolation => "clique_percolation",
            Self::Louvain => "louvain",
        }
    }

    /// Catalog lookup; fails fast with
    /// [`AnalyzerError::UnknownCommunityAlgorithm`] before any computation
    pub fn from_name(name: &str) -> Result<Self> {
        COMMUNITY_ALGORITHMS
            .into_iter()
            .find(|algorithm| algorithm.name() == name)
            .ok_or_else(|| AnalyzerError::UnknownCommunityAlgorithm(name.to_string()))
    }
}

impl FromStr for CommunityAlgorithm {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

/// Route a catalog entry to its computation
pub fn detect_communities<N: NodeId, Ty: EdgeType>(
    network: &Network<N, Ty>,
    algorithm: CommunityAlgorithm,
    params: &CommunityParams,
) -> Result<HashMap<N, usize>> {
    log::info!(
        "detecting communities with {} over {} nodes",
        algorithm.name(),
        network.node_count()
    );
    let weight = params.weight.as_deref();
    match algorithm {
        CommunityAlgorithm::GirvanNewman => {
            girvan_newman_communities(network, weight, params.girvan_newman_communities)
        }
        CommunityAlgorithm::KCore => k_core_communities(network, params.k, weight),
        CommunityAlgorithm::KTruss => k_truss_communities(
            network,
            params.k.unwrap_or(2.0).max(0.0) as usize,
            params.truss_weight_cap,
            weight,
        ),
        CommunityAlgorithm::KClub => {
            k_club_communities(network, params.k.unwrap_or(2.0), weight)
        }
        CommunityAlgorithm::CliquePercolation => clique_percolation_communities(
            network,
            params.k.unwrap_or(2.0).max(0.0) as usize,
            weight,
        ),
        CommunityAlgorithm::Louvain => Ok(louvain_communities(
            network,
            weight,
            params.louvain_resolution,
            params.louvain_threshold,
        )),
    }
}
