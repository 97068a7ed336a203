//! Parameter defaults for the centrality and community engines

use serde::{Deserialize, Serialize};

/// Seed carried by every adapter for reproducibility.
/// The in-crate implementations are deterministic; the seed is part of the
/// parameter contract and reserved for sampled approximations.
pub const DEFAULT_SEED: u64 = 42;

/// Options shared by every centrality metric
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CentralityParams {
    /// Min-max normalize the resulting map (sum-to-1 scaling for HITS)
    pub normalize: bool,

    /// Edge attribute holding the weight; `None` counts every edge as 1
    pub weight: Option<String>,

    /// Seed reserved for sampled betweenness approximation
    pub seed: u64,
}

impl Default for CentralityParams {
    fn default() -> Self {
        Self {
            normalize: true,
            weight: None,
            seed: DEFAULT_SEED,
        }
    }
}

impl CentralityParams {
    /// Raw scores for the given weight attribute, no normalization
    pub fn raw(weight: Option<&str>) -> Self {
        Self {
            normalize: false,
            weight: weight.map(str::to_string),
            seed: DEFAULT_SEED,
        }
    }
}

/// Knobs for the weighted HITS power iteration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HitsParams {
    /// Iteration cap before the computation is declared non-convergent
    pub max_iter: usize,

    /// L1 tolerance on the hub vector between iterations
    pub tol: f64,

    /// Rescale the final hub and authority vectors to sum to 1
    pub normalized: bool,
}

impl Default for HitsParams {
    fn default() -> Self {
        Self {
            max_iter: 1_000,
            tol: 1.0e-8,
            normalized: true,
        }
    }
}

/// Knobs for the PageRank power iteration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRankParams {
    /// Damping factor (probability of following an edge)
    pub damping: f64,

    /// Iteration cap before the computation is declared non-convergent
    pub max_iter: usize,

    /// Per-node tolerance; the L1 stop threshold is `node_count * tol`
    pub tol: f64,
}

impl Default for PageRankParams {
    fn default() -> Self {
        Self {
            damping: 0.85,
            max_iter: 100,
            tol: 1.0e-6,
        }
    }
}

/// Options shared by the community-detection algorithms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityParams {
    /// Edge attribute holding the weight; `None` counts every edge as 1
    pub weight: Option<String>,

    /// Structural threshold; meaning depends on the algorithm
    /// (core number cutoff, minimum clique size, club diameter bound).
    /// `None` picks the algorithm's own default: mean core number for
    /// k-core, 2 elsewhere.
    pub k: Option<f64>,

    /// Weight-sum admissibility cap for the k-truss wedge test
    pub truss_weight_cap: f64,

    /// Component count Girvan-Newman cuts down to
    pub girvan_newman_communities: usize,

    /// Louvain resolution (gamma)
    pub louvain_resolution: f64,

    /// Minimum modularity gain for Louvain to keep aggregating
    pub louvain_threshold: f64,

    /// Seed carried for reproducibility
    pub seed: u64,
}

impl Default for CommunityParams {
    fn default() -> Self {
        Self {
            weight: None,
            k: None,
            truss_weight_cap: f64::INFINITY,
            girvan_newman_communities: 2,
            louvain_resolution: 1.0,
            louvain_threshold: 1.0e-7,
            seed: DEFAULT_SEED,
        }
    }
}
