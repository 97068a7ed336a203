//! Error taxonomy for the analyzer

use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Errors produced by the decomposition, centrality and community engines
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyzerError {
    /// Self-loops or parallel edges present where an algorithm requires a simple graph
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// An extractor found no structure in the residual graph.
    /// Caught by the peeling partitioner as its loop-termination signal.
    #[error("no valid structure found in the residual graph")]
    NoValidStructure,

    /// Power iteration exhausted its iteration budget without reaching tolerance
    #[error("power iteration failed to converge within {max_iter} iterations")]
    PowerIterationNotConverged { max_iter: usize },

    /// Min-max normalization requested on a zero-width value range
    #[error("cannot min-max normalize a metric whose value range is zero-width")]
    DegenerateRange,

    /// Requested centrality metric is outside the supported catalog
    #[error("unsupported centrality metric: {0}")]
    UnsupportedMetric(String),

    /// Requested community algorithm is outside the supported catalog
    #[error("unknown community algorithm: {0}")]
    UnknownCommunityAlgorithm(String),

    /// A node-to-community assignment that does not partition the graph's node set
    #[error("not a partition of the graph: {0}")]
    InvalidPartition(String),
}
