//! Core library for the zone network analyzer
//!
//! Decomposition, centrality and community-detection engines over weighted
//! transportation networks built from city zones and inter-zone travel
//! times. Collaborators supply a [`graph::Network`] and consume plain
//! node-to-score and node-to-community maps.

pub mod centrality;
pub mod community;
pub mod config;
pub mod decompose;
pub mod error;
pub mod graph;

pub use error::{AnalyzerError, Result};
