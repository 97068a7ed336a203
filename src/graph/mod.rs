//! Network representation module

pub mod builder;
pub mod network;
pub mod temporal;

pub use builder::NetworkBuilder;
pub use network::{DirectedNetwork, EdgeAttrs, Network, NodeId, UndirectedNetwork};
pub use temporal::{to_undirected_mean, HourlyNetworks};

pub(crate) use network::attr_value;
