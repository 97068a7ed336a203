//! Weighted network representation over opaque node identifiers

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::{Directed, Direction, EdgeType, Undirected};

/// Named numeric attributes carried by every edge
pub type EdgeAttrs = BTreeMap<String, f64>;

/// Bounds required of node identifiers (zone ids, names, ...)
pub trait NodeId: Clone + Eq + Hash + Ord + Debug {}

impl<T: Clone + Eq + Hash + Ord + Debug> NodeId for T {}

/// Weighted graph keyed by opaque node identifiers.
///
/// Wraps a stable-index adjacency structure plus an id-to-index map so that
/// nodes can be removed while the remaining indices stay valid (the peeling
/// partitioner shrinks its working copy round by round). Directedness is
/// the `Ty` type parameter; parallel edges and self-loops are representable
/// and detected by the algorithms that forbid them.
///
/// Node iteration order is insertion order and deterministic.
#[derive(Debug)]
pub struct Network<N: NodeId, Ty: EdgeType = Undirected> {
    graph: StableGraph<N, EdgeAttrs, Ty>,
    indices: HashMap<N, NodeIndex>,
}

impl<N: NodeId, Ty: EdgeType> Clone for Network<N, Ty> {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph.clone(),
            indices: self.indices.clone(),
        }
    }
}

/// Network with undirected edges
pub type UndirectedNetwork<N> = Network<N, Undirected>;

/// Network with directed edges
pub type DirectedNetwork<N> = Network<N, Directed>;

/// Attribute lookup with the count-as-one default for missing names
pub(crate) fn attr_value(attrs: &EdgeAttrs, name: Option<&str>) -> f64 {
    match name {
        Some(key) => attrs.get(key).copied().unwrap_or(1.0),
        None => 1.0,
    }
}

impl<N: NodeId, Ty: EdgeType> Default for Network<N, Ty> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: NodeId, Ty: EdgeType> Network<N, Ty> {
    /// Create an empty network
    pub fn new() -> Self {
        Self {
            graph: StableGraph::with_capacity(0, 0),
            indices: HashMap::new(),
        }
    }

    /// Whether edges carry a direction
    pub fn is_directed(&self) -> bool {
        Ty::is_directed()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains_node(&self, node: &N) -> bool {
        self.indices.contains_key(node)
    }

    /// Insert a node; returns false if it was already present
    pub fn add_node(&mut self, node: N) -> bool {
        if self.indices.contains_key(&node) {
            return false;
        }
        let index = self.graph.add_node(node.clone());
        self.indices.insert(node, index);
        true
    }

    /// Insert an edge with the given attributes, creating missing endpoints.
    /// Repeated calls for the same endpoints add parallel edges.
    pub fn add_edge(&mut self, u: N, v: N, attrs: EdgeAttrs) {
        self.add_node(u.clone());
        self.add_node(v.clone());
        let ui = self.indices[&u];
        let vi = self.indices[&v];
        self.graph.add_edge(ui, vi, attrs);
    }

    /// Insert an edge carrying a single named attribute
    pub fn add_weighted_edge(&mut self, u: N, v: N, attr: &str, value: f64) {
        let mut attrs = EdgeAttrs::new();
        attrs.insert(attr.to_string(), value);
        self.add_edge(u, v, attrs);
    }

    /// Remove a node and every incident edge; returns false if absent
    pub fn remove_node(&mut self, node: &N) -> bool {
        match self.indices.remove(node) {
            Some(index) => {
                self.graph.remove_node(index);
                true
            }
            None => false,
        }
    }

    /// Remove one edge between the endpoints (either orientation on
    /// undirected networks); returns false if none exists
    pub fn remove_edge(&mut self, u: &N, v: &N) -> bool {
        let (ui, vi) = match (self.indices.get(u), self.indices.get(v)) {
            (Some(&ui), Some(&vi)) => (ui, vi),
            _ => return false,
        };
        match self.graph.find_edge(ui, vi) {
            Some(edge) => {
                self.graph.remove_edge(edge);
                true
            }
            None => false,
        }
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.graph.node_indices().map(move |i| &self.graph[i])
    }

    /// Edge endpoints and attributes, in insertion order
    pub fn edges(&self) -> impl Iterator<Item = (&N, &N, &EdgeAttrs)> {
        self.graph
            .edge_references()
            .map(move |e| (&self.graph[e.source()], &self.graph[e.target()], e.weight()))
    }

    pub fn has_edge(&self, u: &N, v: &N) -> bool {
        match (self.indices.get(u), self.indices.get(v)) {
            (Some(&ui), Some(&vi)) => self.graph.find_edge(ui, vi).is_some(),
            _ => false,
        }
    }

    /// Attributes of the first edge between the endpoints
    pub fn edge_attrs(&self, u: &N, v: &N) -> Option<&EdgeAttrs> {
        let ui = *self.indices.get(u)?;
        let vi = *self.indices.get(v)?;
        let edge = self.graph.find_edge(ui, vi)?;
        self.graph.edge_weight(edge)
    }

    /// Value of the named attribute on the first edge between the endpoints
    pub fn edge_value(&self, u: &N, v: &N, attr: Option<&str>) -> Option<f64> {
        self.edge_attrs(u, v).map(|attrs| attr_value(attrs, attr))
    }

    /// Successors on directed networks, all neighbors on undirected ones
    pub fn neighbors(&self, node: &N) -> Vec<&N> {
        match self.indices.get(node) {
            Some(&i) => self.graph.neighbors(i).map(|j| &self.graph[j]).collect(),
            None => Vec::new(),
        }
    }

    /// Neighbors regardless of direction. On directed networks a reciprocal
    /// pair contributes the neighbor twice, consistent with degree counting.
    pub fn all_neighbors(&self, node: &N) -> Vec<&N> {
        match self.indices.get(node) {
            Some(&i) => self
                .all_neighbors_at(i)
                .into_iter()
                .map(|j| &self.graph[j])
                .collect(),
            None => Vec::new(),
        }
    }

    /// Weighted degree: sum of incident edge attributes (in + out on
    /// directed networks, self-loops counted twice on undirected ones)
    pub fn degree(&self, node: &N, weight: Option<&str>) -> f64 {
        match self.indices.get(node) {
            Some(&i) => self.degree_at(i, weight),
            None => 0.0,
        }
    }

    /// In-degree on directed networks; plain degree on undirected ones
    pub fn in_degree(&self, node: &N, weight: Option<&str>) -> f64 {
        match self.indices.get(node) {
            Some(&i) if Ty::is_directed() => self.directed_degree(i, Direction::Incoming, weight),
            Some(&i) => self.degree_at(i, weight),
            None => 0.0,
        }
    }

    /// Out-degree on directed networks; plain degree on undirected ones
    pub fn out_degree(&self, node: &N, weight: Option<&str>) -> f64 {
        match self.indices.get(node) {
            Some(&i) if Ty::is_directed() => self.directed_degree(i, Direction::Outgoing, weight),
            Some(&i) => self.degree_at(i, weight),
            None => 0.0,
        }
    }

    /// Sum of the named attribute over every edge
    pub fn total_edge_weight(&self, weight: Option<&str>) -> f64 {
        self.graph
            .edge_references()
            .map(|e| attr_value(e.weight(), weight))
            .sum()
    }

    /// The named attribute of every edge, in insertion order
    pub fn edge_weights(&self, weight: Option<&str>) -> Vec<f64> {
        self.graph
            .edge_references()
            .map(|e| attr_value(e.weight(), weight))
            .collect()
    }

    pub fn self_loop_count(&self) -> usize {
        self.graph
            .edge_references()
            .filter(|e| e.source() == e.target())
            .count()
    }

    pub fn has_parallel_edges(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.graph.edge_count());
        for e in self.graph.edge_references() {
            let (a, b) = (e.source(), e.target());
            let key = if Ty::is_directed() || a <= b { (a, b) } else { (b, a) };
            if !seen.insert(key) {
                return true;
            }
        }
        false
    }

    /// Induced subgraph on the given nodes, attributes preserved.
    /// Unknown identifiers are ignored. The input network is untouched.
    pub fn subgraph<'a, I>(&self, keep: I) -> Self
    where
        I: IntoIterator<Item = &'a N>,
        N: 'a,
    {
        let keep: HashSet<NodeIndex> = keep
            .into_iter()
            .filter_map(|n| self.indices.get(n).copied())
            .collect();

        let mut sub = Self::new();
        for i in self.graph.node_indices() {
            if keep.contains(&i) {
                sub.add_node(self.graph[i].clone());
            }
        }
        for e in self.graph.edge_references() {
            if keep.contains(&e.source()) && keep.contains(&e.target()) {
                sub.add_edge(
                    self.graph[e.source()].clone(),
                    self.graph[e.target()].clone(),
                    e.weight().clone(),
                );
            }
        }
        sub
    }

    // Index-level accessors used by the algorithm modules.

    pub(crate) fn raw_graph(&self) -> &StableGraph<N, EdgeAttrs, Ty> {
        &self.graph
    }

    pub(crate) fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub(crate) fn node_id(&self, index: NodeIndex) -> &N {
        &self.graph[index]
    }

    pub(crate) fn degree_at(&self, index: NodeIndex, weight: Option<&str>) -> f64 {
        if Ty::is_directed() {
            self.directed_degree(index, Direction::Incoming, weight)
                + self.directed_degree(index, Direction::Outgoing, weight)
        } else {
            let mut total = 0.0;
            for e in self.graph.edges(index) {
                let w = attr_value(e.weight(), weight);
                // an undirected self-loop occupies both edge ends
                total += if e.source() == e.target() { 2.0 * w } else { w };
            }
            total
        }
    }

    fn directed_degree(&self, index: NodeIndex, dir: Direction, weight: Option<&str>) -> f64 {
        self.graph
            .edges_directed(index, dir)
            .map(|e| attr_value(e.weight(), weight))
            .sum()
    }

    pub(crate) fn all_neighbors_at(&self, index: NodeIndex) -> Vec<NodeIndex> {
        if Ty::is_directed() {
            self.graph
                .neighbors_directed(index, Direction::Outgoing)
                .chain(self.graph.neighbors_directed(index, Direction::Incoming))
                .collect()
        } else {
            self.graph.neighbors(index).collect()
        }
    }

    /// Every edge incident to the node (both directions on directed
    /// networks) as (other endpoint, attributes)
    pub(crate) fn incident_edges_at(&self, index: NodeIndex) -> Vec<(NodeIndex, &EdgeAttrs)> {
        let mut incident = Vec::new();
        if Ty::is_directed() {
            for e in self.graph.edges_directed(index, Direction::Outgoing) {
                incident.push((e.target(), e.weight()));
            }
            for e in self.graph.edges_directed(index, Direction::Incoming) {
                incident.push((e.source(), e.weight()));
            }
        } else {
            for e in self.graph.edges(index) {
                let other = if e.source() == index { e.target() } else { e.source() };
                incident.push((other, e.weight()));
            }
        }
        incident
    }

    pub(crate) fn edge_index_triples(
        &self,
    ) -> impl Iterator<Item = (NodeIndex, NodeIndex, &EdgeAttrs)> {
        self.graph
            .edge_references()
            .map(|e| (e.source(), e.target(), e.weight()))
    }

    /// Value of the named attribute on the first edge between the indices,
    /// checking the reverse orientation on directed networks
    pub(crate) fn edge_value_at(
        &self,
        a: NodeIndex,
        b: NodeIndex,
        attr: Option<&str>,
    ) -> Option<f64> {
        let edge = self
            .graph
            .find_edge(a, b)
            .or_else(|| self.graph.find_edge(b, a))?;
        self.graph.edge_weight(edge).map(|attrs| attr_value(attrs, attr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directed_degree_sums_both_directions() {
        let mut net: DirectedNetwork<&str> = Network::new();
        net.add_weighted_edge("a", "b", "weight", 2.0);
        net.add_weighted_edge("b", "a", "weight", 3.0);
        net.add_weighted_edge("a", "c", "weight", 1.0);

        assert_eq!(net.degree(&"a", Some("weight")), 6.0);
        assert_eq!(net.in_degree(&"a", Some("weight")), 3.0);
        assert_eq!(net.out_degree(&"a", Some("weight")), 3.0);
        assert_eq!(net.degree(&"a", None), 3.0);
    }

    #[test]
    fn undirected_self_loop_counts_twice() {
        let mut net: UndirectedNetwork<u32> = Network::new();
        net.add_weighted_edge(1, 1, "weight", 2.0);
        net.add_weighted_edge(1, 2, "weight", 1.0);

        assert_eq!(net.degree(&1, Some("weight")), 5.0);
        assert_eq!(net.self_loop_count(), 1);
    }

    #[test]
    fn parallel_edges_detected_across_orientations() {
        let mut net: UndirectedNetwork<u32> = Network::new();
        net.add_weighted_edge(1, 2, "weight", 1.0);
        assert!(!net.has_parallel_edges());

        net.add_weighted_edge(2, 1, "weight", 4.0);
        assert!(net.has_parallel_edges());
    }

    #[test]
    fn subgraph_preserves_attributes() {
        let mut net: UndirectedNetwork<&str> = Network::new();
        let mut attrs = EdgeAttrs::new();
        attrs.insert("weight".to_string(), 7.0);
        attrs.insert("distance".to_string(), 1.5);
        net.add_edge("a", "b", attrs);
        net.add_weighted_edge("b", "c", "weight", 2.0);

        let sub = net.subgraph(["a", "b"].iter());
        assert_eq!(sub.node_count(), 2);
        assert_eq!(sub.edge_count(), 1);
        assert_eq!(sub.edge_value(&"a", &"b", Some("distance")), Some(1.5));
        assert_eq!(sub.edge_value(&"a", &"b", Some("weight")), Some(7.0));
    }

    #[test]
    fn missing_attribute_counts_as_one() {
        let mut net: UndirectedNetwork<u32> = Network::new();
        net.add_edge(1, 2, EdgeAttrs::new());
        assert_eq!(net.edge_value(&1, &2, Some("weight")), Some(1.0));
        assert_eq!(net.degree(&1, Some("weight")), 1.0);
    }
}
