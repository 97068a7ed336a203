//! Betweenness centrality (Brandes accumulation)

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, VecDeque};

use petgraph::EdgeType;
use rayon::prelude::*;

use crate::centrality::paths::{local_view, LocalView};
use crate::config::CentralityParams;
use crate::error::Result;
use crate::graph::{Network, NodeId};

/// Below this many nodes the source loop runs sequentially
const PARALLEL_MIN_NODES: usize = 1000;

/// Betweenness centrality of every node: raw (unnormalized) sums of
/// shortest-path dependencies over all sources, endpoints excluded,
/// halved on undirected networks. Weighted paths use Dijkstra with the
/// named attribute as length. `params.seed` is reserved for sampled
/// approximation; the computation here is exact.
pub fn betweenness_centrality<N: NodeId, Ty: EdgeType>(
    network: &Network<N, Ty>,
    params: &CentralityParams,
) -> Result<HashMap<N, f64>> {
    let weight = params.weight.as_deref();
    let view = local_view(network, weight);
    let n = view.order.len();
    let weighted = weight.is_some();

    let mut scores = if n >= PARALLEL_MIN_NODES {
        log::debug!("accumulating betweenness from {n} sources in parallel");
        (0..n)
            .into_par_iter()
            .map(|s| source_dependencies(&view, weighted, s))
            .reduce(|| vec![0.0; n], merge_scores)
    } else {
        let mut total = vec![0.0; n];
        for s in 0..n {
            total = merge_scores(total, source_dependencies(&view, weighted, s));
        }
        total
    };

    // each undirected path is discovered from both ends
    if !network.is_directed() {
        for value in &mut scores {
            *value *= 0.5;
        }
    }

    let raw: HashMap<N, f64> = view
        .order
        .iter()
        .zip(scores)
        .map(|(&ix, value)| (network.node_id(ix).clone(), value))
        .collect();
    if params.normalize {
        super::normalize_metric(&raw)
    } else {
        Ok(raw)
    }
}

/// Betweenness centrality of every edge, raw sums, halved on undirected
/// networks. Keys on undirected networks are normalized to insertion
/// order of the node endpoints.
pub fn edge_betweenness_centrality<N: NodeId, Ty: EdgeType>(
    network: &Network<N, Ty>,
    weight: Option<&str>,
) -> HashMap<(N, N), f64> {
    let view = local_view(network, weight);
    let n = view.order.len();
    let weighted = weight.is_some();
    let directed = network.is_directed();

    let mut edge_scores: HashMap<(usize, usize), f64> = HashMap::new();
    for s in 0..n {
        let traversal = single_source(&view, weighted, s);
        let mut delta = vec![0.0; n];
        let mut stack = traversal.stack;
        while let Some(w) = stack.pop() {
            for &v in &traversal.preds[w] {
                let credit = traversal.sigma[v] / traversal.sigma[w] * (1.0 + delta[w]);
                let key = if directed || v <= w { (v, w) } else { (w, v) };
                *edge_scores.entry(key).or_insert(0.0) += credit;
                delta[v] += credit;
            }
        }
    }

    let scale = if directed { 1.0 } else { 0.5 };
    edge_scores
        .into_iter()
        .map(|((a, b), value)| {
            let u = network.node_id(view.order[a]).clone();
            let v = network.node_id(view.order[b]).clone();
            ((u, v), value * scale)
        })
        .collect()
}

struct Traversal {
    /// Nodes in non-decreasing distance order
    stack: Vec<usize>,
    preds: Vec<Vec<usize>>,
    sigma: Vec<f64>,
}

fn source_dependencies(view: &LocalView, weighted: bool, s: usize) -> Vec<f64> {
    let n = view.successors.len();
    let traversal = single_source(view, weighted, s);

    let mut delta = vec![0.0; n];
    let mut scores = vec![0.0; n];
    let mut stack = traversal.stack;
    while let Some(w) = stack.pop() {
        for &v in &traversal.preds[w] {
            delta[v] += traversal.sigma[v] / traversal.sigma[w] * (1.0 + delta[w]);
        }
        if w != s {
            scores[w] += delta[w];
        }
    }
    scores
}

fn single_source(view: &LocalView, weighted: bool, s: usize) -> Traversal {
    if weighted {
        single_source_dijkstra(view, s)
    } else {
        single_source_bfs(view, s)
    }
}

fn single_source_bfs(view: &LocalView, s: usize) -> Traversal {
    let n = view.successors.len();
    let mut stack = Vec::with_capacity(n);
    let mut preds = vec![Vec::new(); n];
    let mut sigma = vec![0.0; n];
    let mut dist = vec![-1i64; n];

    sigma[s] = 1.0;
    dist[s] = 0;
    let mut queue = VecDeque::new();
    queue.push_back(s);
    while let Some(v) = queue.pop_front() {
        stack.push(v);
        for &(w, _) in &view.successors[v] {
            if dist[w] < 0 {
                dist[w] = dist[v] + 1;
                queue.push_back(w);
            }
            if dist[w] == dist[v] + 1 {
                sigma[w] += sigma[v];
                preds[w].push(v);
            }
        }
    }

    Traversal { stack, preds, sigma }
}

fn single_source_dijkstra(view: &LocalView, s: usize) -> Traversal {
    let n = view.successors.len();
    let mut stack = Vec::with_capacity(n);
    let mut preds = vec![Vec::new(); n];
    let mut sigma = vec![0.0; n];
    let mut dist = vec![f64::INFINITY; n];
    let mut settled = vec![false; n];

    sigma[s] = 1.0;
    dist[s] = 0.0;
    let mut heap: BinaryHeap<Reverse<(HeapLength, usize)>> = BinaryHeap::new();
    heap.push(Reverse((HeapLength(0.0), s)));

    while let Some(Reverse((HeapLength(d), u))) = heap.pop() {
        if settled[u] || d > dist[u] {
            continue;
        }
        settled[u] = true;
        stack.push(u);
        for &(v, w) in &view.successors[u] {
            let candidate = dist[u] + w;
            if candidate < dist[v] {
                dist[v] = candidate;
                sigma[v] = sigma[u];
                preds[v] = vec![u];
                heap.push(Reverse((HeapLength(candidate), v)));
            } else if !settled[v] && candidate == dist[v] {
                sigma[v] += sigma[u];
                preds[v].push(u);
            }
        }
    }

    Traversal { stack, preds, sigma }
}

fn merge_scores(mut left: Vec<f64>, right: Vec<f64>) -> Vec<f64> {
    for (a, b) in left.iter_mut().zip(right) {
        *a += b;
    }
    left
}

/// Path length wrapper giving f64 a total order inside the heap
#[derive(PartialEq)]
struct HeapLength(f64);

impl Eq for HeapLength {}

impl PartialOrd for HeapLength {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapLength {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}
