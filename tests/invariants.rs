use std::collections::{HashMap, HashSet};

use zone_network_analyzer::centrality::{normalize_metric, weighted_hits};
use zone_network_analyzer::community::{
    clique_percolation_communities, detect_communities, k_core_communities, louvain_communities,
    modularity, CommunityAlgorithm,
};
use zone_network_analyzer::config::{CommunityParams, HitsParams};
use zone_network_analyzer::decompose::{core_number, core_number_weighted, k_core, weighted_k_truss};
use zone_network_analyzer::graph::{to_undirected_mean, DirectedNetwork, UndirectedNetwork};
use zone_network_analyzer::AnalyzerError;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Two unit-weight triangles joined by a single bridge edge
fn barbell() -> UndirectedNetwork<u32> {
    let mut net = UndirectedNetwork::new();
    for (u, v) in [(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3), (2, 3)] {
        net.add_weighted_edge(u, v, "weight", 1.0);
    }
    net
}

#[test]
fn core_number_bounded_by_degree() {
    init_logging();
    let mut net = barbell();
    net.add_weighted_edge(5, 6, "weight", 1.0);
    net.add_node(7);

    let cores = core_number(&net).unwrap();
    for node in net.nodes() {
        assert!(
            (cores[node] as f64) <= net.degree(node, None),
            "core exceeds degree at {node}"
        );
    }
}

#[test]
fn k_core_members_keep_k_internal_degree() {
    init_logging();
    let mut net = barbell();
    net.add_weighted_edge(0, 6, "weight", 1.0);

    let sub = k_core(&net, Some(2.0), None, None).unwrap();
    for node in sub.nodes() {
        assert!(sub.degree(node, None) >= 2.0);
    }
}

#[test]
fn k_core_is_idempotent() {
    init_logging();
    let net = barbell();
    let once = k_core(&net, Some(2.0), None, None).unwrap();
    let twice = k_core(&once, Some(2.0), None, None).unwrap();

    let first: HashSet<u32> = once.nodes().copied().collect();
    let second: HashSet<u32> = twice.nodes().copied().collect();
    assert_eq!(first, second);
    assert_eq!(once.edge_count(), twice.edge_count());
}

#[test]
fn weighted_triangle_core_numbers_equal_two() {
    init_logging();
    let mut net = UndirectedNetwork::new();
    net.add_weighted_edge(1, 2, "weight", 1.0);
    net.add_weighted_edge(2, 3, "weight", 1.0);
    net.add_weighted_edge(3, 1, "weight", 1.0);

    let cores = core_number_weighted(&net, "weight").unwrap();
    for (_, value) in cores {
        assert!((value - 2.0).abs() < 1e-12);
    }
}

#[test]
fn self_loops_are_rejected_before_any_work() {
    init_logging();
    let mut net = barbell();
    net.add_weighted_edge(0, 0, "weight", 1.0);

    assert!(matches!(
        core_number(&net),
        Err(AnalyzerError::InvalidGraph(_))
    ));
    assert!(matches!(
        k_core(&net, None, None, None),
        Err(AnalyzerError::InvalidGraph(_))
    ));
}

#[test]
fn peeling_partitions_cover_every_node_exactly_once() {
    init_logging();
    let mut net = barbell();
    net.add_node(99);

    let expected: HashSet<u32> = net.nodes().copied().collect();
    let by_core = k_core_communities(&net, None, Some("weight")).unwrap();
    assert_eq!(by_core.keys().copied().collect::<HashSet<_>>(), expected);

    let by_clique = clique_percolation_communities(&net, 3, Some("weight")).unwrap();
    assert_eq!(by_clique.keys().copied().collect::<HashSet<_>>(), expected);
}

#[test]
fn four_clique_truss_scenario() {
    init_logging();
    let mut net = UndirectedNetwork::new();
    for (u, v) in [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)] {
        net.add_weighted_edge(u, v, "weight", 1.0);
    }

    // every edge is closed by two wedges passing the weight-sum test
    let truss = weighted_k_truss(&net, 3, 2.0, Some("weight"));
    assert_eq!(truss.node_count(), 4);
    assert_eq!(truss.edge_count(), 6);
}

#[test]
fn hits_converges_on_the_unit_path() {
    init_logging();
    let mut net = UndirectedNetwork::new();
    net.add_weighted_edge(0, 1, "weight", 1.0);
    net.add_weighted_edge(1, 2, "weight", 1.0);
    net.add_weighted_edge(2, 3, "weight", 1.0);

    let (hubs, authorities) =
        weighted_hits(&net, Some("weight"), None, &HitsParams::default()).unwrap();
    let hub_sum: f64 = hubs.values().sum();
    let auth_sum: f64 = authorities.values().sum();
    assert!((hub_sum - 1.0).abs() < 1e-9);
    assert!((auth_sum - 1.0).abs() < 1e-9);
}

#[test]
fn modularity_stays_within_theoretical_bounds() {
    init_logging();
    let net = barbell();

    let by_louvain = louvain_communities(&net, Some("weight"), 1.0, 1e-7);
    let q = modularity(&net, &by_louvain, Some("weight")).unwrap();
    assert!((-1.0..=1.0).contains(&q), "q={q}");

    // the all-in-one partition scores 0 minus the null-model mass
    let lumped: HashMap<u32, usize> = net.nodes().map(|&n| (n, 0)).collect();
    let q_lumped = modularity(&net, &lumped, Some("weight")).unwrap();
    assert!((-1.0..=1.0).contains(&q_lumped));
    assert!(q > q_lumped);
}

#[test]
fn degenerate_normalization_is_an_error() {
    init_logging();
    let uniform: HashMap<u32, f64> = [(1, 3.0), (2, 3.0)].into_iter().collect();
    assert_eq!(normalize_metric(&uniform), Err(AnalyzerError::DegenerateRange));
}

#[test]
fn dispatcher_rejects_unknown_algorithms() {
    init_logging();
    assert!(matches!(
        CommunityAlgorithm::from_name("label_propagation"),
        Err(AnalyzerError::UnknownCommunityAlgorithm(_))
    ));
}

#[test]
fn every_catalog_algorithm_covers_the_barbell() {
    init_logging();
    let net = barbell();
    let expected: HashSet<u32> = net.nodes().copied().collect();

    for algorithm in zone_network_analyzer::community::COMMUNITY_ALGORITHMS {
        let params = CommunityParams {
            weight: Some("weight".to_string()),
            ..CommunityParams::default()
        };
        let labels = detect_communities(&net, algorithm, &params).unwrap();
        assert_eq!(
            labels.keys().copied().collect::<HashSet<_>>(),
            expected,
            "{} broke partition coverage",
            algorithm.name()
        );
    }
}

#[test]
fn hourly_conversion_averages_reciprocal_edges() {
    init_logging();
    let mut directed = DirectedNetwork::new();
    directed.add_weighted_edge(10, 20, "mean_travel_time", 300.0);
    directed.add_weighted_edge(20, 10, "mean_travel_time", 100.0);
    directed.add_weighted_edge(20, 30, "mean_travel_time", 60.0);

    let undirected = to_undirected_mean(&directed, "mean_travel_time");
    assert_eq!(
        undirected.edge_value(&10, &20, Some("mean_travel_time")),
        Some(200.0)
    );
    assert_eq!(
        undirected.edge_value(&20, &30, Some("mean_travel_time")),
        Some(60.0)
    );
}
