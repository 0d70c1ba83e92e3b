//! Unit tests for nav-spatial.
//!
//! All tests use hand-crafted or synthetic networks so they run without any
//! OSM file.

#[cfg(test)]
mod helpers {
    use nav_core::{Coordinate, NodeId, Region};
    use crate::{RoadGraph, RoadGraphBuilder};

    /// Build a small grid graph for testing.
    ///
    /// Nodes (lat, lon):
    ///   0:(0,0)  1:(0,1)  2:(0,2)
    ///   3:(1,0)           4:(1,2)
    ///
    /// Two-way roads: 0-1, 1-2, 0-3, 2-4, 3-4
    ///
    /// Shortest path 0→4 by length:
    ///   0→1→2→4 = 300 m  vs  0→3→4 = 600 m
    pub fn grid_graph() -> (RoadGraph, [NodeId; 5]) {
        let mut b = RoadGraphBuilder::new();

        let n0 = b.add_node(Coordinate::new(0.0, 0.0));
        let n1 = b.add_node(Coordinate::new(0.0, 1.0));
        let n2 = b.add_node(Coordinate::new(0.0, 2.0));
        let n3 = b.add_node(Coordinate::new(1.0, 0.0));
        let n4 = b.add_node(Coordinate::new(1.0, 2.0));

        b.add_road(n0, n1, 100.0);
        b.add_road(n1, n2, 100.0);
        b.add_road(n2, n4, 100.0);
        b.add_road(n0, n3, 500.0); // long detour
        b.add_road(n3, n4, 100.0);

        (b.build().unwrap(), [n0, n1, n2, n3, n4])
    }

    pub fn unit_square() -> Region {
        Region::new(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(1.0, 0.0),
            Coordinate::new(1.0, 1.0),
            Coordinate::new(0.0, 1.0),
        ])
        .unwrap()
    }
}

// ── Builder & graph structure ─────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use nav_core::{Coordinate, NodeId};
    use crate::{RoadGraphBuilder, SpatialError};

    #[test]
    fn empty_build() {
        let graph = RoadGraphBuilder::new().build().unwrap();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.is_empty());
        assert!(graph.spatial_index().is_empty());
    }

    #[test]
    fn single_road() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(Coordinate::new(30.0, -88.0));
        let c = b.add_node(Coordinate::new(30.1, -88.0));
        b.add_road(a, c, 11_120.0);
        let graph = b.build().unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 2); // bidirectional
    }

    #[test]
    fn csr_out_degrees() {
        let (graph, [n0, n1, n2, n3, n4]) = super::helpers::grid_graph();
        assert_eq!(graph.out_degree(n0), 2); // n0→n1, n0→n3
        assert_eq!(graph.out_degree(n1), 2);
        assert_eq!(graph.out_degree(n2), 2);
        assert_eq!(graph.out_degree(n3), 2);
        assert_eq!(graph.out_degree(n4), 2);
        for e in graph.out_edges(n0) {
            assert_eq!(graph.edge_from[e.index()], n0);
        }
    }

    #[test]
    fn neighbors_carry_lengths_in_insertion_order() {
        let (graph, [n0, n1, _, n3, _]) = super::helpers::grid_graph();
        let out: Vec<_> = graph.neighbors(n0).collect();
        assert_eq!(out, vec![(n1, 100.0), (n3, 500.0)]);
    }

    #[test]
    fn neighbors_of_dead_end_and_unknown_are_empty() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(Coordinate::new(0.0, 0.0));
        let c = b.add_node(Coordinate::new(0.0, 1.0));
        b.add_directed_edge(a, c, 100.0);
        let graph = b.build().unwrap();

        assert_eq!(graph.neighbors(c).count(), 0);
        assert_eq!(graph.neighbors(NodeId(99)).count(), 0);
        assert_eq!(graph.out_degree(NodeId(99)), 0);
    }

    #[test]
    fn directed_only_edge() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(Coordinate::new(0.0, 0.0));
        let c = b.add_node(Coordinate::new(0.0, 1.0));
        b.add_directed_edge(a, c, 100.0);
        let graph = b.build().unwrap();
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.out_degree(a), 1);
        assert_eq!(graph.out_degree(c), 0);
    }

    #[test]
    fn node_coordinate_lookup() {
        let (graph, [_, n1, ..]) = super::helpers::grid_graph();
        assert_eq!(graph.node_coordinate(n1).unwrap(), Coordinate::new(0.0, 1.0));
        assert!(matches!(
            graph.node_coordinate(NodeId(5)),
            Err(SpatialError::UnknownNode(NodeId(5)))
        ));
    }

    #[test]
    fn external_ids_deduplicate() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_external_node(9_001, Coordinate::new(0.0, 0.0));
        let again = b.add_external_node(9_001, Coordinate::new(5.0, 5.0));
        assert_eq!(a, again);
        assert_eq!(b.node_count(), 1);
        let graph = b.build().unwrap();
        assert_eq!(graph.find_node(9_001), Some(a));
        assert_eq!(graph.external_id(a).unwrap(), 9_001);
        assert_eq!(graph.node_coordinate(a).unwrap(), Coordinate::new(0.0, 0.0));
    }

    #[test]
    fn dangling_endpoint_rejected() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(Coordinate::new(0.0, 0.0));
        b.add_node(Coordinate::new(0.0, 1.0));
        b.add_directed_edge(a, NodeId(9), 5.0);
        assert!(matches!(b.build(), Err(SpatialError::UnknownNode(NodeId(9)))));
    }

    #[test]
    fn non_finite_length_rejected() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(Coordinate::new(0.0, 0.0));
        let c = b.add_node(Coordinate::new(0.0, 1.0));
        b.add_directed_edge(a, c, f64::NAN);
        assert!(matches!(
            b.build(),
            Err(SpatialError::InvalidEdgeLength { from: 0, to: 1, .. })
        ));
    }

    #[test]
    fn negative_length_rejected() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(Coordinate::new(0.0, 0.0));
        let c = b.add_node(Coordinate::new(0.0, 1.0));
        let d = b.add_node(Coordinate::new(0.0, 2.0));
        b.add_directed_edge(a, c, 10.0);
        b.add_directed_edge(c, d, -500.0);
        assert!(matches!(
            b.build(),
            Err(SpatialError::InvalidEdgeLength { from: 1, to: 2, length_m }) if length_m == -500.0
        ));
    }
}

// ── Provider data → graph ─────────────────────────────────────────────────────

#[cfg(test)]
mod from_raw {
    use nav_core::{Coordinate, NodeId};
    use crate::{DistanceMetric, RawEdge, RawNetwork, RawNode, RoadGraph, SpatialError};

    fn node(id: i64, lat: f64, lon: f64) -> RawNode {
        RawNode { id, pos: Coordinate::new(lat, lon) }
    }

    fn edge(from: i64, to: i64, length_m: f64) -> RawEdge {
        RawEdge { from, to, length_m }
    }

    #[test]
    fn nodes_numbered_by_external_id() {
        let raw = RawNetwork {
            nodes: vec![node(30, 0.0, 0.2), node(10, 0.0, 0.0), node(20, 0.0, 0.1)],
            edges: vec![edge(10, 20, 5.0), edge(20, 30, 7.0)],
        };
        let graph = RoadGraph::from_raw(raw, DistanceMetric::Planar).unwrap();
        assert_eq!(graph.node_external_id, vec![10, 20, 30]);
        assert_eq!(graph.find_node(30), Some(NodeId(2)));
        assert_eq!(graph.neighbors(NodeId(0)).collect::<Vec<_>>(), vec![(NodeId(1), 5.0)]);
    }

    #[test]
    fn duplicate_external_ids_keep_first() {
        let raw = RawNetwork {
            nodes: vec![node(1, 0.0, 0.0), node(1, 9.0, 9.0), node(2, 0.0, 1.0)],
            edges: vec![],
        };
        let graph = RoadGraph::from_raw(raw, DistanceMetric::Planar).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.spatial_index().len(), 2);
        assert_eq!(graph.node_coordinate(NodeId(0)).unwrap(), Coordinate::new(0.0, 0.0));
    }

    #[test]
    fn dangling_edges_are_skipped() {
        let raw = RawNetwork {
            nodes: vec![node(1, 0.0, 0.0), node(2, 0.0, 1.0)],
            edges: vec![edge(1, 2, 10.0), edge(2, 3, 10.0), edge(4, 1, 10.0)],
        };
        let graph = RoadGraph::from_raw(raw, DistanceMetric::Planar).unwrap();
        assert_eq!(graph.edge_count(), 1);
        for (&from, &to) in graph.edge_from.iter().zip(&graph.edge_to) {
            assert!(graph.contains_node(from) && graph.contains_node(to));
        }
    }

    #[test]
    fn negative_length_rejected() {
        let raw = RawNetwork {
            nodes: vec![node(1, 0.0, 0.0), node(2, 0.0, 1.0)],
            edges: vec![edge(1, 2, -1.0)],
        };
        let err = RoadGraph::from_raw(raw, DistanceMetric::Planar).err().unwrap();
        assert!(matches!(err, SpatialError::InvalidEdgeLength { from: 1, to: 2, .. }));
    }

    #[test]
    fn nan_length_rejected() {
        let raw = RawNetwork {
            nodes: vec![node(1, 0.0, 0.0), node(2, 0.0, 1.0)],
            edges: vec![edge(1, 2, f64::NAN)],
        };
        assert!(matches!(
            RoadGraph::from_raw(raw, DistanceMetric::Planar),
            Err(SpatialError::InvalidEdgeLength { .. })
        ));
    }

    #[test]
    fn zero_nodes_is_region_empty() {
        let result = RoadGraph::from_raw(RawNetwork::default(), DistanceMetric::Planar);
        assert!(matches!(result, Err(SpatialError::RegionEmpty)));
    }
}

// ── Spatial index ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod index {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use nav_core::{Coordinate, NodeId};
    use crate::{DistanceMetric, RoadGraphBuilder, SpatialError, SpatialIndex};

    #[test]
    fn snap_exact_position() {
        let (graph, [n0, ..]) = super::helpers::grid_graph();
        assert_eq!(graph.snap_to_node(Coordinate::new(0.0, 0.0)).unwrap(), n0);
    }

    #[test]
    fn snap_nearest() {
        let (graph, [n0, n1, ..]) = super::helpers::grid_graph();
        let index = graph.spatial_index();
        assert_eq!(index.nearest(Coordinate::new(0.0, 0.4)).unwrap(), n0);
        assert_eq!(index.nearest(Coordinate::new(0.0, 0.6)).unwrap(), n1);
    }

    #[test]
    fn empty_index_errors() {
        let graph = RoadGraphBuilder::new().build().unwrap();
        assert!(matches!(
            graph.snap_to_node(Coordinate::new(0.0, 0.0)),
            Err(SpatialError::EmptyIndex)
        ));
        let index = SpatialIndex::build(std::iter::empty(), DistanceMetric::Haversine);
        assert!(matches!(index.nearest(Coordinate::new(0.0, 0.0)), Err(SpatialError::EmptyIndex)));
    }

    #[test]
    fn exact_tie_resolves_to_lowest_id() {
        // Query point is exactly halfway between the two nodes.
        let index = SpatialIndex::build(
            [
                (NodeId(7), Coordinate::new(0.0, 1.0)),
                (NodeId(3), Coordinate::new(0.0, -1.0)),
            ],
            DistanceMetric::Planar,
        );
        assert_eq!(index.nearest(Coordinate::new(0.0, 0.0)).unwrap(), NodeId(3));
    }

    #[test]
    fn coincident_nodes_resolve_to_lowest_id() {
        let p = Coordinate::new(51.5, -0.12);
        for metric in [DistanceMetric::Planar, DistanceMetric::Haversine] {
            let index = SpatialIndex::build(
                [(NodeId(4), p), (NodeId(2), p), (NodeId(9), p)],
                metric,
            );
            assert_eq!(index.nearest(Coordinate::new(51.6, -0.1)).unwrap(), NodeId(2));
        }
    }

    #[test]
    fn one_entry_per_node() {
        let index = SpatialIndex::build(
            [
                (NodeId(1), Coordinate::new(0.0, 0.0)),
                (NodeId(1), Coordinate::new(1.0, 1.0)),
                (NodeId(2), Coordinate::new(2.0, 2.0)),
            ],
            DistanceMetric::Planar,
        );
        assert_eq!(index.len(), 2);
        assert_eq!(index.nearest(Coordinate::new(1.0, 1.0)).unwrap(), NodeId(1));
        assert_eq!(
            index.iter().collect::<Vec<_>>(),
            vec![(NodeId(1), Coordinate::new(0.0, 0.0)), (NodeId(2), Coordinate::new(2.0, 2.0))]
        );
    }

    #[test]
    fn k_nearest_order() {
        let (graph, nodes) = super::helpers::grid_graph();
        let nearest = graph.spatial_index().k_nearest(Coordinate::new(0.0, 0.0), 2);
        assert_eq!(nearest[0], nodes[0]); // exact
        // n1 and n3 are both one degree away; near the equator either may come first.
        assert!(nearest[1] == nodes[1] || nearest[1] == nodes[3]);
    }

    #[test]
    fn distance_to_unknown_node() {
        let (graph, _) = super::helpers::grid_graph();
        assert!(matches!(
            graph.spatial_index().distance_to(NodeId(42), Coordinate::new(0.0, 0.0)),
            Err(SpatialError::UnknownNode(NodeId(42)))
        ));
    }

    /// `nearest` must never lose to any other node, checked by brute force.
    fn brute_force_check(metric: DistanceMetric) {
        let mut rng = SmallRng::seed_from_u64(7);
        let nodes: Vec<(NodeId, Coordinate)> = (0..300)
            .map(|i| {
                let c = Coordinate::new(rng.gen_range(40.70..40.80), rng.gen_range(-74.02..-73.92));
                (NodeId(i), c)
            })
            .collect();
        let index = SpatialIndex::build(nodes.iter().copied(), metric);
        assert_eq!(index.len(), nodes.len());

        for _ in 0..200 {
            let q = Coordinate::new(rng.gen_range(40.68..40.82), rng.gen_range(-74.04..-73.90));
            let best = index.nearest(q).unwrap();
            let best_d = index.distance_to(best, q).unwrap();
            for &(other, _) in &nodes {
                let d = index.distance_to(other, q).unwrap();
                assert!(best_d <= d + 1e-6, "{metric:?}: {best} at {best_d} m loses to {other} at {d} m");
            }
        }
    }

    #[test]
    fn brute_force_planar() {
        brute_force_check(DistanceMetric::Planar);
    }

    #[test]
    fn brute_force_haversine() {
        brute_force_check(DistanceMetric::Haversine);
    }

    #[test]
    fn haversine_metric_reports_great_circle_metres() {
        let a = Coordinate::new(30.0, -88.0);
        let index = SpatialIndex::build([(NodeId(0), a)], DistanceMetric::Haversine);
        let q = Coordinate::new(31.0, -88.0);
        assert_eq!(index.metric(), DistanceMetric::Haversine);
        assert_eq!(index.distance_to(NodeId(0), q).unwrap(), a.distance_m(q));
    }
}

// ── Dijkstra routing ──────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use std::time::{Duration, Instant};

    use nav_core::{Coordinate, NodeId};
    use crate::{
        CancelToken, DijkstraRouter, RoadGraphBuilder, Router, SearchLimits, SpatialError,
    };

    #[test]
    fn trivial_same_node() {
        let (graph, [n0, ..]) = super::helpers::grid_graph();
        let path = DijkstraRouter.route(&graph, n0, n0, &SearchLimits::none()).unwrap();
        assert!(path.is_trivial());
        assert_eq!(path.nodes, vec![n0]);
        assert_eq!(path.length_m, 0.0);
    }

    #[test]
    fn shortest_path_correct() {
        let (graph, [n0, n1, n2, _, n4]) = super::helpers::grid_graph();
        let path = DijkstraRouter.route(&graph, n0, n4, &SearchLimits::none()).unwrap();

        assert_eq!(path.nodes, vec![n0, n1, n2, n4]);
        assert_eq!(path.edges.len(), 3);
        assert_eq!(path.length_m, 300.0);
        assert_eq!(path.source(), n0);
        assert_eq!(path.target(), n4);

        // Consecutive nodes are joined by the recorded edges.
        for (w, e) in path.nodes.windows(2).zip(&path.edges) {
            assert_eq!(graph.edge_from[e.index()], w[0]);
            assert_eq!(graph.edge_to[e.index()], w[1]);
        }
    }

    #[test]
    fn distance_equals_summed_path_weights() {
        let (graph, _) = super::helpers::grid_graph();
        let index = graph.spatial_index();
        let a = Coordinate::new(0.1, 0.1);
        let b = Coordinate::new(0.9, 1.9);

        let path = DijkstraRouter.shortest_path(&graph, index, a, b).unwrap();
        let dist = DijkstraRouter.shortest_distance(&graph, index, a, b).unwrap();
        let summed = path
            .edges
            .iter()
            .fold(0.0, |acc, e| acc + graph.edge_length_m[e.index()]);
        assert_eq!(dist, summed);
        assert_eq!(path.source(), index.nearest(a).unwrap());
        assert_eq!(path.target(), index.nearest(b).unwrap());
    }

    #[test]
    fn distance_equals_summed_path_weights_for_all_pairs() {
        use crate::{GraphProvider, GridProvider, RoadGraph};
        use nav_core::NetworkType;

        let region = super::helpers::unit_square();
        let raw = GridProvider::new(6, 6)
            .with_jitter(0.3, 11)
            .fetch(&region, NetworkType::Walk)
            .unwrap();
        let graph = RoadGraph::from_raw(raw, crate::DistanceMetric::Planar).unwrap();
        let index = graph.spatial_index();

        let nodes: Vec<_> = index.iter().collect();
        for &(from, from_pos) in &nodes {
            for &(to, to_pos) in &nodes {
                let path = match DijkstraRouter.route(&graph, from, to, &SearchLimits::none()) {
                    Ok(path) => path,
                    Err(SpatialError::NoPath { .. }) => continue,
                    Err(e) => panic!("{from} → {to}: {e}"),
                };
                let summed = path
                    .edges
                    .iter()
                    .fold(0.0, |acc, e| acc + graph.edge_length_m[e.index()]);
                assert_eq!(path.length_m, summed, "{from} → {to}");

                let dist = DijkstraRouter
                    .shortest_distance(&graph, index, from_pos, to_pos)
                    .unwrap();
                assert_eq!(dist, summed, "{from} → {to}");
            }
        }
    }

    #[test]
    fn same_point_is_single_node_zero_distance() {
        let (graph, _) = super::helpers::grid_graph();
        let index = graph.spatial_index();
        let a = Coordinate::new(0.2, 1.1);
        let path = DijkstraRouter.shortest_path(&graph, index, a, a).unwrap();
        assert_eq!(path.nodes.len(), 1);
        assert_eq!(DijkstraRouter.shortest_distance(&graph, index, a, a).unwrap(), 0.0);
    }

    #[test]
    fn no_path_disconnected() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(Coordinate::new(0.0, 0.0));
        let c = b.add_node(Coordinate::new(1.0, 0.0));
        let graph = b.build().unwrap();
        let result = DijkstraRouter.route(&graph, a, c, &SearchLimits::none());
        assert!(matches!(result, Err(SpatialError::NoPath { from, to }) if from == a && to == c));

        let index = graph.spatial_index();
        let result = DijkstraRouter.shortest_distance(
            &graph, index, Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0),
        );
        assert!(matches!(result, Err(SpatialError::NoPath { .. })));
    }

    #[test]
    fn directed_one_way_blocks_return() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(Coordinate::new(0.0, 0.0));
        let c = b.add_node(Coordinate::new(0.0, 1.0));
        b.add_directed_edge(a, c, 100.0);
        let graph = b.build().unwrap();

        assert!(DijkstraRouter.route(&graph, a, c, &SearchLimits::none()).is_ok());
        assert!(matches!(
            DijkstraRouter.route(&graph, c, a, &SearchLimits::none()),
            Err(SpatialError::NoPath { .. })
        ));
    }

    #[test]
    fn unknown_endpoint() {
        let (graph, [n0, ..]) = super::helpers::grid_graph();
        let result = DijkstraRouter.route(&graph, n0, NodeId(77), &SearchLimits::none());
        assert!(matches!(result, Err(SpatialError::UnknownNode(NodeId(77)))));
    }

    #[test]
    fn equal_length_tie_goes_to_first_discovered() {
        //     1
        //   ╱   ╲
        //  0     3      both branches 200 m
        //   ╲   ╱
        //     2
        let mut b = RoadGraphBuilder::new();
        let n0 = b.add_node(Coordinate::new(0.0, 0.0));
        let n1 = b.add_node(Coordinate::new(0.001, 0.001));
        let n2 = b.add_node(Coordinate::new(-0.001, 0.001));
        let n3 = b.add_node(Coordinate::new(0.0, 0.002));
        b.add_directed_edge(n0, n1, 100.0);
        b.add_directed_edge(n0, n2, 100.0);
        b.add_directed_edge(n1, n3, 100.0);
        b.add_directed_edge(n2, n3, 100.0);
        let graph = b.build().unwrap();

        let path = DijkstraRouter.route(&graph, n0, n3, &SearchLimits::none()).unwrap();
        assert_eq!(path.nodes, vec![n0, n1, n3]);
        assert_eq!(path.length_m, 200.0);
    }

    #[test]
    fn zero_length_edges() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(Coordinate::new(0.0, 0.0));
        let c = b.add_node(Coordinate::new(0.0, 0.0));
        let d = b.add_node(Coordinate::new(0.0, 0.001));
        b.add_road(a, c, 0.0);
        b.add_road(c, d, 111.0);
        let graph = b.build().unwrap();
        let path = DijkstraRouter.route(&graph, a, d, &SearchLimits::none()).unwrap();
        assert_eq!(path.nodes, vec![a, c, d]);
        assert_eq!(path.length_m, 111.0);
    }

    #[test]
    fn parallel_edges_use_shorter() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(Coordinate::new(0.0, 0.0));
        let c = b.add_node(Coordinate::new(0.0, 0.01));
        b.add_directed_edge(a, c, 900.0);
        b.add_directed_edge(a, c, 400.0);
        let graph = b.build().unwrap();
        let path = DijkstraRouter.route(&graph, a, c, &SearchLimits::none()).unwrap();
        assert_eq!(path.length_m, 400.0);
        assert_eq!(graph.edge_length_m[path.edges[0].index()], 400.0);
    }

    #[test]
    fn cancelled_search_aborts() {
        let (graph, [n0, _, _, _, n4]) = super::helpers::grid_graph();
        let token = CancelToken::new();
        token.cancel();
        let limits = SearchLimits::none().cancel_token(token);
        assert!(matches!(
            DijkstraRouter.route(&graph, n0, n4, &limits),
            Err(SpatialError::SearchCancelled)
        ));
    }

    #[test]
    fn expired_deadline_aborts() {
        let (graph, [n0, _, _, _, n4]) = super::helpers::grid_graph();
        let limits = SearchLimits { deadline: Some(Instant::now()), cancel: None };
        assert!(matches!(
            DijkstraRouter.route(&graph, n0, n4, &limits),
            Err(SpatialError::DeadlineExceeded)
        ));
        // A generous timeout does not interfere.
        let limits = SearchLimits::with_timeout(Duration::from_secs(60));
        assert!(DijkstraRouter.route(&graph, n0, n4, &limits).is_ok());
    }

    #[test]
    fn path_coordinates() {
        let (graph, [n0, n1, _, _, _]) = super::helpers::grid_graph();
        let path = DijkstraRouter.route(&graph, n0, n1, &SearchLimits::none()).unwrap();
        assert_eq!(
            path.coordinates(&graph).unwrap(),
            vec![Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0)]
        );
    }
}

// ── Providers ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod providers {
    use nav_core::{Coordinate, NetworkType, Region};
    use crate::{
        DijkstraRouter, DistanceMetric, GraphProvider, GridProvider, ProviderError, RawEdge,
        RawNetwork, RawNode, RoadGraph, Router, SpatialError, StaticProvider,
    };

    #[test]
    fn static_provider_clips_to_region() {
        let provider = StaticProvider::new(RawNetwork {
            nodes: vec![
                RawNode { id: 1, pos: Coordinate::new(0.2, 0.2) },
                RawNode { id: 2, pos: Coordinate::new(0.8, 0.8) },
                RawNode { id: 3, pos: Coordinate::new(5.0, 5.0) },
            ],
            edges: vec![
                RawEdge { from: 1, to: 2, length_m: 10.0 },
                RawEdge { from: 2, to: 3, length_m: 10.0 },
            ],
        });
        let raw = provider.fetch(&super::helpers::unit_square(), NetworkType::Drive).unwrap();
        assert_eq!(raw.nodes.len(), 2);
        assert_eq!(raw.edges, vec![RawEdge { from: 1, to: 2, length_m: 10.0 }]);
    }

    #[test]
    fn static_provider_outside_region_is_empty() {
        let provider = StaticProvider::new(RawNetwork {
            nodes: vec![RawNode { id: 1, pos: Coordinate::new(5.0, 5.0) }],
            edges: vec![],
        });
        let region = super::helpers::unit_square();
        assert!(matches!(
            provider.fetch(&region, NetworkType::Drive),
            Err(ProviderError::EmptyRegion)
        ));
        assert!(matches!(
            RoadGraph::build(&provider, &region, NetworkType::Drive, DistanceMetric::Planar),
            Err(SpatialError::RegionEmpty)
        ));
    }

    #[test]
    fn index_size_matches_node_count() {
        let region = super::helpers::unit_square();
        for metric in [DistanceMetric::Planar, DistanceMetric::Haversine] {
            let graph = RoadGraph::build(&GridProvider::new(6, 9), &region, NetworkType::Drive, metric)
                .unwrap();
            assert_eq!(graph.node_count(), 54);
            assert_eq!(graph.spatial_index().len(), graph.node_count());
            assert_eq!(graph.spatial_index().metric(), metric);
        }
    }

    #[test]
    fn grid_streets_are_two_way() {
        let raw = GridProvider::new(3, 3)
            .fetch(&super::helpers::unit_square(), NetworkType::Drive)
            .unwrap();
        assert_eq!(raw.nodes.len(), 9);
        // 12 street segments, both directions.
        assert_eq!(raw.edges.len(), 24);
    }

    #[test]
    fn walk_network_adds_diagonals() {
        let region = super::helpers::unit_square();
        let provider = GridProvider::new(3, 3);
        let drive = provider.fetch(&region, NetworkType::Drive).unwrap();
        let walk = provider.fetch(&region, NetworkType::Walk).unwrap();
        assert_eq!(walk.edges.len(), drive.edges.len() + 8);
    }

    #[test]
    fn grid_respects_concave_region() {
        // L-shape: no lattice point in the open upper-right quadrant.
        let region = Region::new(vec![
            Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 2.0), Coordinate::new(1.0, 2.0),
            Coordinate::new(1.0, 1.0), Coordinate::new(2.0, 1.0), Coordinate::new(2.0, 0.0),
        ])
        .unwrap();
        let raw = GridProvider::new(5, 5).fetch(&region, NetworkType::Drive).unwrap();
        assert!(raw.nodes.iter().all(|n| region.contains(n.pos)));
        assert_eq!(raw.nodes.len(), 25 - 4);
    }

    #[test]
    fn jitter_is_seeded() {
        let region = super::helpers::unit_square();
        let a = GridProvider::new(5, 5).with_jitter(0.3, 11).fetch(&region, NetworkType::Drive).unwrap();
        let b = GridProvider::new(5, 5).with_jitter(0.3, 11).fetch(&region, NetworkType::Drive).unwrap();
        assert_eq!(a.nodes, b.nodes);
        assert!(a.nodes.iter().all(|n| region.contains(n.pos)));
    }

    /// Unit square, "drive", (0.1, 0.1) → (0.9, 0.9).
    #[test]
    fn unit_square_end_to_end() {
        let region = super::helpers::unit_square();
        let graph = RoadGraph::build(
            &GridProvider::new(11, 11).with_jitter(0.2, 3),
            &region,
            "drive".parse().unwrap(),
            DistanceMetric::Planar,
        )
        .unwrap();
        let index = graph.spatial_index();
        let source = Coordinate::new(0.1, 0.1);
        let target = Coordinate::new(0.9, 0.9);

        let path = DijkstraRouter.shortest_path(&graph, index, source, target).unwrap();
        assert!(!path.nodes.is_empty());
        assert_eq!(path.nodes[0], index.nearest(source).unwrap());
        assert_eq!(*path.nodes.last().unwrap(), index.nearest(target).unwrap());

        let dist = DijkstraRouter.shortest_distance(&graph, index, source, target).unwrap();
        assert!(dist.is_finite() && dist > 0.0);
        let summed = path.edges.iter().fold(0.0, |acc, e| acc + graph.edge_length_m[e.index()]);
        assert_eq!(dist, summed);
    }
}

// ── Distance matrix ───────────────────────────────────────────────────────────

#[cfg(test)]
mod matrix {
    use nav_core::Coordinate;
    use crate::{distance_matrix, DijkstraRouter, Router, SearchLimits};

    #[test]
    fn matches_pairwise_queries() {
        let (graph, _) = super::helpers::grid_graph();
        let index = graph.spatial_index();
        let points = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 2.0),
            Coordinate::new(1.0, 0.1),
        ];

        let m = distance_matrix(&DijkstraRouter, &graph, index, &points, &points, SearchLimits::none);
        assert_eq!(m.len(), 3);
        for (i, row) in m.iter().enumerate() {
            assert_eq!(row.len(), 3);
            assert_eq!(*row[i].as_ref().unwrap(), 0.0);
            for (j, cell) in row.iter().enumerate() {
                let expected = DijkstraRouter
                    .shortest_distance(&graph, index, points[i], points[j])
                    .unwrap();
                assert_eq!(*cell.as_ref().unwrap(), expected);
            }
        }
        assert_eq!(*m[0][1].as_ref().unwrap(), 200.0);
    }
}

#[cfg(all(test, feature = "osm"))]
mod osm_filter {
    use nav_core::NetworkType;
    use crate::osm::{PbfProvider, allows_highway};
    use crate::{GraphProvider, ProviderError};

    #[test]
    fn drive_keeps_only_car_roads() {
        assert!(allows_highway(NetworkType::Drive, "residential", &[]));
        assert!(allows_highway(NetworkType::Drive, "motorway", &[]));
        assert!(!allows_highway(NetworkType::Drive, "footway", &[]));
        assert!(!allows_highway(NetworkType::Drive, "service", &[]));
        assert!(allows_highway(NetworkType::DriveService, "service", &[]));
    }

    #[test]
    fn access_and_mode_tags() {
        assert!(!allows_highway(NetworkType::Drive, "primary", &[("access", "private")]));
        assert!(!allows_highway(NetworkType::Walk, "pedestrian", &[("area", "yes")]));
        assert!(!allows_highway(NetworkType::Walk, "residential", &[("foot", "no")]));
        assert!(allows_highway(NetworkType::Walk, "footway", &[]));
        assert!(!allows_highway(NetworkType::Walk, "motorway", &[]));
        assert!(allows_highway(NetworkType::Bike, "cycleway", &[]));
        assert!(!allows_highway(NetworkType::Bike, "steps", &[]));
        assert!(!allows_highway(NetworkType::All, "construction", &[]));
    }

    #[test]
    fn missing_file_is_unavailable() {
        let provider = PbfProvider::new("does/not/exist.osm.pbf");
        let region = super::helpers::unit_square();
        let err = provider.fetch(&region, NetworkType::Drive).unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable(_)));
    }
}
