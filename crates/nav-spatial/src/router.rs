//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! Callers route through the [`Router`] trait, so applications can swap in
//! other implementations (A*, contraction hierarchies) without touching the
//! session layer.  The default [`DijkstraRouter`] is exact for the
//! non-negative edge lengths every [`RoadGraph`] carries.
//!
//! # Point-to-point queries
//!
//! [`Router::shortest_path`] and [`Router::shortest_distance`] snap raw
//! coordinates to graph nodes through a [`SpatialIndex`] and then route
//! node-to-node.  The distance is the `length_m` of the same [`Path`], so the
//! two always agree.
//!
//! # Ties
//!
//! The heap is keyed by `(cost, insertion sequence)`: equal-cost entries pop
//! in the order they were pushed, and relaxation only accepts strictly
//! shorter costs.  Among several equally short paths the first one
//! discovered wins.  Callers must not assume the shortest path is unique.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::time::{Duration, Instant};

use nav_core::{Coordinate, EdgeId, NodeId};

use crate::graph::RoadGraph;
use crate::index::SpatialIndex;
use crate::{SpatialError, SpatialResult};

// ── Path ──────────────────────────────────────────────────────────────────────

/// The result of a routing query.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Nodes from source to target inclusive.  Never empty.
    pub nodes: Vec<NodeId>,
    /// Edges traversed, in order.  `edges.len() == nodes.len() - 1`.
    pub edges: Vec<EdgeId>,
    /// Sum of the traversed edge lengths in metres.
    pub length_m: f64,
}

impl Path {
    fn trivial(node: NodeId) -> Self {
        Self { nodes: vec![node], edges: vec![], length_m: 0.0 }
    }

    /// `true` if the source and target are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn source(&self) -> NodeId {
        self.nodes[0]
    }

    pub fn target(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    /// Ordered coordinates of the path's nodes.
    pub fn coordinates(&self, graph: &RoadGraph) -> SpatialResult<Vec<Coordinate>> {
        self.nodes.iter().map(|&n| graph.node_coordinate(n)).collect()
    }
}

// ── Search limits ─────────────────────────────────────────────────────────────

/// Shared flag for aborting in-flight searches from another thread.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, AtomicOrdering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(AtomicOrdering::Relaxed)
    }
}

/// Bounds on a single search, checked once per node expansion.
#[derive(Clone, Debug, Default)]
pub struct SearchLimits {
    pub deadline: Option<Instant>,
    pub cancel:   Option<CancelToken>,
}

impl SearchLimits {
    /// No deadline, no cancellation.
    pub fn none() -> Self {
        Self::default()
    }

    /// Deadline `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { deadline: Instant::now().checked_add(timeout), cancel: None }
    }

    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    #[inline]
    pub fn check(&self) -> SpatialResult<()> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(SpatialError::SearchCancelled);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(SpatialError::DeadlineExceeded);
        }
        Ok(())
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// Implementations must be `Send + Sync` so a single router can serve
/// concurrent queries over a shared graph.
pub trait Router: Send + Sync {
    /// Shortest path from node `from` to node `to`.
    ///
    /// `from == to` yields a single-node path of length 0.  Fails with
    /// [`SpatialError::NoPath`] when `to` is unreachable and
    /// [`SpatialError::UnknownNode`] when either id is not in `graph`.
    fn route(
        &self,
        graph:  &RoadGraph,
        from:   NodeId,
        to:     NodeId,
        limits: &SearchLimits,
    ) -> SpatialResult<Path>;

    /// Snap both points to their nearest nodes and route between them.
    fn shortest_path(
        &self,
        graph:  &RoadGraph,
        index:  &SpatialIndex,
        source: Coordinate,
        target: Coordinate,
    ) -> SpatialResult<Path> {
        self.shortest_path_with_limits(graph, index, source, target, &SearchLimits::none())
    }

    fn shortest_path_with_limits(
        &self,
        graph:  &RoadGraph,
        index:  &SpatialIndex,
        source: Coordinate,
        target: Coordinate,
        limits: &SearchLimits,
    ) -> SpatialResult<Path> {
        let s = index.nearest(source)?;
        let t = index.nearest(target)?;
        tracing::debug!(%source, %s, %target, %t, "snapped endpoints");
        self.route(graph, s, t, limits)
    }

    /// Length in metres of [`shortest_path`](Self::shortest_path).
    fn shortest_distance(
        &self,
        graph:  &RoadGraph,
        index:  &SpatialIndex,
        source: Coordinate,
        target: Coordinate,
    ) -> SpatialResult<f64> {
        self.shortest_path(graph, index, source, target).map(|p| p.length_m)
    }

    fn shortest_distance_with_limits(
        &self,
        graph:  &RoadGraph,
        index:  &SpatialIndex,
        source: Coordinate,
        target: Coordinate,
        limits: &SearchLimits,
    ) -> SpatialResult<f64> {
        self.shortest_path_with_limits(graph, index, source, target, limits)
            .map(|p| p.length_m)
    }
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the CSR road graph, weighted by
/// `edge_length_m`.
#[derive(Copy, Clone, Debug, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(
        &self,
        graph:  &RoadGraph,
        from:   NodeId,
        to:     NodeId,
        limits: &SearchLimits,
    ) -> SpatialResult<Path> {
        dijkstra(graph, from, to, limits)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Heap entry.  Ordered so that `BinaryHeap` (a max-heap) pops the lowest
/// cost first and, among equal costs, the earliest push.
#[derive(Copy, Clone, Debug)]
struct State {
    cost: f64,
    seq:  u64,
    node: NodeId,
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

fn dijkstra(
    graph:  &RoadGraph,
    from:   NodeId,
    to:     NodeId,
    limits: &SearchLimits,
) -> SpatialResult<Path> {
    for node in [from, to] {
        if !graph.contains_node(node) {
            return Err(SpatialError::UnknownNode(node));
        }
    }
    if from == to {
        return Ok(Path::trivial(from));
    }

    let n = graph.node_count();
    // dist[v] = best known length (m) to reach v.
    let mut dist      = vec![f64::INFINITY; n];
    // prev_edge[v] = EdgeId that reached v; EdgeId::INVALID for unreached nodes.
    let mut prev_edge = vec![EdgeId::INVALID; n];
    let mut settled   = vec![false; n];

    dist[from.index()] = 0.0;

    let mut seq = 0u64;
    let mut heap = BinaryHeap::new();
    heap.push(State { cost: 0.0, seq, node: from });

    while let Some(State { cost, node, .. }) = heap.pop() {
        if settled[node.index()] {
            continue;
        }
        limits.check()?;
        settled[node.index()] = true;

        if node == to {
            let path = reconstruct(graph, &prev_edge, from, to);
            tracing::debug!(%from, %to, hops = path.edges.len(), length_m = path.length_m, "route found");
            return Ok(path);
        }

        for edge in graph.out_edges(node) {
            let neighbor = graph.edge_to[edge.index()];
            if settled[neighbor.index()] {
                continue;
            }
            let new_cost = cost + graph.edge_length_m[edge.index()];

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                seq += 1;
                heap.push(State { cost: new_cost, seq, node: neighbor });
            }
        }
    }

    Err(SpatialError::NoPath { from, to })
}

fn reconstruct(graph: &RoadGraph, prev_edge: &[EdgeId], from: NodeId, to: NodeId) -> Path {
    let mut edges = Vec::new();
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        edges.push(e);
        cur = graph.edge_from[e.index()];
    }
    edges.reverse();

    let mut nodes = Vec::with_capacity(edges.len() + 1);
    nodes.push(from);
    nodes.extend(edges.iter().map(|e| graph.edge_to[e.index()]));

    // Summed in path order so the total matches a caller re-adding the
    // edge lengths front to back.
    let length_m = edges.iter().map(|e| graph.edge_length_m[e.index()]).sum();

    Path { nodes, edges, length_m }
}
