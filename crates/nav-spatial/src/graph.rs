//! Road graph representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_length_m`) are sorted by
//! source node and indexed by `EdgeId`.  Within one source node, edges keep
//! the order they were added in, so Dijkstra's expansion order is
//! reproducible.
//!
//! # Node identifiers
//!
//! Nodes get dense `NodeId`s.  Graphs built from a [`GraphProvider`] number
//! nodes in ascending order of the provider's external id, and keep the
//! external id around for callers that need to map back.
//!
//! # Spatial index
//!
//! Every graph embeds a [`SpatialIndex`] over all of its nodes, built in the
//! same pass as the CSR arrays.

use rustc_hash::FxHashMap;

use nav_core::{Coordinate, EdgeId, NetworkType, NodeId, Region};

use crate::index::{DistanceMetric, SpatialIndex};
use crate::provider::{GraphProvider, RawNetwork};
use crate::{SpatialError, SpatialResult};

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// Directed, non-negatively weighted road graph in CSR format plus a spatial
/// index for node snapping.
///
/// Fields are `pub` for direct indexed access on hot paths.  Do not
/// construct directly; use [`RoadGraph::build`] or [`RoadGraphBuilder`].
pub struct RoadGraph {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Geographic position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<Coordinate>,

    /// Provider identifier of each node.  Indexed by `NodeId`.
    pub node_external_id: Vec<i64>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId = position in sorted order) ──────────
    /// Source node of each edge.  Used to walk predecessor edges back to the
    /// source during path reconstruction.
    pub edge_from: Vec<NodeId>,

    /// Destination node of each edge.
    pub edge_to: Vec<NodeId>,

    /// Length of each edge in metres.  Always finite and `>= 0`.
    pub edge_length_m: Vec<f64>,

    external_lookup: FxHashMap<i64, NodeId>,
    spatial_idx:     SpatialIndex,
}

impl RoadGraph {
    /// Fetch raw data for `region` from `provider` and build a graph.
    ///
    /// # Errors
    ///
    /// - [`SpatialError::RegionInvalid`] if the provider rejects the polygon.
    /// - [`SpatialError::RegionEmpty`] if it returns no nodes.
    /// - [`SpatialError::Provider`] for provider I/O failures.
    /// - [`SpatialError::InvalidEdgeLength`] for negative or non-finite edge
    ///   lengths.
    pub fn build<P>(
        provider:     &P,
        region:       &Region,
        network_type: NetworkType,
        metric:       DistanceMetric,
    ) -> SpatialResult<RoadGraph>
    where
        P: GraphProvider + ?Sized,
    {
        let raw = provider.fetch(region, network_type)?;
        tracing::debug!(
            nodes = raw.nodes.len(),
            edges = raw.edges.len(),
            %network_type,
            "provider returned raw network"
        );
        let graph = Self::from_raw(raw, metric)?;
        tracing::info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            %network_type,
            "road graph built"
        );
        Ok(graph)
    }

    /// Build a graph directly from provider-shaped data.
    ///
    /// Nodes are numbered in ascending external-id order; a repeated external
    /// id keeps its first position.  Edges referencing unknown nodes are
    /// skipped.
    pub fn from_raw(raw: RawNetwork, metric: DistanceMetric) -> SpatialResult<RoadGraph> {
        let RawNetwork { mut nodes, edges } = raw;
        if nodes.is_empty() {
            return Err(SpatialError::RegionEmpty);
        }

        nodes.sort_by_key(|n| n.id);
        nodes.dedup_by_key(|n| n.id);

        let mut b = RoadGraphBuilder::with_capacity(nodes.len(), edges.len());
        for n in &nodes {
            b.add_external_node(n.id, n.pos);
        }

        let mut skipped = 0usize;
        for e in &edges {
            if !e.length_m.is_finite() || e.length_m < 0.0 {
                return Err(SpatialError::InvalidEdgeLength {
                    from:     e.from,
                    to:       e.to,
                    length_m: e.length_m,
                });
            }
            match (b.find_node(e.from), b.find_node(e.to)) {
                (Some(from), Some(to)) => b.add_directed_edge(from, to, e.length_m),
                _ => skipped += 1,
            }
        }
        if skipped > 0 {
            tracing::warn!(skipped, "dropped provider edges referencing unknown nodes");
        }

        b.build_with_metric(metric)
    }

    /// Construct an empty graph with no nodes or edges.
    ///
    /// Any snapping request against it fails with
    /// [`SpatialError::EmptyIndex`].
    pub fn empty() -> Self {
        RoadGraph {
            node_pos:         Vec::new(),
            node_external_id: Vec::new(),
            node_out_start:   vec![0],
            edge_from:        Vec::new(),
            edge_to:          Vec::new(),
            edge_length_m:    Vec::new(),
            external_lookup:  FxHashMap::default(),
            spatial_idx:      SpatialIndex::build(std::iter::empty(), DistanceMetric::default()),
        }
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    #[inline]
    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    ///
    /// Empty for nodes outside the graph.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let (start, end) = self.edge_range(node);
        (start..end).map(|i| EdgeId(i as u32))
    }

    /// Outgoing `(neighbour, length_m)` pairs of `node`.
    ///
    /// Empty for dead ends, isolated nodes, and ids outside the graph.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.out_edges(node)
            .map(|e| (self.edge_to[e.index()], self.edge_length_m[e.index()]))
    }

    /// Out-degree of `node` (number of outgoing edges).
    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let (start, end) = self.edge_range(node);
        end - start
    }

    #[inline]
    fn edge_range(&self, node: NodeId) -> (usize, usize) {
        if !self.contains_node(node) {
            return (0, 0);
        }
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start, end)
    }

    // ── Node lookups ──────────────────────────────────────────────────────

    /// Position of `node`.
    pub fn node_coordinate(&self, node: NodeId) -> SpatialResult<Coordinate> {
        self.node_pos
            .get(node.index())
            .copied()
            .ok_or(SpatialError::UnknownNode(node))
    }

    /// Provider identifier of `node`.
    pub fn external_id(&self, node: NodeId) -> SpatialResult<i64> {
        self.node_external_id
            .get(node.index())
            .copied()
            .ok_or(SpatialError::UnknownNode(node))
    }

    /// Dense `NodeId` for a provider identifier.
    pub fn find_node(&self, external_id: i64) -> Option<NodeId> {
        self.external_lookup.get(&external_id).copied()
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The index built over this graph's nodes.
    pub fn spatial_index(&self) -> &SpatialIndex {
        &self.spatial_idx
    }

    /// Return the `NodeId` of the nearest road node to `pos`.
    pub fn snap_to_node(&self, pos: Coordinate) -> SpatialResult<NodeId> {
        self.spatial_idx.nearest(pos)
    }
}

// ── RoadGraphBuilder ──────────────────────────────────────────────────────────

/// Construct a [`RoadGraph`] incrementally, then call [`build`](Self::build).
///
/// The builder accepts nodes and directed edges in any order.  `build()`
/// sorts edges by source node (stable, so insertion order survives within a
/// node), constructs the CSR arrays, and bulk-loads the spatial index.
///
/// # Example
///
/// ```
/// use nav_core::Coordinate;
/// use nav_spatial::RoadGraphBuilder;
///
/// let mut b = RoadGraphBuilder::new();
/// let a = b.add_node(Coordinate::new(40.71, -74.00));
/// let c = b.add_node(Coordinate::new(40.72, -74.00));
/// b.add_road(a, c, 1_112.0);
/// let graph = b.build().unwrap();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 2); // bidirectional
/// ```
pub struct RoadGraphBuilder {
    nodes:        Vec<Coordinate>,
    external_ids: Vec<i64>,
    lookup:       FxHashMap<i64, NodeId>,
    raw_edges:    Vec<BuilderEdge>,
}

struct BuilderEdge {
    from:     NodeId,
    to:       NodeId,
    length_m: f64,
}

impl RoadGraphBuilder {
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    /// Pre-allocate for the expected number of nodes and edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:        Vec::with_capacity(nodes),
            external_ids: Vec::with_capacity(nodes),
            lookup:       FxHashMap::with_capacity_and_hasher(nodes, Default::default()),
            raw_edges:    Vec::with_capacity(edges),
        }
    }

    /// Add a road node and return its `NodeId` (sequential from 0).
    ///
    /// The node's external id is its `NodeId` value.
    pub fn add_node(&mut self, pos: Coordinate) -> NodeId {
        let next = self.nodes.len() as i64;
        self.add_external_node(next, pos)
    }

    /// Add a node carrying a provider identifier.
    ///
    /// Adding the same external id twice returns the first node's id.
    pub fn add_external_node(&mut self, external_id: i64, pos: Coordinate) -> NodeId {
        if let Some(&id) = self.lookup.get(&external_id) {
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        self.external_ids.push(external_id);
        self.lookup.insert(external_id, id);
        id
    }

    /// `NodeId` previously assigned to `external_id`.
    pub fn find_node(&self, external_id: i64) -> Option<NodeId> {
        self.lookup.get(&external_id).copied()
    }

    /// Add a **directed** edge from `from` to `to` of `length_m` metres.
    ///
    /// Endpoints and length are validated by [`build`](Self::build).
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, length_m: f64) {
        self.raw_edges.push(BuilderEdge { from, to, length_m });
    }

    /// Convenience: add edges in **both directions** for a two-way street.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, length_m: f64) {
        self.add_directed_edge(a, b, length_m);
        self.add_directed_edge(b, a, length_m);
    }

    /// Position of a node added earlier.
    pub fn node_pos(&self, id: NodeId) -> Coordinate {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder using the default [`DistanceMetric::Planar`] index.
    pub fn build(self) -> SpatialResult<RoadGraph> {
        self.build_with_metric(DistanceMetric::default())
    }

    /// Consume the builder and produce a [`RoadGraph`].
    ///
    /// Fails with [`SpatialError::UnknownNode`] when an edge endpoint was
    /// never added, and [`SpatialError::InvalidEdgeLength`] for negative or
    /// non-finite lengths.
    ///
    /// Time complexity: O(E log E) for the edge sort + O(N log N) for the
    /// index bulk load.
    pub fn build_with_metric(self, metric: DistanceMetric) -> SpatialResult<RoadGraph> {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        for e in &self.raw_edges {
            for node in [e.from, e.to] {
                if node.index() >= node_count {
                    return Err(SpatialError::UnknownNode(node));
                }
            }
            if !e.length_m.is_finite() || e.length_m < 0.0 {
                return Err(SpatialError::InvalidEdgeLength {
                    from:     self.external_ids[e.from.index()],
                    to:       self.external_ids[e.to.index()],
                    length_m: e.length_m,
                });
            }
        }

        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from:     Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to:       Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_length_m: Vec<f64>    = raw.iter().map(|e| e.length_m).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        let spatial_idx = SpatialIndex::build(
            self.nodes
                .iter()
                .enumerate()
                .map(|(i, &pos)| (NodeId(i as u32), pos)),
            metric,
        );

        Ok(RoadGraph {
            node_pos: self.nodes,
            node_external_id: self.external_ids,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_m,
            external_lookup: self.lookup,
            spatial_idx,
        })
    }
}

impl Default for RoadGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
