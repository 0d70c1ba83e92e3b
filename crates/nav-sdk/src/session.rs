//! The routing session: one graph, many queries.
//!
//! # States
//!
//! ```text
//!   Unbuilt ──build_graph ok──▶ Built ──build_graph ok──▶ Built (new graph)
//!      │                          │
//!      └──build_graph err──▶ Unbuilt   build_graph err ──▶ Built (old graph kept)
//! ```
//!
//! Every graph query fails with [`NavError::GraphNotBuilt`] while the session
//! is unbuilt.  Geocoding does not need a graph.
//!
//! # Concurrency
//!
//! Queries take `&self` and only read the immutable graph, so one session can
//! serve many threads at once.  Rebuilding takes `&mut self`, which
//! serializes builds.  [`RoutingSession::shared_graph`] hands out the graph
//! itself for callers that outlive the session borrow.

use std::sync::Arc;

use nav_core::{Coordinate, NodeId, Region};
use nav_spatial::{
    DijkstraRouter, GraphProvider, Path, RoadGraph, Router, SearchLimits, SpatialResult,
    distance_matrix,
};

use crate::geocode::Geocoder;
use crate::render::Renderer;
use crate::{NavError, NavResult, SessionConfig};

enum GraphState {
    Unbuilt,
    Built(Arc<RoadGraph>),
}

/// Owns a graph provider, a router, an optional geocoder and (once built)
/// the road graph.
///
/// Create via [`SessionBuilder`][crate::SessionBuilder].
pub struct RoutingSession<P: GraphProvider, R: Router = DijkstraRouter> {
    config:   SessionConfig,
    provider: P,
    router:   R,
    geocoder: Option<Box<dyn Geocoder>>,
    state:    GraphState,
}

impl<P: GraphProvider, R: Router> RoutingSession<P, R> {
    pub(crate) fn new(
        config:   SessionConfig,
        provider: P,
        router:   R,
        geocoder: Option<Box<dyn Geocoder>>,
    ) -> Self {
        Self { config, provider, router, geocoder, state: GraphState::Unbuilt }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_built(&self) -> bool {
        matches!(self.state, GraphState::Built(_))
    }

    // ── Graph construction ────────────────────────────────────────────────

    /// Validate `polygon` and build the session graph inside it.
    ///
    /// The ring may be open or closed.  Fails with
    /// [`SpatialError::RegionInvalid`](nav_spatial::SpatialError::RegionInvalid)
    /// for degenerate or self-intersecting polygons.
    pub fn build_graph(&mut self, polygon: &[Coordinate]) -> NavResult<()> {
        let region = Region::new(polygon.to_vec())?;
        self.build_graph_in(&region)
    }

    /// Build the session graph inside an already validated region.
    ///
    /// On success the previous graph (if any) is replaced wholesale; on
    /// failure the session is left as it was.
    pub fn build_graph_in(&mut self, region: &Region) -> NavResult<()> {
        let graph = RoadGraph::build(
            &self.provider,
            region,
            self.config.network_type,
            self.config.metric,
        )?;
        if self.is_built() {
            tracing::info!("replacing previously built graph");
        }
        self.state = GraphState::Built(Arc::new(graph));
        Ok(())
    }

    // ── Graph access ──────────────────────────────────────────────────────

    pub fn graph(&self) -> NavResult<&RoadGraph> {
        match &self.state {
            GraphState::Built(graph) => Ok(graph),
            GraphState::Unbuilt => Err(NavError::GraphNotBuilt),
        }
    }

    /// Reference-counted handle to the current graph.
    pub fn shared_graph(&self) -> NavResult<Arc<RoadGraph>> {
        match &self.state {
            GraphState::Built(graph) => Ok(Arc::clone(graph)),
            GraphState::Unbuilt => Err(NavError::GraphNotBuilt),
        }
    }

    pub fn nearest_node(&self, point: Coordinate) -> NavResult<NodeId> {
        Ok(self.graph()?.spatial_index().nearest(point)?)
    }

    pub fn node_coordinate(&self, node: NodeId) -> NavResult<Coordinate> {
        Ok(self.graph()?.node_coordinate(node)?)
    }

    /// Outgoing `(neighbour, length_m)` pairs of `node`.
    pub fn neighbors(&self, node: NodeId) -> NavResult<Vec<(NodeId, f64)>> {
        Ok(self.graph()?.neighbors(node).collect())
    }

    // ── Routing ───────────────────────────────────────────────────────────

    /// Shortest motorable path between the nodes nearest to `source` and
    /// `target`.
    pub fn motorable_path(&self, source: Coordinate, target: Coordinate) -> NavResult<Path> {
        self.motorable_path_with_limits(source, target, &self.config.search_limits())
    }

    pub fn motorable_path_with_limits(
        &self,
        source: Coordinate,
        target: Coordinate,
        limits: &SearchLimits,
    ) -> NavResult<Path> {
        let graph = self.graph()?;
        Ok(self
            .router
            .shortest_path_with_limits(graph, graph.spatial_index(), source, target, limits)?)
    }

    /// Length in metres of [`motorable_path`](Self::motorable_path).
    pub fn motorable_distance(&self, source: Coordinate, target: Coordinate) -> NavResult<f64> {
        self.motorable_distance_with_limits(source, target, &self.config.search_limits())
    }

    pub fn motorable_distance_with_limits(
        &self,
        source: Coordinate,
        target: Coordinate,
        limits: &SearchLimits,
    ) -> NavResult<f64> {
        let graph = self.graph()?;
        Ok(self
            .router
            .shortest_distance_with_limits(graph, graph.spatial_index(), source, target, limits)?)
    }

    /// Coordinates of a path's nodes, in order.
    pub fn path_coordinates(&self, path: &Path) -> NavResult<Vec<Coordinate>> {
        Ok(path.coordinates(self.graph()?)?)
    }

    /// Shortest distances from every source to every target.
    ///
    /// Individual unreachable pairs are reported per cell; the call itself
    /// only fails when no graph is built.  The configured `search_timeout`
    /// applies to each cell separately.
    pub fn distance_matrix(
        &self,
        sources: &[Coordinate],
        targets: &[Coordinate],
    ) -> NavResult<Vec<Vec<SpatialResult<f64>>>> {
        let graph = self.graph()?;
        Ok(distance_matrix(
            &self.router,
            graph,
            graph.spatial_index(),
            sources,
            targets,
            || self.config.search_limits(),
        ))
    }

    // ── Collaborators ─────────────────────────────────────────────────────

    /// Resolve a free-text address with the configured geocoder.
    pub fn geocode(&self, address: &str) -> NavResult<Coordinate> {
        let geocoder = self.geocoder.as_deref().ok_or(NavError::NoGeocoder)?;
        Ok(geocoder.geocode(address)?)
    }

    /// Hand the current graph to `renderer`.
    pub fn render(&self, renderer: &mut dyn Renderer) -> NavResult<()> {
        renderer.render(self.graph()?)?;
        Ok(())
    }
}
