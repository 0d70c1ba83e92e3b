//! Graph data providers.
//!
//! A [`GraphProvider`] turns a region polygon plus a network-type filter into
//! raw nodes and edges.  [`RoadGraph::build`](crate::RoadGraph::build) only
//! depends on this data shape, never on how a provider obtains it.
//!
//! | Provider           | Source                                        |
//! |--------------------|-----------------------------------------------|
//! | [`StaticProvider`] | In-memory network, clipped to the region      |
//! | [`GridProvider`]   | Synthetic street lattice over the region      |
//! | `PbfProvider`      | OSM PBF extract (feature = `"osm"` only)      |

mod grid;
mod static_provider;

pub use grid::GridProvider;
pub use static_provider::StaticProvider;

use thiserror::Error;

use nav_core::{Coordinate, NetworkType, Region};

use crate::SpatialError;

// ── Raw data shape ────────────────────────────────────────────────────────────

/// A node as emitted by a provider.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawNode {
    /// Provider identifier; unique within one response.
    pub id:  i64,
    pub pos: Coordinate,
}

/// A directed edge as emitted by a provider.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawEdge {
    pub from:     i64,
    pub to:       i64,
    pub length_m: f64,
}

/// Provider output: `(nodes, edges)`.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawNetwork {
    pub nodes: Vec<RawNode>,
    pub edges: Vec<RawEdge>,
}

impl RawNetwork {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

// ── Provider trait ────────────────────────────────────────────────────────────

/// Failures a provider may report.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider rejected region: {0}")]
    InvalidRegion(String),

    #[error("region contains no mapped roads")]
    EmptyRegion,

    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

impl From<ProviderError> for SpatialError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::InvalidRegion(msg) => SpatialError::RegionInvalid(msg),
            ProviderError::EmptyRegion => SpatialError::RegionEmpty,
            ProviderError::Unavailable(msg) => SpatialError::Provider(msg),
        }
    }
}

/// Source of raw road data for a region.
///
/// Implementations must only return nodes inside `region` and only edges
/// that belong to `network_type`.  They may block on I/O; callers serialize
/// builds for the same region.
pub trait GraphProvider: Send + Sync {
    fn fetch(&self, region: &Region, network_type: NetworkType) -> Result<RawNetwork, ProviderError>;
}

impl<P: GraphProvider + ?Sized> GraphProvider for &P {
    fn fetch(&self, region: &Region, network_type: NetworkType) -> Result<RawNetwork, ProviderError> {
        (**self).fetch(region, network_type)
    }
}

impl<P: GraphProvider + ?Sized> GraphProvider for Box<P> {
    fn fetch(&self, region: &Region, network_type: NetworkType) -> Result<RawNetwork, ProviderError> {
        (**self).fetch(region, network_type)
    }
}
