//! `nav-spatial` — road graph, spatial indexing, and shortest-path routing.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`graph`]    | `RoadGraph` (CSR + spatial index), `RoadGraphBuilder`      |
//! | [`index`]    | `SpatialIndex`, `DistanceMetric`                           |
//! | [`router`]   | `Router` trait, `Path`, `DijkstraRouter`, `SearchLimits`   |
//! | [`matrix`]   | `distance_matrix` (Rayon with feature = `"parallel"`)      |
//! | [`provider`] | `GraphProvider` trait, raw data shape, built-in providers  |
//! | [`osm`]      | `PbfProvider` (feature = `"osm"` only)                     |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                         |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `osm`      | Enables OSM PBF loading via the `osmpbf` crate.          |
//! | `parallel` | Computes distance-matrix rows on Rayon's thread pool.    |
//! | `serde`    | Derives `Serialize`/`Deserialize` on plain-data types.   |

pub mod error;
pub mod graph;
pub mod index;
pub mod matrix;
pub mod provider;
pub mod router;

#[cfg(feature = "osm")]
pub mod osm;

#[cfg(test)]
mod tests;

pub use error::{SpatialError, SpatialResult};
pub use graph::{RoadGraph, RoadGraphBuilder};
pub use index::{DistanceMetric, SpatialIndex};
pub use matrix::distance_matrix;
pub use provider::{
    GraphProvider, GridProvider, ProviderError, RawEdge, RawNetwork, RawNode, StaticProvider,
};
pub use router::{CancelToken, DijkstraRouter, Path, Router, SearchLimits};
