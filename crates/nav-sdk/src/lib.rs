//! `nav-sdk` — routing session façade for the road_nav toolkit.
//!
//! # Workflow
//!
//! ```text
//! SessionBuilder::new(provider) ─▶ RoutingSession (Unbuilt)
//!   .build_graph(polygon)       ─▶ RoutingSession (Built)
//!   .motorable_path(a, b)       ─▶ Path
//!   .motorable_distance(a, b)   ─▶ f64 metres
//!   .geocode("address")         ─▶ Coordinate
//!   .render(&mut renderer)      ─▶ visual artifact
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `osm`      | Re-enables `nav_spatial::osm::PbfProvider`.            |
//! | `parallel` | Distance matrices run on Rayon's thread pool.          |
//! | `serde`    | `Serialize`/`Deserialize` on `SessionConfig`.          |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use nav_core::Coordinate;
//! use nav_sdk::SessionBuilder;
//! use nav_spatial::GridProvider;
//!
//! let mut session = SessionBuilder::new(GridProvider::new(11, 11)).build()?;
//! session.build_graph(&[
//!     Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0),
//!     Coordinate::new(1.0, 1.0), Coordinate::new(0.0, 1.0),
//! ])?;
//! let metres = session.motorable_distance(
//!     Coordinate::new(0.1, 0.1),
//!     Coordinate::new(0.9, 0.9),
//! )?;
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod geocode;
pub mod render;
pub mod session;


pub use builder::SessionBuilder;
pub use config::SessionConfig;
pub use error::{NavError, NavResult};
pub use geocode::{Gazetteer, GeocodeError, Geocoder};
pub use render::{GeoJsonRenderer, RenderError, Renderer};
pub use session::RoutingSession;
