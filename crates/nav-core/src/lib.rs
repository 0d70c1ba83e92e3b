//! `nav-core` — foundational types for the `road_nav` routing toolkit.
//!
//! This crate is a dependency of every other `nav-*` crate.  It has no
//! `nav-*` dependencies and few external ones (`geo` for polygon geometry and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module           | Contents                                             |
//! |------------------|------------------------------------------------------|
//! | [`ids`]          | `NodeId`, `EdgeId`                                   |
//! | [`coord`]        | `Coordinate`, haversine distance, `LocalProjection`  |
//! | [`region`]       | `Region` (validated polygon)                         |
//! | [`network_type`] | `NetworkType` enum                                   |
//! | [`error`]        | `CoreError`, `CoreResult`                            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to plain-data public types.  |

pub mod coord;
pub mod error;
pub mod ids;
pub mod network_type;
pub mod region;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use coord::{Coordinate, EARTH_RADIUS_M, LocalProjection};
pub use error::{CoreError, CoreResult};
pub use ids::{EdgeId, NodeId};
pub use network_type::NetworkType;
pub use region::Region;
