//! Spatial-subsystem error type.

use thiserror::Error;

use nav_core::{CoreError, NodeId};

/// Errors produced by `nav-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("invalid region: {0}")]
    RegionInvalid(String),

    #[error("region contains no mapped roads")]
    RegionEmpty,

    #[error("graph provider failed: {0}")]
    Provider(String),

    #[error("edge {from} -> {to} has invalid length {length_m}")]
    InvalidEdgeLength { from: i64, to: i64, length_m: f64 },

    #[error("node {0} not found in graph")]
    UnknownNode(NodeId),

    #[error("spatial index is empty")]
    EmptyIndex,

    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("search cancelled")]
    SearchCancelled,

    #[error("search deadline exceeded")]
    DeadlineExceeded,
}

impl From<CoreError> for SpatialError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidRegion(msg) => SpatialError::RegionInvalid(msg),
            other => SpatialError::Provider(other.to_string()),
        }
    }
}

pub type SpatialResult<T> = Result<T, SpatialError>;
