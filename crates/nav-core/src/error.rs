//! Core error type.
//!
//! Downstream crates wrap `CoreError` in their own enums via `From` impls.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid region: {0}")]
    InvalidRegion(String),

    #[error("unknown network type {0:?}: expected drive, drive_service, walk, bike, or all")]
    UnknownNetworkType(String),
}

/// Shorthand result type for `nav-core`.
pub type CoreResult<T> = Result<T, CoreError>;
