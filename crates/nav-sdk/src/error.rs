use thiserror::Error;

use nav_core::CoreError;
use nav_spatial::SpatialError;

use crate::geocode::GeocodeError;
use crate::render::RenderError;

#[derive(Debug, Error)]
pub enum NavError {
    #[error("graph not built: call build_graph first")]
    GraphNotBuilt,

    #[error("address not found: {0:?}")]
    AddressNotFound(String),

    #[error("no geocoder configured")]
    NoGeocoder,

    #[error("geocoder failed: {0}")]
    Geocoder(String),

    #[error("session configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

impl From<CoreError> for NavError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::UnknownNetworkType(_) => NavError::Config(e.to_string()),
            region => NavError::Spatial(SpatialError::from(region)),
        }
    }
}

impl From<GeocodeError> for NavError {
    fn from(e: GeocodeError) -> Self {
        match e {
            GeocodeError::NotFound(address) => NavError::AddressNotFound(address),
            other => NavError::Geocoder(other.to_string()),
        }
    }
}

pub type NavResult<T> = Result<T, NavError>;
