//! Session configuration.

use std::time::Duration;

use nav_core::NetworkType;
use nav_spatial::{DistanceMetric, SearchLimits};

/// Settings shared by every graph build and query of a session.
///
/// | Field            | Default    | Used by                              |
/// |------------------|------------|--------------------------------------|
/// | `network_type`   | `Drive`    | provider filter on `build_graph`     |
/// | `metric`         | `Planar`   | spatial index built with the graph   |
/// | `search_timeout` | `None`     | per-query deadline for path searches |
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    pub network_type:   NetworkType,
    pub metric:         DistanceMetric,
    pub search_timeout: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            network_type:   NetworkType::Drive,
            metric:         DistanceMetric::Planar,
            search_timeout: None,
        }
    }
}

impl SessionConfig {
    pub fn network_type(mut self, network_type: NetworkType) -> Self {
        self.network_type = network_type;
        self
    }

    pub fn metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn search_timeout(mut self, timeout: Duration) -> Self {
        self.search_timeout = Some(timeout);
        self
    }

    /// Fresh limits for one query; the deadline starts counting now.
    pub fn search_limits(&self) -> SearchLimits {
        match self.search_timeout {
            Some(t) => SearchLimits::with_timeout(t),
            None => SearchLimits::none(),
        }
    }
}
