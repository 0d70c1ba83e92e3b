//! Fluent builder for constructing a [`RoutingSession`].

use nav_spatial::{DijkstraRouter, GraphProvider, Router};

use crate::geocode::Geocoder;
use crate::{NavError, NavResult, RoutingSession, SessionConfig};

/// Fluent builder for [`RoutingSession<P, R>`].
///
/// # Required inputs
///
/// - `P: GraphProvider` — where road data comes from
///
/// # Optional inputs (have defaults)
///
/// | Method           | Default                  |
/// |------------------|--------------------------|
/// | `.config(c)`     | `SessionConfig::default` |
/// | `.router(r)`     | `DijkstraRouter`         |
/// | `.geocoder(g)`   | none (`geocode` fails)   |
///
/// # Example
///
/// ```rust,ignore
/// let mut session = SessionBuilder::new(GridProvider::new(11, 11))
///     .geocoder(gazetteer)
///     .build()?;
/// session.build_graph(&polygon)?;
/// let path = session.motorable_path(source, target)?;
/// ```
pub struct SessionBuilder<P: GraphProvider, R: Router = DijkstraRouter> {
    config:   SessionConfig,
    provider: P,
    router:   R,
    geocoder: Option<Box<dyn Geocoder>>,
}

impl<P: GraphProvider> SessionBuilder<P, DijkstraRouter> {
    pub fn new(provider: P) -> Self {
        Self {
            config:   SessionConfig::default(),
            provider,
            router:   DijkstraRouter,
            geocoder: None,
        }
    }
}

impl<P: GraphProvider, R: Router> SessionBuilder<P, R> {
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the routing algorithm.
    pub fn router<R2: Router>(self, router: R2) -> SessionBuilder<P, R2> {
        SessionBuilder {
            config:   self.config,
            provider: self.provider,
            router,
            geocoder: self.geocoder,
        }
    }

    pub fn geocoder(mut self, geocoder: impl Geocoder + 'static) -> Self {
        self.geocoder = Some(Box::new(geocoder));
        self
    }

    /// Validate the configuration and return an unbuilt session.
    pub fn build(self) -> NavResult<RoutingSession<P, R>> {
        if self.config.search_timeout.is_some_and(|t| t.is_zero()) {
            return Err(NavError::Config("search_timeout must be positive".into()));
        }
        Ok(RoutingSession::new(self.config, self.provider, self.router, self.geocoder))
    }
}
