//! Many-to-many shortest distances.
//!
//! Each cell is an independent [`Router::shortest_distance_with_limits`]
//! query over the same read-only graph and index, so rows can be computed
//! concurrently.  With the `parallel` Cargo feature rows run on Rayon's
//! thread pool; results are identical either way.
//!
//! Limits come from a factory called once per cell, so a deadline bounds each
//! query rather than the whole matrix.  A shared [`CancelToken`] cloned into
//! every set of limits still aborts all remaining cells.
//!
//! [`CancelToken`]: crate::CancelToken

use nav_core::Coordinate;

use crate::graph::RoadGraph;
use crate::index::SpatialIndex;
use crate::router::{Router, SearchLimits};
use crate::SpatialResult;

/// `result[i][j]` is the shortest distance from `sources[i]` to
/// `targets[j]`, or the error that query produced.
pub fn distance_matrix<R, L>(
    router:  &R,
    graph:   &RoadGraph,
    index:   &SpatialIndex,
    sources: &[Coordinate],
    targets: &[Coordinate],
    limits:  L,
) -> Vec<Vec<SpatialResult<f64>>>
where
    R: Router + ?Sized,
    L: Fn() -> SearchLimits + Sync,
{
    let row = |&source: &Coordinate| -> Vec<SpatialResult<f64>> {
        targets
            .iter()
            .map(|&target| router.shortest_distance_with_limits(graph, index, source, target, &limits()))
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    {
        sources.iter().map(row).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        sources.par_iter().map(row).collect()
    }
}
