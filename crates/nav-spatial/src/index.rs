//! Nearest-node spatial index.
//!
//! # Metrics
//!
//! | Metric      | Tree  | Distance                                          |
//! |-------------|-------|---------------------------------------------------|
//! | `Planar`    | 2-D   | Euclidean on a local equirectangular plane (m)    |
//! | `Haversine` | 3-D   | Chord on the Earth sphere; ranked like haversine  |
//!
//! `Planar` is the default: road graphs here cover small polygons where the
//! flat-earth error is negligible.  It is an approximation and is documented
//! as such; pick `Haversine` when regions are large enough for the
//! difference to matter.  The metric is fixed when the index is built.
//!
//! # Ties
//!
//! When several nodes are at exactly the same distance from the query point,
//! [`SpatialIndex::nearest`] returns the one with the lowest `NodeId`.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use nav_core::{Coordinate, LocalProjection, NodeId};

use crate::{SpatialError, SpatialResult};

// ── Metric ────────────────────────────────────────────────────────────────────

/// Distance metric used for nearest-node snapping.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DistanceMetric {
    /// Local flat-plane approximation.
    #[default]
    Planar,
    /// Great-circle distance.
    Haversine,
}

// ── R-tree entries ────────────────────────────────────────────────────────────

/// Generate an R-tree entry type for `D`-dimensional projected points.
macro_rules! node_entry {
    ($name:ident, $dim:literal) => {
        #[derive(Clone)]
        struct $name {
            point: [f64; $dim],
            id:    NodeId,
        }

        impl RTreeObject for $name {
            type Envelope = AABB<[f64; $dim]>;
            fn envelope(&self) -> Self::Envelope {
                AABB::from_point(self.point)
            }
        }

        impl PointDistance for $name {
            fn distance_2(&self, point: &[f64; $dim]) -> f64 {
                self.point
                    .iter()
                    .zip(point)
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum()
            }
        }
    };
}

node_entry!(PlanarEntry, 2);
node_entry!(SphereEntry, 3);

enum Tree {
    Planar { proj: LocalProjection, tree: RTree<PlanarEntry> },
    Sphere(RTree<SphereEntry>),
}

// ── SpatialIndex ──────────────────────────────────────────────────────────────

/// Read-only nearest-neighbour index over graph nodes.
///
/// Holds exactly one entry per distinct `NodeId`; queries never mutate it,
/// so a shared reference can serve any number of threads.
pub struct SpatialIndex {
    metric: DistanceMetric,
    tree:   Tree,
    /// `(id, position)` sorted by id, for `distance_to` lookups.
    nodes:  Vec<(NodeId, Coordinate)>,
}

impl SpatialIndex {
    /// Bulk-load an index from `(id, position)` pairs.
    ///
    /// If an id occurs more than once, its first position wins.
    pub fn build<I>(nodes: I, metric: DistanceMetric) -> Self
    where
        I: IntoIterator<Item = (NodeId, Coordinate)>,
    {
        let mut nodes: Vec<(NodeId, Coordinate)> = nodes.into_iter().collect();
        // Stable sort keeps first occurrences ahead of their duplicates.
        nodes.sort_by_key(|(id, _)| *id);
        let before = nodes.len();
        nodes.dedup_by_key(|(id, _)| *id);
        if nodes.len() != before {
            tracing::debug!(dropped = before - nodes.len(), "duplicate node ids in spatial index input");
        }

        let tree = match metric {
            DistanceMetric::Planar => {
                let proj = LocalProjection::centred_on(nodes.iter().map(|(_, c)| *c));
                let entries = nodes
                    .iter()
                    .map(|&(id, c)| PlanarEntry { point: proj.project(c), id })
                    .collect();
                Tree::Planar { proj, tree: RTree::bulk_load(entries) }
            }
            DistanceMetric::Haversine => {
                let entries = nodes
                    .iter()
                    .map(|&(id, c)| SphereEntry { point: c.to_ecef(), id })
                    .collect();
                Tree::Sphere(RTree::bulk_load(entries))
            }
        };

        Self { metric, tree, nodes }
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node closest to `point`, lowest id among exact ties.
    pub fn nearest(&self, point: Coordinate) -> SpatialResult<NodeId> {
        let best = match &self.tree {
            Tree::Planar { proj, tree } => lowest_id_among_nearest(
                tree.nearest_neighbor_iter_with_distance_2(&proj.project(point))
                    .map(|(e, d)| (e.id, d)),
            ),
            Tree::Sphere(tree) => lowest_id_among_nearest(
                tree.nearest_neighbor_iter_with_distance_2(&point.to_ecef())
                    .map(|(e, d)| (e.id, d)),
            ),
        };
        best.ok_or(SpatialError::EmptyIndex)
    }

    /// Up to `k` nodes sorted by ascending distance to `point`.
    pub fn k_nearest(&self, point: Coordinate, k: usize) -> Vec<NodeId> {
        match &self.tree {
            Tree::Planar { proj, tree } => tree
                .nearest_neighbor_iter(&proj.project(point))
                .take(k)
                .map(|e| e.id)
                .collect(),
            Tree::Sphere(tree) => tree
                .nearest_neighbor_iter(&point.to_ecef())
                .take(k)
                .map(|e| e.id)
                .collect(),
        }
    }

    /// Distance in metres from `node` to `point` under this index's metric.
    pub fn distance_to(&self, node: NodeId, point: Coordinate) -> SpatialResult<f64> {
        let pos = self
            .nodes
            .binary_search_by_key(&node, |(id, _)| *id)
            .map(|i| self.nodes[i].1)
            .map_err(|_| SpatialError::UnknownNode(node))?;
        Ok(match &self.tree {
            Tree::Planar { proj, .. } => proj.distance_m(pos, point),
            Tree::Sphere(_) => pos.distance_m(point),
        })
    }

    /// Iterator over every indexed `(id, position)`, in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Coordinate)> + '_ {
        self.nodes.iter().copied()
    }
}

/// Walk an ascending-distance iterator and keep the lowest id among the
/// entries tied with the first one.
fn lowest_id_among_nearest<I>(mut iter: I) -> Option<NodeId>
where
    I: Iterator<Item = (NodeId, f64)>,
{
    let (mut best, best_d2) = iter.next()?;
    for (id, d2) in iter {
        if d2 > best_d2 {
            break;
        }
        best = best.min(id);
    }
    Some(best)
}
