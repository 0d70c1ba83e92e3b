//! Synthetic street-lattice provider.
//!
//! Lays a `rows × cols` lattice over the region's bounding box and keeps the
//! lattice points inside the region:
//!
//! ```text
//!  row 2:  o───o───o
//!          │ ╱ │ ╱ │      ─ │  two-way streets (every network type)
//!  row 1:  o───o───o      ╱    footpath diagonals (walk / bike / all)
//!          │ ╱ │ ╱ │
//!  row 0:  o───o───o
//! ```
//!
//! Node ids are `row * cols + col`.  Positions can be jittered with a seeded
//! RNG so that snapping tests do not only see perfectly regular spacing.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use nav_core::{Coordinate, NetworkType, Region};

use super::{GraphProvider, ProviderError, RawEdge, RawNetwork, RawNode};

/// Synthetic lattice provider.
#[derive(Clone, Debug)]
pub struct GridProvider {
    rows:   usize,
    cols:   usize,
    /// Maximum displacement of a lattice point, as a fraction of the cell
    /// size.  Clamped to `[0, 0.45]` so neighbouring points never swap.
    jitter: f64,
    seed:   u64,
}

impl GridProvider {
    /// Regular lattice with `rows × cols` points (each at least 2).
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows: rows.max(2), cols: cols.max(2), jitter: 0.0, seed: 0 }
    }

    /// Displace every lattice point by up to `fraction` of a cell, using a
    /// RNG seeded with `seed`.
    pub fn with_jitter(mut self, fraction: f64, seed: u64) -> Self {
        self.jitter = fraction.clamp(0.0, 0.45);
        self.seed = seed;
        self
    }

    fn node_id(&self, row: usize, col: usize) -> i64 {
        (row * self.cols + col) as i64
    }
}

impl GraphProvider for GridProvider {
    fn fetch(&self, region: &Region, network_type: NetworkType) -> Result<RawNetwork, ProviderError> {
        let (sw, ne) = region.bounding_box();
        let lat_step = (ne.lat - sw.lat) / (self.rows - 1) as f64;
        let lon_step = (ne.lon - sw.lon) / (self.cols - 1) as f64;
        let mut rng = SmallRng::seed_from_u64(self.seed);

        // Lattice position of every kept point; `None` when outside the region.
        let mut kept: Vec<Option<Coordinate>> = Vec::with_capacity(self.rows * self.cols);
        for row in 0..self.rows {
            for col in 0..self.cols {
                let mut pos = Coordinate::new(
                    sw.lat + row as f64 * lat_step,
                    sw.lon + col as f64 * lon_step,
                );
                if self.jitter > 0.0 {
                    pos.lat += rng.gen_range(-self.jitter..=self.jitter) * lat_step;
                    pos.lon += rng.gen_range(-self.jitter..=self.jitter) * lon_step;
                }
                kept.push(region.contains(pos).then_some(pos));
            }
        }

        let nodes: Vec<RawNode> = kept
            .iter()
            .enumerate()
            .filter_map(|(i, pos)| pos.map(|pos| RawNode { id: i as i64, pos }))
            .collect();
        if nodes.is_empty() {
            return Err(ProviderError::EmptyRegion);
        }

        let at = |row: usize, col: usize| kept[row * self.cols + col];
        let mut edges = Vec::new();
        let mut connect = |a: (usize, usize), b: (usize, usize)| {
            if let (Some(pa), Some(pb)) = (at(a.0, a.1), at(b.0, b.1)) {
                let (ia, ib) = (self.node_id(a.0, a.1), self.node_id(b.0, b.1));
                let length_m = pa.distance_m(pb);
                edges.push(RawEdge { from: ia, to: ib, length_m });
                edges.push(RawEdge { from: ib, to: ia, length_m });
            }
        };

        for row in 0..self.rows {
            for col in 0..self.cols {
                if col + 1 < self.cols {
                    connect((row, col), (row, col + 1));
                }
                if row + 1 < self.rows {
                    connect((row, col), (row + 1, col));
                }
            }
        }

        if !network_type.is_motorable() {
            for row in 0..self.rows - 1 {
                for col in 0..self.cols - 1 {
                    let corners = [(row, col), (row, col + 1), (row + 1, col), (row + 1, col + 1)];
                    if corners.iter().all(|&(r, c)| at(r, c).is_some()) {
                        connect((row, col), (row + 1, col + 1));
                    }
                }
            }
        }

        Ok(RawNetwork { nodes, edges })
    }
}
