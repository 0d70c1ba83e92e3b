//! Validated region polygons.
//!
//! A [`Region`] is the boundary a road graph is fetched for.  Construction
//! rejects anything a provider could not sensibly clip against: fewer than
//! three distinct vertices, out-of-range coordinates, zero-area outlines and
//! self-intersecting rings.
//!
//! Geometry is delegated to the `geo` crate, which uses `x = lon, y = lat`.

use geo::line_intersection::{LineIntersection, line_intersection};
use geo::{Area, Coord, Intersects, Line, LineString, Polygon};

use crate::{CoreError, CoreResult, Coordinate};

/// Areas below this (in square degrees) are treated as degenerate.
const MIN_AREA_DEG2: f64 = 1e-12;

/// A simple (non-self-intersecting) polygon in WGS-84 degrees.
#[derive(Clone, Debug)]
pub struct Region {
    vertices: Vec<Coordinate>,
    polygon:  Polygon<f64>,
}

impl Region {
    /// Validate `vertices` and build a region.
    ///
    /// The ring may be given open or closed: a last vertex equal to the first
    /// is dropped, as are consecutive duplicates.
    pub fn new(vertices: Vec<Coordinate>) -> CoreResult<Self> {
        let mut ring: Vec<Coordinate> = Vec::with_capacity(vertices.len());
        for v in vertices {
            if !v.is_valid() {
                return Err(CoreError::InvalidRegion(format!("vertex {v} is out of range")));
            }
            if ring.last() != Some(&v) {
                ring.push(v);
            }
        }
        while ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }

        if ring.len() < 3 {
            return Err(CoreError::InvalidRegion(format!(
                "polygon needs at least 3 distinct vertices, got {}",
                ring.len()
            )));
        }

        let exterior: LineString<f64> = ring.iter().map(|v| to_geo(*v)).collect();
        let polygon = Polygon::new(exterior, vec![]);

        if polygon.unsigned_area() < MIN_AREA_DEG2 {
            return Err(CoreError::InvalidRegion("polygon vertices are collinear".into()));
        }
        if let Some((a, b)) = first_self_intersection(&ring) {
            return Err(CoreError::InvalidRegion(format!(
                "polygon is self-intersecting (sides {a} and {b} cross)"
            )));
        }

        Ok(Self { vertices: ring, polygon })
    }

    /// Distinct vertices in ring order, without the closing repeat.
    pub fn vertices(&self) -> &[Coordinate] {
        &self.vertices
    }

    /// Boundary-inclusive point-in-polygon test.
    pub fn contains(&self, c: Coordinate) -> bool {
        self.polygon.intersects(&to_geo(c))
    }

    /// `(south_west, north_east)` corners of the axis-aligned bounding box.
    pub fn bounding_box(&self) -> (Coordinate, Coordinate) {
        let mut sw = self.vertices[0];
        let mut ne = self.vertices[0];
        for v in &self.vertices[1..] {
            sw.lat = sw.lat.min(v.lat);
            sw.lon = sw.lon.min(v.lon);
            ne.lat = ne.lat.max(v.lat);
            ne.lon = ne.lon.max(v.lon);
        }
        (sw, ne)
    }

    /// Area in square degrees.  Only meaningful for comparisons.
    pub fn area_deg2(&self) -> f64 {
        self.polygon.unsigned_area()
    }
}

#[inline]
fn to_geo(c: Coordinate) -> Coord<f64> {
    Coord { x: c.lon, y: c.lat }
}

/// Return the indices of the first pair of sides that illegally meet.
///
/// Adjacent sides may only share their common vertex; any other pair of
/// sides must not touch at all.
fn first_self_intersection(ring: &[Coordinate]) -> Option<(usize, usize)> {
    let n = ring.len();
    let side = |i: usize| Line::new(to_geo(ring[i]), to_geo(ring[(i + 1) % n]));

    for i in 0..n {
        for j in (i + 1)..n {
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            match line_intersection(side(i), side(j)) {
                None => {}
                Some(LineIntersection::Collinear { .. }) => return Some((i, j)),
                Some(LineIntersection::SinglePoint { .. }) if adjacent => {}
                Some(LineIntersection::SinglePoint { .. }) => return Some((i, j)),
            }
        }
    }
    None
}
