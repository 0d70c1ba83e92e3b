//! Geographic coordinate type and distance helpers.
//!
//! `Coordinate` uses `f64` latitude/longitude.  Region polygons are small
//! (city scale or less), but edge lengths are summed along whole paths, so
//! double precision keeps path totals stable to the millimetre.

/// Mean Earth radius in metres (IUGG).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// A WGS-84 geographic coordinate, in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// `true` if both components are finite and inside the WGS-84 ranges.
    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && self.lat.abs() <= 90.0
            && self.lon.abs() <= 180.0
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: Coordinate) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Earth-centred Cartesian position on a sphere of [`EARTH_RADIUS_M`].
    ///
    /// The straight-line (chord) distance between two such points grows
    /// monotonically with their great-circle distance, which lets a 3-D
    /// R-tree answer haversine nearest-neighbour queries exactly.
    pub fn to_ecef(self) -> [f64; 3] {
        let lat = self.lat.to_radians();
        let lon = self.lon.to_radians();
        [
            EARTH_RADIUS_M * lat.cos() * lon.cos(),
            EARTH_RADIUS_M * lat.cos() * lon.sin(),
            EARTH_RADIUS_M * lat.sin(),
        ]
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

impl From<(f64, f64)> for Coordinate {
    /// Interprets the tuple as `(lat, lon)`.
    fn from((lat, lon): (f64, f64)) -> Self {
        Self::new(lat, lon)
    }
}

// ── LocalProjection ───────────────────────────────────────────────────────────

/// Equirectangular projection onto a flat plane tangent at `origin`.
///
/// Output is `[x, y]` in metres (east, north).  Distortion grows with the
/// distance from the origin; for polygons spanning a few tens of kilometres
/// the error in relative distances stays well under 1 %.  This is an
/// approximation, not a geodesic computation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LocalProjection {
    origin:  Coordinate,
    cos_lat: f64,
}

impl LocalProjection {
    pub fn new(origin: Coordinate) -> Self {
        Self { origin, cos_lat: origin.lat.to_radians().cos() }
    }

    /// Projection centred on the middle of the bounding box of `points`.
    ///
    /// Falls back to `(0, 0)` when `points` is empty.
    pub fn centred_on<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let mut min = Coordinate::new(f64::INFINITY, f64::INFINITY);
        let mut max = Coordinate::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in points {
            min.lat = min.lat.min(p.lat);
            min.lon = min.lon.min(p.lon);
            max.lat = max.lat.max(p.lat);
            max.lon = max.lon.max(p.lon);
        }
        if min.lat > max.lat {
            return Self::new(Coordinate::new(0.0, 0.0));
        }
        Self::new(Coordinate::new((min.lat + max.lat) * 0.5, (min.lon + max.lon) * 0.5))
    }

    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    #[inline]
    pub fn project(&self, c: Coordinate) -> [f64; 2] {
        [
            EARTH_RADIUS_M * (c.lon - self.origin.lon).to_radians() * self.cos_lat,
            EARTH_RADIUS_M * (c.lat - self.origin.lat).to_radians(),
        ]
    }

    /// Planar distance in metres between two coordinates.
    pub fn distance_m(&self, a: Coordinate, b: Coordinate) -> f64 {
        let [ax, ay] = self.project(a);
        let [bx, by] = self.project(b);
        (ax - bx).hypot(ay - by)
    }
}
