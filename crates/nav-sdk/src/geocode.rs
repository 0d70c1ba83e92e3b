//! Address → coordinate resolution.
//!
//! Geocoding is a collaborator: the session only depends on the
//! [`Geocoder`] trait.  [`Gazetteer`] is an offline implementation backed by
//! a CSV place list.
//!
//! # CSV format
//!
//! ```csv
//! name,lat,lon
//! "New York City, USA",40.7127,-74.0059
//! "Mobile, AL",30.6954,-88.0399
//! ```
//!
//! Lookups ignore case and collapse runs of whitespace, so
//! `"new york city,  usa"` resolves to the first row above.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use nav_core::Coordinate;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("address not found: {0:?}")]
    NotFound(String),

    #[error("gazetteer parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Resolves free-text addresses to coordinates.
pub trait Geocoder: Send + Sync {
    fn geocode(&self, address: &str) -> Result<Coordinate, GeocodeError>;
}

// ── Gazetteer ─────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct GazetteerRecord {
    name: String,
    lat:  f64,
    lon:  f64,
}

/// In-memory place-name table.
#[derive(Clone, Debug, Default)]
pub struct Gazetteer {
    places: HashMap<String, Coordinate>,
}

impl Gazetteer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a gazetteer from a CSV file.
    pub fn from_csv(path: &Path) -> Result<Self, GeocodeError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Like [`from_csv`](Self::from_csv) but accepts any `Read` source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, GeocodeError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut gazetteer = Self::new();

        for result in csv_reader.deserialize::<GazetteerRecord>() {
            let row = result.map_err(|e| GeocodeError::Parse(e.to_string()))?;
            let pos = Coordinate::new(row.lat, row.lon);
            if !pos.is_valid() {
                return Err(GeocodeError::Parse(format!(
                    "place {:?} has out-of-range coordinate {pos}",
                    row.name
                )));
            }
            gazetteer.insert(&row.name, pos);
        }

        Ok(gazetteer)
    }

    /// Add or replace a place.
    pub fn insert(&mut self, name: &str, pos: Coordinate) {
        self.places.insert(normalize(name), pos);
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

impl Geocoder for Gazetteer {
    fn geocode(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        self.places
            .get(&normalize(address))
            .copied()
            .ok_or_else(|| GeocodeError::NotFound(address.to_owned()))
    }
}

fn normalize(s: &str) -> String {
    s.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
