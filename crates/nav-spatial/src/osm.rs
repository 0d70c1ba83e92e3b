//! OSM PBF graph provider — enabled with the `osm` Cargo feature.
//!
//! # Usage
//!
//! ```ignore
//! use nav_spatial::osm::PbfProvider;
//! use nav_spatial::{DistanceMetric, RoadGraph};
//!
//! let provider = PbfProvider::new("new-york.osm.pbf");
//! let graph = RoadGraph::build(&provider, &region, NetworkType::Drive, DistanceMetric::Planar)?;
//! ```
//!
//! # What is loaded
//!
//! Only `highway=*` ways accepted by the requested [`NetworkType`] are used
//! (see [`allows_highway`]), and only the way nodes inside the region.  A way
//! leaving and re-entering the region is split where it leaves.  One-way
//! tags are honoured for network types that respect them.
//!
//! # Memory note
//!
//! The whole file is read on every `fetch`; node positions are buffered in a
//! hash map for the first pass because ways reference nodes by OSM id.

use std::path::{Path, PathBuf};

use osmpbf::{Element, ElementReader};
use rustc_hash::{FxHashMap, FxHashSet};

use nav_core::{Coordinate, NetworkType, Region};

use crate::provider::{GraphProvider, ProviderError, RawEdge, RawNetwork, RawNode};

// ── Public entry point ────────────────────────────────────────────────────────

/// Reads road data from an OSM PBF extract on disk.
#[derive(Clone, Debug)]
pub struct PbfProvider {
    path: PathBuf,
}

impl PbfProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GraphProvider for PbfProvider {
    fn fetch(&self, region: &Region, network_type: NetworkType) -> Result<RawNetwork, ProviderError> {
        let raw = load_region(&self.path, region, network_type)?;
        if raw.is_empty() {
            return Err(ProviderError::EmptyRegion);
        }
        Ok(raw)
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

struct OsmWay {
    refs:   Vec<i64>,
    oneway: Oneway,
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Oneway {
    No,
    Forward,
    Reverse,
}

fn load_region(
    path:         &Path,
    region:       &Region,
    network_type: NetworkType,
) -> Result<RawNetwork, ProviderError> {
    // ── Phase 1: collect nodes inside the region + accepted ways ──────────
    let reader = ElementReader::from_path(path)
        .map_err(|e| ProviderError::Unavailable(format!("{}: {e}", path.display())))?;

    let mut inside: FxHashMap<i64, Coordinate> = FxHashMap::default();
    let mut ways: Vec<OsmWay> = Vec::new();

    reader
        .for_each(|elem| match elem {
            Element::Node(n) => {
                let pos = Coordinate::new(n.lat(), n.lon());
                if region.contains(pos) {
                    inside.insert(n.id(), pos);
                }
            }
            Element::DenseNode(n) => {
                let pos = Coordinate::new(n.lat(), n.lon());
                if region.contains(pos) {
                    inside.insert(n.id(), pos);
                }
            }
            Element::Way(w) => {
                // Collect tags eagerly so &str lifetimes don't escape the closure.
                let tags: Vec<(&str, &str)> = w.tags().collect();
                let Some(highway) = tag(&tags, "highway") else { return };
                if !allows_highway(network_type, highway, &tags) {
                    return;
                }
                let oneway = if network_type.respects_oneway() {
                    oneway(highway, &tags)
                } else {
                    Oneway::No
                };
                ways.push(OsmWay { refs: w.refs().collect(), oneway });
            }
            _ => {}
        })
        .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

    // ── Phase 2: emit edges between consecutive in-region way nodes ───────
    let mut used: FxHashSet<i64> = FxHashSet::default();
    let mut edges = Vec::new();

    for way in &ways {
        for pair in way.refs.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let (Some(&pa), Some(&pb)) = (inside.get(&a), inside.get(&b)) else { continue };
            let length_m = pa.distance_m(pb);

            if way.oneway != Oneway::Reverse {
                edges.push(RawEdge { from: a, to: b, length_m });
            }
            if way.oneway != Oneway::Forward {
                edges.push(RawEdge { from: b, to: a, length_m });
            }
            used.insert(a);
            used.insert(b);
        }
    }

    // ── Phase 3: keep only nodes that carry an edge ───────────────────────
    let nodes = used
        .into_iter()
        .filter_map(|id| inside.get(&id).map(|&pos| RawNode { id, pos }))
        .collect();

    Ok(RawNetwork { nodes, edges })
}

// ── Tag helpers ───────────────────────────────────────────────────────────────

fn tag<'a>(tags: &[(&'a str, &'a str)], key: &str) -> Option<&'a str> {
    tags.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Whether a way with this `highway` value belongs to `network_type`.
///
/// Private access and areas are excluded for every type.
pub fn allows_highway(network_type: NetworkType, highway: &str, tags: &[(&str, &str)]) -> bool {
    if matches!(tag(tags, "access"), Some("private" | "no"))
        || tag(tags, "area") == Some("yes")
    {
        return false;
    }

    let drivable = matches!(
        highway,
        "motorway" | "motorway_link" | "trunk" | "trunk_link"
            | "primary" | "primary_link" | "secondary" | "secondary_link"
            | "tertiary" | "tertiary_link" | "residential" | "living_street"
            | "unclassified" | "road"
    );

    match network_type {
        NetworkType::Drive => drivable,
        NetworkType::DriveService => drivable || highway == "service",
        NetworkType::Walk => !matches!(
            highway,
            "motorway" | "motorway_link" | "trunk" | "trunk_link" | "cycleway" | "bus_guideway"
        ) && tag(tags, "foot") != Some("no"),
        NetworkType::Bike => !matches!(
            highway,
            "motorway" | "motorway_link" | "footway" | "steps" | "corridor" | "pedestrian"
        ) && tag(tags, "bicycle") != Some("no"),
        NetworkType::All => !matches!(highway, "proposed" | "construction" | "abandoned"),
    }
}

/// One-way direction for traffic on a way.
///
/// Motorways and roundabouts are implicitly one-way in OSM convention.
fn oneway(highway: &str, tags: &[(&str, &str)]) -> Oneway {
    match tag(tags, "oneway") {
        Some("yes" | "1" | "true") => Oneway::Forward,
        Some("-1" | "reverse") => Oneway::Reverse,
        Some("no" | "0" | "false") => Oneway::No,
        _ if matches!(highway, "motorway" | "motorway_link")
            || tag(tags, "junction") == Some("roundabout") => Oneway::Forward,
        _ => Oneway::No,
    }
}
