//! unit_square — smallest end-to-end example for the road_nav toolkit.
//!
//! Builds a synthetic 11 × 11 street grid over the one-degree square between
//! (0°, 0°) and (1°, 1°), routes across it, geocodes an address from an
//! embedded gazetteer, and writes the graph out as GeoJSON.
//!
//! Set `RUST_LOG=debug` to see snapping and search details.

use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use nav_core::{Coordinate, NetworkType};
use nav_sdk::{Gazetteer, GeoJsonRenderer, SessionBuilder, SessionConfig};
use nav_spatial::{DistanceMetric, GridProvider};

// ── Constants ─────────────────────────────────────────────────────────────────

const GRID_SIZE:   usize = 11;
const JITTER:      f64   = 0.2;
const SEED:        u64   = 3;
const OUTPUT_DIR:  &str  = "output/unit_square";

const GAZETTEER_CSV: &str = "\
name,lat,lon\n\
\"New York City, USA\",40.7127,-74.0059\n\
\"Mobile, AL\",30.6954,-88.0399\n\
\"Null Island\",0.0,0.0\n\
";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== unit_square — road_nav routing demo ===");
    println!("Grid: {GRID_SIZE} × {GRID_SIZE}  |  Jitter: {JITTER}  |  Seed: {SEED}");
    println!();

    // 1. Session.
    let network_type: NetworkType = "drive".parse()?;
    let config = SessionConfig::default()
        .network_type(network_type)
        .metric(DistanceMetric::Haversine)
        .search_timeout(Duration::from_secs(5));
    let gazetteer = Gazetteer::from_reader(Cursor::new(GAZETTEER_CSV))?;
    let mut session = SessionBuilder::new(GridProvider::new(GRID_SIZE, GRID_SIZE).with_jitter(JITTER, SEED))
        .config(config)
        .geocoder(gazetteer)
        .build()?;

    // 2. Graph.
    let polygon = [
        Coordinate::new(0.0, 0.0),
        Coordinate::new(1.0, 0.0),
        Coordinate::new(1.0, 1.0),
        Coordinate::new(0.0, 1.0),
    ];
    let t0 = Instant::now();
    tracing::info!(vertices = polygon.len(), %network_type, "building road graph");
    session.build_graph(&polygon)?;
    let graph = session.graph()?;
    println!(
        "Road graph ({network_type}): {} nodes, {} edges, built in {:.3} s",
        graph.node_count(),
        graph.edge_count(),
        t0.elapsed().as_secs_f64()
    );

    // 3. Route.
    let source = Coordinate::new(0.1, 0.1);
    let target = Coordinate::new(0.9, 0.9);
    tracing::info!(%source, %target, "routing");
    let path = session.motorable_path(source, target)?;
    let metres = session.motorable_distance(source, target)?;
    println!("Route {source} → {target}: {} nodes, {:.1} km", path.nodes.len(), metres / 1_000.0);

    println!("{:<6} {:<10} {:<24}", "Step", "Node", "Position");
    println!("{}", "-".repeat(40));
    for (i, (node, pos)) in path.nodes.iter().zip(session.path_coordinates(&path)?).enumerate() {
        println!("{:<6} {:<10} {:<24}", i, node.0, pos.to_string());
    }
    println!();

    // 4. Geocode.
    for address in ["New York City, USA", "null island", "Atlantis"] {
        match session.geocode(address) {
            Ok(pos) => println!("{address:<20} → {pos}"),
            Err(e) => {
                tracing::warn!(address, error = %e, "geocoding failed");
                println!("{address:<20} → {e}");
            }
        }
    }
    println!();

    // 5. Render.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let out_path = Path::new(OUTPUT_DIR).join("graph.geojson");
    let mut renderer = GeoJsonRenderer::new(BufWriter::new(File::create(&out_path)?));
    session.render(&mut renderer)?;
    tracing::info!(path = %out_path.display(), "wrote GeoJSON");
    println!("Wrote {}", out_path.display());

    Ok(())
}
