//! Graph rendering for visual inspection.
//!
//! The session hands a built graph to any [`Renderer`].  The bundled
//! [`GeoJsonRenderer`] writes a GeoJSON `FeatureCollection` that map viewers
//! (QGIS, geojson.io, kepler.gl) can display directly:
//!
//! - one `Point` per node, with `node_id` and `external_id`;
//! - one `LineString` per directed edge, with `from`, `to` and `length_m`.
//!
//! GeoJSON positions are `[lon, lat]`.

use std::io::Write;

use serde_json::{Value, json};
use thiserror::Error;

use nav_spatial::RoadGraph;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Produces a visual artifact from a road graph.
pub trait Renderer {
    fn render(&mut self, graph: &RoadGraph) -> Result<(), RenderError>;
}

/// Writes the graph as GeoJSON to `W`.
pub struct GeoJsonRenderer<W: Write> {
    out:    W,
    pretty: bool,
}

impl<W: Write> GeoJsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, pretty: false }
    }

    /// Indent the output.
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for GeoJsonRenderer<W> {
    fn render(&mut self, graph: &RoadGraph) -> Result<(), RenderError> {
        let doc = feature_collection(graph);
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.out, &doc)?;
        } else {
            serde_json::to_writer(&mut self.out, &doc)?;
        }
        self.out.flush()?;
        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "rendered graph as GeoJSON"
        );
        Ok(())
    }
}

fn feature_collection(graph: &RoadGraph) -> Value {
    let nodes = graph
        .node_pos
        .iter()
        .zip(&graph.node_external_id)
        .enumerate()
        .map(|(i, (pos, ext))| {
            json!({
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [pos.lon, pos.lat] },
                "properties": { "kind": "node", "node_id": i, "external_id": ext },
            })
        });

    let edges = (0..graph.edge_count()).map(|e| {
        let from = graph.edge_from[e];
        let to   = graph.edge_to[e];
        let a = graph.node_pos[from.index()];
        let b = graph.node_pos[to.index()];
        json!({
            "type": "Feature",
            "geometry": {
                "type": "LineString",
                "coordinates": [[a.lon, a.lat], [b.lon, b.lat]],
            },
            "properties": {
                "kind": "edge",
                "from": from.0,
                "to": to.0,
                "length_m": graph.edge_length_m[e],
            },
        })
    });

    json!({
        "type": "FeatureCollection",
        "features": nodes.chain(edges).collect::<Vec<_>>(),
    })
}
