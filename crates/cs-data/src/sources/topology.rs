//! TopoJSON topology decoding
//!
//! Decodes the shared, optionally quantized and delta-encoded arcs of a
//! topology into one polygon geometry per country feature.

use std::collections::BTreeMap;

use cs_core::CountryKey;
use geo_types::{Coord, LineString, MultiPolygon, Polygon};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::{DataError, DataResult};

/// One country's outline from the topology
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryFeature {
    /// Join key from the feature properties, `None` when the property is missing
    pub key: Option<CountryKey>,

    /// Outline in longitude/latitude degrees
    pub geometry: MultiPolygon<f64>,
}

#[derive(Debug, Deserialize)]
struct Topology {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    transform: Option<Transform>,
    arcs: Vec<Vec<Vec<f64>>>,
    objects: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct Transform {
    scale: [f64; 2],
    translate: [f64; 2],
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum GeometryObject {
    GeometryCollection {
        geometries: Vec<Value>,
    },
    Polygon {
        arcs: Vec<Vec<i64>>,
        #[serde(default)]
        properties: Option<Map<String, Value>>,
    },
    MultiPolygon {
        arcs: Vec<Vec<Vec<i64>>>,
        #[serde(default)]
        properties: Option<Map<String, Value>>,
    },
    #[serde(other)]
    Other,
}

/// Decode the polygon features of `object` in a TopoJSON document.
///
/// `join_property` names the feature property holding the country name.
/// Geometries other than polygons are skipped.
pub fn decode_topology(payload: &str, object: &str, join_property: &str) -> DataResult<Vec<GeometryFeature>> {
    let mut topology: Topology = serde_json::from_str(payload)?;
    if topology.kind != "Topology" {
        return Err(DataError::Topology(format!("expected type 'Topology', found '{}'", topology.kind)));
    }

    let arcs = decode_arcs(&topology.arcs, topology.transform);
    let root = topology
        .objects
        .remove(object)
        .ok_or_else(|| DataError::Topology(format!("object '{}' not found", object)))?;

    let mut features = Vec::new();
    collect_features(root, &arcs, join_property, &mut features)?;

    let unnamed = features.iter().filter(|f| f.key.is_none()).count();
    info!(
        "Decoded {} features from topology object '{}' ({} without '{}')",
        features.len(),
        object,
        unnamed,
        join_property
    );
    Ok(features)
}

/// Absolute positions for every arc
fn decode_arcs(arcs: &[Vec<Vec<f64>>], transform: Option<Transform>) -> Vec<Vec<Coord<f64>>> {
    arcs.iter()
        .map(|arc| match transform {
            Some(t) => {
                // Quantized positions are deltas from the previous one
                let (mut x, mut y) = (0.0, 0.0);
                arc.iter()
                    .filter(|p| p.len() >= 2)
                    .map(|p| {
                        x += p[0];
                        y += p[1];
                        Coord {
                            x: x * t.scale[0] + t.translate[0],
                            y: y * t.scale[1] + t.translate[1],
                        }
                    })
                    .collect()
            }
            None => arc
                .iter()
                .filter(|p| p.len() >= 2)
                .map(|p| Coord { x: p[0], y: p[1] })
                .collect(),
        })
        .collect()
}

fn collect_features(
    value: Value,
    arcs: &[Vec<Coord<f64>>],
    join_property: &str,
    out: &mut Vec<GeometryFeature>,
) -> DataResult<()> {
    let geometry = match serde_json::from_value::<GeometryObject>(value) {
        Ok(geometry) => geometry,
        Err(e) => {
            // Null geometries carry `"type": null`
            debug!("Skipping unreadable geometry: {}", e);
            return Ok(());
        }
    };

    match geometry {
        GeometryObject::GeometryCollection { geometries } => {
            for child in geometries {
                collect_features(child, arcs, join_property, out)?;
            }
        }
        GeometryObject::Polygon { arcs: rings, properties } => {
            let polygon = build_polygon(&rings, arcs)?;
            out.push(GeometryFeature {
                key: join_key(properties.as_ref(), join_property),
                geometry: MultiPolygon::new(polygon.into_iter().collect()),
            });
        }
        GeometryObject::MultiPolygon { arcs: polygons, properties } => {
            let mut parts = Vec::with_capacity(polygons.len());
            for rings in &polygons {
                parts.extend(build_polygon(rings, arcs)?);
            }
            out.push(GeometryFeature {
                key: join_key(properties.as_ref(), join_property),
                geometry: MultiPolygon::new(parts),
            });
        }
        GeometryObject::Other => {}
    }
    Ok(())
}

fn join_key(properties: Option<&Map<String, Value>>, join_property: &str) -> Option<CountryKey> {
    properties?
        .get(join_property)?
        .as_str()
        .filter(|name| !name.is_empty())
        .map(CountryKey::from)
}

/// First ring is the exterior, the rest are holes. Degenerate exteriors yield nothing.
fn build_polygon(rings: &[Vec<i64>], arcs: &[Vec<Coord<f64>>]) -> DataResult<Option<Polygon<f64>>> {
    let mut rings = rings.iter().map(|ring| stitch_ring(ring, arcs));

    let exterior = match rings.next() {
        Some(ring) => ring?,
        None => return Ok(None),
    };
    if exterior.len() < 3 {
        return Ok(None);
    }

    let interiors = rings
        .filter(|ring| ring.as_ref().map_or(true, |r| r.len() >= 3))
        .map(|ring| ring.map(LineString::new))
        .collect::<DataResult<Vec<_>>>()?;

    Ok(Some(Polygon::new(LineString::new(exterior), interiors)))
}

/// Join the arcs of one ring; a negative index `i` means arc `!i` reversed
fn stitch_ring(indices: &[i64], arcs: &[Vec<Coord<f64>>]) -> DataResult<Vec<Coord<f64>>> {
    let mut ring: Vec<Coord<f64>> = Vec::new();

    for &index in indices {
        let (arc_idx, reversed) = if index >= 0 {
            (index as usize, false)
        } else {
            (!index as usize, true)
        };
        let arc = arcs
            .get(arc_idx)
            .ok_or_else(|| DataError::Topology(format!("arc index {} out of range", index)))?;

        let points: Box<dyn Iterator<Item = &Coord<f64>>> = if reversed {
            Box::new(arc.iter().rev())
        } else {
            Box::new(arc.iter())
        };

        // Consecutive arcs share their joining position
        let skip = usize::from(!ring.is_empty());
        ring.extend(points.skip(skip).copied());
    }

    Ok(ring)
}
