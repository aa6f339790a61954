//! Geometry payloads carried by entity specs.
//!
//! Point effects take a list of [`PointRecord`]s. Area effects take GeoJSON
//! polygons: a `FeatureCollection`, a single `Feature`, a bare `Polygon` /
//! `MultiPolygon` geometry, or (as a shorthand) a list of at least three point
//! records forming one ring. Positions inside GeoJSON are `[lon, lat]`.

use foundation::math::GeoPoint;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::BuildError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeometryInput {
    Points(Vec<PointRecord>),
    Features(FeatureCollection),
    Feature(Feature),
    Geometry(GeometryObject),
}

impl Default for GeometryInput {
    fn default() -> Self {
        GeometryInput::Points(Vec::new())
    }
}

/// One located event, plus whatever extra fields the producer attached.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointRecord {
    #[serde(default, alias = "latitude", alias = "startLat", skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(
        default,
        alias = "lng",
        alias = "longitude",
        alias = "startLng",
        skip_serializing_if = "Option::is_none"
    )]
    pub lon: Option<f64>,
    #[serde(default, alias = "endLat", skip_serializing_if = "Option::is_none")]
    pub target_lat: Option<f64>,
    #[serde(
        default,
        alias = "targetLng",
        alias = "endLng",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_lon: Option<f64>,
    /// Bearing in degrees clockwise from north.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magnitude: Option<f64>,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl PointRecord {
    pub fn at(lat: f64, lon: f64) -> Self {
        Self {
            lat: Some(lat),
            lon: Some(lon),
            ..Self::default()
        }
    }

    pub fn with_target(mut self, lat: f64, lon: f64) -> Self {
        self.target_lat = Some(lat);
        self.target_lon = Some(lon);
        self
    }

    pub fn with_direction(mut self, bearing_deg: f64) -> Self {
        self.direction = Some(bearing_deg);
        self
    }

    pub fn with_color(mut self, color: impl Into<Value>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Validated position; `index` is the record's place in its list.
    pub fn position(&self, index: usize) -> Result<GeoPoint, BuildError> {
        let (Some(lat), Some(lon)) = (self.lat, self.lon) else {
            return Err(BuildError::MissingCoordinate { index });
        };
        GeoPoint::new(lat, lon).map_err(|source| BuildError::InvalidCoordinate { index, source })
    }

    pub fn has_target(&self) -> bool {
        self.target_lat.is_some() || self.target_lon.is_some()
    }

    /// Validated arc target, if the record carries one.
    pub fn target(&self, index: usize) -> Option<Result<GeoPoint, BuildError>> {
        if !self.has_target() {
            return None;
        }
        let (Some(lat), Some(lon)) = (self.target_lat, self.target_lon) else {
            return Some(Err(BuildError::MissingEndpoints { index }));
        };
        Some(
            GeoPoint::new(lat, lon)
                .map_err(|source| BuildError::InvalidCoordinate { index, source }),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub properties: Map<String, Value>,
    /// Parsed lazily so one bad feature fails only its own instruction.
    pub geometry: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryObject {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Value,
}

/// Polygon on the globe: outer ring first, then holes. Rings are implicitly
/// closed (no repeated closing vertex).
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPolygon {
    pub rings: Vec<Vec<GeoPoint>>,
}

impl GeoPolygon {
    pub fn outer(&self) -> &[GeoPoint] {
        self.rings.first().map(Vec::as_slice).unwrap_or(&[])
    }
}

/// A ring is usable when it has at least three positions and every position
/// is exactly two finite numbers.
pub fn validate_ring(coords: &[Vec<f64>]) -> bool {
    coords.len() >= 3
        && coords
            .iter()
            .all(|p| p.len() == 2 && p.iter().all(|c| c.is_finite()))
}

impl GeometryInput {
    pub fn points(&self) -> Option<&[PointRecord]> {
        match self {
            GeometryInput::Points(points) => Some(points),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            GeometryInput::Points(points) => points.is_empty(),
            GeometryInput::Features(fc) => fc.features.is_empty(),
            GeometryInput::Feature(_) | GeometryInput::Geometry(_) => false,
        }
    }

    /// Every polygon in the payload, each ring checked with [`validate_ring`].
    pub fn polygons(&self) -> Result<Vec<GeoPolygon>, BuildError> {
        let mut rings_seen = 0usize;
        let mut out = Vec::new();

        match self {
            GeometryInput::Points(points) => {
                if points.is_empty() {
                    return Err(BuildError::EmptyInput);
                }
                let coords = points
                    .iter()
                    .enumerate()
                    .map(|(index, p)| match (p.lon, p.lat) {
                        (Some(lon), Some(lat)) => Ok(vec![lon, lat]),
                        _ => Err(BuildError::MissingCoordinate { index }),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                out.push(GeoPolygon {
                    rings: vec![ring_from_coords(&coords, 0)?],
                });
            }
            GeometryInput::Features(fc) => {
                if fc.features.is_empty() {
                    return Err(BuildError::EmptyInput);
                }
                for feature in &fc.features {
                    collect_geometry(&feature.geometry, &mut rings_seen, &mut out)?;
                }
            }
            GeometryInput::Feature(feature) => {
                collect_geometry(&feature.geometry, &mut rings_seen, &mut out)?;
            }
            GeometryInput::Geometry(geometry) => {
                collect_coordinates(&geometry.kind, &geometry.coordinates, &mut rings_seen, &mut out)?;
            }
        }

        if out.is_empty() {
            return Err(BuildError::EmptyInput);
        }
        Ok(out)
    }
}

fn collect_geometry(
    geometry: &Value,
    rings_seen: &mut usize,
    out: &mut Vec<GeoPolygon>,
) -> Result<(), BuildError> {
    let Some(kind) = geometry.get("type").and_then(Value::as_str) else {
        return Err(BuildError::UnsupportedGeometry(geometry.to_string()));
    };
    let coordinates = geometry.get("coordinates").unwrap_or(&Value::Null);
    collect_coordinates(kind, coordinates, rings_seen, out)
}

fn collect_coordinates(
    kind: &str,
    coordinates: &Value,
    rings_seen: &mut usize,
    out: &mut Vec<GeoPolygon>,
) -> Result<(), BuildError> {
    match kind {
        "Polygon" => {
            let rings: Vec<Vec<Vec<f64>>> =
                serde_json::from_value(coordinates.clone()).map_err(malformed(*rings_seen))?;
            out.push(polygon_from_rings(&rings, rings_seen)?);
        }
        "MultiPolygon" => {
            let polygons: Vec<Vec<Vec<Vec<f64>>>> =
                serde_json::from_value(coordinates.clone()).map_err(malformed(*rings_seen))?;
            for rings in &polygons {
                out.push(polygon_from_rings(rings, rings_seen)?);
            }
        }
        other => return Err(BuildError::UnsupportedGeometry(other.to_string())),
    }
    Ok(())
}

fn malformed(ring: usize) -> impl Fn(serde_json::Error) -> BuildError {
    move |_| BuildError::MalformedRing { ring }
}

fn polygon_from_rings(rings: &[Vec<Vec<f64>>], rings_seen: &mut usize) -> Result<GeoPolygon, BuildError> {
    if rings.is_empty() {
        return Err(BuildError::DegenerateRing {
            ring: *rings_seen,
            vertices: 0,
        });
    }
    let mut out = Vec::with_capacity(rings.len());
    for ring in rings {
        out.push(ring_from_coords(ring, *rings_seen)?);
        *rings_seen += 1;
    }
    Ok(GeoPolygon { rings: out })
}

fn ring_from_coords(coords: &[Vec<f64>], ring: usize) -> Result<Vec<GeoPoint>, BuildError> {
    if !validate_ring(coords) {
        return Err(if coords.len() < 3 {
            BuildError::DegenerateRing {
                ring,
                vertices: coords.len(),
            }
        } else {
            BuildError::MalformedRing { ring }
        });
    }

    let mut points = coords
        .iter()
        .enumerate()
        .map(|(index, c)| {
            GeoPoint::new(c[1], c[0]).map_err(|source| BuildError::InvalidCoordinate { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    drop_closing_duplicate(&mut points);
    if points.len() < 3 {
        return Err(BuildError::DegenerateRing {
            ring,
            vertices: points.len(),
        });
    }
    Ok(points)
}

fn drop_closing_duplicate(points: &mut Vec<GeoPoint>) {
    if points.len() >= 2 && points.first() == points.last() {
        points.pop();
    }
}
