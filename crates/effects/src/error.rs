use foundation::math::GeoPointError;
use thiserror::Error;

use crate::kind::EffectKind;

/// Why a builder could not materialise an effect.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("{kind} expects a list of point records")]
    ExpectedPoints { kind: EffectKind },
    #[error("no geometry supplied")]
    EmptyInput,
    #[error("point {index} has no coordinates")]
    MissingCoordinate { index: usize },
    #[error("point {index} has invalid coordinates: {source}")]
    InvalidCoordinate {
        index: usize,
        #[source]
        source: GeoPointError,
    },
    #[error("arc {index} needs both a source and a target point")]
    MissingEndpoints { index: usize },
    #[error("unsupported geometry {0:?}; expected Polygon or MultiPolygon")]
    UnsupportedGeometry(String),
    #[error("ring {ring} is not an array of [lon, lat] positions")]
    MalformedRing { ring: usize },
    #[error("ring {ring} has {vertices} usable vertices; at least 3 are required")]
    DegenerateRing { ring: usize, vertices: usize },
}
