//! One pure builder per effect kind.
//!
//! A builder turns geometry input and options into a [`RenderState`]. Builders
//! never touch the registry or the clock; the creation time is passed in so
//! the result is a function of its inputs alone.

mod arc;
mod area;
mod arrow;
mod explosion;
mod glowing_border;
mod marker;
mod pulsing_dot;

use foundation::math::{GeoPoint, Vec3, to_cartesian};
use foundation::time::Time;
use runtime::config::EngineConfig;
use tracing::debug;

use crate::color::Rgba;
use crate::error::BuildError;
use crate::input::{GeoPolygon, GeometryInput, PointRecord};
use crate::kind::EffectKind;
use crate::options::{Options, OptionsView};
use crate::render::{Dot, Outline, RenderState};

pub use arc::MAX_SEGMENTS;
pub use area::triangulate_rings;

/// Everything a builder may read.
#[derive(Debug, Copy, Clone)]
pub struct BuildInput<'a> {
    pub id: &'a str,
    pub data: &'a GeometryInput,
    pub options: &'a Options,
    /// Clock time the effect is created at.
    pub clock: Time,
    pub config: &'a EngineConfig,
}

impl<'a> BuildInput<'a> {
    pub fn options(&self) -> OptionsView<'a> {
        OptionsView::new(self.options)
    }

    /// Radius positions are projected at: globe radius plus `altitude`.
    pub fn surface_radius(&self) -> f64 {
        self.config.globe.radius + self.options().number("altitude", 0.0)
    }

    fn project(&self, point: GeoPoint) -> Vec3 {
        to_cartesian(point, self.surface_radius())
    }

    fn point_records(&self, kind: EffectKind) -> Result<&'a [PointRecord], BuildError> {
        let records = self.data.points().ok_or(BuildError::ExpectedPoints { kind })?;
        if records.is_empty() {
            return Err(BuildError::EmptyInput);
        }
        Ok(records)
    }

    fn polygons(&self) -> Result<Vec<GeoPolygon>, BuildError> {
        self.data.polygons()
    }

    fn dots(&self, kind: EffectKind, color: Rgba) -> Result<Vec<Dot>, BuildError> {
        self.point_records(kind)?
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let geo = record.position(index)?;
                Ok(Dot {
                    geo,
                    position: self.project(geo),
                    color: record_color(record, color),
                })
            })
            .collect()
    }

    fn outlines(&self, polygons: &[GeoPolygon]) -> Vec<Outline> {
        polygons
            .iter()
            .map(|polygon| Outline {
                rings: polygon
                    .rings
                    .iter()
                    .map(|ring| ring.iter().map(|p| self.project(*p)).collect())
                    .collect(),
            })
            .collect()
    }
}

pub type BuildFn = fn(&BuildInput<'_>) -> Result<RenderState, BuildError>;

pub fn builder_for(kind: EffectKind) -> BuildFn {
    match kind {
        EffectKind::PulsingDot => pulsing_dot::build,
        EffectKind::AnimatedArc => arc::build,
        EffectKind::Explosion => explosion::build,
        EffectKind::GlowingBorder => glowing_border::build,
        EffectKind::DirectionalArrow => arrow::build,
        EffectKind::EventMarker => marker::build,
        EffectKind::AreaHighlight => area::build,
    }
}

pub fn build(kind: EffectKind, input: &BuildInput<'_>) -> Result<RenderState, BuildError> {
    debug!(id = input.id, %kind, clock_ms = input.clock.millis(), "building effect");
    builder_for(kind)(input)
}

/// Per-point colour override, falling back to the option colour.
fn record_color(record: &PointRecord, fallback: Rgba) -> Rgba {
    record
        .color
        .as_ref()
        .and_then(Rgba::from_value)
        .unwrap_or(fallback)
}
