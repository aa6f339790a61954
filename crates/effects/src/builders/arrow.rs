use foundation::math::{GeoPoint, bearing_deg, destination_point};

use super::BuildInput;
use crate::color::Rgba;
use crate::error::BuildError;
use crate::input::PointRecord;
use crate::kind::EffectKind;
use crate::render::{Arrow, Pulse, RenderState};

/// Where the head starts, as a fraction of the arrow length.
const NECK: f64 = 0.65;

pub(super) fn build(input: &BuildInput<'_>) -> Result<RenderState, BuildError> {
    let opts = input.options();
    let length = opts.number("arrowLength", 5.0);
    let width = opts.number("arrowWidth", 2.0);
    let default_direction = opts.number("direction", 0.0);

    let arrows = input
        .point_records(EffectKind::DirectionalArrow)?
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let origin = record.position(index)?;
            let bearing = resolve_bearing(record, index, origin, default_direction)?;
            let polygon = arrow_polygon(origin, bearing, length, width);
            Ok(Arrow {
                origin,
                tip: polygon[3],
                bearing_deg: bearing,
                outline: polygon.into_iter().map(|p| input.project(p)).collect(),
            })
        })
        .collect::<Result<Vec<_>, BuildError>>()?;

    let pulse = opts.flag("pulse", false).then(|| Pulse {
        base_radius: length,
        intensity: opts.number("pulseIntensity", 0.3),
        speed: opts.number("pulseSpeed", 2.0),
    });

    Ok(RenderState::DirectionalArrow {
        arrows,
        color: opts.color("color", Rgba::WHITE),
        pulse,
    })
}

/// Record `direction`, then the bearing towards the record's target, then the
/// option default.
fn resolve_bearing(
    record: &PointRecord,
    index: usize,
    origin: GeoPoint,
    default_direction: f64,
) -> Result<f64, BuildError> {
    if let Some(direction) = record.direction.filter(|d| d.is_finite()) {
        return Ok(direction.rem_euclid(360.0));
    }
    match record.target(index) {
        Some(target) => Ok(bearing_deg(origin, target?)),
        None => Ok(default_direction.rem_euclid(360.0)),
    }
}

/// Seven-vertex arrow outline, counter-clockwise from the left tail corner.
/// Index 3 is the tip. Sizes are in degrees of arc.
fn arrow_polygon(origin: GeoPoint, bearing: f64, length: f64, width: f64) -> Vec<GeoPoint> {
    let shaft = width / 6.0;
    let barb = width / 2.0;
    let neck = length * NECK;
    [
        (0.0, -shaft),
        (neck, -shaft),
        (neck, -barb),
        (length, 0.0),
        (neck, barb),
        (neck, shaft),
        (0.0, shaft),
    ]
    .into_iter()
    .map(|(along, across)| offset(origin, bearing, along, across))
    .collect()
}

/// Local (along, across) offset from `origin`, treating the neighbourhood as flat.
fn offset(origin: GeoPoint, bearing: f64, along: f64, across: f64) -> GeoPoint {
    let distance = along.hypot(across);
    if distance == 0.0 {
        return origin;
    }
    let turn = across.atan2(along).to_degrees();
    destination_point(origin, bearing + turn, distance)
}
