use std::f64::consts::PI;

use foundation::math::{GeoPoint, build_arc_curve, great_circle_points, to_cartesian};

use super::{BuildInput, record_color};
use crate::color::Rgba;
use crate::error::BuildError;
use crate::input::PointRecord;
use crate::kind::EffectKind;
use crate::render::{ArcPath, DrawIn, RenderState};

const SOURCE_COLOR: Rgba = Rgba::rgb8(0x00, 0xaa, 0xff);
const TARGET_COLOR: Rgba = Rgba::rgb8(0xff, 0x66, 0x00);

/// Upper bound on the `segments` option; larger requests are clamped.
pub const MAX_SEGMENTS: usize = 4096;

struct Leg {
    source: GeoPoint,
    target: GeoPoint,
    color: Rgba,
}

/// Arcs come either from records carrying their own target, or (when no
/// record has one) from consecutive records chained into a route.
pub(super) fn build(input: &BuildInput<'_>) -> Result<RenderState, BuildError> {
    let opts = input.options();
    let records = input.point_records(EffectKind::AnimatedArc)?;

    let source_color = opts.color("sourceColor", SOURCE_COLOR);
    let target_color = opts.color("targetColor", TARGET_COLOR);
    let height = opts.number("arcHeight", input.config.arcs.height);
    let segments = opts
        .count("segments", input.config.arcs.segments)
        .clamp(1, MAX_SEGMENTS);
    let great_circle = matches!(opts.text("curve"), Some("great_circle" | "greatCircle"));
    let radius = input.surface_radius();

    let arcs = legs(records, source_color)?
        .into_iter()
        .map(|leg| {
            if great_circle {
                let points = great_circle_points(leg.source, leg.target, segments)
                    .into_iter()
                    .enumerate()
                    .map(|(i, p)| {
                        let t = i as f64 / segments as f64;
                        to_cartesian(p, radius + height * (PI * t).sin())
                    })
                    .collect();
                ArcPath {
                    source: leg.source,
                    target: leg.target,
                    curve: None,
                    points,
                    source_color: leg.color,
                    target_color,
                }
            } else {
                let curve = build_arc_curve(leg.source, leg.target, radius, height);
                ArcPath {
                    source: leg.source,
                    target: leg.target,
                    points: curve.sample(segments),
                    curve: Some(curve),
                    source_color: leg.color,
                    target_color,
                }
            }
        })
        .collect();

    let draw_in = opts.flag("animate", true).then(|| DrawIn {
        duration_ms: opts.number("drawDuration", 2000.0) / opts.number("animationSpeed", 1.0),
    });

    Ok(RenderState::AnimatedArc {
        arcs,
        stroke_width: opts.number("strokeWidth", 4.0),
        draw_in,
    })
}

fn legs(records: &[PointRecord], default_color: Rgba) -> Result<Vec<Leg>, BuildError> {
    if records.iter().any(PointRecord::has_target) {
        return records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let source = record.position(index)?;
                let target = record
                    .target(index)
                    .ok_or(BuildError::MissingEndpoints { index })??;
                Ok(Leg {
                    source,
                    target,
                    color: record_color(record, default_color),
                })
            })
            .collect();
    }

    if records.len() < 2 {
        return Err(BuildError::MissingEndpoints { index: 0 });
    }
    let points = records
        .iter()
        .enumerate()
        .map(|(index, record)| record.position(index))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(points
        .windows(2)
        .zip(records)
        .map(|(pair, record)| Leg {
            source: pair[0],
            target: pair[1],
            color: record_color(record, default_color),
        })
        .collect())
}
