use serde::{Deserialize, Serialize};

use super::{GeoPoint, Vec3, to_cartesian};

/// Quadratic Bézier curve in render space.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadraticCurve {
    pub start: Vec3,
    pub control: Vec3,
    pub end: Vec3,
}

impl QuadraticCurve {
    pub fn new(start: Vec3, control: Vec3, end: Vec3) -> Self {
        Self {
            start,
            control,
            end,
        }
    }

    /// Point at parameter `t`; `t` is clamped to `[0, 1]`.
    pub fn evaluate_at(&self, t: f64) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        self.start.scale(u * u) + self.control.scale(2.0 * u * t) + self.end.scale(t * t)
    }

    /// `segments + 1` points at uniform parameter steps, endpoints included.
    pub fn sample(&self, segments: usize) -> Vec<Vec3> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| {
                if i == segments {
                    self.end
                } else {
                    self.evaluate_at(i as f64 / segments as f64)
                }
            })
            .collect()
    }
}

/// Arc between two surface points, bulging `arc_height` above the globe.
///
/// The control point is the chord midpoint pushed out to
/// `base_radius + arc_height`. Antipodal endpoints have no midpoint direction,
/// so the control is lifted perpendicular to `a`, towards the north pole where
/// possible. Identical endpoints collapse
/// the whole curve onto that single surface point.
pub fn build_arc_curve(a: GeoPoint, b: GeoPoint, base_radius: f64, arc_height: f64) -> QuadraticCurve {
    let start = to_cartesian(a, base_radius);
    let end = to_cartesian(b, base_radius);
    if a == b {
        return QuadraticCurve::new(start, start, end);
    }
    let lifted = base_radius + arc_height;

    let mid = start.lerp(end, 0.5);
    let direction = if mid.length() > 1e-9 * base_radius.abs().max(1.0) {
        mid.try_normalize()
    } else {
        antipodal_bulge(start)
    }
    .unwrap_or(Vec3::new(0.0, 1.0, 0.0));

    QuadraticCurve::new(start, direction.scale(lifted), end)
}

fn antipodal_bulge(start: Vec3) -> Option<Vec3> {
    let n = start.try_normalize()?;
    let up = Vec3::new(0.0, 1.0, 0.0);
    (up - n.scale(up.dot(n)))
        .try_normalize()
        .or_else(|| Vec3::new(1.0, 0.0, 0.0).try_normalize())
}
