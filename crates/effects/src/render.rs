//! Render state handed to the rendering backend.
//!
//! Geometry is baked when an effect is built. Time-dependent values are not:
//! animated variants carry small parameter structs whose formulas the backend
//! evaluates at draw time against the shared clock, via
//! [`RenderState::sample`] or the structs directly.

use foundation::math::{GeoPoint, QuadraticCurve, Vec3};
use foundation::time::Time;
use serde::Serialize;

use crate::color::Rgba;
use crate::kind::EffectKind;

/// Periodic modulation around a base radius (absolute clock phase).
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Pulse {
    pub base_radius: f64,
    pub intensity: f64,
    pub speed: f64,
}

impl Pulse {
    pub fn factor_at(&self, now: Time) -> f64 {
        1.0 + self.intensity * (now.0 * 0.002 * self.speed).sin()
    }

    /// `base_radius * (1 + intensity * sin(t * 0.002 * speed))`
    pub fn radius_at(&self, now: Time) -> f64 {
        self.base_radius * self.factor_at(now)
    }
}

/// Looping expansion from `base_radius` to `max_radius` over `duration_ms`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Growth {
    pub base_radius: f64,
    pub max_radius: f64,
    pub duration_ms: f64,
}

impl Growth {
    /// Position within the current loop, in `[0, 1)`. A non-positive duration
    /// pins the effect at its end state.
    pub fn progress(&self, elapsed_ms: f64) -> f64 {
        if !(self.duration_ms > 0.0) {
            return 1.0;
        }
        elapsed_ms.max(0.0).rem_euclid(self.duration_ms) / self.duration_ms
    }

    pub fn radius_at(&self, elapsed_ms: f64) -> f64 {
        let p = self.progress(elapsed_ms);
        self.base_radius + (self.max_radius - self.base_radius) * ease_out_cubic(p)
    }

    /// Fades out as the ring expands.
    pub fn opacity_at(&self, elapsed_ms: f64) -> f64 {
        1.0 - self.progress(elapsed_ms)
    }
}

pub fn ease_out_cubic(p: f64) -> f64 {
    1.0 - (1.0 - p).powi(3)
}

/// Periodic opacity (absolute clock phase).
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Glow {
    pub base_opacity: f64,
    pub intensity: f64,
    pub speed: f64,
}

impl Glow {
    /// `min(1, base + intensity * sin(t * 0.0015 * speed) + intensity)`
    pub fn opacity_at(&self, now: Time) -> f64 {
        (self.base_opacity
            + self.intensity * (now.0 * 0.0015 * self.speed).sin()
            + self.intensity)
            .min(1.0)
    }
}

/// Progressive reveal of a polyline after creation.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct DrawIn {
    pub duration_ms: f64,
}

impl DrawIn {
    pub fn visible_fraction(&self, elapsed_ms: f64) -> f64 {
        if !(self.duration_ms > 0.0) {
            return 1.0;
        }
        (elapsed_ms.max(0.0) / self.duration_ms).min(1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dot {
    pub geo: GeoPoint,
    pub position: Vec3,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArcPath {
    pub source: GeoPoint,
    pub target: GeoPoint,
    /// Control curve for Bézier arcs; `None` for great-circle arcs.
    pub curve: Option<QuadraticCurve>,
    pub points: Vec<Vec3>,
    pub source_color: Rgba,
    pub target_color: Rgba,
}

impl ArcPath {
    /// Prefix of the polyline covering `fraction` of its vertices.
    pub fn visible_points(&self, fraction: f64) -> &[Vec3] {
        if self.points.is_empty() {
            return &self.points;
        }
        let last = self.points.len() - 1;
        let count = (fraction.clamp(0.0, 1.0) * last as f64).ceil() as usize + 1;
        &self.points[..count.min(self.points.len())]
    }

    /// Gradient colour at parameter `t` along the arc.
    pub fn color_at(&self, t: f64) -> Rgba {
        let t = t.clamp(0.0, 1.0) as f32;
        let mut out = [0.0f32; 4];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.source_color.0[i] + (self.target_color.0[i] - self.source_color.0[i]) * t;
        }
        Rgba(out)
    }
}

/// Polygon rings projected to render space, outer ring first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outline {
    pub rings: Vec<Vec<Vec3>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arrow {
    pub origin: GeoPoint,
    pub tip: GeoPoint,
    pub bearing_deg: f64,
    /// Closed arrow polygon (shaft and head) in render space.
    pub outline: Vec<Vec3>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub geo: GeoPoint,
    pub position: Vec3,
    pub radius: f64,
    pub color: Rgba,
    pub stroke_color: Rgba,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderState {
    /// Radii are in metres; `units_per_metre` converts them to render units.
    PulsingDot {
        dots: Vec<Dot>,
        pulse: Pulse,
        units_per_metre: f64,
    },
    #[serde(rename = "arc")]
    AnimatedArc {
        arcs: Vec<ArcPath>,
        stroke_width: f64,
        draw_in: Option<DrawIn>,
    },
    Explosion {
        dots: Vec<Dot>,
        growth: Growth,
        units_per_metre: f64,
    },
    GlowingBorder {
        outlines: Vec<Outline>,
        color: Rgba,
        stroke_width: f64,
        glow: Glow,
    },
    DirectionalArrow {
        arrows: Vec<Arrow>,
        color: Rgba,
        pulse: Option<Pulse>,
    },
    EventMarker {
        markers: Vec<Marker>,
    },
    AreaHighlight {
        outlines: Vec<Outline>,
        /// Flat triangle list (3 vertices per triangle).
        triangles: Vec<Vec3>,
        fill: Rgba,
        stroke: Rgba,
        stroke_width: f64,
    },
}

/// Time-dependent values of one effect at one instant. Fields that do not
/// apply to the effect are `None`.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize)]
pub struct AnimatedSample {
    /// Metres.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    /// `radius` converted to render units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_fraction: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

impl RenderState {
    pub fn kind(&self) -> EffectKind {
        match self {
            RenderState::PulsingDot { .. } => EffectKind::PulsingDot,
            RenderState::AnimatedArc { .. } => EffectKind::AnimatedArc,
            RenderState::Explosion { .. } => EffectKind::Explosion,
            RenderState::GlowingBorder { .. } => EffectKind::GlowingBorder,
            RenderState::DirectionalArrow { .. } => EffectKind::DirectionalArrow,
            RenderState::EventMarker { .. } => EffectKind::EventMarker,
            RenderState::AreaHighlight { .. } => EffectKind::AreaHighlight,
        }
    }

    /// Every render-space vertex of the effect.
    pub fn positions(&self) -> Vec<Vec3> {
        match self {
            RenderState::PulsingDot { dots, .. } | RenderState::Explosion { dots, .. } => {
                dots.iter().map(|d| d.position).collect()
            }
            RenderState::AnimatedArc { arcs, .. } => {
                arcs.iter().flat_map(|a| a.points.iter().copied()).collect()
            }
            RenderState::GlowingBorder { outlines, .. }
            | RenderState::AreaHighlight { outlines, .. } => outlines
                .iter()
                .flat_map(|o| o.rings.iter().flatten().copied())
                .collect(),
            RenderState::DirectionalArrow { arrows, .. } => {
                arrows.iter().flat_map(|a| a.outline.iter().copied()).collect()
            }
            RenderState::EventMarker { markers } => markers.iter().map(|m| m.position).collect(),
        }
    }

    /// Primary colour of the effect.
    pub fn color(&self) -> Rgba {
        match self {
            RenderState::PulsingDot { dots, .. } | RenderState::Explosion { dots, .. } => {
                dots.first().map(|d| d.color).unwrap_or(Rgba::WHITE)
            }
            RenderState::AnimatedArc { arcs, .. } => {
                arcs.first().map(|a| a.source_color).unwrap_or(Rgba::WHITE)
            }
            RenderState::GlowingBorder { color, .. } | RenderState::DirectionalArrow { color, .. } => {
                *color
            }
            RenderState::EventMarker { markers } => {
                markers.first().map(|m| m.color).unwrap_or(Rgba::WHITE)
            }
            RenderState::AreaHighlight { fill, .. } => *fill,
        }
    }

    /// Evaluates the time-dependent parameters at `now` for an effect created
    /// at `created_at`.
    pub fn sample(&self, now: Time, created_at: Time) -> AnimatedSample {
        let elapsed = now.elapsed_since(created_at);
        match self {
            RenderState::PulsingDot {
                pulse,
                units_per_metre,
                ..
            } => AnimatedSample {
                radius: Some(pulse.radius_at(now)),
                render_radius: Some(pulse.radius_at(now) * units_per_metre),
                scale: Some(pulse.factor_at(now)),
                ..AnimatedSample::default()
            },
            RenderState::AnimatedArc { draw_in, .. } => AnimatedSample {
                visible_fraction: Some(draw_in.map_or(1.0, |d| d.visible_fraction(elapsed))),
                ..AnimatedSample::default()
            },
            RenderState::Explosion {
                growth,
                units_per_metre,
                ..
            } => AnimatedSample {
                radius: Some(growth.radius_at(elapsed)),
                render_radius: Some(growth.radius_at(elapsed) * units_per_metre),
                opacity: Some(growth.opacity_at(elapsed)),
                ..AnimatedSample::default()
            },
            RenderState::GlowingBorder { glow, .. } => AnimatedSample {
                opacity: Some(glow.opacity_at(now)),
                ..AnimatedSample::default()
            },
            RenderState::DirectionalArrow { pulse, .. } => AnimatedSample {
                scale: pulse.map(|p| p.factor_at(now)),
                ..AnimatedSample::default()
            },
            RenderState::EventMarker { .. } | RenderState::AreaHighlight { .. } => {
                AnimatedSample::default()
            }
        }
    }
}
