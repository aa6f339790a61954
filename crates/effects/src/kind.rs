use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The closed set of visual effects the engine can build.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    PulsingDot,
    #[serde(rename = "arc", alias = "animated_arc")]
    AnimatedArc,
    Explosion,
    GlowingBorder,
    DirectionalArrow,
    EventMarker,
    AreaHighlight,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown effect type {0:?}")]
pub struct UnknownKind(pub String);

impl EffectKind {
    pub const ALL: [EffectKind; 7] = [
        EffectKind::PulsingDot,
        EffectKind::AnimatedArc,
        EffectKind::Explosion,
        EffectKind::GlowingBorder,
        EffectKind::DirectionalArrow,
        EffectKind::EventMarker,
        EffectKind::AreaHighlight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EffectKind::PulsingDot => "pulsing_dot",
            EffectKind::AnimatedArc => "arc",
            EffectKind::Explosion => "explosion",
            EffectKind::GlowingBorder => "glowing_border",
            EffectKind::DirectionalArrow => "directional_arrow",
            EffectKind::EventMarker => "event_marker",
            EffectKind::AreaHighlight => "area_highlight",
        }
    }

    /// Whether the render state carries time-dependent parameters.
    pub fn is_animated(&self) -> bool {
        !matches!(self, EffectKind::EventMarker | EffectKind::AreaHighlight)
    }

    /// Whether the effect consumes polygon rings rather than points.
    pub fn is_area(&self) -> bool {
        matches!(self, EffectKind::GlowingBorder | EffectKind::AreaHighlight)
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffectKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name == "animated_arc" {
            return Ok(EffectKind::AnimatedArc);
        }
        EffectKind::ALL
            .into_iter()
            .find(|k| k.as_str() == name)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{EffectKind, UnknownKind};

    #[test]
    fn parses_every_wire_name() {
        for kind in EffectKind::ALL {
            assert_eq!(kind.as_str().parse::<EffectKind>(), Ok(kind));
            assert_eq!(kind.to_string(), kind.as_str());
        }
        assert_eq!("animated_arc".parse(), Ok(EffectKind::AnimatedArc));
    }

    #[test]
    fn rejects_unknown_names() {
        assert_eq!(
            "not_a_real_type".parse::<EffectKind>(),
            Err(UnknownKind("not_a_real_type".to_string()))
        );
        assert!("PulsingDot".parse::<EffectKind>().is_err());
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&EffectKind::PulsingDot).unwrap();
        assert_eq!(json, "\"pulsing_dot\"");
        let arc: EffectKind = serde_json::from_str("\"arc\"").unwrap();
        assert_eq!(arc, EffectKind::AnimatedArc);
    }

    #[test]
    fn static_kinds_are_not_animated() {
        assert!(EffectKind::PulsingDot.is_animated());
        assert!(!EffectKind::EventMarker.is_animated());
        assert!(EffectKind::AreaHighlight.is_area());
    }
}
