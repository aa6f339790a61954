use super::BuildInput;
use crate::color::Rgba;
use crate::error::BuildError;
use crate::kind::EffectKind;
use crate::render::{Pulse, RenderState};

const COLOR: Rgba = Rgba::rgb8(0xff, 0x44, 0x44);

pub(super) fn build(input: &BuildInput<'_>) -> Result<RenderState, BuildError> {
    let opts = input.options();
    let dots = input.dots(EffectKind::PulsingDot, opts.color("color", COLOR))?;
    Ok(RenderState::PulsingDot {
        dots,
        pulse: Pulse {
            base_radius: opts.number("baseRadius", 5000.0),
            intensity: opts.number("pulseIntensity", 0.3),
            speed: opts.number("pulseSpeed", 2.0),
        },
        units_per_metre: input.config.globe.units_per_metre(),
    })
}
