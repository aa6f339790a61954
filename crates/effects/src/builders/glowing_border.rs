use super::BuildInput;
use crate::color::Rgba;
use crate::error::BuildError;
use crate::render::{Glow, RenderState};

const BASE_COLOR: Rgba = Rgba::rgb8(0xff, 0xcc, 0x00);

pub(super) fn build(input: &BuildInput<'_>) -> Result<RenderState, BuildError> {
    let opts = input.options();
    let polygons = input.polygons()?;
    Ok(RenderState::GlowingBorder {
        outlines: input.outlines(&polygons),
        color: opts.color("baseColor", BASE_COLOR),
        stroke_width: opts.number("strokeWidth", 2.0),
        glow: Glow {
            base_opacity: opts.number("baseOpacity", 0.3),
            intensity: opts.number("glowIntensity", 0.5),
            speed: opts.number("glowSpeed", 1.5),
        },
    })
}
