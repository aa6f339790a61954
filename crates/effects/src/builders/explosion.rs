use super::BuildInput;
use crate::color::Rgba;
use crate::error::BuildError;
use crate::kind::EffectKind;
use crate::render::{Growth, RenderState};

const COLOR: Rgba = Rgba::rgb8(0xff, 0x88, 0x00);

pub(super) fn build(input: &BuildInput<'_>) -> Result<RenderState, BuildError> {
    let opts = input.options();
    let dots = input.dots(EffectKind::Explosion, opts.color("color", COLOR))?;
    Ok(RenderState::Explosion {
        dots,
        growth: Growth {
            base_radius: opts.number("baseRadius", 10_000.0),
            max_radius: opts.number("maxRadius", 50_000.0),
            duration_ms: opts.number("duration", 2000.0),
        },
        units_per_metre: input.config.globe.units_per_metre(),
    })
}
