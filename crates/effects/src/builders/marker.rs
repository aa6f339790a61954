use super::{BuildInput, record_color};
use crate::color::Rgba;
use crate::error::BuildError;
use crate::kind::EffectKind;
use crate::render::{Marker, RenderState};

pub(super) fn build(input: &BuildInput<'_>) -> Result<RenderState, BuildError> {
    let opts = input.options();
    let radius = opts.number("radius", 8.0);
    let color = opts.color("color", Rgba::WHITE);
    let stroke_color = opts.color("strokeColor", Rgba::BLACK);

    let markers = input
        .point_records(EffectKind::EventMarker)?
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let geo = record.position(index)?;
            Ok(Marker {
                geo,
                position: input.project(geo),
                radius,
                color: record_color(record, color),
                stroke_color,
                icon_type: record.icon_type.clone(),
            })
        })
        .collect::<Result<Vec<_>, BuildError>>()?;

    Ok(RenderState::EventMarker { markers })
}
