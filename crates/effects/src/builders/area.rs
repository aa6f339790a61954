use earcutr::earcut;
use foundation::math::Vec3;
use tracing::warn;

use super::BuildInput;
use crate::color::Rgba;
use crate::error::BuildError;
use crate::render::RenderState;

const FILL: Rgba = Rgba::rgba8(0xff, 0x00, 0x00, 0x66);
const STROKE: Rgba = Rgba::rgb8(0xff, 0x00, 0x00);

pub(super) fn build(input: &BuildInput<'_>) -> Result<RenderState, BuildError> {
    let opts = input.options();
    let polygons = input.polygons()?;
    let outlines = input.outlines(&polygons);

    let mut triangles = Vec::new();
    for outline in &outlines {
        let tris = triangulate_rings(&outline.rings);
        if tris.is_empty() {
            warn!(id = input.id, rings = outline.rings.len(), "polygon produced no triangles");
        }
        triangles.extend(tris);
    }

    Ok(RenderState::AreaHighlight {
        outlines,
        triangles,
        fill: opts.color("fillColor", FILL),
        stroke: opts.color("strokeColor", STROKE),
        stroke_width: opts.number("strokeWidth", 1.0),
    })
}

/// Triangulates one polygon (outer ring, then holes) given in render space.
/// Returns a flat triangle list, 3 vertices per triangle.
pub fn triangulate_rings(rings: &[Vec<Vec3>]) -> Vec<Vec3> {
    // Earcut runs in the tangent plane at the outer ring's centroid.
    let Some(outer) = rings.first() else {
        return Vec::new();
    };
    if outer.len() < 3 {
        return Vec::new();
    }

    let origin = centroid(outer);
    let Some(n) = origin.try_normalize() else {
        return Vec::new();
    };

    let up = if n.y.abs() < 0.99 {
        Vec3::new(0.0, 1.0, 0.0)
    } else {
        Vec3::new(1.0, 0.0, 0.0)
    };
    let Some(east) = up.cross(n).try_normalize() else {
        return Vec::new();
    };
    let north = n.cross(east);

    let mut vertices: Vec<Vec3> = Vec::new();
    let mut coords_2d: Vec<f64> = Vec::new();
    let mut hole_indices: Vec<usize> = Vec::new();

    for (ring_i, ring) in rings.iter().enumerate() {
        if ring.len() < 3 {
            continue;
        }
        if ring_i > 0 {
            hole_indices.push(vertices.len());
        }
        for &p in ring {
            let v = p - origin;
            coords_2d.push(v.dot(east));
            coords_2d.push(v.dot(north));
            vertices.push(p);
        }
    }

    let indices = match earcut(&coords_2d, &hole_indices, 2) {
        Ok(ix) => ix,
        Err(_) => return Vec::new(),
    };

    indices
        .into_iter()
        .filter_map(|idx| vertices.get(idx).copied())
        .collect()
}

fn centroid(vertices: &[Vec3]) -> Vec3 {
    let sum = vertices.iter().fold(Vec3::ZERO, |acc, v| acc + *v);
    sum.scale(1.0 / vertices.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{options, run};
    use super::triangulate_rings;
    use crate::color::Rgba;
    use crate::input::{GeometryInput, PointRecord};
    use crate::kind::EffectKind;
    use crate::render::RenderState;
    use foundation::math::{GeoPoint, to_cartesian};
    use serde_json::json;

    fn ring(coords: &[(f64, f64)]) -> Vec<foundation::math::Vec3> {
        coords
            .iter()
            .map(|&(lon, lat)| to_cartesian(GeoPoint::new(lat, lon).unwrap(), 100.0))
            .collect()
    }

    #[test]
    fn square_becomes_two_triangles() {
        let tris = triangulate_rings(&[ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])]);
        assert_eq!(tris.len(), 6);
    }

    #[test]
    fn hole_adds_triangles() {
        let outer = ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let hole = ring(&[(3.0, 3.0), (3.0, 7.0), (7.0, 7.0), (7.0, 3.0)]);
        let tris = triangulate_rings(&[outer, hole]);
        assert_eq!(tris.len() % 3, 0);
        assert_eq!(tris.len() / 3, 8);
    }

    #[test]
    fn polar_polygon_triangulates() {
        let tris = triangulate_rings(&[ring(&[(0.0, 85.0), (120.0, 85.0), (240.0 - 360.0, 85.0)])]);
        assert_eq!(tris.len(), 3);
    }

    #[test]
    fn area_highlight_from_point_ring() {
        let data = GeometryInput::Points(vec![
            PointRecord::at(0.0, 0.0),
            PointRecord::at(0.0, 10.0),
            PointRecord::at(10.0, 10.0),
            PointRecord::at(10.0, 0.0),
        ]);
        let state = run(EffectKind::AreaHighlight, &data, &options(json!({}))).unwrap();
        let RenderState::AreaHighlight {
            outlines,
            triangles,
            fill,
            ..
        } = &state
        else {
            panic!("wrong variant");
        };
        assert_eq!(outlines[0].rings[0].len(), 4);
        assert_eq!(triangles.len(), 6);
        assert_eq!(*fill, Rgba::rgba8(0xff, 0x00, 0x00, 0x66));
        assert_eq!(state.color(), *fill);
    }
}
