pub mod builders;
pub mod color;
pub mod entity_spec;
pub mod error;
pub mod input;
pub mod kind;
pub mod options;
pub mod render;

// Effect construction: declarative specs in, render state out.
pub use builders::{BuildFn, BuildInput, MAX_SEGMENTS, build, builder_for, triangulate_rings};
pub use color::Rgba;
pub use entity_spec::EntitySpec;
pub use error::BuildError;
pub use input::{GeoPolygon, GeometryInput, PointRecord, validate_ring};
pub use kind::{EffectKind, UnknownKind};
pub use options::{Options, OptionsView, merge};
pub use render::*;
