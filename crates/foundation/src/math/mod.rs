pub mod curve;
pub mod geodesy;
pub mod vec;

pub use curve::*;
pub use geodesy::*;
pub use vec::*;
