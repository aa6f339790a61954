pub mod clock;
pub mod config;
pub mod frame;
pub mod metrics;

pub use clock::*;
pub use config::*;
pub use frame::*;
pub use metrics::*;
