pub mod batch;
pub mod entity;
pub mod registry;

// Entity lifecycle over the effect builders, driven by one shared clock.
pub use batch::{BatchOutcome, BatchReport, process_batch};
pub use entity::{EntityId, RenderableEntity};
pub use registry::{CreateError, EntityRegistry};
