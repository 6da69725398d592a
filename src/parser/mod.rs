pub mod step;
pub mod store;
pub mod units;

pub use crate::error::FormatError;
pub use step::{StepEntity, StepFile, StepValue};
pub use store::{EntityStore, SchemaRevision};
