pub mod element;
pub mod quantities;
pub mod report;

pub use element::{ElementKind, ResolvedElement};
pub use quantities::{AggregatedArchitecturalQuantities, Quantity, QuantityKind, QuantitySet};
pub use report::{ExtractionSummary, TakeoffReport};
