pub mod load;
pub mod quantities;
pub mod structural;

pub use load::surcharge_load;
pub use quantities::{aggregate_quantities, QuantityTakeoff, RunLengthRule, WallAreaRule};
pub use structural::{extract_structural_elements, StructuralExtraction, STRUCTURAL_TAGS};
