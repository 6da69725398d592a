use crate::model::AggregatedArchitecturalQuantities;

/// Wall surcharge handed to beam sizing: total wall area times the wall's
/// weight per unit area (kN/m² gives kN).
#[must_use]
pub fn surcharge_load(quantities: &AggregatedArchitecturalQuantities, unit_weight: f64) -> f64 {
    quantities.wall_area * unit_weight
}
