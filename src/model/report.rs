use super::{AggregatedArchitecturalQuantities, ElementKind, ResolvedElement};
use crate::parser::SchemaRevision;
use serde::Serialize;

/// How much of the model was read directly versus skipped or filled in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionSummary {
    pub elements_read: usize,
    pub elements_skipped: usize,
    pub elements_unplaced: usize,
    pub geometry_recovered: usize,
    pub wall_area_fallbacks: usize,
    pub run_length_fallbacks: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TakeoffReport {
    pub schema: SchemaRevision,
    pub elements: Vec<ResolvedElement>,
    pub quantities: AggregatedArchitecturalQuantities,
    pub surcharge_load: f64,
    pub summary: ExtractionSummary,
}

impl TakeoffReport {
    #[must_use]
    pub fn elements_of(&self, kind: ElementKind) -> usize {
        self.elements.iter().filter(|e| e.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(kind: ElementKind, id: u64) -> ResolvedElement {
        ResolvedElement {
            kind,
            name: format!("Unnamed {kind}"),
            x: 0.0,
            y: 0.0,
            z: 0.0,
            id,
            global_id: String::new(),
        }
    }

    #[test]
    fn counts_elements_per_kind() {
        let report = TakeoffReport {
            schema: SchemaRevision::Ifc4,
            elements: vec![
                element(ElementKind::Column, 1),
                element(ElementKind::Wall, 2),
                element(ElementKind::Column, 3),
            ],
            quantities: AggregatedArchitecturalQuantities::default(),
            surcharge_load: 0.0,
            summary: ExtractionSummary::default(),
        };
        assert_eq!(report.elements_of(ElementKind::Column), 2);
        assert_eq!(report.elements_of(ElementKind::Wall), 1);
        assert_eq!(report.elements_of(ElementKind::Slab), 0);
    }
}
