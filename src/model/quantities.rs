use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuantityKind {
    Length,
    Area,
    Volume,
    Count,
}

impl QuantityKind {
    /// Maps an IFCQUANTITY* tag to its kind. Weight and time quantities are ignored.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "IFCQUANTITYLENGTH" => Some(QuantityKind::Length),
            "IFCQUANTITYAREA" => Some(QuantityKind::Area),
            "IFCQUANTITYVOLUME" => Some(QuantityKind::Volume),
            "IFCQUANTITYCOUNT" => Some(QuantityKind::Count),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quantity {
    pub name: String,
    pub kind: QuantityKind,
    pub value: f64,
}

/// A named bag of quantities attached to one element (IFCELEMENTQUANTITY).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantitySet {
    pub name: String,
    pub quantities: Vec<Quantity>,
}

impl QuantitySet {
    /// First quantity whose name matches `name`, ignoring ASCII case.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Quantity> {
        self.quantities
            .iter()
            .find(|q| q.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregatedArchitecturalQuantities {
    pub wall_area: f64,
    pub door_count: usize,
    pub window_count: usize,
    pub mep_run_length: f64,
    pub mep_segment_count: usize,
}
