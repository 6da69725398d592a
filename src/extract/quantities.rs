//! Architectural and MEP quantity aggregation.
//!
//! Authoring tools disagree on quantity names and sometimes on quantity kinds,
//! so every per-element value is read through an ordered list of rules. The
//! first rule that yields a value wins; the last rule of each list is a
//! configured constant so an element never contributes zero.

use crate::config::TakeoffConfig;
use crate::error::MissingDataWarning;
use crate::model::{AggregatedArchitecturalQuantities, Quantity, QuantityKind, QuantitySet};
use crate::parser::{EntityStore, SchemaRevision, StepEntity};

pub const WALL_TAGS: &[&str] = &["IFCWALL", "IFCWALLSTANDARDCASE"];
pub const DOOR_TAGS: &[&str] = &["IFCDOOR", "IFCDOORSTANDARDCASE"];
pub const WINDOW_TAGS: &[&str] = &["IFCWINDOW", "IFCWINDOWSTANDARDCASE"];

/// IFC4 splits runs into dedicated segment types.
pub const IFC4_RUN_TAGS: &[&str] = &["IFCPIPESEGMENT", "IFCDUCTSEGMENT", "IFCCABLECARRIERSEGMENT"];
/// IFC2X3 only knows the generic flow segment.
pub const IFC2X3_RUN_TAGS: &[&str] = &["IFCFLOWSEGMENT"];

/// Wall area quantity names, most specific first.
pub const AREA_SYNONYMS: &[&str] = &["NetSideArea", "GrossSideArea", "Area", "NetArea", "GrossArea"];
pub const LENGTH_SYNONYMS: &[&str] = &["Length", "NetLength", "GrossLength"];

#[must_use]
pub fn run_segment_tags(schema: SchemaRevision) -> &'static [&'static str] {
    match schema {
        SchemaRevision::Ifc4 => IFC4_RUN_TAGS,
        SchemaRevision::Ifc2x3 => IFC2X3_RUN_TAGS,
    }
}

/// Where a wall's area came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallAreaRule {
    /// A synonym-named quantity tagged as an area.
    TaggedArea,
    /// A synonym-named quantity tagged as a volume but small enough to be an
    /// area exported with the wrong type.
    MislabeledVolume,
    /// The configured per-wall default.
    DefaultPerElement,
}

pub const WALL_AREA_POLICY: [WallAreaRule; 3] = [
    WallAreaRule::TaggedArea,
    WallAreaRule::MislabeledVolume,
    WallAreaRule::DefaultPerElement,
];

impl WallAreaRule {
    #[must_use]
    pub fn apply(self, sets: &[QuantitySet], config: &TakeoffConfig) -> Option<f64> {
        match self {
            WallAreaRule::TaggedArea => first_synonym(sets, AREA_SYNONYMS, |q| {
                q.kind == QuantityKind::Area && usable(q.value)
            }),
            WallAreaRule::MislabeledVolume => {
                let ceiling = config.volume_as_area_ceiling?;
                first_synonym(sets, AREA_SYNONYMS, |q| {
                    q.kind == QuantityKind::Volume && usable(q.value) && q.value < ceiling
                })
            }
            WallAreaRule::DefaultPerElement => Some(config.default_wall_area),
        }
    }
}

/// Where a run segment's length came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunLengthRule {
    /// A synonym-named quantity tagged as a length.
    TaggedLength,
    /// A numeric `Length` single-value property.
    PropertyLength,
    /// The configured per-segment default.
    DefaultPerSegment,
}

pub const RUN_LENGTH_POLICY: [RunLengthRule; 3] = [
    RunLengthRule::TaggedLength,
    RunLengthRule::PropertyLength,
    RunLengthRule::DefaultPerSegment,
];

impl RunLengthRule {
    /// Length in metres. `length_scale` converts model units for values read
    /// from the file; the default is already in metres.
    #[must_use]
    pub fn apply(
        self,
        sets: &[QuantitySet],
        properties: &[(String, f64)],
        length_scale: f64,
        config: &TakeoffConfig,
    ) -> Option<f64> {
        match self {
            RunLengthRule::TaggedLength => first_synonym(sets, LENGTH_SYNONYMS, |q| {
                q.kind == QuantityKind::Length && usable(q.value)
            })
            .map(|v| v * length_scale),
            RunLengthRule::PropertyLength => LENGTH_SYNONYMS
                .iter()
                .find_map(|synonym| {
                    properties
                        .iter()
                        .find(|(name, value)| name.eq_ignore_ascii_case(synonym) && usable(*value))
                })
                .map(|(_, value)| value * length_scale),
            RunLengthRule::DefaultPerSegment => Some(config.default_run_length),
        }
    }
}

fn usable(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Tries each synonym in order across all sets; first accepted quantity wins.
fn first_synonym<F>(sets: &[QuantitySet], synonyms: &[&str], accept: F) -> Option<f64>
where
    F: Fn(&Quantity) -> bool,
{
    synonyms.iter().find_map(|synonym| {
        sets.iter()
            .filter_map(|set| set.find(synonym))
            .find(|&q| accept(q))
            .map(|q| q.value)
    })
}

/// Evaluates a rule list, returning the value and the rule that produced it.
fn first_rule<R: Copy>(policy: &[R], apply: impl Fn(R) -> Option<f64>) -> Option<(f64, R)> {
    policy.iter().find_map(|&rule| apply(rule).map(|value| (value, rule)))
}

/// Quantity sets attached to an element (IFCELEMENTQUANTITY: Name at 2, Quantities at 5).
#[must_use]
pub fn quantity_sets(store: &EntityStore, element_id: u64) -> Vec<QuantitySet> {
    store
        .relations_of(element_id)
        .filter(|definition| definition.is_a("IFCELEMENTQUANTITY"))
        .map(|definition| QuantitySet {
            name: definition.get_string(2).unwrap_or_default().to_string(),
            quantities: definition
                .get_refs(5)
                .into_iter()
                .filter_map(|id| store.get(id))
                .filter_map(decode_quantity)
                .collect(),
        })
        .collect()
}

/// IFCQUANTITY*(Name, Description, Unit, Value, ...)
fn decode_quantity(entity: &StepEntity) -> Option<Quantity> {
    let kind = QuantityKind::from_tag(&entity.entity_type)?;
    Some(Quantity {
        name: entity.get_string(0)?.to_string(),
        kind,
        value: entity.get_float(3)?,
    })
}

/// Numeric single-value properties from attached property sets
/// (IFCPROPERTYSET.HasProperties at 4; IFCPROPERTYSINGLEVALUE Name at 0, NominalValue at 2).
#[must_use]
pub fn numeric_properties(store: &EntityStore, element_id: u64) -> Vec<(String, f64)> {
    store
        .relations_of(element_id)
        .filter(|definition| definition.is_a("IFCPROPERTYSET"))
        .flat_map(|pset| pset.get_refs(4))
        .filter_map(|id| store.get(id))
        .filter(|prop| prop.is_a("IFCPROPERTYSINGLEVALUE"))
        .filter_map(|prop| Some((prop.get_string(0)?.to_string(), prop.get_float(2)?)))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuantityTakeoff {
    pub quantities: AggregatedArchitecturalQuantities,
    pub wall_area_fallbacks: usize,
    pub run_length_fallbacks: usize,
}

/// Sums wall area, opening counts and MEP run length for the whole model.
#[must_use]
pub fn aggregate_quantities(store: &EntityStore, config: &TakeoffConfig) -> QuantityTakeoff {
    let mut takeoff = QuantityTakeoff::default();

    for wall in WALL_TAGS.iter().flat_map(|tag| store.entities_of_type(tag)) {
        let sets = quantity_sets(store, wall.id);
        let Some((area, rule)) = first_rule(&WALL_AREA_POLICY, |rule| rule.apply(&sets, config))
        else {
            continue;
        };
        match rule {
            WallAreaRule::DefaultPerElement => {
                let warning = MissingDataWarning::WallArea {
                    id: wall.id,
                    fallback: area,
                };
                tracing::debug!(%warning, "wall area fallback");
                takeoff.wall_area_fallbacks += 1;
            }
            WallAreaRule::MislabeledVolume => {
                tracing::debug!(id = wall.id, area, "reading volume-tagged quantity as area");
            }
            WallAreaRule::TaggedArea => {}
        }
        takeoff.quantities.wall_area += area;
    }

    takeoff.quantities.door_count = DOOR_TAGS.iter().map(|tag| store.count_of_type(tag)).sum();
    takeoff.quantities.window_count = WINDOW_TAGS.iter().map(|tag| store.count_of_type(tag)).sum();

    let length_scale = store.length_scale();
    for segment in run_segment_tags(store.schema())
        .iter()
        .flat_map(|tag| store.entities_of_type(tag))
    {
        let sets = quantity_sets(store, segment.id);
        let properties = numeric_properties(store, segment.id);
        let Some((length, rule)) = first_rule(&RUN_LENGTH_POLICY, |rule| {
            rule.apply(&sets, &properties, length_scale, config)
        }) else {
            continue;
        };
        if rule == RunLengthRule::DefaultPerSegment {
            let warning = MissingDataWarning::RunLength {
                id: segment.id,
                fallback: length,
            };
            tracing::debug!(%warning, "run length fallback");
            takeoff.run_length_fallbacks += 1;
        }
        takeoff.quantities.mep_run_length += length;
        takeoff.quantities.mep_segment_count += 1;
    }

    takeoff
}
