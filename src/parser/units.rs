//! Project length unit → metre conversion.

use crate::parser::step::StepEntity;
use crate::parser::store::EntityStore;

/// Scale factor from the project's length unit to metres.
///
/// Follows IFCPROJECT.UnitsInContext (index 8) → IFCUNITASSIGNMENT.Units (index 0)
/// and reads the first length unit, SI or conversion based. Returns 1.0 when nothing
/// usable is declared.
pub fn length_unit_scale(store: &EntityStore) -> f64 {
    let Some(project) = store.entities_of_type("IFCPROJECT").next() else {
        return 1.0;
    };

    let Some(assignment) = project.get_ref(8).and_then(|id| store.get(id)) else {
        return 1.0;
    };

    assignment
        .get_refs(0)
        .into_iter()
        .filter_map(|id| store.get(id))
        .find_map(|unit| length_scale_of(store, unit, 0))
        .unwrap_or(1.0)
}

// Conversion units may be defined in terms of other conversion units.
const MAX_UNIT_NESTING: usize = 4;

fn length_scale_of(store: &EntityStore, unit: &StepEntity, depth: usize) -> Option<f64> {
    match unit.entity_type.as_str() {
        "IFCSIUNIT" => si_length_scale(unit),
        "IFCCONVERSIONBASEDUNIT" if depth < MAX_UNIT_NESTING => {
            conversion_length_scale(store, unit, depth)
        }
        _ => None,
    }
}

/// IFCCONVERSIONBASEDUNIT(Dimensions, UnitType, Name, ConversionFactor)
/// with ConversionFactor = IFCMEASUREWITHUNIT(ValueComponent, UnitComponent).
fn conversion_length_scale(store: &EntityStore, unit: &StepEntity, depth: usize) -> Option<f64> {
    if unit.get_enum(1)? != "LENGTHUNIT" {
        return None;
    }

    let factor = store.get(unit.get_ref(3)?)?;
    if !factor.is_a("IFCMEASUREWITHUNIT") {
        return None;
    }
    let value = factor.get_float(0)?;
    let base = store.get(factor.get_ref(1)?)?;
    let base_scale = length_scale_of(store, base, depth + 1).unwrap_or(1.0);

    let scale = value * base_scale;
    (scale.is_finite() && scale > 0.0).then_some(scale)
}

/// IFCSIUNIT(*, UnitType, Prefix, Name)
fn si_length_scale(unit: &StepEntity) -> Option<f64> {
    if unit.get_enum(1)? != "LENGTHUNIT" {
        return None;
    }
    if unit.get_enum(3)? != "METRE" {
        return None;
    }

    let scale = match unit.get_enum(2) {
        Some("KILO") => 1e3,
        Some("HECTO") => 1e2,
        Some("DECA") => 1e1,
        Some("DECI") => 1e-1,
        Some("CENTI") => 1e-2,
        Some("MILLI") => 1e-3,
        Some("MICRO") => 1e-6,
        _ => 1.0,
    };
    Some(scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_unit(unit: &str) -> EntityStore {
        let content = format!(
            "FILE_SCHEMA(('IFC4'));DATA;
#1=IFCPROJECT('p',$,'Project',$,$,$,$,$,#2);
#2=IFCUNITASSIGNMENT((#4,#3));
#3={unit};
#4=IFCSIUNIT(*,.AREAUNIT.,$,.SQUARE_METRE.);
ENDSEC;"
        );
        EntityStore::from_bytes(content.as_bytes()).unwrap()
    }

    #[test]
    fn millimetre_projects_scale_to_metres() {
        let store = store_with_unit("IFCSIUNIT(*,.LENGTHUNIT.,.MILLI.,.METRE.)");
        assert!((store.length_scale() - 0.001).abs() < f64::EPSILON);
    }

    #[test]
    fn unprefixed_metre_is_identity() {
        let store = store_with_unit("IFCSIUNIT(*,.LENGTHUNIT.,$,.METRE.)");
        assert!((store.length_scale() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn feet_convert_through_measure_with_unit() {
        let content = "FILE_SCHEMA(('IFC2X3'));DATA;
#1=IFCPROJECT('p',$,'Project',$,$,$,$,$,#2);
#2=IFCUNITASSIGNMENT((#5));
#3=IFCSIUNIT(*,.LENGTHUNIT.,$,.METRE.);
#4=IFCMEASUREWITHUNIT(IFCLENGTHMEASURE(0.3048),#3);
#5=IFCCONVERSIONBASEDUNIT(#6,.LENGTHUNIT.,'FOOT',#4);
#6=IFCDIMENSIONALEXPONENTS(1,0,0,0,0,0,0);
ENDSEC;";
        let store = EntityStore::from_bytes(content.as_bytes()).unwrap();
        assert!((store.length_scale() - 0.3048).abs() < 1e-12);
    }

    #[test]
    fn inches_defined_over_millimetres() {
        let store = store_with_unit("IFCCONVERSIONBASEDUNIT($,.LENGTHUNIT.,'INCH',#5);
#5=IFCMEASUREWITHUNIT(IFCLENGTHMEASURE(25.4),#6);
#6=IFCSIUNIT(*,.LENGTHUNIT.,.MILLI.,.METRE.)");
        assert!((store.length_scale() - 0.0254).abs() < 1e-12);
    }

    #[test]
    fn self_referencing_conversion_unit_terminates() {
        let store = store_with_unit("IFCCONVERSIONBASEDUNIT($,.LENGTHUNIT.,'LOOP',#5);
#5=IFCMEASUREWITHUNIT(IFCLENGTHMEASURE(2.),#3)");
        assert!(store.length_scale().is_finite());
    }

    #[test]
    fn missing_project_defaults_to_metres() {
        let store = EntityStore::from_bytes(b"FILE_SCHEMA(('IFC4'));DATA;ENDSEC;").unwrap();
        assert!((store.length_scale() - 1.0).abs() < f64::EPSILON);
    }
}
