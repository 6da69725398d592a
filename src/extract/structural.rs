use crate::geometry::{PlacementResolver, Resolution};
use crate::model::{ElementKind, ResolvedElement};
use crate::parser::{EntityStore, StepEntity, StepValue};

/// Element tags extracted into the element table, in output order.
pub const STRUCTURAL_TAGS: &[&str] = &[
    "IFCCOLUMN",
    "IFCCOLUMNSTANDARDCASE",
    "IFCBEAM",
    "IFCBEAMSTANDARDCASE",
    "IFCMEMBER",
    "IFCMEMBERSTANDARDCASE",
    "IFCPLATE",
    "IFCPLATESTANDARDCASE",
    "IFCFOOTING",
    "IFCPILE",
    "IFCWALL",
    "IFCWALLSTANDARDCASE",
    "IFCSLAB",
    "IFCSLABSTANDARDCASE",
    "IFCCURTAINWALL",
    "IFCROOF",
    "IFCSTAIR",
    "IFCRAILING",
];

// IfcProduct attribute positions
const GLOBAL_ID: usize = 0;
const NAME: usize = 2;
const OBJECT_PLACEMENT: usize = 5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuralExtraction {
    pub elements: Vec<ResolvedElement>,
    /// Elements whose placement could not be resolved.
    pub skipped: usize,
    /// Elements declared without any placement.
    pub unplaced: usize,
    /// Elements placed after part of their chain was replaced by identity.
    pub recovered: usize,
}

/// Resolves every allow-listed element to a world position.
///
/// Rows come out in declaration order within each tag, tags in
/// [`STRUCTURAL_TAGS`] order. A broken element is logged, counted and left
/// out; it never stops the remaining elements.
pub fn extract_structural_elements(
    store: &EntityStore,
    resolver: &PlacementResolver<'_>,
) -> StructuralExtraction {
    let mut extraction = StructuralExtraction::default();

    for tag in STRUCTURAL_TAGS {
        let Some(kind) = ElementKind::from_tag(tag) else {
            continue;
        };

        for entity in store.entities_of_type(tag) {
            let placement = match placement_ref(entity) {
                Ok(Some(id)) => Some(id),
                Ok(None) => {
                    tracing::debug!(id = entity.id, tag, "element has no placement");
                    extraction.unplaced += 1;
                    continue;
                }
                Err(attribute) => {
                    tracing::warn!(id = entity.id, tag, attribute, "skipping malformed element");
                    extraction.skipped += 1;
                    continue;
                }
            };

            match resolver.resolve(entity.id, placement) {
                Ok(Resolution::Placed(resolved)) => {
                    if resolved.recovered.is_some() {
                        extraction.recovered += 1;
                    }
                    let p = resolved.position;
                    extraction.elements.push(ResolvedElement {
                        kind,
                        name: display_name(entity, kind),
                        x: p.x,
                        y: p.y,
                        z: p.z,
                        id: entity.id,
                        global_id: entity.get_string(GLOBAL_ID).unwrap_or_default().to_string(),
                    });
                }
                Ok(Resolution::Missing) => extraction.unplaced += 1,
                Err(err) => {
                    tracing::warn!(id = entity.id, tag, %err, "skipping element");
                    extraction.skipped += 1;
                }
            }
        }
    }

    extraction
}

/// ObjectPlacement reference; `Err` names the attribute when it is unreadable.
fn placement_ref(entity: &StepEntity) -> Result<Option<u64>, &'static str> {
    match entity.get(OBJECT_PLACEMENT) {
        Some(StepValue::Reference(id)) => Ok(Some(*id)),
        Some(StepValue::Null) => Ok(None),
        _ => Err("ObjectPlacement"),
    }
}

fn display_name(entity: &StepEntity, kind: ElementKind) -> String {
    entity
        .get_string(NAME)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map_or_else(|| format!("Unnamed {kind}"), str::to_string)
}
