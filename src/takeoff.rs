use std::path::Path;

use crate::config::TakeoffConfig;
use crate::error::{FormatError, LoadError};
use crate::extract::{aggregate_quantities, extract_structural_elements, surcharge_load};
use crate::geometry::PlacementResolver;
use crate::model::{ExtractionSummary, TakeoffReport};
use crate::parser::EntityStore;

/// Reads an IFC file and runs the full takeoff on it.
///
/// Supports both IFC2x3 and IFC4 schemas. Produces:
/// - Structural elements with world positions, in a stable order
/// - Wall area, door and window counts, MEP run length
/// - The wall surcharge load derived from the wall area
/// - Counts of skipped elements and fallback values
///
/// # Errors
///
/// Returns [`LoadError::FileRead`] if the file cannot be read.
/// Returns [`LoadError::Format`] if the content is not a supported IFC file.
///
/// # Example
///
/// ```no_run
/// use ifc_takeoff::{parse_ifc_file, TakeoffConfig};
///
/// let report = parse_ifc_file("model.ifc", &TakeoffConfig::default())?;
/// for element in &report.elements {
///     println!("{} {} at ({:.3}, {:.3}, {:.3})", element.kind, element.name, element.x, element.y, element.z);
/// }
/// # Ok::<(), ifc_takeoff::error::LoadError>(())
/// ```
pub fn parse_ifc_file<P: AsRef<Path>>(
    path: P,
    config: &TakeoffConfig,
) -> Result<TakeoffReport, LoadError> {
    let bytes = std::fs::read(&path).map_err(|source| LoadError::FileRead {
        path: path.as_ref().to_path_buf(),
        source,
    })?;

    Ok(run_takeoff(&bytes, config)?)
}

/// Runs the takeoff on an in-memory IFC buffer.
///
/// Only a buffer that cannot be read as an entity graph is an error. Broken
/// placements, missing quantities and similar per-element defects are
/// absorbed and reported through [`ExtractionSummary`].
pub fn run_takeoff(bytes: &[u8], config: &TakeoffConfig) -> Result<TakeoffReport, FormatError> {
    let store = EntityStore::from_bytes(bytes)?;
    let resolver = PlacementResolver::new(&store, config);

    let structural = extract_structural_elements(&store, &resolver);
    let takeoff = aggregate_quantities(&store, config);
    let surcharge_load = surcharge_load(&takeoff.quantities, config.wall_unit_weight);

    let summary = ExtractionSummary {
        elements_read: structural.elements.len(),
        elements_skipped: structural.skipped,
        elements_unplaced: structural.unplaced,
        geometry_recovered: structural.recovered,
        wall_area_fallbacks: takeoff.wall_area_fallbacks,
        run_length_fallbacks: takeoff.run_length_fallbacks,
    };

    tracing::info!(
        schema = store.schema_name(),
        placements = resolver.arena().len(),
        read = summary.elements_read,
        skipped = summary.elements_skipped,
        wall_area = takeoff.quantities.wall_area,
        mep_run_length = takeoff.quantities.mep_run_length,
        "takeoff complete"
    );

    Ok(TakeoffReport {
        schema: store.schema(),
        elements: structural.elements,
        quantities: takeoff.quantities,
        surcharge_load,
        summary,
    })
}
