use crate::error::ExportError;
use crate::model::TakeoffReport;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub fn export_csv<P: AsRef<Path>>(report: &TakeoffReport, path: P) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    write_elements(report, file)
}

/// Writes the element table: one row per resolved element, in report order.
pub fn write_elements<W: Write>(report: &TakeoffReport, writer: W) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(writer);

    writer.write_record(["Type", "Name", "X", "Y", "Z", "Id", "Global ID"])?;

    for element in &report.elements {
        writer.write_record([
            element.kind.label(),
            element.name.as_str(),
            format!("{:.4}", element.x).as_str(),
            format!("{:.4}", element.y).as_str(),
            format!("{:.4}", element.z).as_str(),
            element.id.to_string().as_str(),
            element.global_id.as_str(),
        ])?;
    }

    writer.flush().map_err(|e| ExportError::WriteError {
        message: e.to_string(),
    })?;

    Ok(())
}
