use crate::error::ExportError;
use crate::model::TakeoffReport;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub fn export_json<P: AsRef<Path>>(report: &TakeoffReport, path: P) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    write_report(report, BufWriter::new(file))
}

/// Writes the whole report (schema, elements, quantities, load, summary) as pretty JSON.
pub fn write_report<W: Write>(report: &TakeoffReport, mut writer: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer)
        .and_then(|()| writer.flush())
        .map_err(|e| ExportError::WriteError {
            message: e.to_string(),
        })
}
