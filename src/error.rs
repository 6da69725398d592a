//! Error types for IFC Takeoff.

use std::path::PathBuf;
use thiserror::Error;

/// The buffer is not a parseable entity graph. Always fatal.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The buffer is not valid UTF-8 text.
    #[error("file is not valid UTF-8 text (first bad byte at offset {offset})")]
    Encoding { offset: usize },

    /// No `FILE_SCHEMA` declaration was found in the header.
    #[error("missing FILE_SCHEMA declaration in header")]
    MissingSchema,

    /// The declared schema is not one of the supported revisions.
    #[error("unsupported schema '{schema}' (expected IFC2X3 or IFC4)")]
    UnsupportedSchema { schema: String },

    /// The file has no `DATA;` section.
    #[error("missing DATA section")]
    MissingDataSection,

    /// The STEP format is invalid or malformed.
    #[error("invalid STEP format: {message}")]
    InvalidStep { message: String },

    /// The same entity id is declared twice.
    #[error("entity #{id} is declared more than once")]
    DuplicateEntity { id: u64 },
}

/// Errors that can occur when loading an IFC file from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read the IFC file from disk.
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Format(#[from] FormatError),
}

/// A placement chain could not be composed. Recovered locally, never fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("placement chain starting at #{placement} exceeds depth bound {bound}")]
    DepthExceeded { placement: u64, bound: usize },

    #[error("placement #{placement} has a non-finite or degenerate basis")]
    NonFiniteBasis { placement: u64 },
}

/// An element's placement references something that is not a usable placement.
/// Isolated to the element; the element is skipped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlacementError {
    #[error("#{from} references missing entity #{target}")]
    DanglingReference { from: u64, target: u64 },

    #[error("#{id} is a {found}, not a placement")]
    NotAPlacement { id: u64, found: String },

    #[error("#{id} has a malformed {attribute} attribute")]
    MalformedAttribute { id: u64, attribute: &'static str },

    #[error("placement parent index {index} is outside the arena")]
    ParentOutOfRange { index: usize },
}

/// A quantity was absent and a fallback constant was used instead.
/// Only ever logged and counted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MissingDataWarning {
    #[error("wall #{id} has no usable area quantity, using default {fallback}")]
    WallArea { id: u64, fallback: f64 },

    #[error("segment #{id} has no usable length, using default {fallback}")]
    RunLength { id: u64, fallback: f64 },
}

/// Errors that can occur when loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config '{path}': {source}")]
    Invalid {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Errors that can occur when exporting data.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Failed to create the output file.
    #[error("failed to create file '{path}': {source}")]
    FileCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write data to the file.
    #[error("failed to write data: {message}")]
    WriteError { message: String },

    /// Failed to serialize data to JSON.
    #[error("JSON serialization failed: {source}")]
    JsonSerialize {
        #[from]
        source: serde_json::Error,
    },

    /// Failed to write CSV data.
    #[error("CSV write failed: {source}")]
    CsvWrite {
        #[from]
        source: csv::Error,
    },
}
