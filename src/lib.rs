//! # IFC Takeoff
//!
//! Structural and quantity takeoff from IFC model-interchange files.
//!
//! ## Features
//!
//! - Parse IFC files (IFC2x3 and IFC4 schemas)
//! - Resolve nested local placements to world coordinates
//! - Extract columns, beams, walls, slabs and other structural elements
//! - Aggregate wall area, door/window counts and MEP run lengths
//! - Derive the wall surcharge load for beam sizing
//! - Export to CSV and JSON
//!
//! ## Example
//!
//! ```no_run
//! use ifc_takeoff::{parse_ifc_file, TakeoffConfig};
//!
//! let report = parse_ifc_file("model.ifc", &TakeoffConfig::default()).expect("Failed to parse");
//! println!("Elements: {}", report.elements.len());
//! println!("Wall area: {:.1} m²", report.quantities.wall_area);
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod geometry;
pub mod model;
pub mod parser;
pub mod takeoff;

pub use config::{PlacementStrategy, TakeoffConfig};
pub use takeoff::{parse_ifc_file, run_takeoff};
