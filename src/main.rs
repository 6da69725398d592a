use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use ifc_takeoff::export::{export_csv, export_json};
use ifc_takeoff::model::{ElementKind, TakeoffReport};
use ifc_takeoff::{parse_ifc_file, PlacementStrategy, TakeoffConfig};

#[derive(Parser, Debug)]
#[command(name = "ifc-takeoff")]
#[command(about = "IFC Takeoff - structural element positions and architectural/MEP quantities")]
#[command(version)]
struct Args {
    /// Path to IFC file
    #[arg(required = true)]
    file: PathBuf,

    /// Export element table to CSV
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Export full report to JSON
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// JSON config file with fallback constants and load factors
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Wall surcharge per square metre of wall (kN/m²)
    #[arg(long, value_name = "KN_PER_M2")]
    unit_weight: Option<f64>,

    /// Read volume-tagged wall quantities below this value as areas
    #[arg(long, value_name = "VALUE")]
    volume_area_ceiling: Option<f64>,

    /// Skip matrix composition when every placement is relative to the root
    #[arg(long)]
    fast_placement: bool,
}

impl Args {
    fn takeoff_config(&self) -> Result<TakeoffConfig> {
        let mut config = match &self.config {
            Some(path) => TakeoffConfig::from_file(path)?,
            None => TakeoffConfig::default(),
        };
        if let Some(unit_weight) = self.unit_weight {
            config.wall_unit_weight = unit_weight;
        }
        if let Some(ceiling) = self.volume_area_ceiling {
            config.volume_as_area_ceiling = Some(ceiling);
        }
        if self.fast_placement {
            config.placement_strategy = PlacementStrategy::RootedFastPath;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let filter = EnvFilter::try_from_env("IFC_TAKEOFF_LOG")
        .unwrap_or_else(|_| EnvFilter::new("ifc_takeoff=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.takeoff_config()?;

    let report = parse_ifc_file(&args.file, &config)?;

    if let Some(csv_path) = &args.csv {
        export_csv(&report, csv_path)?;
        println!("Exported to CSV: {}", csv_path.display());
    }

    if let Some(json_path) = &args.json {
        export_json(&report, json_path)?;
        println!("Exported to JSON: {}", json_path.display());
    }

    print_summary(&report);
    Ok(())
}

fn print_summary(report: &TakeoffReport) {
    let q = &report.quantities;
    let s = &report.summary;

    println!("Schema:            {}", report.schema);
    println!(
        "Elements:          {} read, {} skipped, {} without placement",
        s.elements_read, s.elements_skipped, s.elements_unplaced
    );
    for kind in ElementKind::ALL {
        let count = report.elements_of(kind);
        if count > 0 {
            println!("  {:<17}{count}", format!("{kind}:"));
        }
    }
    if s.geometry_recovered > 0 {
        println!("Recovered chains:  {}", s.geometry_recovered);
    }
    println!(
        "Wall area:         {:.2} m² ({} defaulted)",
        q.wall_area, s.wall_area_fallbacks
    );
    println!("Doors / windows:   {} / {}", q.door_count, q.window_count);
    println!(
        "MEP run length:    {:.2} m over {} segments ({} defaulted)",
        q.mep_run_length, q.mep_segment_count, s.run_length_fallbacks
    );
    println!("Wall surcharge:    {:.2} kN", report.surcharge_load);
}
