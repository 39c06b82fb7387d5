#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for coastline change analysis.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Deserialize;
use shoreline_analysis::{
    AnalysisOptions, DEFAULT_MAX_VERTICES, MemoryStore, compare_with, statistics,
};
use shoreline_analysis_models::Analysis;
use shoreline_coastline::inspect::inspect;
use shoreline_coastline::load::{CoastlineOverrides, load_coastline, read_geojson};
use shoreline_coastline_models::{Accuracy, Coastline, CoastlineMetadata, DataSource};

#[derive(Parser)]
#[command(name = "shoreline", about = "Coastline change analysis tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a baseline coastline with a later comparison coastline
    Compare {
        /// Baseline `GeoJSON` file (e.g. `Manila_Bay_2010.geojson`)
        baseline: PathBuf,
        /// Comparison `GeoJSON` file
        comparison: PathBuf,
        /// Baseline capture year (defaults to the year in the file name)
        #[arg(long)]
        baseline_year: Option<i32>,
        /// Comparison capture year (defaults to the year in the file name)
        #[arg(long)]
        comparison_year: Option<i32>,
        /// Analysis name (defaults to "<baseline name> Analysis")
        #[arg(long)]
        name: Option<String>,
        /// Region of both coastlines
        #[arg(long)]
        region: Option<String>,
        /// Province of both coastlines
        #[arg(long)]
        province: Option<String>,
        /// Municipality of both coastlines
        #[arg(long)]
        municipality: Option<String>,
        /// Barangay of both coastlines
        #[arg(long)]
        barangay: Option<String>,
        /// Data source (NAMRIA, NOAH, `OpenStreetMap`, "Manual Upload", Other)
        #[arg(long, default_value = "Manual Upload", value_parser = parse_source)]
        source: DataSource,
        /// Positional accuracy (High, Medium, Low)
        #[arg(long, default_value = "Medium", value_parser = parse_accuracy)]
        accuracy: Accuracy,
        /// Maximum combined vertex count before the comparison is refused
        #[arg(long, default_value_t = DEFAULT_MAX_VERTICES)]
        max_vertices: usize,
        /// Write the analysis JSON here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Summarize the structure of a `GeoJSON` file
    Inspect {
        /// `GeoJSON` file to inspect
        file: PathBuf,
    },
    /// Aggregate statistics over saved analysis JSON files
    Stats {
        /// Files holding one analysis or an array of analyses
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AnalysisFile {
    Many(Vec<Analysis>),
    One(Box<Analysis>),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Compare {
            baseline,
            comparison,
            baseline_year,
            comparison_year,
            name,
            region,
            province,
            municipality,
            barangay,
            source,
            accuracy,
            max_vertices,
            output,
        } => {
            let shared = CoastlineOverrides {
                region,
                province,
                municipality,
                barangay,
                metadata: CoastlineMetadata {
                    source,
                    accuracy,
                    ..CoastlineMetadata::default()
                },
                ..CoastlineOverrides::default()
            };

            let baseline = load_coastline(
                &baseline,
                &CoastlineOverrides {
                    year: baseline_year,
                    ..shared.clone()
                },
            )?;
            let comparison = load_coastline(
                &comparison,
                &CoastlineOverrides {
                    year: comparison_year,
                    ..shared
                },
            )?;

            if comparison.year <= baseline.year {
                log::warn!(
                    "Comparison year {} is not after baseline year {}",
                    comparison.year,
                    baseline.year
                );
            }

            let (store, baseline_id, comparison_id) = store_pair(baseline, comparison);

            let options = AnalysisOptions { max_vertices };
            let analysis = compare_with(
                &store,
                &baseline_id,
                &comparison_id,
                name.as_deref(),
                &options,
            )?;

            write_json(&analysis, output.as_deref())?;

            log::info!(
                "{}: {} risk ({}% change)",
                analysis.name,
                analysis.risk_assessment.level,
                analysis.results.percentage_change
            );
        }
        Commands::Inspect { file } => {
            let geojson = read_geojson(&file)?;
            write_json(&inspect(&geojson), None)?;
        }
        Commands::Stats { files } => {
            let mut analyses = Vec::new();
            for file in &files {
                let text = std::fs::read_to_string(file)?;
                match serde_json::from_str::<AnalysisFile>(&text)? {
                    AnalysisFile::Many(many) => analyses.extend(many),
                    AnalysisFile::One(one) => analyses.push(*one),
                }
            }
            log::info!("Loaded {} analyses from {} files", analyses.len(), files.len());

            write_json(&statistics::overview(&analyses), None)?;
        }
    }

    Ok(())
}

/// Puts both coastlines in a store, renaming the comparison when both files
/// share a stem. Returns the store and the two ids.
fn store_pair(baseline: Coastline, mut comparison: Coastline) -> (MemoryStore, String, String) {
    if comparison.id == baseline.id {
        comparison.id = format!("{}#comparison", comparison.id);
        log::debug!("Comparison shares the baseline id; using {}", comparison.id);
    }

    let baseline_id = baseline.id.clone();
    let comparison_id = comparison.id.clone();
    let store = [baseline, comparison].into_iter().collect();

    (store, baseline_id, comparison_id)
}

fn parse_source(value: &str) -> Result<DataSource, String> {
    value
        .parse()
        .map_err(|_| format!("unknown data source '{value}'"))
}

fn parse_accuracy(value: &str) -> Result<Accuracy, String> {
    value
        .parse()
        .map_err(|_| format!("unknown accuracy '{value}'"))
}

fn write_json<T: serde::Serialize>(
    value: &T,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(value)?;

    if let Some(path) = output {
        std::fs::write(path, json)?;
        log::info!("Wrote {}", path.display());
    } else {
        println!("{json}");
    }

    Ok(())
}
