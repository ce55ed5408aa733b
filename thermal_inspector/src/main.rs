//! Command-line front end for the thermal leak detector.
//!
//! Every subcommand prints its predictions as pretty JSON on stdout; logs go to
//! stderr and follow `RUST_LOG` (default `info`).

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thermal_leaks::core_modules::structural::PrecomputedDetections;
use thermal_leaks::core_modules::utils::image_helper::image_helper;
use thermal_leaks::{
    BatchInspector, InspectionConfig, InspectionReport, Prediction, ThermalInspector, WorkingSize,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "thermal_inspector", version, about = "Find hot and cold leaks in thermal captures")]
struct Cli {
    /// JSON configuration file; missing keys keep their defaults.
    #[arg(long, global = true, env = "THERMAL_CONFIG")]
    config: Option<PathBuf>,

    /// Deviation from the scene mean that marks a leak.
    #[arg(long, global = true)]
    leak_offset: Option<f64>,

    /// Working resolution for palette images, as WIDTHxHEIGHT.
    #[arg(long, global = true)]
    size: Option<WorkingSize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect one palette-rendered thermal image.
    Image {
        path: PathBuf,
        /// Where to write the red/blue leak visualization (PNG).
        #[arg(long)]
        out: Option<PathBuf>,
        /// Also write the predictions to this file.
        #[arg(long)]
        json: Option<PathBuf>,
        /// Normal-light photograph of the same wall cell.
        #[arg(long, requires = "structural")]
        photo: Option<PathBuf>,
        /// Structural predictions for the photograph (JSON array).
        #[arg(long, requires = "photo")]
        structural: Option<PathBuf>,
    },
    /// Inspect a raw temperature grid stored as a JSON array of rows.
    Samples {
        path: PathBuf,
        /// Where to write the red/blue leak visualization (PNG).
        #[arg(long)]
        out: Option<PathBuf>,
        /// Where to write the false-color rendering of the samples (PNG).
        #[arg(long)]
        view: Option<PathBuf>,
    },
    /// Inspect many palette-rendered images concurrently.
    Batch {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Directory receiving one `<stem>_leaks.png` per capture; repeated
        /// stems get the input index appended.
        #[arg(long)]
        out_dir: PathBuf,
        /// Concurrent inspections; defaults to the number of CPUs.
        #[arg(long)]
        workers: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Command::Image {
            path,
            out,
            json,
            photo,
            structural,
        } => {
            let inspector = ThermalInspector::new(config)?;
            let thermal = image::open(&path).with_context(|| format!("cannot read {}", path.display()))?;

            let (report, predictions) = match (photo, structural) {
                (Some(photo), Some(structural)) => {
                    let photo = image::open(&photo).with_context(|| format!("cannot read {}", photo.display()))?;
                    let detector = PrecomputedDetections::from_json_file(&structural)?;
                    let cell = inspector.inspect_cell(&thermal, &photo, &detector)?;
                    tracing::info!(summary = ?cell.summary.counts, "merged leak and structural predictions");
                    (cell.thermal, cell.predictions)
                }
                _ => {
                    let report = inspector.detect_from_image(&thermal)?;
                    let predictions = report.predictions();
                    (report, predictions)
                }
            };

            if let Some(out) = out {
                write_visualization(&out, &report)?;
            }
            let rendered = serde_json::to_string_pretty(&predictions)?;
            if let Some(json) = json {
                std::fs::write(&json, &rendered).with_context(|| format!("cannot write {}", json.display()))?;
            }
            println!("{rendered}");
        }
        Command::Samples { path, out, view } => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("cannot read {}", path.display()))?;
            let samples: Vec<Vec<f64>> = serde_json::from_str(&text)
                .with_context(|| format!("{} is not a JSON array of numeric rows", path.display()))?;

            let report = ThermalInspector::new(config)?.detect_from_samples(samples)?;
            if let Some(out) = out {
                write_visualization(&out, &report)?;
            }
            if let Some(view) = view {
                image_helper::save(&view, &report.thermal_view)
                    .with_context(|| format!("cannot write {}", view.display()))?;
            }
            print_predictions(&report.predictions())?;
        }
        Command::Batch {
            paths,
            out_dir,
            workers,
        } => {
            std::fs::create_dir_all(&out_dir)
                .with_context(|| format!("cannot create {}", out_dir.display()))?;
            let batch = BatchInspector::new(config, workers)?;

            let names = capture_names(&paths);

            // --- 1. Load; unreadable files become error records ---
            let mut load_errors = Vec::with_capacity(paths.len());
            let mut captures = Vec::with_capacity(paths.len());
            for (path, name) in paths.iter().zip(&names) {
                match image::open(path) {
                    Ok(img) => {
                        captures.push((name.clone(), img));
                        load_errors.push(None);
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "cannot read capture");
                        load_errors.push(Some(format!("cannot read {}: {e}", path.display())));
                    }
                }
            }

            // --- 2. Inspect what loaded ---
            let mut inspected = batch.inspect_images(captures).await.into_iter();

            // --- 3. One record per input, in input order ---
            let mut failures = 0;
            let mut listing = Vec::with_capacity(paths.len());
            for ((path, name), load_error) in paths.iter().zip(names).zip(load_errors) {
                let outcome = match load_error {
                    Some(e) => Err(e),
                    None => match inspected.next() {
                        Some(item) => item.result.map_err(|e| e.to_string()).and_then(|report| {
                            write_visualization(&out_dir.join(format!("{name}_leaks.png")), &report)
                                .map(|()| report)
                                .map_err(|e| format!("{e:#}"))
                        }),
                        None => Err("no inspection result".to_string()),
                    },
                };

                let input = path.display().to_string();
                match outcome {
                    Ok(report) => listing.push(serde_json::json!({
                        "capture": name,
                        "input": input,
                        "predictions": report.predictions(),
                    })),
                    Err(error) => {
                        failures += 1;
                        listing.push(serde_json::json!({
                            "capture": name,
                            "input": input,
                            "error": error,
                        }));
                    }
                }
            }

            println!("{}", serde_json::to_string_pretty(&listing)?);
            if failures > 0 {
                bail!("{failures} of {} captures failed", paths.len());
            }
        }
    }

    Ok(())
}

/// Defaults, then the config file, then environment, then flags.
fn load_config(cli: &Cli) -> anyhow::Result<InspectionConfig> {
    let base = match &cli.config {
        Some(path) => InspectionConfig::from_json_file(path)?,
        None => InspectionConfig::default(),
    };
    let mut config = base.with_env_overrides()?;
    if let Some(offset) = cli.leak_offset {
        config.leak_offset = offset;
    }
    if let Some(size) = cli.size {
        config.working_size = size;
    }
    config.validate()?;

    tracing::debug!(
        leak_offset = config.leak_offset,
        width = config.working_size.width,
        height = config.working_size.height,
        "configuration loaded"
    );
    Ok(config)
}

fn write_visualization(path: &Path, report: &InspectionReport) -> anyhow::Result<()> {
    image_helper::save(path, &report.visualization)
        .with_context(|| format!("cannot write {}", path.display()))?;
    tracing::info!(path = %path.display(), leaks = report.regions.len(), "visualization written");
    Ok(())
}

fn print_predictions(predictions: &[Prediction]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(predictions)?);
    Ok(())
}

/// File stems, with the input index appended wherever a stem repeats so no
/// two captures share an output file.
fn capture_names(paths: &[PathBuf]) -> Vec<String> {
    let mut taken = HashSet::new();
    paths
        .iter()
        .enumerate()
        .map(|(index, path)| {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| format!("capture{index}"));
            let mut name = stem.clone();
            let mut suffix = index;
            while !taken.insert(name.clone()) {
                name = format!("{stem}_{suffix}");
                suffix += paths.len();
            }
            name
        })
        .collect()
}
