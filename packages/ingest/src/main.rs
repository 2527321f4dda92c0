#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the tourism data normalizer.

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use tourism_map_cli_utils::IndicatifProgress;
use tourism_map_ingest::{IngestOptions, STEPS, run};

#[derive(Parser)]
#[command(
    name = "tourism_map_ingest",
    about = "Normalize the tourism statistics exports for the dashboard"
)]
struct Cli {
    /// Directory that contains the raw data files
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
    /// Archive with the raw files (defaults to `data.zip` or `<data-dir>/data.zip` if present)
    #[arg(long)]
    zip: Option<PathBuf>,
    /// Output directory for the normalized files
    #[arg(long, default_value = "data/normalized")]
    out_dir: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = tourism_map_cli_utils::init_logger();
    let cli = Cli::parse();

    let options = IngestOptions {
        data_dir: cli.data_dir,
        zip: cli.zip,
        out_dir: cli.out_dir,
    };

    let start = Instant::now();
    let progress = IndicatifProgress::steps_bar(&multi, "Normalizing", STEPS);
    let summary = run(&options, &progress)?;

    log::info!(
        "Normalized {} origin rows, {} intensity rows and {} regions in {:.1}s",
        summary.origins,
        summary.intensity,
        summary.regions,
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
