#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command line front end for the tourism dashboard.
//!
//! `ingest` normalizes the raw exports, `render` prints one selection's
//! panels as text or JSON, and `interactive` (the default) drives the
//! dashboard from menus.
//!
//! Log output goes through `indicatif-log-bridge` (via
//! [`tourism_map_cli_utils::init_logger`]) so it never interleaves with the
//! progress bars.

mod interactive;
mod session;
mod text;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tourism_map_dashboard_models::Metric;
use tourism_map_ingest::IngestOptions;

use crate::session::SessionArgs;

#[derive(Parser)]
#[command(name = "tourism_map_cli", about = "Croatian tourism dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize the raw statistical-office exports
    Ingest {
        /// Directory that contains the raw data files
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
        /// Archive with the raw files
        #[arg(long)]
        zip: Option<PathBuf>,
        /// Output directory for the normalized files
        #[arg(long, default_value = "data/normalized")]
        out_dir: PathBuf,
    },
    /// Print every panel for one selection
    Render {
        #[command(flatten)]
        session: SessionArgs,
        /// Year (defaults to the configured or latest year)
        #[arg(long)]
        year: Option<i32>,
        /// Month, 1-12
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=12))]
        month: Option<u8>,
        /// `arrivals` or `nights`
        #[arg(long)]
        metric: Option<Metric>,
        /// Region to select, by name or key (e.g. "Istarska županija")
        #[arg(long)]
        region: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Drive the dashboard from menus
    Interactive {
        #[command(flatten)]
        session: SessionArgs,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = tourism_map_cli_utils::init_logger();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Interactive {
        session: SessionArgs::default(),
    }) {
        Commands::Ingest {
            data_dir,
            zip,
            out_dir,
        } => {
            let options = IngestOptions {
                data_dir,
                zip,
                out_dir,
            };
            let progress = tourism_map_cli_utils::IndicatifProgress::steps_bar(
                &multi,
                "Normalizing",
                tourism_map_ingest::STEPS,
            );
            let summary = tourism_map_ingest::run(&options, &progress)?;
            println!(
                "Wrote {} county-month rows, {} origin rows, {} intensity rows and {} regions to {}",
                summary.county_months,
                summary.origins,
                summary.intensity,
                summary.regions,
                options.out_dir.display()
            );
        }
        Commands::Render {
            session,
            year,
            month,
            metric,
            region,
            format,
        } => {
            let mut config = session.load_config()?;
            if year.is_some() {
                config.selection.year = year;
            }
            if let Some(month) = month {
                config.selection.month = month;
            }
            if let Some(metric) = metric {
                config.selection.metric = metric;
            }

            let dashboard = session::start(config, &multi).await?;
            if let Some(region) = region {
                dashboard.click_region(&region);
            }

            let frames = dashboard.frames();
            match format {
                OutputFormat::Text => print!("{}", text::render_text(&frames)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&frames)?),
            }
        }
        Commands::Interactive { session } => {
            let config = session.load_config()?;
            let dashboard = session::start(config, &multi).await?;
            interactive::run(dashboard, &multi).await?;
        }
    }

    Ok(())
}
