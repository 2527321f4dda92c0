#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Converts the statistical office's PX-Web exports and the raw county
//! boundary file into the normalized files the dashboard loads.
//!
//! Inputs come from a directory or a `data.zip` archive (see [`inputs`]).
//! Each table has its own reshaping module; [`run`] ties them together and
//! writes the outputs.

pub mod boundaries;
pub mod inputs;
pub mod intensity;
pub mod national;
pub mod origins;
pub mod output;
pub mod px;

use std::path::PathBuf;
use std::sync::Arc;

use tourism_map_dashboard_models::DatasetMeta;
use tourism_map_dashboard_models::calendar::MONTHS;
use tourism_map_ingest_models::IngestSummary;
use tourism_map_source::{ProgressCallback, SourceKind};

use crate::output::{META_NOTE, OutputFiles, write_csv};

/// Errors that can occur during ingestion.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// A required input file does not exist.
    #[error("Missing input file: {}", .0.display())]
    MissingInput(PathBuf),

    /// The archive lacks required entries.
    #[error("Archive {} is missing: {}", path.display(), missing.join(", "))]
    ArchiveIncomplete {
        /// Archive path.
        path: PathBuf,
        /// Names of the missing entries.
        missing: Vec<String>,
    },

    /// File system error.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Offending path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Archive error.
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// CSV read or write error.
    #[error("CSV error in {table}: {source}")]
    Csv {
        /// Table being read or written.
        table: &'static str,
        /// Underlying error.
        source: csv::Error,
    },

    /// A required column is absent.
    #[error("{table} has no {column:?} column")]
    MissingColumn {
        /// Table name.
        table: &'static str,
        /// Expected header.
        column: &'static str,
    },

    /// The boundary file is not valid `GeoJSON`.
    #[error("Invalid boundary GeoJSON: {0}")]
    GeoJson(Box<geojson::Error>),

    /// The boundary file is `GeoJSON` but not a feature collection.
    #[error("Boundary GeoJSON is not a FeatureCollection")]
    NotFeatureCollection,

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where to read from and write to.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Directory with the raw files.
    pub data_dir: PathBuf,
    /// Explicit archive. When unset, `data.zip` is looked up in the working
    /// directory and in `data_dir`.
    pub zip: Option<PathBuf>,
    /// Output directory.
    pub out_dir: PathBuf,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            zip: None,
            out_dir: PathBuf::from(tourism_map_source::files::DEFAULT_DATA_DIR),
        }
    }
}

/// Number of progress steps reported by [`run`].
pub const STEPS: u64 = 5;

/// Reads the raw inputs, reshapes every table and writes the outputs.
///
/// # Errors
///
/// Returns the first [`IngestError`]. Inputs are read and reshaped before
/// anything is written; files written before a write failure stay on disk.
pub fn run(
    options: &IngestOptions,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<IngestSummary, IngestError> {
    progress.set_total(STEPS);

    progress.set_message("Reading inputs".to_string());
    let raw = inputs::load(&options.data_dir, options.zip.as_deref())?;
    progress.inc(1);

    progress.set_message("Table 1.2".to_string());
    let national = national::reshape(&px::read_px_csv("table1.2", &raw.table12)?)?;
    progress.inc(1);

    progress.set_message("Table 1.3".to_string());
    let origins = origins::reshape(&px::read_px_csv("table1.3", &raw.table13)?)?;
    progress.inc(1);

    progress.set_message("Table 1.9".to_string());
    let intensity = intensity::reshape(&px::read_px_csv("table1.9", &raw.table19)?)?;
    progress.inc(1);

    progress.set_message("Writing outputs".to_string());
    let regions = boundaries::simplify(&raw.boundaries)?;

    let meta = DatasetMeta {
        years_table12: national::years(&national),
        years_table13: origins::years(&origins),
        years_table19: intensity::years(&intensity),
        months: MONTHS.to_vec(),
        note: Some(META_NOTE.to_string()),
    };

    let out = OutputFiles::create(&options.out_dir)?;
    write_csv(&out.national_long(), &national.long)?;
    write_csv(&out.path(SourceKind::National), &national.wide)?;
    write_csv(&out.path(SourceKind::Origins), &origins.origins)?;
    write_csv(&out.path(SourceKind::Monthly), &origins.county_months)?;
    write_csv(&out.path(SourceKind::Intensity), &intensity)?;
    out.write_regions(&regions)?;
    out.write_meta(&meta)?;
    progress.inc(1);

    let summary = IngestSummary {
        national_long: national.long.len(),
        national_wide: national.wide.len(),
        origins: origins.origins.len(),
        county_months: origins.county_months.len(),
        intensity: intensity.len(),
        regions: regions.features.len(),
    };
    progress.finish(format!(
        "Wrote {} files to {}",
        SourceKind::ALL.len() + 1,
        options.out_dir.display()
    ));
    log::info!("Ingest complete: {summary:?}");
    Ok(summary)
}
