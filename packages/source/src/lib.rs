#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loading of the normalized tourism data files.
//!
//! The dashboard reads six files at startup: the county boundaries, three
//! monthly tables, the intensity table and the year coverage metadata.
//! [`load_dataset`] reads them concurrently and parses each into typed rows
//! with canonical region keys.

pub mod files;
pub mod loader;
pub mod parsing;
pub mod progress;
pub mod regions;
pub mod table;
pub mod tables;

use std::path::PathBuf;

pub use files::{SourceFiles, SourceKind};
pub use loader::load_dataset;
pub use progress::{NullProgress, ProgressCallback, null_progress};
pub use regions::RegionRecord;

use tourism_map_dashboard_models::{
    DatasetMeta, IntensityRow, MonthlyMetricRow, NationalMonthRow, OriginRow,
};

/// Errors that can occur while loading the data files.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// A file could not be read.
    #[error("Failed to read {kind} file {}: {source}", path.display())]
    Io {
        /// Which input.
        kind: SourceKind,
        /// Path that was tried.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// A CSV file has an unreadable header row.
    #[error("CSV error in {kind} file: {source}")]
    Csv {
        /// Which input.
        kind: SourceKind,
        /// Underlying error.
        source: csv::Error,
    },

    /// A JSON file could not be parsed.
    #[error("JSON error in {kind} file: {source}")]
    Json {
        /// Which input.
        kind: SourceKind,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// The boundary file is not valid `GeoJSON`.
    #[error("GeoJSON error in {kind} file: {source}")]
    GeoJson {
        /// Which input.
        kind: SourceKind,
        /// Underlying error.
        source: Box<geojson::Error>,
    },

    /// The boundary file is valid `GeoJSON` but not a feature collection.
    #[error("Regions file is not a GeoJSON FeatureCollection")]
    NotFeatureCollection,
}

/// Everything loaded at startup. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Drawable regions in file order.
    pub regions: Vec<RegionRecord>,
    /// County × month totals.
    pub monthly: Vec<MonthlyMetricRow>,
    /// Nationwide monthly totals.
    pub national: Vec<NationalMonthRow>,
    /// County × month × origin country.
    pub origins: Vec<OriginRow>,
    /// Town/municipality intensity.
    pub intensity: Vec<IntensityRow>,
    /// Year coverage.
    pub meta: DatasetMeta,
}

impl Dataset {
    /// Looks up a region by canonical key.
    #[must_use]
    pub fn region(&self, key: &str) -> Option<&RegionRecord> {
        self.regions.iter().find(|r| r.key == key)
    }

    /// Display label for `key`, falling back to the key itself.
    #[must_use]
    pub fn region_label<'a>(&'a self, key: &'a str) -> &'a str {
        self.region(key).map_or(key, |r| r.label.as_str())
    }

    /// Years offered by the year control, ascending.
    #[must_use]
    pub fn available_years(&self) -> Vec<i32> {
        let years = self.meta.available_years();
        if years.is_empty() {
            let mut from_rows: Vec<i32> = self.monthly.iter().map(|r| r.year).collect();
            from_rows.sort_unstable();
            from_rows.dedup();
            return from_rows;
        }
        years
    }

    /// The year selected after load: the latest available year.
    #[must_use]
    pub fn latest_year(&self) -> Option<i32> {
        self.available_years().last().copied()
    }
}
