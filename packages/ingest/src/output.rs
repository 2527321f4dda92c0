//! Writes the normalized files.

use std::path::{Path, PathBuf};

use geojson::FeatureCollection;
use serde::Serialize;
use tourism_map_dashboard_models::DatasetMeta;
use tourism_map_source::{SourceFiles, SourceKind};

use crate::IngestError;

/// Long form of the national table. The loader reads the wide form.
pub const NATIONAL_LONG_FILE: &str = "tourism_hr_monthly_long.csv";

/// Note stored in `meta.json`.
pub const META_NOTE: &str = "All outputs are UTF-8 and normalized for the dashboard.";

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> IngestError + '_ {
    move |source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Writes `records` as a CSV with a header row.
///
/// # Errors
///
/// Returns [`IngestError::Io`] or [`IngestError::Csv`] on write failure.
pub fn write_csv<T: Serialize>(path: &Path, records: &[T]) -> Result<(), IngestError> {
    let mut writer = csv::Writer::from_path(path).map_err(|source| IngestError::Csv {
        table: "output",
        source,
    })?;
    for record in records {
        writer.serialize(record).map_err(|source| IngestError::Csv {
            table: "output",
            source,
        })?;
    }
    writer.flush().map_err(io_error(path))?;
    log::debug!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

/// Writes `value` as JSON.
///
/// # Errors
///
/// Returns [`IngestError::Json`] or [`IngestError::Io`] on failure.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), IngestError> {
    let text = serde_json::to_string(value)?;
    std::fs::write(path, text).map_err(io_error(path))?;
    log::debug!("Wrote {}", path.display());
    Ok(())
}

/// Output locations, matching the loader's default file names.
#[derive(Debug, Clone)]
pub struct OutputFiles {
    files: SourceFiles,
}

impl OutputFiles {
    /// Creates `out_dir` if needed.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Io`] if the directory cannot be created.
    pub fn create(out_dir: &Path) -> Result<Self, IngestError> {
        std::fs::create_dir_all(out_dir).map_err(io_error(out_dir))?;
        Ok(Self {
            files: SourceFiles::in_dir(out_dir),
        })
    }

    /// Path of a loader input.
    #[must_use]
    pub fn path(&self, kind: SourceKind) -> PathBuf {
        self.files.path(kind)
    }

    /// Path of the long national table.
    #[must_use]
    pub fn national_long(&self) -> PathBuf {
        self.files.data_dir.join(NATIONAL_LONG_FILE)
    }

    /// Writes the simplified boundaries.
    ///
    /// # Errors
    ///
    /// As [`write_json`].
    pub fn write_regions(&self, regions: &FeatureCollection) -> Result<(), IngestError> {
        write_json(&self.path(SourceKind::Regions), regions)
    }

    /// Writes `meta.json`.
    ///
    /// # Errors
    ///
    /// As [`write_json`].
    pub fn write_meta(&self, meta: &DatasetMeta) -> Result<(), IngestError> {
        write_json(&self.path(SourceKind::Meta), meta)
    }
}
