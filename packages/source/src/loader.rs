//! Concurrent startup load of every input file.

use std::path::PathBuf;
use std::sync::Arc;

use tourism_map_dashboard_models::DatasetMeta;

use crate::files::{SourceFiles, SourceKind};
use crate::progress::ProgressCallback;
use crate::regions::parse_regions;
use crate::tables::{parse_intensity, parse_monthly, parse_national, parse_origins};
use crate::{Dataset, SourceError};

async fn read_file(
    files: &SourceFiles,
    kind: SourceKind,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<u8>, SourceError> {
    let path: PathBuf = files.path(kind);
    log::debug!("[{kind}] Reading {}", path.display());

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|source| SourceError::Io {
            kind,
            path: path.clone(),
            source,
        })?;

    progress.inc(1);
    progress.set_message(format!("read {}", files.file_name(kind)));
    Ok(bytes)
}

/// Parses the year coverage file.
///
/// # Errors
///
/// Returns [`SourceError::Json`] if the file is not a valid metadata object.
pub fn parse_meta(bytes: &[u8]) -> Result<DatasetMeta, SourceError> {
    serde_json::from_slice(bytes).map_err(|source| SourceError::Json {
        kind: SourceKind::Meta,
        source,
    })
}

/// Reads and parses all six inputs.
///
/// The reads run concurrently and the first failure aborts the whole load;
/// nothing is returned unless every file was read and parsed.
///
/// # Errors
///
/// Returns the first [`SourceError`] encountered while reading or parsing.
pub async fn load_dataset(
    files: &SourceFiles,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Dataset, SourceError> {
    log::info!("Loading data from {}", files.data_dir.display());
    progress.set_total(SourceKind::ALL.len() as u64);
    progress.set_message("loading data files".to_string());

    let result = tokio::try_join!(
        read_file(files, SourceKind::Regions, progress),
        read_file(files, SourceKind::Monthly, progress),
        read_file(files, SourceKind::National, progress),
        read_file(files, SourceKind::Origins, progress),
        read_file(files, SourceKind::Intensity, progress),
        read_file(files, SourceKind::Meta, progress),
    );

    let (regions, monthly, national, origins, intensity, meta) = match result {
        Ok(bytes) => bytes,
        Err(e) => {
            progress.finish(format!("load failed: {e}"));
            return Err(e);
        }
    };

    let dataset = Dataset {
        regions: parse_regions(&String::from_utf8_lossy(&regions))?,
        monthly: parse_monthly(&monthly)?,
        national: parse_national(&national)?,
        origins: parse_origins(&origins)?,
        intensity: parse_intensity(&intensity)?,
        meta: parse_meta(&meta)?,
    };

    progress.finish(format!(
        "loaded {} regions, {} monthly rows",
        dataset.regions.len(),
        dataset.monthly.len()
    ));
    log::info!(
        "Loaded {} regions, {} monthly, {} national, {} origin, {} intensity rows",
        dataset.regions.len(),
        dataset.monthly.len(),
        dataset.national.len(),
        dataset.origins.len(),
        dataset.intensity.len()
    );

    Ok(dataset)
}
