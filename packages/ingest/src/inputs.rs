//! Raw input discovery: a directory of files or a `data.zip` archive.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::IngestError;

/// National monthly table.
pub const TABLE_12: &str = "table1.2.csv";
/// Spatial unit × origin country table.
pub const TABLE_13: &str = "table1.3.csv";
/// Intensity table.
pub const TABLE_19: &str = "table1.9.csv";
/// County boundaries.
pub const BOUNDARIES: &str = "zupanije_GeoJson.json";
/// Accepted alternative name for [`BOUNDARIES`] in a directory.
pub const BOUNDARIES_ALT: &str = "zupanije.geojson";

const REQUIRED: [&str; 4] = [TABLE_12, TABLE_13, TABLE_19, BOUNDARIES];

/// Bytes of the four raw inputs.
#[derive(Debug, Clone)]
pub struct RawInputs {
    /// Table 1.2.
    pub table12: Vec<u8>,
    /// Table 1.3.
    pub table13: Vec<u8>,
    /// Table 1.9.
    pub table19: Vec<u8>,
    /// Boundary `GeoJSON`.
    pub boundaries: Vec<u8>,
}

impl RawInputs {
    fn from_map(mut blobs: BTreeMap<&'static str, Vec<u8>>) -> Self {
        let mut take = |name: &str| blobs.remove(name).unwrap_or_default();
        Self {
            table12: take(TABLE_12),
            table13: take(TABLE_13),
            table19: take(TABLE_19),
            boundaries: take(BOUNDARIES),
        }
    }
}

fn read(path: &Path) -> Result<Vec<u8>, IngestError> {
    std::fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads the inputs from `dir`.
///
/// # Errors
///
/// Returns [`IngestError::MissingInput`] naming the first missing file.
pub fn from_dir(dir: &Path) -> Result<RawInputs, IngestError> {
    let mut blobs = BTreeMap::new();
    for name in REQUIRED {
        let mut path = dir.join(name);
        if name == BOUNDARIES && !path.exists() {
            let alt = dir.join(BOUNDARIES_ALT);
            if alt.exists() {
                path = alt;
            }
        }
        if !path.exists() {
            return Err(IngestError::MissingInput(path));
        }
        log::debug!("Reading {}", path.display());
        blobs.insert(name, read(&path)?);
    }
    Ok(RawInputs::from_map(blobs))
}

/// Reads the inputs from the archive at `path`. Entries are matched by
/// exact name.
///
/// # Errors
///
/// Returns [`IngestError::Zip`] for an unreadable archive and
/// [`IngestError::ArchiveIncomplete`] if a required entry is missing.
pub fn from_zip(path: &Path) -> Result<RawInputs, IngestError> {
    log::info!("Reading inputs from archive {}", path.display());
    let file = std::fs::File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut archive = zip::ZipArchive::new(file)?;

    let names: Vec<String> = archive.file_names().map(str::to_string).collect();
    let missing: Vec<String> = REQUIRED
        .iter()
        .filter(|r| !names.iter().any(|n| n == *r))
        .map(ToString::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(IngestError::ArchiveIncomplete {
            path: path.to_path_buf(),
            missing,
        });
    }

    let mut blobs = BTreeMap::new();
    for name in REQUIRED {
        let mut entry = archive.by_name(name)?;
        let mut bytes = Vec::new();
        entry
            .read_to_end(&mut bytes)
            .map_err(|source| IngestError::Io {
                path: path.join(name),
                source,
            })?;
        blobs.insert(name, bytes);
    }
    Ok(RawInputs::from_map(blobs))
}

/// Picks the input source: an explicit archive, else `data.zip` in the
/// working directory or in `data_dir`, else `data_dir` itself.
#[must_use]
pub fn resolve_archive(data_dir: &Path, zip: Option<&Path>) -> Option<PathBuf> {
    if let Some(zip) = zip {
        return Some(zip.to_path_buf());
    }
    [PathBuf::from("data.zip"), data_dir.join("data.zip")]
        .into_iter()
        .find(|candidate| candidate.exists())
}

/// Loads the inputs from whichever source [`resolve_archive`] selects.
///
/// # Errors
///
/// As [`from_zip`] or [`from_dir`].
pub fn load(data_dir: &Path, zip: Option<&Path>) -> Result<RawInputs, IngestError> {
    match resolve_archive(data_dir, zip) {
        Some(archive) if archive.exists() => from_zip(&archive),
        Some(archive) => Err(IngestError::MissingInput(archive)),
        None => from_dir(data_dir),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_inputs(dir: &Path, boundaries_name: &str) {
        for name in [TABLE_12, TABLE_13, TABLE_19] {
            std::fs::write(dir.join(name), name).unwrap();
        }
        std::fs::write(dir.join(boundaries_name), "{}").unwrap();
    }

    #[test]
    fn reads_directory_with_alternative_boundary_name() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path(), BOUNDARIES_ALT);
        let inputs = from_dir(dir.path()).unwrap();
        assert_eq!(inputs.table13, TABLE_13.as_bytes());
        assert_eq!(inputs.boundaries, b"{}");
    }

    #[test]
    fn missing_file_is_named() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path(), BOUNDARIES);
        std::fs::remove_file(dir.path().join(TABLE_19)).unwrap();
        match from_dir(dir.path()).unwrap_err() {
            IngestError::MissingInput(path) => assert!(path.ends_with(TABLE_19)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reads_archive_entries() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("data.zip");
        let mut writer = zip::ZipWriter::new(std::fs::File::create(&archive).unwrap());
        for name in REQUIRED {
            writer
                .start_file(name, zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(name.as_bytes()).unwrap();
        }
        writer.finish().unwrap();

        let inputs = load(dir.path(), Some(&archive)).unwrap();
        assert_eq!(inputs.table12, TABLE_12.as_bytes());
        assert_eq!(inputs.boundaries, BOUNDARIES.as_bytes());
    }

    #[test]
    fn incomplete_archive_lists_missing_entries() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("partial.zip");
        let mut writer = zip::ZipWriter::new(std::fs::File::create(&archive).unwrap());
        writer
            .start_file(TABLE_12, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"x").unwrap();
        writer.finish().unwrap();

        match from_zip(&archive).unwrap_err() {
            IngestError::ArchiveIncomplete { missing, .. } => {
                assert_eq!(missing, vec![TABLE_13, TABLE_19, BOUNDARIES]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
