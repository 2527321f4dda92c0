//! Locations of the six normalized input files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Default directory holding the normalized files, relative to the working
/// directory.
pub const DEFAULT_DATA_DIR: &str = "data/normalized";

/// One of the dashboard's input files.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SourceKind {
    /// County boundaries (`GeoJSON`).
    Regions,
    /// County × month totals.
    Monthly,
    /// Nationwide monthly wide table.
    National,
    /// County × month × origin country.
    Origins,
    /// Town/municipality intensity per year.
    Intensity,
    /// Year coverage metadata (JSON).
    Meta,
}

impl SourceKind {
    /// Every input file, in load order.
    pub const ALL: [Self; 6] = [
        Self::Regions,
        Self::Monthly,
        Self::National,
        Self::Origins,
        Self::Intensity,
        Self::Meta,
    ];
}

/// File names of the inputs, resolved against `data_dir`.
///
/// Every field has a default, so a config only needs to name what differs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceFiles {
    /// Directory containing the files.
    pub data_dir: PathBuf,
    /// County boundaries.
    pub regions: String,
    /// County × month totals.
    pub monthly: String,
    /// Nationwide monthly wide table.
    pub national: String,
    /// County × month × origin country.
    pub origins: String,
    /// Town/municipality intensity.
    pub intensity: String,
    /// Year coverage metadata.
    pub meta: String,
}

impl Default for SourceFiles {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            regions: "zupanije_simplified.geojson".to_string(),
            monthly: "tourism_counties_monthly_total.csv".to_string(),
            national: "tourism_hr_monthly_wide.csv".to_string(),
            origins: "tourism_origin_long.csv".to_string(),
            intensity: "tourism_intensity_long.csv".to_string(),
            meta: "meta.json".to_string(),
        }
    }
}

impl SourceFiles {
    /// Default file names inside `data_dir`.
    #[must_use]
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// File name configured for `kind`.
    #[must_use]
    pub fn file_name(&self, kind: SourceKind) -> &str {
        match kind {
            SourceKind::Regions => &self.regions,
            SourceKind::Monthly => &self.monthly,
            SourceKind::National => &self.national,
            SourceKind::Origins => &self.origins,
            SourceKind::Intensity => &self.intensity,
            SourceKind::Meta => &self.meta,
        }
    }

    /// Full path of `kind`.
    #[must_use]
    pub fn path(&self, kind: SourceKind) -> PathBuf {
        self.data_dir.join(self.file_name(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_paths_inside_data_dir() {
        let files = SourceFiles::in_dir("/tmp/tourism");
        assert_eq!(
            files.path(SourceKind::Meta),
            PathBuf::from("/tmp/tourism/meta.json")
        );
        assert_eq!(
            files.path(SourceKind::Regions),
            PathBuf::from("/tmp/tourism/zupanije_simplified.geojson")
        );
    }

    #[test]
    fn kinds_display_snake_case() {
        assert_eq!(SourceKind::Origins.to_string(), "origins");
        assert_eq!("intensity".parse::<SourceKind>().unwrap(), SourceKind::Intensity);
    }
}
