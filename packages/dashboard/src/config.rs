//! TOML configuration for a dashboard session.
//!
//! ```toml
//! [files]
//! data_dir = "data/normalized"
//!
//! [selection]
//! month = 7
//! metric = "nights"
//!
//! [views]
//! top_n = 15
//! ```
//!
//! Every table and key is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tourism_map_dashboard_models::Metric;
use tourism_map_dashboard_models::calendar::is_valid_month;
use tourism_map_source::SourceFiles;
use tourism_map_views::ViewConfig;

/// Errors from reading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        /// Config path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema.
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be written back as TOML.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is out of range.
    #[error("Invalid config value for {field}: {message}")]
    Invalid {
        /// Offending key.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

/// Selection applied when the dashboard starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultSelection {
    /// Start year. The latest available year when unset or unavailable.
    pub year: Option<i32>,
    /// Start month.
    pub month: u8,
    /// Start metric.
    pub metric: Metric,
}

impl Default for DefaultSelection {
    fn default() -> Self {
        Self {
            year: None,
            month: 1,
            metric: Metric::Arrivals,
        }
    }
}

/// Complete session configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Input file locations.
    pub files: SourceFiles,
    /// Initial selection.
    pub selection: DefaultSelection,
    /// View settings.
    pub views: ViewConfig,
}

impl DashboardConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`DashboardConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded config from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Serializes the config as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_month(self.selection.month) {
            return Err(ConfigError::Invalid {
                field: "selection.month",
                message: format!("{} is not in 1-12", self.selection.month),
            });
        }
        if self.views.top_n == 0 {
            return Err(ConfigError::Invalid {
                field: "views.top_n",
                message: "must be at least 1".to_string(),
            });
        }
        if !(self.views.min_radius >= 0.0 && self.views.min_radius <= self.views.max_radius) {
            return Err(ConfigError::Invalid {
                field: "views.min_radius",
                message: format!(
                    "radius range [{}, {}] is empty or negative",
                    self.views.min_radius, self.views.max_radius
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_all_defaults() {
        let config = DashboardConfig::from_toml_str("").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.views.top_n, 10);
        assert_eq!(config.files.monthly, "tourism_counties_monthly_total.csv");
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let config = DashboardConfig::from_toml_str(
            r#"
            [files]
            data_dir = "/srv/tourism"

            [selection]
            year = 2022
            metric = "nights"

            [views]
            top_n = 5
            excluded_origins = ["Total"]
            "#,
        )
        .unwrap();
        assert_eq!(config.files.data_dir, PathBuf::from("/srv/tourism"));
        assert_eq!(config.files.meta, "meta.json");
        assert_eq!(config.selection.year, Some(2022));
        assert_eq!(config.selection.month, 1);
        assert_eq!(config.selection.metric, Metric::Nights);
        assert_eq!(config.views.top_n, 5);
        assert!(config.views.is_excluded_origin("total"));
        assert!(!config.views.is_excluded_origin("ukupno"));
        assert!((config.views.max_radius - 18.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let err = DashboardConfig::from_toml_str("[selection]\nmonth = 13\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "selection.month", .. }));

        let err =
            DashboardConfig::from_toml_str("[views]\nmin_radius = 20.0\nmax_radius = 5.0\n")
                .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        assert!(matches!(
            DashboardConfig::from_toml_str("[views\n").unwrap_err(),
            ConfigError::Parse(_)
        ));
    }

    #[test]
    fn round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.toml");
        let mut config = DashboardConfig::default();
        config.selection.month = 8;
        std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();

        assert_eq!(DashboardConfig::load(&path).unwrap(), config);
        assert!(matches!(
            DashboardConfig::load(dir.path().join("missing.toml")).unwrap_err(),
            ConfigError::Io { .. }
        ));
    }
}
