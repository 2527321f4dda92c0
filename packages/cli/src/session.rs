//! Building a dashboard session from config file and flags.

use std::path::PathBuf;

use clap::Args;
use tourism_map_cli_utils::{IndicatifProgress, MultiProgress};
use tourism_map_dashboard::{ConfigError, Dashboard, DashboardConfig, DashboardError};

/// Flags shared by every command that opens the dashboard.
#[derive(Debug, Clone, Default, Args)]
pub struct SessionArgs {
    /// TOML config file (all keys optional)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Directory with the normalized files (overrides the config)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

impl SessionArgs {
    /// Reads the config file if one was given and applies the flag
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or is invalid.
    pub fn load_config(&self) -> Result<DashboardConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => DashboardConfig::load(path)?,
            None => DashboardConfig::default(),
        };
        if let Some(dir) = &self.data_dir {
            config.files.data_dir.clone_from(dir);
        }
        Ok(config)
    }
}

/// Loads the data behind a progress bar and starts the dashboard.
///
/// # Errors
///
/// As [`Dashboard::start`].
pub async fn start(
    config: DashboardConfig,
    multi: &MultiProgress,
) -> Result<Dashboard, DashboardError> {
    log::info!("Loading data from {}", config.files.data_dir.display());
    let progress = IndicatifProgress::files_bar(multi, "Loading data files");
    Dashboard::start(config, &progress).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_flag_overrides_default() {
        let args = SessionArgs {
            config: None,
            data_dir: Some(PathBuf::from("/tmp/normalized")),
        };
        let config = args.load_config().unwrap();
        assert_eq!(config.files.data_dir, PathBuf::from("/tmp/normalized"));
        assert_eq!(config.views, DashboardConfig::default().views);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args = SessionArgs {
            config: Some(PathBuf::from("/nonexistent/dashboard.toml")),
            data_dir: None,
        };
        assert!(matches!(args.load_config(), Err(ConfigError::Io { .. })));
    }
}
