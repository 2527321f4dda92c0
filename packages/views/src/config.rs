//! Tunable view settings.

use serde::{Deserialize, Serialize};

/// Origin labels that are totals rather than countries.
pub const DEFAULT_EXCLUDED_ORIGINS: &[&str] =
    &["countries - total", "total", "countries total", "ukupno"];

/// Settings shared by the four views. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Number of origin countries shown in the bar chart.
    pub top_n: usize,
    /// Origin labels dropped from the bar chart (compared case-insensitively).
    pub excluded_origins: Vec<String>,
    /// Smallest scatter point radius in pixels.
    pub min_radius: f64,
    /// Largest scatter point radius in pixels.
    pub max_radius: f64,
    /// Map fill for value 0.
    pub color_low: String,
    /// Map fill for the slice maximum.
    pub color_high: String,
    /// Map fill for regions without data.
    pub color_no_data: String,
    /// Duration of the animated transition between scenes.
    pub transition_ms: u32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            excluded_origins: DEFAULT_EXCLUDED_ORIGINS
                .iter()
                .map(ToString::to_string)
                .collect(),
            min_radius: 3.0,
            max_radius: 18.0,
            color_low: "#eff3ff".to_string(),
            color_high: "#08519c".to_string(),
            color_no_data: "#d9d9d9".to_string(),
            transition_ms: 750,
        }
    }
}

impl ViewConfig {
    /// Whether `label` is one of the aggregate origin labels.
    #[must_use]
    pub fn is_excluded_origin(&self, label: &str) -> bool {
        let label = label.trim();
        self.excluded_origins
            .iter()
            .any(|excluded| excluded.trim().eq_ignore_ascii_case(label))
    }
}
