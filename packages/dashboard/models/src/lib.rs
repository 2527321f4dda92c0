#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Selection state, metric and tabular row types for the tourism dashboard.
//!
//! Everything the linked charts share lives here: the [`SelectionState`]
//! that the user drives through the controls, the [`SelectionPatch`] used to
//! mutate it, and the row types parsed from the normalized data files.

pub mod calendar;
pub mod rows;

pub use rows::{DatasetMeta, IntensityRow, MonthlyMetricRow, NationalMonthRow, OriginRow};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The measure the dashboard visualizes.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Metric {
    /// Tourist arrivals (check-ins).
    #[default]
    Arrivals,
    /// Tourist nights (overnight stays).
    Nights,
}

impl Metric {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Arrivals, Self::Nights]
    }

    /// Human-readable label for legends and axis titles.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Arrivals => "Tourist arrivals",
            Self::Nights => "Tourist nights",
        }
    }
}

/// Granularity of a spatial unit in the intensity table.
///
/// Only municipalities (towns and municipalities) take part in the
/// settlement-to-region mapping; counties, statistical regions and the
/// country total are all aggregates.
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
pub enum SpatialLevel {
    /// A town or municipality nested in exactly one county.
    Municipality,
    /// Any aggregate unit (county, statistical region, country).
    Aggregate,
}

impl SpatialLevel {
    /// Classifies a level label as written by the ingest step.
    ///
    /// `"municipality"` (any case, surrounding whitespace ignored) is the only
    /// label that maps to [`SpatialLevel::Municipality`]; `"county"`,
    /// `"region"`, `"country"`, `"city"` and anything else non-empty are
    /// aggregates. Returns `None` for an empty label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.is_empty() {
            None
        } else if label.eq_ignore_ascii_case("municipality") {
            Some(Self::Municipality)
        } else {
            Some(Self::Aggregate)
        }
    }
}

/// The user's current selection, shared by every chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    /// Selected year, `None` until the orchestrator picks one after load.
    pub year: Option<i32>,
    /// Selected month (1-12).
    pub month: u8,
    /// Selected metric.
    pub metric: Metric,
    /// Canonical key of the selected region, if any.
    pub selected_region: Option<String>,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            year: None,
            month: 1,
            metric: Metric::Arrivals,
            selected_region: None,
        }
    }
}

impl SelectionState {
    /// Shallow-merges `patch` into this state. Fields the patch leaves unset
    /// keep their current value.
    pub fn apply(&mut self, patch: SelectionPatch) {
        if let Some(year) = patch.year {
            self.year = year;
        }
        if let Some(month) = patch.month {
            self.month = month;
        }
        if let Some(metric) = patch.metric {
            self.metric = metric;
        }
        if let Some(region) = patch.selected_region {
            self.selected_region = region;
        }
    }

    /// Returns the selected region key as a `&str`.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.selected_region.as_deref()
    }
}

/// A partial update to [`SelectionState`].
///
/// `year` and `selected_region` are tri-state: `None` leaves the field
/// alone, `Some(None)` clears it, `Some(Some(v))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionPatch {
    /// New year (or clear).
    pub year: Option<Option<i32>>,
    /// New month.
    pub month: Option<u8>,
    /// New metric.
    pub metric: Option<Metric>,
    /// New selected region (or clear).
    pub selected_region: Option<Option<String>>,
}

impl SelectionPatch {
    /// An empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the year.
    #[must_use]
    pub const fn year(mut self, year: i32) -> Self {
        self.year = Some(Some(year));
        self
    }

    /// Clears the year.
    #[must_use]
    pub const fn clear_year(mut self) -> Self {
        self.year = Some(None);
        self
    }

    /// Sets the month.
    #[must_use]
    pub const fn month(mut self, month: u8) -> Self {
        self.month = Some(month);
        self
    }

    /// Sets the metric.
    #[must_use]
    pub const fn metric(mut self, metric: Metric) -> Self {
        self.metric = Some(metric);
        self
    }

    /// Selects a region by canonical key.
    #[must_use]
    pub fn region(mut self, key: impl Into<String>) -> Self {
        self.selected_region = Some(Some(key.into()));
        self
    }

    /// Clears the selected region.
    #[must_use]
    pub fn clear_region(mut self) -> Self {
        self.selected_region = Some(None);
        self
    }

    /// Returns `true` if applying this patch would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.year.is_none()
            && self.month.is_none()
            && self.metric.is_none()
            && self.selected_region.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_are_last_write_wins_per_field() {
        let mut state = SelectionState::default();
        state.apply(SelectionPatch::new().year(2022));
        state.apply(SelectionPatch::new().month(5));
        assert_eq!(state.year, Some(2022));
        assert_eq!(state.month, 5);

        state.apply(SelectionPatch::new().year(2023));
        assert_eq!(state.year, Some(2023));
        assert_eq!(state.month, 5);
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let mut state = SelectionState {
            year: Some(2021),
            month: 8,
            metric: Metric::Nights,
            selected_region: Some("istarska".to_string()),
        };
        let before = state.clone();
        let patch = SelectionPatch::new();
        assert!(patch.is_empty());
        state.apply(patch);
        assert_eq!(state, before);
    }

    #[test]
    fn clear_region_is_distinct_from_leaving_it() {
        let mut state = SelectionState::default();
        state.apply(SelectionPatch::new().region("zadarska"));
        state.apply(SelectionPatch::new().month(3));
        assert_eq!(state.region(), Some("zadarska"));
        state.apply(SelectionPatch::new().clear_region());
        assert_eq!(state.region(), None);
    }

    #[test]
    fn parses_metric_case_insensitively() {
        assert_eq!("nights".parse::<Metric>().unwrap(), Metric::Nights);
        assert_eq!("Arrivals".parse::<Metric>().unwrap(), Metric::Arrivals);
        assert!("beds".parse::<Metric>().is_err());
        assert_eq!(Metric::Nights.to_string(), "nights");
    }

    #[test]
    fn classifies_spatial_levels() {
        assert_eq!(
            SpatialLevel::from_label(" Municipality "),
            Some(SpatialLevel::Municipality)
        );
        assert_eq!(
            SpatialLevel::from_label("county"),
            Some(SpatialLevel::Aggregate)
        );
        assert_eq!(
            SpatialLevel::from_label("country"),
            Some(SpatialLevel::Aggregate)
        );
        assert_eq!(SpatialLevel::from_label(""), None);
    }

    #[test]
    fn selection_serializes_camel_case() {
        let state = SelectionState {
            year: Some(2023),
            month: 6,
            metric: Metric::Arrivals,
            selected_region: None,
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["selectedRegion"], serde_json::Value::Null);
        assert_eq!(json["metric"], "arrivals");
    }
}
