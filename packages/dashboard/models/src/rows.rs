//! Row types for the normalized tourism tables.
//!
//! Missing numeric cells are `None`. Aggregations treat `None` as zero;
//! displays show it as "no data".

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Metric, SpatialLevel};

/// One region's totals for one month (all origin countries combined).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyMetricRow {
    /// Canonical region key.
    pub region_key: String,
    /// Calendar year.
    pub year: i32,
    /// Month (1-12).
    pub month: u8,
    /// Tourist arrivals.
    pub arrivals: Option<f64>,
    /// Tourist nights.
    pub nights: Option<f64>,
}

impl MonthlyMetricRow {
    /// Returns the value of `metric`, `None` when the cell was empty.
    #[must_use]
    pub const fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Arrivals => self.arrivals,
            Metric::Nights => self.nights,
        }
    }
}

/// Nationwide totals for one month, split by domestic/foreign segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NationalMonthRow {
    /// Calendar year.
    pub year: i32,
    /// Month (1-12).
    pub month: u8,
    /// All arrivals.
    pub total_arrivals: Option<f64>,
    /// All nights.
    pub total_nights: Option<f64>,
    /// Arrivals of domestic tourists.
    pub domestic_arrivals: Option<f64>,
    /// Nights of domestic tourists.
    pub domestic_nights: Option<f64>,
    /// Arrivals of foreign tourists.
    pub foreign_arrivals: Option<f64>,
    /// Nights of foreign tourists.
    pub foreign_nights: Option<f64>,
}

impl NationalMonthRow {
    /// Returns the all-segment total for `metric`.
    #[must_use]
    pub const fn total(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Arrivals => self.total_arrivals,
            Metric::Nights => self.total_nights,
        }
    }
}

/// One region × month × origin country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginRow {
    /// Canonical region key.
    pub region_key: String,
    /// Region label as written in the source table.
    pub region_label: String,
    /// Calendar year.
    pub year: i32,
    /// Month (1-12).
    pub month: u8,
    /// Origin country label (may be an aggregate such as "Countries - total").
    pub origin_country: String,
    /// Tourist arrivals.
    pub arrivals: Option<f64>,
    /// Tourist nights.
    pub nights: Option<f64>,
}

impl OriginRow {
    /// Returns the value of `metric`, `None` when the cell was empty.
    #[must_use]
    pub const fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Arrivals => self.arrivals,
            Metric::Nights => self.nights,
        }
    }
}

/// Yearly tourism intensity for one spatial unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntensityRow {
    /// Municipality or aggregate.
    pub spatial_level: SpatialLevel,
    /// Spatial unit name (settlement name for municipalities).
    pub spatial_unit: String,
    /// Key of the owning county as recorded in the table.
    pub county_key: String,
    /// Calendar year.
    pub year: i32,
    /// Tourist nights per 100 inhabitants.
    pub nights_per_100: Option<f64>,
    /// Tourist nights per km².
    pub nights_per_km2: Option<f64>,
    /// Number of permanent beds.
    pub permanent_beds: Option<f64>,
    /// Tourist nights.
    pub nights: Option<f64>,
    /// Tourist arrivals.
    pub arrivals: Option<f64>,
}

impl IntensityRow {
    /// Whether this row describes a municipality.
    #[must_use]
    pub fn is_municipality(&self) -> bool {
        self.spatial_level == SpatialLevel::Municipality
    }
}

/// Contents of `meta.json`: which years each table covers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetMeta {
    /// Years present in the national monthly table.
    #[serde(default)]
    pub years_table12: Vec<i32>,
    /// Years present in the origin-country table.
    #[serde(default)]
    pub years_table13: Vec<i32>,
    /// Years present in the intensity table.
    #[serde(default)]
    pub years_table19: Vec<i32>,
    /// Months offered by the month control.
    #[serde(default)]
    pub months: Vec<u8>,
    /// Free-form note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl DatasetMeta {
    /// Sorted union of the years covered by any table.
    #[must_use]
    pub fn available_years(&self) -> Vec<i32> {
        self.years_table12
            .iter()
            .chain(&self.years_table13)
            .chain(&self.years_table19)
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// The most recent year covered by any table.
    #[must_use]
    pub fn latest_year(&self) -> Option<i32> {
        self.available_years().last().copied()
    }
}
