#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Records written by the ingest step.
//!
//! Each struct serializes to one CSV row; `None` becomes an empty cell.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Nationwide segment of table 1.2.
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
pub enum Segment {
    /// Domestic tourists.
    Domestic,
    /// Foreign tourists.
    Foreign,
    /// All tourists.
    Total,
}

/// Measure of table 1.2.
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
pub enum Measure {
    /// Arrivals.
    Arrivals,
    /// Nights.
    Nights,
}

/// One cell of table 1.2 in long form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NationalLongRecord {
    /// Year.
    pub year: i32,
    /// Month (1-12).
    pub month: u8,
    /// English month name as in the source.
    pub month_name: String,
    /// Segment.
    pub segment: Segment,
    /// Measure.
    pub metric: Measure,
    /// Value.
    pub value: Option<f64>,
}

/// One month of table 1.2 in wide form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NationalWideRecord {
    /// Year.
    pub year: i32,
    /// Month (1-12).
    pub month: u8,
    /// English month name.
    pub month_name: String,
    /// All tourists, arrivals.
    pub total_arrivals: Option<f64>,
    /// All tourists, nights.
    pub total_nights: Option<f64>,
    /// Domestic arrivals.
    pub domestic_arrivals: Option<f64>,
    /// Domestic nights.
    pub domestic_nights: Option<f64>,
    /// Foreign arrivals.
    pub foreign_arrivals: Option<f64>,
    /// Foreign nights.
    pub foreign_nights: Option<f64>,
}

/// One spatial unit × origin country × month of table 1.3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginRecord {
    /// Canonical key of the spatial unit.
    pub county_key: String,
    /// Spatial unit as written.
    pub county_label: String,
    /// Spatial unit as written.
    pub spatial_unit: String,
    /// Level of the spatial unit (`country`, `county`, `city`, `other`).
    pub spatial_level: String,
    /// Origin country label.
    pub origin_country: String,
    /// Year.
    pub year: i32,
    /// Month (1-12).
    pub month: u8,
    /// Tourist arrivals.
    pub arrivals: Option<f64>,
    /// Tourist nights.
    pub nights: Option<f64>,
    /// Average nights per arrival.
    pub avg_nights_per_arrival: Option<f64>,
}

/// One spatial unit × year of table 1.9.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntensityRecord {
    /// Spatial unit as written.
    pub spatial_unit: String,
    /// `country`, `region`, `county` or `municipality`.
    pub spatial_level: String,
    /// Canonical key of the owning county (of the unit itself for
    /// aggregates).
    pub county_key: String,
    /// Year.
    pub year: i32,
    /// Census population.
    pub population_census: Option<f64>,
    /// Surface area in km².
    pub area_km2: Option<f64>,
    /// Population density.
    pub pop_per_km2: Option<f64>,
    /// Permanent beds.
    pub permanent_beds: Option<f64>,
    /// Tourist arrivals.
    pub arrivals: Option<f64>,
    /// Tourist nights.
    pub nights: Option<f64>,
    /// Arrivals per 100 inhabitants.
    pub arrivals_per_100: Option<f64>,
    /// Nights per 100 inhabitants.
    pub nights_per_100: Option<f64>,
    /// Arrivals per km².
    pub arrivals_per_km2: Option<f64>,
    /// Nights per km².
    pub nights_per_km2: Option<f64>,
    /// Permanent beds per 100 inhabitants.
    pub beds_per_100: Option<f64>,
    /// Permanent beds per km².
    pub beds_per_km2: Option<f64>,
    /// Average nights per arrival.
    pub avg_nights_per_arrival: Option<f64>,
    /// Average nights per permanent bed.
    pub avg_nights_per_bed: Option<f64>,
}

/// Row counts of a finished ingest run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestSummary {
    /// Rows in the national long table.
    pub national_long: usize,
    /// Rows in the national wide table.
    pub national_wide: usize,
    /// Rows in the origin table.
    pub origins: usize,
    /// Rows in the county monthly totals table.
    pub county_months: usize,
    /// Rows in the intensity table.
    pub intensity: usize,
    /// Features in the simplified boundary file.
    pub regions: usize,
}
