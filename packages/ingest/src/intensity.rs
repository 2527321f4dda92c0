//! Table 1.9: tourism intensity in towns and municipalities, per year.
//!
//! Columns are `"<year> <indicator>"`. Towns follow the row of the county
//! they belong to, so each municipality inherits the key of the nearest
//! `County of ...` row above it.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;
use tourism_map_ingest_models::IntensityRecord;
use tourism_map_normalize::{normalize_region_key, normalize_spaces};
use tourism_map_source::parsing::parse_number;

use crate::IngestError;
use crate::px::PxTable;

const TABLE: &str = "table1.9";

static COLUMN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})\s+(.+)$").expect("valid regex"));

/// Indicator labels as exported, and the record field each fills.
const INDICATORS: &[(&str, &str)] = &[
    ("Number of Population, Census 2021", "population_census"),
    ("Surface Area, km2", "area_km2"),
    ("Number of Population 2021, per km2", "pop_per_km2"),
    ("Number of Permanent Beds", "permanent_beds"),
    ("Tourist Arrivals", "arrivals"),
    ("Tourist Nights", "nights"),
    ("Number of Tourist Arrivals per 100 inhabitants", "arrivals_per_100"),
    ("Number of Tourist Nights per 100 inhabitants", "nights_per_100"),
    ("Number of Tourist Arrivals per km2", "arrivals_per_km2"),
    ("Number of Tourist Nights per km2", "nights_per_km2"),
    ("Number of Permanent beds per 100 inhabitants", "beds_per_100"),
    ("Number of Permanent beds per km2", "beds_per_km2"),
    ("Average Number of Tourist Nights per Arrival", "avg_nights_per_arrival"),
    (
        "Average Number of Tourist Nights per Permanent Beds",
        "avg_nights_per_bed",
    ),
];

fn field_mut<'a>(record: &'a mut IntensityRecord, field: &str) -> Option<&'a mut Option<f64>> {
    Some(match field {
        "population_census" => &mut record.population_census,
        "area_km2" => &mut record.area_km2,
        "pop_per_km2" => &mut record.pop_per_km2,
        "permanent_beds" => &mut record.permanent_beds,
        "arrivals" => &mut record.arrivals,
        "nights" => &mut record.nights,
        "arrivals_per_100" => &mut record.arrivals_per_100,
        "nights_per_100" => &mut record.nights_per_100,
        "arrivals_per_km2" => &mut record.arrivals_per_km2,
        "nights_per_km2" => &mut record.nights_per_km2,
        "beds_per_100" => &mut record.beds_per_100,
        "beds_per_km2" => &mut record.beds_per_km2,
        "avg_nights_per_arrival" => &mut record.avg_nights_per_arrival,
        "avg_nights_per_bed" => &mut record.avg_nights_per_bed,
        _ => return None,
    })
}

/// Level of a table 1.9 spatial unit.
#[must_use]
pub fn spatial_level(unit: &str) -> &'static str {
    let lower = unit.trim().to_lowercase();
    if lower == "republic of croatia" || lower == "republik of croatia" {
        "country"
    } else if lower.ends_with("croatia") {
        "region"
    } else if lower.starts_with("county of ") {
        "county"
    } else {
        "municipality"
    }
}

struct ValueColumn {
    index: usize,
    year: i32,
    field: &'static str,
}

fn value_columns(table: &PxTable) -> Vec<ValueColumn> {
    let mut unknown = BTreeSet::new();
    let columns = table
        .headers
        .iter()
        .enumerate()
        .filter_map(|(index, header)| {
            let caps = COLUMN_RE.captures(header)?;
            let label = normalize_spaces(&caps[2]);
            let Some(&(_, field)) = INDICATORS
                .iter()
                .find(|(known, _)| known.eq_ignore_ascii_case(&label))
            else {
                unknown.insert(label);
                return None;
            };
            Some(ValueColumn {
                index,
                year: caps[1].parse().ok()?,
                field,
            })
        })
        .collect();
    for label in unknown {
        log::warn!("[{TABLE}] Unknown indicator {label:?}; column dropped");
    }
    columns
}

/// Reshapes table 1.9 into one record per spatial unit and year, sorted by
/// level, unit and year.
///
/// # Errors
///
/// Returns [`IngestError::MissingColumn`] if there is no `Spatial unit`
/// column.
pub fn reshape(table: &PxTable) -> Result<Vec<IntensityRecord>, IngestError> {
    let unit_col = table.require(TABLE, "Spatial unit")?;
    let columns = value_columns(table);

    let mut records: BTreeMap<(String, i32), IntensityRecord> = BTreeMap::new();
    let mut owner: Option<String> = None;
    let mut orphans = 0_usize;

    for row in &table.rows {
        let unit = normalize_spaces(&row[unit_col]);
        if unit.is_empty() {
            continue;
        }
        let level = spatial_level(&unit);
        let own_key = normalize_region_key(&unit);
        let is_city_county = unit.to_lowercase().starts_with("city of ");

        let county_key = match level {
            "county" => {
                owner = Some(own_key.clone());
                own_key
            }
            "municipality" if is_city_county => {
                owner = Some(own_key.clone());
                own_key
            }
            "municipality" => owner.clone().unwrap_or_else(|| {
                orphans += 1;
                own_key
            }),
            _ => own_key,
        };

        for column in &columns {
            let Some(value) = parse_number(&row[column.index]) else {
                continue;
            };
            let record = records
                .entry((unit.clone(), column.year))
                .or_insert_with(|| IntensityRecord {
                    spatial_unit: unit.clone(),
                    spatial_level: level.to_string(),
                    county_key: county_key.clone(),
                    year: column.year,
                    ..IntensityRecord::default()
                });
            if let Some(slot) = field_mut(record, column.field) {
                slot.get_or_insert(value);
            }
        }
    }

    if orphans > 0 {
        log::warn!("[{TABLE}] {orphans} municipality rows appear before any county row");
    }

    let mut records: Vec<IntensityRecord> = records.into_values().collect();
    records.sort_by(|a, b| {
        (&a.spatial_level, &a.spatial_unit, a.year).cmp(&(&b.spatial_level, &b.spatial_unit, b.year))
    });
    log::info!("[{TABLE}] {} unit-year rows", records.len());
    Ok(records)
}

/// Sorted distinct years of the intensity table.
#[must_use]
pub fn years(records: &[IntensityRecord]) -> Vec<i32> {
    records
        .iter()
        .map(|r| r.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
