//! Table 1.3: arrivals and nights per spatial unit, origin country and month.
//!
//! Rows are `(Spatial unit, Countries)`, columns `"<year> <MM> <measure>"`.
//! The `"Countries - total"` rows of counties and the city of Zagreb become
//! the choropleth's monthly totals.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tourism_map_ingest_models::OriginRecord;
use tourism_map_normalize::{normalize_region_key, normalize_spaces};
use tourism_map_source::parsing::parse_number;

use crate::IngestError;
use crate::px::PxTable;

const TABLE: &str = "table1.3";

/// Origin label of the all-countries row.
pub const ALL_COUNTRIES: &str = "Countries - total";

static COLUMN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4})\s+(\d{2})\s+(Tourist arrivals|Tourist nights|Average number of nights by arrival)$",
    )
    .expect("valid regex")
});

#[derive(Clone, Copy)]
enum Field {
    Arrivals,
    Nights,
    AvgNights,
}

struct ValueColumn {
    index: usize,
    year: i32,
    month: u8,
    field: Field,
}

fn value_columns(table: &PxTable) -> Vec<ValueColumn> {
    table
        .headers
        .iter()
        .enumerate()
        .filter_map(|(index, header)| {
            let caps = COLUMN_RE.captures(header)?;
            let field = match &caps[3] {
                "Tourist arrivals" => Field::Arrivals,
                "Tourist nights" => Field::Nights,
                _ => Field::AvgNights,
            };
            Some(ValueColumn {
                index,
                year: caps[1].parse().ok()?,
                month: caps[2].parse().ok()?,
                field,
            })
        })
        .collect()
}

/// Level of a table 1.3 spatial unit.
#[must_use]
pub fn spatial_level(unit: &str) -> &'static str {
    let lower = unit.trim().to_lowercase();
    if lower == "croatia" {
        "country"
    } else if lower.starts_with("county of ") {
        "county"
    } else if lower.starts_with("city of ") {
        "city"
    } else {
        "other"
    }
}

/// Origin rows and the derived county monthly totals.
#[derive(Debug, Clone, Default)]
pub struct OriginTables {
    /// Every unit × origin × month with at least one value, sorted by
    /// key, origin, year and month.
    pub origins: Vec<OriginRecord>,
    /// All-countries rows of counties and cities, sorted by key, year and
    /// month.
    pub county_months: Vec<OriginRecord>,
}

/// Reshapes table 1.3.
///
/// # Errors
///
/// Returns [`IngestError::MissingColumn`] if `Spatial unit` or `Countries`
/// is absent.
pub fn reshape(table: &PxTable) -> Result<OriginTables, IngestError> {
    let unit_col = table.require(TABLE, "Spatial unit")?;
    let country_col = table.require(TABLE, "Countries")?;
    let columns = value_columns(table);
    if columns.is_empty() {
        log::warn!("[{TABLE}] No '<year> <month> <measure>' columns found");
    }

    let mut cells: BTreeMap<(String, String, i32, u8), OriginRecord> = BTreeMap::new();

    for row in &table.rows {
        let unit = normalize_spaces(&row[unit_col]);
        let country = normalize_spaces(&row[country_col]);
        if unit.is_empty() {
            continue;
        }

        for column in &columns {
            let Some(value) = parse_number(&row[column.index]) else {
                continue;
            };
            let record = cells
                .entry((unit.clone(), country.clone(), column.year, column.month))
                .or_insert_with(|| OriginRecord {
                    county_key: normalize_region_key(&unit),
                    county_label: unit.clone(),
                    spatial_unit: unit.clone(),
                    spatial_level: spatial_level(&unit).to_string(),
                    origin_country: country.clone(),
                    year: column.year,
                    month: column.month,
                    arrivals: None,
                    nights: None,
                    avg_nights_per_arrival: None,
                });
            let slot = match column.field {
                Field::Arrivals => &mut record.arrivals,
                Field::Nights => &mut record.nights,
                Field::AvgNights => &mut record.avg_nights_per_arrival,
            };
            slot.get_or_insert(value);
        }
    }

    let mut origins: Vec<OriginRecord> = cells.into_values().collect();
    origins.sort_by(|a, b| {
        (&a.county_key, &a.origin_country, a.year, a.month)
            .cmp(&(&b.county_key, &b.origin_country, b.year, b.month))
    });

    let mut county_months: Vec<OriginRecord> = origins
        .iter()
        .filter(|r| {
            r.origin_country == ALL_COUNTRIES
                && matches!(r.spatial_level.as_str(), "county" | "city")
        })
        .cloned()
        .collect();
    county_months.sort_by(|a, b| {
        (&a.county_key, a.year, a.month).cmp(&(&b.county_key, b.year, b.month))
    });

    log::info!(
        "[{TABLE}] {} origin rows, {} county month totals",
        origins.len(),
        county_months.len()
    );
    Ok(OriginTables {
        origins,
        county_months,
    })
}

/// Sorted distinct years of the origin table.
#[must_use]
pub fn years(tables: &OriginTables) -> Vec<i32> {
    let mut years: Vec<i32> = tables.origins.iter().map(|r| r.year).collect();
    years.sort_unstable();
    years.dedup();
    years
}
