//! Parsers for the four tabular inputs.
//!
//! Region identifiers are passed through [`normalize_region_key`] on the way
//! in, so every row carries a canonical key regardless of how the file
//! spelled it. Rows without a usable key, year or month are dropped and
//! counted; missing numeric cells become `None`.

use tourism_map_dashboard_models::{
    IntensityRow, MonthlyMetricRow, NationalMonthRow, OriginRow, SpatialLevel,
};
use tourism_map_normalize::normalize_region_key;

use crate::SourceError;
use crate::files::SourceKind;
use crate::parsing::{parse_month, parse_number, parse_year};
use crate::table::{CsvTable, cell};

const KEY_ALIASES: &[&str] = &["county_key", "region_key", "key"];
const LABEL_ALIASES: &[&str] = &["county_label", "region_label", "spatial_unit", "label"];
const YEAR_ALIASES: &[&str] = &["year"];
const MONTH_ALIASES: &[&str] = &["month"];
const ARRIVALS_ALIASES: &[&str] = &["arrivals", "tourist_arrivals"];
const NIGHTS_ALIASES: &[&str] = &["nights", "tourist_nights"];

/// Counts dropped rows and logs one summary warning per table.
struct DropLog {
    kind: SourceKind,
    dropped: usize,
}

impl DropLog {
    const fn new(kind: SourceKind) -> Self {
        Self { kind, dropped: 0 }
    }

    fn drop_row(&mut self, line: Option<u64>, reason: &str) {
        log::debug!(
            "[{}] Dropping row at line {}: {reason}",
            self.kind,
            line.map_or_else(|| "?".to_string(), |l| l.to_string())
        );
        self.dropped += 1;
    }
}

impl Drop for DropLog {
    fn drop(&mut self) {
        if self.dropped > 0 {
            log::warn!(
                "[{}] Dropped {} rows with missing key, year or month",
                self.kind,
                self.dropped
            );
        }
    }
}

/// Resolves the region key of a row: the key column if present and
/// non-empty, otherwise the label column, both normalized.
fn region_key(raw_key: &str, raw_label: &str) -> Option<String> {
    let source = if raw_key.is_empty() { raw_label } else { raw_key };
    let key = normalize_region_key(source);
    (!key.is_empty()).then_some(key)
}

/// Parses the county × month totals table.
///
/// # Errors
///
/// Returns [`SourceError::Csv`] if the header row cannot be read.
pub fn parse_monthly(bytes: &[u8]) -> Result<Vec<MonthlyMetricRow>, SourceError> {
    let table = CsvTable::read(SourceKind::Monthly, bytes)?;
    let key = table.column("region key", KEY_ALIASES);
    let label = table.optional_column(LABEL_ALIASES);
    let year = table.column("year", YEAR_ALIASES);
    let month = table.column("month", MONTH_ALIASES);
    let arrivals = table.column("arrivals", ARRIVALS_ALIASES);
    let nights = table.column("nights", NIGHTS_ALIASES);

    let mut drops = DropLog::new(table.kind);
    let mut rows = Vec::with_capacity(table.records.len());

    for record in &table.records {
        let line = record.position().map(csv::Position::line);
        let Some(region_key) = region_key(cell(record, key), cell(record, label)) else {
            drops.drop_row(line, "no region key");
            continue;
        };
        let (Some(year), Some(month)) = (
            parse_year(cell(record, year)),
            parse_month(cell(record, month)),
        ) else {
            drops.drop_row(line, "no year/month");
            continue;
        };

        rows.push(MonthlyMetricRow {
            region_key,
            year,
            month,
            arrivals: parse_number(cell(record, arrivals)),
            nights: parse_number(cell(record, nights)),
        });
    }

    log::info!("[{}] Parsed {} rows", table.kind, rows.len());
    Ok(rows)
}

/// Parses the nationwide monthly wide table.
///
/// # Errors
///
/// Returns [`SourceError::Csv`] if the header row cannot be read.
pub fn parse_national(bytes: &[u8]) -> Result<Vec<NationalMonthRow>, SourceError> {
    let table = CsvTable::read(SourceKind::National, bytes)?;
    let year = table.column("year", YEAR_ALIASES);
    let month = table.column("month", MONTH_ALIASES);
    let total_arrivals = table.column("total arrivals", &["total_arrivals"]);
    let total_nights = table.column("total nights", &["total_nights"]);
    let domestic_arrivals = table.optional_column(&["domestic_arrivals"]);
    let domestic_nights = table.optional_column(&["domestic_nights"]);
    let foreign_arrivals = table.optional_column(&["foreign_arrivals"]);
    let foreign_nights = table.optional_column(&["foreign_nights"]);

    let mut drops = DropLog::new(table.kind);
    let mut rows = Vec::with_capacity(table.records.len());

    for record in &table.records {
        let (Some(year), Some(month)) = (
            parse_year(cell(record, year)),
            parse_month(cell(record, month)),
        ) else {
            drops.drop_row(record.position().map(csv::Position::line), "no year/month");
            continue;
        };

        rows.push(NationalMonthRow {
            year,
            month,
            total_arrivals: parse_number(cell(record, total_arrivals)),
            total_nights: parse_number(cell(record, total_nights)),
            domestic_arrivals: parse_number(cell(record, domestic_arrivals)),
            domestic_nights: parse_number(cell(record, domestic_nights)),
            foreign_arrivals: parse_number(cell(record, foreign_arrivals)),
            foreign_nights: parse_number(cell(record, foreign_nights)),
        });
    }

    log::info!("[{}] Parsed {} rows", table.kind, rows.len());
    Ok(rows)
}

/// Parses the county × month × origin country table.
///
/// # Errors
///
/// Returns [`SourceError::Csv`] if the header row cannot be read.
pub fn parse_origins(bytes: &[u8]) -> Result<Vec<OriginRow>, SourceError> {
    let table = CsvTable::read(SourceKind::Origins, bytes)?;
    let key = table.column("region key", KEY_ALIASES);
    let label = table.column("region label", LABEL_ALIASES);
    let year = table.column("year", YEAR_ALIASES);
    let month = table.column("month", MONTH_ALIASES);
    let country = table.column("origin country", &["origin_country", "countries", "country"]);
    let arrivals = table.column("arrivals", ARRIVALS_ALIASES);
    let nights = table.column("nights", NIGHTS_ALIASES);

    let mut drops = DropLog::new(table.kind);
    let mut rows = Vec::with_capacity(table.records.len());

    for record in &table.records {
        let line = record.position().map(csv::Position::line);
        let raw_label = cell(record, label);
        let Some(region_key) = region_key(cell(record, key), raw_label) else {
            drops.drop_row(line, "no region key");
            continue;
        };
        let (Some(year), Some(month)) = (
            parse_year(cell(record, year)),
            parse_month(cell(record, month)),
        ) else {
            drops.drop_row(line, "no year/month");
            continue;
        };
        let origin_country = cell(record, country);
        if origin_country.is_empty() {
            drops.drop_row(line, "no origin country");
            continue;
        }

        rows.push(OriginRow {
            region_label: if raw_label.is_empty() {
                region_key.clone()
            } else {
                raw_label.to_string()
            },
            region_key,
            year,
            month,
            origin_country: origin_country.to_string(),
            arrivals: parse_number(cell(record, arrivals)),
            nights: parse_number(cell(record, nights)),
        });
    }

    log::info!("[{}] Parsed {} rows", table.kind, rows.len());
    Ok(rows)
}

/// Parses the town/municipality intensity table.
///
/// Settlement names are kept as written; the recorded county key is
/// normalized.
///
/// # Errors
///
/// Returns [`SourceError::Csv`] if the header row cannot be read.
pub fn parse_intensity(bytes: &[u8]) -> Result<Vec<IntensityRow>, SourceError> {
    let table = CsvTable::read(SourceKind::Intensity, bytes)?;
    let level = table.column("spatial level", &["spatial_level", "level"]);
    let unit = table.column("spatial unit", &["spatial_unit", "settlement", "name"]);
    let key = table.column("county key", KEY_ALIASES);
    let year = table.column("year", YEAR_ALIASES);
    let nights_per_100 = table.column("nights per 100", &["nights_per_100"]);
    let nights_per_km2 = table.column("nights per km2", &["nights_per_km2"]);
    let permanent_beds = table.column("permanent beds", &["permanent_beds", "beds"]);
    let nights = table.optional_column(NIGHTS_ALIASES);
    let arrivals = table.optional_column(ARRIVALS_ALIASES);

    let mut drops = DropLog::new(table.kind);
    let mut rows = Vec::with_capacity(table.records.len());

    for record in &table.records {
        let line = record.position().map(csv::Position::line);
        let Some(spatial_level) = SpatialLevel::from_label(cell(record, level)) else {
            drops.drop_row(line, "no spatial level");
            continue;
        };
        let spatial_unit = cell(record, unit);
        if spatial_unit.is_empty() {
            drops.drop_row(line, "no spatial unit");
            continue;
        }
        let Some(year) = parse_year(cell(record, year)) else {
            drops.drop_row(line, "no year");
            continue;
        };

        rows.push(IntensityRow {
            spatial_level,
            spatial_unit: spatial_unit.to_string(),
            county_key: normalize_region_key(cell(record, key)),
            year,
            nights_per_100: parse_number(cell(record, nights_per_100)),
            nights_per_km2: parse_number(cell(record, nights_per_km2)),
            permanent_beds: parse_number(cell(record, permanent_beds)),
            nights: parse_number(cell(record, nights)),
            arrivals: parse_number(cell(record, arrivals)),
        });
    }

    log::info!("[{}] Parsed {} rows", table.kind, rows.len());
    Ok(rows)
}
