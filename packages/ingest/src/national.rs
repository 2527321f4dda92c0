//! Table 1.2: nationwide arrivals and nights per month.
//!
//! One row per month, one column per `"<year> <segment> <measure>"`, for
//! example `"2023 foreign nights"`. A trailing `Total` row is dropped.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tourism_map_dashboard_models::calendar::month_from_name;
use tourism_map_ingest_models::{Measure, NationalLongRecord, NationalWideRecord, Segment};
use tourism_map_source::parsing::parse_number;

use crate::IngestError;
use crate::px::PxTable;

const TABLE: &str = "table1.2";

static COLUMN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d{4})\s+(total|domestic|foreign)\s+(arrivals|nights)$")
        .expect("valid regex")
});

/// Long and wide forms of table 1.2.
#[derive(Debug, Clone, Default)]
pub struct NationalTables {
    /// One record per year, month, segment and measure.
    pub long: Vec<NationalLongRecord>,
    /// One record per year and month with at least one value.
    pub wide: Vec<NationalWideRecord>,
}

struct ValueColumn {
    index: usize,
    year: i32,
    segment: Segment,
    measure: Measure,
}

fn value_columns(table: &PxTable) -> Vec<ValueColumn> {
    table
        .headers
        .iter()
        .enumerate()
        .filter_map(|(index, header)| {
            let caps = COLUMN_RE.captures(header)?;
            Some(ValueColumn {
                index,
                year: caps[1].parse().ok()?,
                segment: caps[2].to_ascii_lowercase().parse().ok()?,
                measure: caps[3].to_ascii_lowercase().parse().ok()?,
            })
        })
        .collect()
}

fn wide_slot(
    record: &mut NationalWideRecord,
    segment: Segment,
    measure: Measure,
) -> &mut Option<f64> {
    match (segment, measure) {
        (Segment::Total, Measure::Arrivals) => &mut record.total_arrivals,
        (Segment::Total, Measure::Nights) => &mut record.total_nights,
        (Segment::Domestic, Measure::Arrivals) => &mut record.domestic_arrivals,
        (Segment::Domestic, Measure::Nights) => &mut record.domestic_nights,
        (Segment::Foreign, Measure::Arrivals) => &mut record.foreign_arrivals,
        (Segment::Foreign, Measure::Nights) => &mut record.foreign_nights,
    }
}

/// Reshapes table 1.2.
///
/// # Errors
///
/// Returns [`IngestError::MissingColumn`] if there is no `Month` column.
pub fn reshape(table: &PxTable) -> Result<NationalTables, IngestError> {
    let month_col = table.require(TABLE, "Month")?;
    let columns = value_columns(table);
    if columns.is_empty() {
        log::warn!("[{TABLE}] No '<year> <segment> <measure>' columns found");
    }

    let mut long = Vec::new();
    let mut wide: BTreeMap<(i32, u8), NationalWideRecord> = BTreeMap::new();

    for row in &table.rows {
        let label = row[month_col].trim();
        if label.eq_ignore_ascii_case("total") {
            continue;
        }
        let Some(month) = month_from_name(label) else {
            log::warn!("[{TABLE}] Unknown month {label:?}; skipping row");
            continue;
        };

        for column in &columns {
            let value = parse_number(&row[column.index]);
            long.push(NationalLongRecord {
                year: column.year,
                month,
                month_name: label.to_string(),
                segment: column.segment,
                metric: column.measure,
                value,
            });

            if value.is_some() {
                let record = wide
                    .entry((column.year, month))
                    .or_insert_with(|| NationalWideRecord {
                        year: column.year,
                        month,
                        month_name: label.to_string(),
                        total_arrivals: None,
                        total_nights: None,
                        domestic_arrivals: None,
                        domestic_nights: None,
                        foreign_arrivals: None,
                        foreign_nights: None,
                    });
                let slot = wide_slot(record, column.segment, column.measure);
                if slot.is_none() {
                    *slot = value;
                }
            }
        }
    }

    long.sort_by(|a, b| {
        (a.year, a.month, a.segment, a.metric).cmp(&(b.year, b.month, b.segment, b.metric))
    });

    log::info!(
        "[{TABLE}] {} long rows, {} month rows",
        long.len(),
        wide.len()
    );
    Ok(NationalTables {
        long,
        wide: wide.into_values().collect(),
    })
}

/// Sorted distinct years of the long table.
#[must_use]
pub fn years(tables: &NationalTables) -> Vec<i32> {
    let mut years: Vec<i32> = tables.long.iter().map(|r| r.year).collect();
    years.dedup();
    years
}
