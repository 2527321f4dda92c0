//! `(year, month) → region → totals` lookup used by the map view.

use std::collections::BTreeMap;

use tourism_map_dashboard_models::{Metric, MonthlyMetricRow};

/// Arrivals and nights for one region in one month.
///
/// Unlike the raw rows, a missing value counts as 0 here: the index answers
/// "how much did this region contribute", not "was anything reported".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricTotals {
    /// Tourist arrivals.
    pub arrivals: f64,
    /// Tourist nights.
    pub nights: f64,
}

impl MetricTotals {
    /// Value of `metric`.
    #[must_use]
    pub const fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Arrivals => self.arrivals,
            Metric::Nights => self.nights,
        }
    }

    fn add(&mut self, row: &MonthlyMetricRow) {
        self.arrivals += row.arrivals.unwrap_or(0.0);
        self.nights += row.nights.unwrap_or(0.0);
    }
}

/// Region totals for every `(year, month)` present in the monthly rows.
#[derive(Debug, Clone, Default)]
pub struct RegionMonthIndex {
    periods: BTreeMap<(i32, u8), BTreeMap<String, MetricTotals>>,
}

impl RegionMonthIndex {
    /// Groups `rows` by period then region key. Several rows for the same
    /// region and period are summed.
    #[must_use]
    pub fn build(rows: &[MonthlyMetricRow]) -> Self {
        let mut periods: BTreeMap<(i32, u8), BTreeMap<String, MetricTotals>> = BTreeMap::new();
        let mut duplicates = 0_usize;

        for row in rows {
            let slice = periods.entry((row.year, row.month)).or_default();
            if let Some(totals) = slice.get_mut(&row.region_key) {
                duplicates += 1;
                totals.add(row);
            } else {
                let mut totals = MetricTotals::default();
                totals.add(row);
                slice.insert(row.region_key.clone(), totals);
            }
        }

        if duplicates > 0 {
            log::warn!("[index] Summed {duplicates} duplicate region/month rows");
        }
        log::debug!("[index] Region-month index covers {} periods", periods.len());

        Self { periods }
    }

    /// All regions reported for `(year, month)`. `None` when the period has
    /// no rows at all.
    #[must_use]
    pub fn slice(&self, year: i32, month: u8) -> Option<&BTreeMap<String, MetricTotals>> {
        self.periods.get(&(year, month))
    }

    /// Totals for one region in one period.
    #[must_use]
    pub fn get(&self, year: i32, month: u8, key: &str) -> Option<&MetricTotals> {
        self.slice(year, month)?.get(key)
    }

    /// Every indexed period, ascending.
    pub fn periods(&self) -> impl Iterator<Item = (i32, u8)> + '_ {
        self.periods.keys().copied()
    }

    /// Largest value of `metric` in the slice, 0 for an empty or missing
    /// slice.
    #[must_use]
    pub fn max_in_slice(&self, year: i32, month: u8, metric: Metric) -> f64 {
        self.slice(year, month)
            .into_iter()
            .flat_map(BTreeMap::values)
            .map(|t| t.value(metric))
            .fold(0.0, f64::max)
    }

    /// Number of indexed periods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Whether no period is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(key: &str, year: i32, month: u8, arrivals: Option<f64>, nights: Option<f64>) -> MonthlyMetricRow {
        MonthlyMetricRow {
            region_key: key.to_string(),
            year,
            month,
            arrivals,
            nights,
        }
    }

    #[test]
    fn every_period_and_region_is_indexed() {
        let rows = vec![
            row("istarska", 2023, 6, Some(10.0), Some(40.0)),
            row("zadarska", 2023, 6, None, Some(5.0)),
            row("istarska", 2023, 7, Some(12.0), None),
            row("istarska", 2022, 6, Some(1.0), Some(1.0)),
        ];
        let index = RegionMonthIndex::build(&rows);

        for r in &rows {
            assert!(index.get(r.year, r.month, &r.region_key).is_some());
        }
        assert_eq!(
            index.periods().collect::<Vec<_>>(),
            vec![(2022, 6), (2023, 6), (2023, 7)]
        );
        assert_eq!(index.slice(2023, 6).unwrap().len(), 2);
    }

    #[test]
    fn missing_values_count_as_zero() {
        let index = RegionMonthIndex::build(&[row("zadarska", 2023, 6, None, Some(5.0))]);
        let totals = index.get(2023, 6, "zadarska").unwrap();
        assert!(totals.arrivals.abs() < f64::EPSILON);
        assert!((totals.nights - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn duplicate_rows_are_summed() {
        let index = RegionMonthIndex::build(&[
            row("istarska", 2023, 6, Some(10.0), None),
            row("istarska", 2023, 6, Some(5.0), Some(2.0)),
        ]);
        let totals = index.get(2023, 6, "istarska").unwrap();
        assert!((totals.arrivals - 15.0).abs() < f64::EPSILON);
        assert!((totals.nights - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn max_of_missing_slice_is_zero() {
        let index = RegionMonthIndex::build(&[
            row("istarska", 2023, 6, Some(10.0), Some(1.0)),
            row("zadarska", 2023, 6, Some(30.0), Some(0.5)),
        ]);
        assert!((index.max_in_slice(2023, 6, Metric::Arrivals) - 30.0).abs() < f64::EPSILON);
        assert!((index.max_in_slice(2023, 6, Metric::Nights) - 1.0).abs() < f64::EPSILON);
        assert!(index.max_in_slice(1999, 1, Metric::Arrivals).abs() < f64::EPSILON);
        assert!(index.slice(1999, 1).is_none());
    }
}
