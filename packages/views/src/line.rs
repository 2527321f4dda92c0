//! Monthly series for the selected year: nationwide, plus the selected
//! region when there is one.
//!
//! Months without a value are left out of a series, so the line shows a gap
//! rather than a drop to zero.

use std::collections::BTreeMap;

use serde::Serialize;
use tourism_map_dashboard_models::Metric;
use tourism_map_dashboard_models::calendar::{MONTHS, month_name};

use crate::config::ViewConfig;
use crate::scale::Domain;
use crate::tooltip::{Hover, Tooltip};
use crate::{ChartView, Mark, Scene, ViewContext, format_count, format_value};

/// Which series a point belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    /// Nationwide totals.
    National,
    /// The selected region.
    Region,
}

/// One point of a series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinePoint {
    /// Series.
    pub series: SeriesKind,
    /// Month (1-12).
    pub month: u8,
    /// Value.
    pub value: f64,
}

impl Mark for LinePoint {
    fn key(&self) -> String {
        let series = match self.series {
            SeriesKind::National => "national",
            SeriesKind::Region => "region",
        };
        format!("{series}:{:02}", self.month)
    }
}

/// The selected region's series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSeries {
    /// Canonical key.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Points with a value, by month.
    pub points: Vec<LinePoint>,
}

/// Nationwide value at the selected month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthMarker {
    /// Selected month.
    pub month: u8,
    /// Nationwide value, 0 when missing.
    pub value: f64,
    /// Whether the value was reported.
    pub present: bool,
}

/// Line chart output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineScene {
    /// Year shown.
    pub year: Option<i32>,
    /// Metric shown.
    pub metric: Metric,
    /// Always months 1 to 12.
    pub x_domain: Domain,
    /// `[0, max across both series]`.
    pub y_domain: Domain,
    /// Nationwide series.
    pub national: Vec<LinePoint>,
    /// Selected region's series.
    pub region: Option<RegionSeries>,
    /// Selected month marker.
    pub marker: MonthMarker,
    /// Transition duration.
    pub transition_ms: u32,
}

impl Scene for LineScene {
    type Mark = LinePoint;

    fn marks(&self) -> Vec<&LinePoint> {
        self.national
            .iter()
            .chain(self.region.iter().flat_map(|r| r.points.iter()))
            .collect()
    }
}

impl Hover for LineScene {
    fn tooltip(&self, key: &str) -> Option<Tooltip> {
        let point = self.marks().into_iter().find(|p| p.key() == key)?;
        let series = match point.series {
            SeriesKind::National => "Croatia".to_string(),
            SeriesKind::Region => self.region.as_ref()?.label.clone(),
        };
        let month = month_name(point.month).unwrap_or("?");
        let title = self
            .year
            .map_or_else(|| month.to_string(), |year| format!("{month} {year}"));
        Some(Tooltip::new(
            title,
            vec![format!(
                "{series}: {} {}",
                format_count(point.value),
                self.metric.label().to_lowercase()
            )],
        ))
    }
}

/// The line chart view.
#[derive(Debug)]
pub struct LineView {
    transition_ms: u32,
    last: Option<LineScene>,
}

impl LineView {
    /// Creates the view.
    #[must_use]
    pub const fn new(config: &ViewConfig) -> Self {
        Self {
            transition_ms: config.transition_ms,
            last: None,
        }
    }
}

fn series(series: SeriesKind, values: &BTreeMap<u8, f64>) -> Vec<LinePoint> {
    MONTHS
        .iter()
        .filter_map(|month| {
            values.get(month).map(|value| LinePoint {
                series,
                month: *month,
                value: *value,
            })
        })
        .collect()
}

impl ChartView for LineView {
    type Scene = LineScene;

    fn name(&self) -> &'static str {
        "line"
    }

    fn compute(&self, ctx: &ViewContext<'_>) -> LineScene {
        let state = ctx.state;
        let metric = state.metric;

        let mut national_values = BTreeMap::new();
        let mut region_values: BTreeMap<u8, f64> = BTreeMap::new();
        let selected = ctx.selected_key();

        if let Some(year) = state.year {
            for row in ctx.dataset.national.iter().filter(|r| r.year == year) {
                if let Some(value) = row.total(metric) {
                    national_values.insert(row.month, value);
                }
            }
            if let Some(key) = selected.as_deref() {
                for row in ctx
                    .dataset
                    .monthly
                    .iter()
                    .filter(|r| r.year == year && r.region_key == key)
                {
                    if let Some(value) = row.value(metric) {
                        *region_values.entry(row.month).or_default() += value;
                    }
                }
            }
        }

        let national = series(SeriesKind::National, &national_values);
        let region = selected.map(|key| RegionSeries {
            label: ctx.dataset.region_label(&key).to_string(),
            key,
            points: series(SeriesKind::Region, &region_values),
        });

        let y_max = national_values
            .values()
            .chain(region_values.values())
            .copied()
            .fold(0.0, f64::max);

        let marker_value = national_values.get(&state.month).copied();
        let marker = MonthMarker {
            month: state.month,
            value: marker_value.unwrap_or(0.0),
            present: marker_value.is_some(),
        };
        log::trace!(
            "[line] month {} marker {}",
            state.month,
            format_value(marker_value)
        );

        LineScene {
            year: state.year,
            metric,
            x_domain: Domain::new(1.0, 12.0),
            y_domain: Domain::new(0.0, y_max),
            national,
            region,
            marker,
            transition_ms: self.transition_ms,
        }
    }

    fn last_scene(&self) -> Option<&LineScene> {
        self.last.as_ref()
    }

    fn set_last_scene(&mut self, scene: LineScene) {
        self.last = Some(scene);
    }
}
