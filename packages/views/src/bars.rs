//! Top origin countries for the selected region and month.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::Serialize;
use tourism_map_dashboard_models::Metric;

use crate::config::ViewConfig;
use crate::tooltip::{Hover, Tooltip};
use crate::{ChartView, Mark, Scene, ViewContext, format_value};

/// Shown when no region is selected.
pub const NO_REGION_MESSAGE: &str = "Select a county on the map to see origin countries";

/// One country bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bar {
    /// Origin country label.
    pub country: String,
    /// Reported value, `None` when missing.
    pub value: Option<f64>,
}

impl Bar {
    /// Value used for ranking and bar length; missing counts as 0.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.value.unwrap_or(0.0)
    }
}

impl Mark for Bar {
    fn key(&self) -> String {
        self.country.clone()
    }
}

/// Bar chart output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum BarsScene {
    /// Nothing to rank.
    #[serde(rename_all = "camelCase")]
    Empty {
        /// Placeholder text.
        message: String,
    },
    /// Ranked origin countries.
    #[serde(rename_all = "camelCase")]
    Ranked {
        /// Selected region.
        region_key: String,
        /// Its label.
        region_label: String,
        /// Year shown.
        year: Option<i32>,
        /// Month shown.
        month: u8,
        /// Metric ranked by.
        metric: Metric,
        /// Bars, largest first.
        bars: Vec<Bar>,
        /// Length of the longest bar.
        x_max: f64,
        /// Transition duration.
        transition_ms: u32,
    },
}

impl BarsScene {
    /// Bars from smallest to largest, the order a horizontal bar chart
    /// stacks them bottom-up.
    pub fn display_order(&self) -> impl Iterator<Item = &Bar> {
        self.bars().iter().rev()
    }

    /// Bars largest first. Empty for [`BarsScene::Empty`].
    #[must_use]
    pub fn bars(&self) -> &[Bar] {
        match self {
            Self::Empty { .. } => &[],
            Self::Ranked { bars, .. } => bars,
        }
    }
}

impl Scene for BarsScene {
    type Mark = Bar;

    fn marks(&self) -> Vec<&Bar> {
        self.bars().iter().collect()
    }
}

impl Hover for BarsScene {
    fn tooltip(&self, key: &str) -> Option<Tooltip> {
        let Self::Ranked { metric, .. } = self else {
            return None;
        };
        let bar = self.bars().iter().find(|b| b.country == key)?;
        Some(Tooltip::new(
            bar.country.clone(),
            vec![format!("{}: {}", metric.label(), format_value(bar.value))],
        ))
    }
}

fn rank(a: &Bar, b: &Bar) -> Ordering {
    b.length()
        .total_cmp(&a.length())
        .then_with(|| a.country.cmp(&b.country))
}

/// The bar chart view.
#[derive(Debug)]
pub struct BarsView {
    config: ViewConfig,
    last: Option<BarsScene>,
}

impl BarsView {
    /// Creates the view.
    #[must_use]
    pub fn new(config: &ViewConfig) -> Self {
        Self {
            config: config.clone(),
            last: None,
        }
    }
}

impl ChartView for BarsView {
    type Scene = BarsScene;

    fn name(&self) -> &'static str {
        "bars"
    }

    fn compute(&self, ctx: &ViewContext<'_>) -> BarsScene {
        let state = ctx.state;
        let Some(key) = ctx.selected_key() else {
            return BarsScene::Empty {
                message: NO_REGION_MESSAGE.to_string(),
            };
        };

        let mut bars: Vec<Bar> = state
            .year
            .map(|year| {
                ctx.dataset
                    .origins
                    .iter()
                    .filter(|r| r.year == year && r.month == state.month && r.region_key == key)
                    .filter(|r| !self.config.is_excluded_origin(&r.origin_country))
                    .map(|r| Bar {
                        country: r.origin_country.clone(),
                        value: r.value(state.metric),
                    })
                    .collect()
            })
            .unwrap_or_default();

        bars.sort_by(rank);
        let mut seen = BTreeSet::new();
        bars.retain(|bar| seen.insert(bar.country.clone()));
        bars.truncate(self.config.top_n);

        let x_max = bars.first().map_or(0.0, Bar::length);

        BarsScene::Ranked {
            region_label: ctx.dataset.region_label(&key).to_string(),
            region_key: key,
            year: state.year,
            month: state.month,
            metric: state.metric,
            bars,
            x_max,
            transition_ms: self.config.transition_ms,
        }
    }

    fn last_scene(&self) -> Option<&BarsScene> {
        self.last.as_ref()
    }

    fn set_last_scene(&mut self, scene: BarsScene) {
        self.last = Some(scene);
    }
}

#[cfg(test)]
mod tests {
    use tourism_map_dashboard_models::{OriginRow, SelectionState};
    use tourism_map_source::Dataset;

    use super::*;
    use crate::DashboardData;

    fn origin(country: &str, arrivals: Option<f64>) -> OriginRow {
        OriginRow {
            region_key: "istarska".to_string(),
            region_label: "Istria".to_string(),
            year: 2023,
            month: 6,
            origin_country: country.to_string(),
            arrivals,
            nights: None,
        }
    }

    fn state(region: Option<&str>) -> SelectionState {
        SelectionState {
            year: Some(2023),
            month: 6,
            selected_region: region.map(ToString::to_string),
            ..SelectionState::default()
        }
    }

    #[test]
    fn empty_without_region() {
        let data = DashboardData::new(Dataset {
            origins: vec![origin("Germany", Some(1.0))],
            ..Dataset::default()
        });
        let mut view = BarsView::new(&ViewConfig::default());
        let s = state(None);
        let scene = view.update(&data.context(&s)).scene;
        assert_eq!(
            scene,
            BarsScene::Empty {
                message: NO_REGION_MESSAGE.to_string()
            }
        );
        assert!(scene.is_empty());
    }

    #[test]
    fn ranks_top_n_without_totals() {
        let mut origins = vec![
            origin("Countries - total", Some(1_000_000.0)),
            origin("TOTAL", Some(900_000.0)),
            origin("Austria", Some(50.0)),
            origin("Germany", Some(500.0)),
            origin("Belgium", Some(50.0)),
            origin("Unknown", None),
        ];
        for i in 0..20 {
            origins.push(origin(&format!("Country {i:02}"), Some(f64::from(i))));
        }
        let data = DashboardData::new(Dataset {
            origins,
            ..Dataset::default()
        });
        let mut view = BarsView::new(&ViewConfig::default());
        let s = state(Some("Istarska županija"));
        let scene = view.update(&data.context(&s)).scene;

        let countries: Vec<&str> = scene.bars().iter().map(|b| b.country.as_str()).collect();
        assert_eq!(countries.len(), 10);
        assert_eq!(&countries[..3], &["Germany", "Austria", "Belgium"]);
        assert_eq!(countries[3], "Country 19");
        assert!(!countries.contains(&"TOTAL"));

        let ascending: Vec<f64> = scene.display_order().map(Bar::length).collect();
        assert!(ascending.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn missing_values_rank_last_and_stay_null() {
        let data = DashboardData::new(Dataset {
            origins: vec![origin("Unknown", None), origin("Germany", Some(5.0))],
            ..Dataset::default()
        });
        let mut view = BarsView::new(&ViewConfig::default());
        let s = state(Some("istarska"));
        let scene = view.update(&data.context(&s)).scene;
        assert_eq!(scene.bars()[1].country, "Unknown");
        assert_eq!(scene.bars()[1].value, None);
        assert_eq!(
            scene.tooltip("Unknown").unwrap().lines,
            vec!["Tourist arrivals: no data"]
        );
    }

    #[test]
    fn select_then_reset_returns_to_empty() {
        let data = DashboardData::new(Dataset {
            origins: vec![origin("Germany", Some(5.0))],
            ..Dataset::default()
        });
        let mut view = BarsView::new(&ViewConfig::default());

        let none = state(None);
        assert!(view.update(&data.context(&none)).scene.is_empty());

        let some = state(Some("istarska"));
        let update = view.update(&data.context(&some));
        assert_eq!(update.diff.entered, vec!["Germany"]);

        let update = view.update(&data.context(&none));
        assert!(matches!(update.scene, BarsScene::Empty { .. }));
        assert_eq!(update.diff.exited, vec!["Germany"]);
    }
}
