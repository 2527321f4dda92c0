//! Tourism intensity of the selected region's towns and municipalities.
//!
//! Each settlement is placed by nights per 100 inhabitants (x) and nights
//! per km² (y), with an area-proportional radius for permanent beds. The
//! axes fit the observed extent on every update.

use std::collections::BTreeSet;

use serde::Serialize;
use tourism_map_normalize::normalize_region_key;

use crate::config::ViewConfig;
use crate::scale::{Domain, SqrtScale};
use crate::tooltip::{Hover, Tooltip};
use crate::{ChartView, Mark, Scene, ViewContext, format_count, format_value};

/// One settlement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterPoint {
    /// Settlement name as written in the intensity table.
    pub settlement: String,
    /// Nights per 100 inhabitants.
    pub x: f64,
    /// Nights per km².
    pub y: f64,
    /// Point radius in pixels.
    pub radius: f64,
    /// Permanent beds, `None` when missing.
    pub beds: Option<f64>,
}

impl Mark for ScatterPoint {
    fn key(&self) -> String {
        normalize_region_key(&self.settlement)
    }
}

/// Scatter plot output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ScatterScene {
    /// Nothing plotted.
    #[serde(rename_all = "camelCase")]
    Cleared {
        /// Why the plot is empty.
        reason: String,
    },
    /// Settlements of the selected region.
    #[serde(rename_all = "camelCase")]
    Plot {
        /// Selected region.
        region_key: String,
        /// Its label.
        region_label: String,
        /// Year shown.
        year: i32,
        /// Nights per 100 inhabitants extent.
        x_domain: Domain,
        /// Nights per km² extent.
        y_domain: Domain,
        /// Points.
        points: Vec<ScatterPoint>,
        /// Transition duration.
        transition_ms: u32,
    },
}

impl ScatterScene {
    fn cleared(reason: &str) -> Self {
        Self::Cleared {
            reason: reason.to_string(),
        }
    }

    /// Plotted points. Empty when cleared.
    #[must_use]
    pub fn points(&self) -> &[ScatterPoint] {
        match self {
            Self::Cleared { .. } => &[],
            Self::Plot { points, .. } => points,
        }
    }
}

impl Scene for ScatterScene {
    type Mark = ScatterPoint;

    fn marks(&self) -> Vec<&ScatterPoint> {
        self.points().iter().collect()
    }
}

impl Hover for ScatterScene {
    fn tooltip(&self, key: &str) -> Option<Tooltip> {
        let point = self.points().iter().find(|p| p.key() == key)?;
        Some(Tooltip::new(
            point.settlement.clone(),
            vec![
                format!("Nights per 100 inhabitants: {}", format_count(point.x)),
                format!("Nights per km²: {}", format_count(point.y)),
                format!("Permanent beds: {}", format_value(point.beds)),
            ],
        ))
    }
}

/// The scatter plot view.
#[derive(Debug)]
pub struct ScatterView {
    config: ViewConfig,
    last: Option<ScatterScene>,
}

impl ScatterView {
    /// Creates the view.
    #[must_use]
    pub fn new(config: &ViewConfig) -> Self {
        Self {
            config: config.clone(),
            last: None,
        }
    }
}

impl ChartView for ScatterView {
    type Scene = ScatterScene;

    fn name(&self) -> &'static str {
        "scatter"
    }

    fn compute(&self, ctx: &ViewContext<'_>) -> ScatterScene {
        let state = ctx.state;
        let Some(selected) = ctx.selected_key() else {
            return ScatterScene::cleared("no region selected");
        };
        let Some(year) = state.year else {
            return ScatterScene::cleared("no year selected");
        };

        let settlements = &ctx.indexes.settlements;
        let mut seen = BTreeSet::new();
        let rows: Vec<_> = ctx
            .dataset
            .intensity
            .iter()
            .filter(|r| r.is_municipality() && r.year == year)
            .filter(|r| {
                let owner = settlements
                    .region_of(&r.spatial_unit)
                    .map_or_else(|| normalize_region_key(&r.county_key), str::to_string);
                owner == selected
            })
            .filter_map(|r| Some((r, r.nights_per_100?, r.nights_per_km2?)))
            .filter(|(r, _, _)| seen.insert(normalize_region_key(&r.spatial_unit)))
            .collect();

        if rows.is_empty() {
            return ScatterScene::cleared("no settlements with intensity data");
        }

        let max_beds = rows
            .iter()
            .filter_map(|(r, _, _)| r.permanent_beds)
            .fold(0.0, f64::max);
        let radius = SqrtScale::new(max_beds, self.config.min_radius, self.config.max_radius);

        let points: Vec<ScatterPoint> = rows
            .iter()
            .map(|(r, x, y)| ScatterPoint {
                settlement: r.spatial_unit.clone(),
                x: *x,
                y: *y,
                radius: radius.radius(r.permanent_beds),
                beds: r.permanent_beds,
            })
            .collect();

        let x_domain = Domain::extent(points.iter().map(|p| p.x)).unwrap_or(Domain::new(0.0, 1.0));
        let y_domain = Domain::extent(points.iter().map(|p| p.y)).unwrap_or(Domain::new(0.0, 1.0));

        ScatterScene::Plot {
            region_label: ctx.dataset.region_label(&selected).to_string(),
            region_key: selected,
            year,
            x_domain,
            y_domain,
            points,
            transition_ms: self.config.transition_ms,
        }
    }

    fn last_scene(&self) -> Option<&ScatterScene> {
        self.last.as_ref()
    }

    fn set_last_scene(&mut self, scene: ScatterScene) {
        self.last = Some(scene);
    }
}

#[cfg(test)]
mod tests {
    use tourism_map_dashboard_models::{IntensityRow, SelectionState, SpatialLevel};
    use tourism_map_source::Dataset;

    use super::*;
    use crate::DashboardData;

    fn town(name: &str, county: &str, x: Option<f64>, y: Option<f64>, beds: Option<f64>) -> IntensityRow {
        IntensityRow {
            spatial_level: SpatialLevel::Municipality,
            spatial_unit: name.to_string(),
            county_key: county.to_string(),
            year: 2023,
            nights_per_100: x,
            nights_per_km2: y,
            permanent_beds: beds,
            nights: None,
            arrivals: None,
        }
    }

    fn data() -> DashboardData {
        DashboardData::new(Dataset {
            intensity: vec![
                town("Poreč", "Istarska županija", Some(100.0), Some(50.0), Some(400.0)),
                town("Pula", "istarska", Some(20.0), Some(10.0), Some(100.0)),
                town("Rovinj", "istarska", None, Some(10.0), Some(100.0)),
                town("Nin", "zadarska", Some(5.0), Some(5.0), None),
                IntensityRow {
                    spatial_level: SpatialLevel::Aggregate,
                    ..town("County of Istra", "istarska", Some(1.0), Some(1.0), None)
                },
            ],
            ..Dataset::default()
        })
    }

    fn state(region: Option<&str>) -> SelectionState {
        SelectionState {
            year: Some(2023),
            selected_region: region.map(ToString::to_string),
            ..SelectionState::default()
        }
    }

    #[test]
    fn plots_only_the_selected_regions_settlements() {
        let data = data();
        let mut view = ScatterView::new(&ViewConfig::default());
        let s = state(Some("Istarska"));
        let scene = view.update(&data.context(&s)).scene;

        let names: Vec<&str> = scene.points().iter().map(|p| p.settlement.as_str()).collect();
        assert_eq!(names, vec!["Poreč", "Pula"]);
        let ScatterScene::Plot { x_domain, .. } = &scene else {
            panic!("expected a plot");
        };
        assert!((x_domain.min - 20.0).abs() < f64::EPSILON);
        assert!((x_domain.max - 100.0).abs() < f64::EPSILON);
        assert!((scene.points()[0].radius - 18.0).abs() < 1e-9);
        assert!((scene.points()[1].radius - 10.5).abs() < 1e-9);
    }

    #[test]
    fn single_point_gets_widened_axes_and_min_radius() {
        let data = data();
        let mut view = ScatterView::new(&ViewConfig::default());
        let s = state(Some("zadarska"));
        let scene = view.update(&data.context(&s)).scene;
        let ScatterScene::Plot { x_domain, y_domain, points, .. } = &scene else {
            panic!("expected a plot");
        };
        assert_eq!(*x_domain, Domain::new(4.0, 6.0));
        assert_eq!(*y_domain, Domain::new(4.0, 6.0));
        assert!((points[0].radius - 3.0).abs() < 1e-9);
    }

    #[test]
    fn clears_when_nothing_survives() {
        let data = data();
        let mut view = ScatterView::new(&ViewConfig::default());

        let s = state(Some("istarska"));
        assert_eq!(view.update(&data.context(&s)).scene.points().len(), 2);

        let s = state(Some("licko senjska"));
        let update = view.update(&data.context(&s));
        assert!(matches!(update.scene, ScatterScene::Cleared { .. }));
        assert_eq!(update.diff.exited, vec!["porec", "pula"]);

        let s = state(None);
        assert!(view.update(&data.context(&s)).scene.is_empty());
    }
}
