//! Choropleth of the selected metric per region.
//!
//! A region with no row in the index slice is drawn as "no data" with the
//! neutral fill and a `None` value. A region that was reported with 0 sits
//! at the start of the color scale. The color domain is `[0, max of the
//! slice]`, recomputed on every update.

use geo::{BooleanOps, BoundingRect, MultiPolygon};
use serde::Serialize;
use tourism_map_dashboard_models::Metric;
use tourism_map_source::Dataset;

use crate::config::ViewConfig;
use crate::scale::{ColorRamp, Domain};
use crate::tooltip::{Hover, Tooltip};
use crate::{ChartView, Mark, Scene, ViewContext, format_value};

/// Bounding box in lon/lat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    /// West edge.
    pub min_x: f64,
    /// South edge.
    pub min_y: f64,
    /// East edge.
    pub max_x: f64,
    /// North edge.
    pub max_y: f64,
}

/// One region's fill.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionFill {
    /// Canonical key.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Metric value, `None` for no data.
    pub value: Option<f64>,
    /// Fill color.
    pub fill: String,
    /// Whether this is the selected region.
    pub selected: bool,
}

impl Mark for RegionFill {
    fn key(&self) -> String {
        self.key.clone()
    }
}

/// Map output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapScene {
    /// Year shown, `None` before one is selected.
    pub year: Option<i32>,
    /// Month shown.
    pub month: u8,
    /// Metric shown.
    pub metric: Metric,
    /// Color scale domain.
    pub domain: Domain,
    /// One fill per region, in boundary file order.
    pub regions: Vec<RegionFill>,
    /// Region drawn with the highlight overlay.
    pub selected: Option<String>,
    /// Union of every region boundary.
    pub outline: Option<geojson::Geometry>,
    /// Extent of the outline.
    pub bounds: Option<Bounds>,
    /// Transition duration.
    pub transition_ms: u32,
}

impl Scene for MapScene {
    type Mark = RegionFill;

    fn marks(&self) -> Vec<&RegionFill> {
        self.regions.iter().collect()
    }
}

impl Hover for MapScene {
    fn tooltip(&self, key: &str) -> Option<Tooltip> {
        let region = self.regions.iter().find(|r| r.key == key)?;
        Some(Tooltip::new(
            region.label.clone(),
            vec![format!(
                "{}: {}",
                self.metric.label(),
                format_value(region.value)
            )],
        ))
    }
}

/// The map view.
#[derive(Debug)]
pub struct MapView {
    config: ViewConfig,
    ramp: ColorRamp,
    outline: Option<geojson::Geometry>,
    bounds: Option<Bounds>,
    last: Option<MapScene>,
}

impl MapView {
    /// Creates the view, computing the national outline from `dataset`.
    #[must_use]
    pub fn new(dataset: &Dataset, config: &ViewConfig) -> Self {
        let union = national_outline(dataset);
        let bounds = union
            .as_ref()
            .and_then(BoundingRect::bounding_rect)
            .map(|rect| Bounds {
                min_x: rect.min().x,
                min_y: rect.min().y,
                max_x: rect.max().x,
                max_y: rect.max().y,
            });

        Self {
            config: config.clone(),
            ramp: ColorRamp::new(&config.color_low, &config.color_high),
            outline: union
                .as_ref()
                .map(|mp| geojson::Geometry::new(geojson::Value::from(mp))),
            bounds,
            last: None,
        }
    }

    /// Extent of the national outline.
    #[must_use]
    pub const fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }
}

fn national_outline(dataset: &Dataset) -> Option<MultiPolygon<f64>> {
    let mut regions = dataset.regions.iter();
    let first = regions.next()?.geometry.clone();
    let union = regions.fold(first, |acc, region| acc.union(&region.geometry));
    log::debug!(
        "[map] National outline has {} polygons",
        union.0.len()
    );
    Some(union)
}

impl ChartView for MapView {
    type Scene = MapScene;

    fn name(&self) -> &'static str {
        "map"
    }

    fn compute(&self, ctx: &ViewContext<'_>) -> MapScene {
        let state = ctx.state;
        let metric = state.metric;
        let slice = state
            .year
            .and_then(|year| ctx.indexes.region_month.slice(year, state.month));
        let max = state.year.map_or(0.0, |year| {
            ctx.indexes
                .region_month
                .max_in_slice(year, state.month, metric)
        });
        let domain = Domain::new(0.0, max);

        let selected_key = ctx.selected_key();
        let regions: Vec<RegionFill> = ctx
            .dataset
            .regions
            .iter()
            .map(|region| {
                let value = slice
                    .and_then(|s| s.get(&region.key))
                    .map(|totals| totals.value(metric));
                let fill = value.map_or_else(
                    || self.config.color_no_data.clone(),
                    |v| self.ramp.at(domain.normalize(v)),
                );
                RegionFill {
                    key: region.key.clone(),
                    label: region.label.clone(),
                    value,
                    fill,
                    selected: selected_key.as_deref() == Some(region.key.as_str()),
                }
            })
            .collect();

        let selected = regions
            .iter()
            .find(|r| r.selected)
            .map(|r| r.key.clone());

        MapScene {
            year: state.year,
            month: state.month,
            metric,
            domain,
            regions,
            selected,
            outline: self.outline.clone(),
            bounds: self.bounds,
            transition_ms: self.config.transition_ms,
        }
    }

    fn last_scene(&self) -> Option<&MapScene> {
        self.last.as_ref()
    }

    fn set_last_scene(&mut self, scene: MapScene) {
        self.last = Some(scene);
    }
}
