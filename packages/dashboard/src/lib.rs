#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Session orchestrator for the tourism dashboard.
//!
//! [`Dashboard::start`] loads every input file, builds the derived indexes,
//! creates the selection store and binds the four views to it. From then
//! on each control call issues exactly one merge, and every merge re-renders
//! all four panels.

pub mod config;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use tourism_map_dashboard_models::calendar::is_valid_month;
use tourism_map_dashboard_models::{Metric, SelectionPatch, SelectionState};
use tourism_map_source::{Dataset, ProgressCallback, SourceError, load_dataset};
use tourism_map_state::{SelectionStore, Subscription};
use tourism_map_views::interaction::{select_month, toggle_region};
use tourism_map_views::{
    BarsView, DashboardData, FrameRecorder, LineView, MapView, Panel, PanelFrame, RenderSink,
    ScatterView, Tooltip, ViewBinding,
};

pub use config::{ConfigError, DashboardConfig, DefaultSelection};

/// Errors surfaced by the orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// An input file failed to load.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A month outside 1-12 was requested.
    #[error("Invalid month {0}, expected 1-12")]
    InvalidMonth(u8),
}

/// Sends every frame to the recorder and to any extra sinks.
struct FanOut {
    recorder: Rc<FrameRecorder>,
    extra: Vec<Rc<dyn RenderSink>>,
}

impl RenderSink for FanOut {
    fn render(&self, frame: PanelFrame) {
        for sink in &self.extra {
            sink.render(frame.clone());
        }
        self.recorder.render(frame);
    }
}

/// A running dashboard session.
pub struct Dashboard {
    config: DashboardConfig,
    data: Rc<DashboardData>,
    store: Rc<SelectionStore>,
    recorder: Rc<FrameRecorder>,
    sinks: Vec<Rc<dyn RenderSink>>,
    map: Rc<ViewBinding<MapView>>,
    line: Rc<ViewBinding<LineView>>,
    bars: Rc<ViewBinding<BarsView>>,
    scatter: Rc<ViewBinding<ScatterView>>,
    tooltip: RefCell<Option<Tooltip>>,
    subscriptions: Vec<Subscription>,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("state", &self.store.snapshot())
            .field("regions", &self.data.dataset.regions.len())
            .finish_non_exhaustive()
    }
}

impl Dashboard {
    /// Loads the configured files and renders the first frame of every
    /// panel.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`] for an invalid config and
    /// [`DashboardError::Source`] if any input fails to load; nothing is
    /// rendered in that case.
    pub async fn start(
        config: DashboardConfig,
        progress: &Arc<dyn ProgressCallback>,
    ) -> Result<Self, DashboardError> {
        config.validate()?;
        let dataset = load_dataset(&config.files, progress).await?;
        Ok(Self::from_dataset(config, dataset, Vec::new()))
    }

    /// Builds a session around an already loaded dataset. `sinks` receive
    /// every frame in addition to the internal recorder.
    #[must_use]
    pub fn from_dataset(
        config: DashboardConfig,
        dataset: Dataset,
        sinks: Vec<Rc<dyn RenderSink>>,
    ) -> Self {
        let year = initial_year(&config, &dataset);
        let data = Rc::new(DashboardData::new(dataset));
        let recorder = Rc::new(FrameRecorder::default());
        let sink: Rc<dyn RenderSink> = Rc::new(FanOut {
            recorder: recorder.clone(),
            extra: sinks.clone(),
        });

        let store = SelectionStore::new(SelectionState {
            year: None,
            month: config.selection.month,
            metric: config.selection.metric,
            selected_region: None,
        });

        let views = &config.views;
        let map = ViewBinding::new(MapView::new(&data.dataset, views), data.clone(), sink.clone());
        let line = ViewBinding::new(LineView::new(views), data.clone(), sink.clone());
        let bars = ViewBinding::new(BarsView::new(views), data.clone(), sink.clone());
        let scatter = ViewBinding::new(ScatterView::new(views), data.clone(), sink);

        let subscriptions = vec![
            store.subscribe(map.clone()),
            store.subscribe(line.clone()),
            store.subscribe(bars.clone()),
            store.subscribe(scatter.clone()),
        ];

        let dashboard = Self {
            config,
            data,
            store,
            recorder,
            sinks,
            map,
            line,
            bars,
            scatter,
            tooltip: RefCell::new(None),
            subscriptions,
        };

        log::info!(
            "Dashboard ready: {} regions, starting at {}",
            dashboard.data.dataset.regions.len(),
            year.map_or_else(|| "no year".to_string(), |y| y.to_string())
        );
        dashboard.merge(year.map_or_else(SelectionPatch::new, |y| SelectionPatch::new().year(y)));
        dashboard
    }

    /// Reloads every file and rebuilds the session, keeping the current
    /// selection where the new data still offers its year.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Source`] if any input fails to load; the
    /// current session is left untouched in that case.
    pub async fn reload(&mut self, progress: &Arc<dyn ProgressCallback>) -> Result<(), DashboardError> {
        let previous = self.state();
        let dataset = load_dataset(&self.config.files, progress).await?;
        let year_still_available = previous
            .year
            .is_some_and(|y| dataset.available_years().contains(&y));

        self.subscriptions.clear();
        *self = Self::from_dataset(self.config.clone(), dataset, self.sinks.clone());

        if year_still_available {
            let mut patch = SelectionPatch::new()
                .month(previous.month)
                .metric(previous.metric);
            if let Some(year) = previous.year {
                patch = patch.year(year);
            }
            if let Some(region) = previous.selected_region {
                patch = patch.region(region);
            }
            self.merge(patch);
        }
        Ok(())
    }

    fn merge(&self, patch: SelectionPatch) {
        log::debug!("Merging {patch:?}");
        self.store.merge(patch);
    }

    /// Current selection.
    #[must_use]
    pub fn state(&self) -> SelectionState {
        self.store.snapshot()
    }

    /// The loaded data.
    #[must_use]
    pub fn data(&self) -> &DashboardData {
        &self.data
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Years the year control offers.
    #[must_use]
    pub fn available_years(&self) -> Vec<i32> {
        self.data.dataset.available_years()
    }

    /// Selects a year.
    pub fn set_year(&self, year: i32) {
        if !self.available_years().contains(&year) {
            log::warn!("Year {year} is not in the data; panels will be empty");
        }
        self.merge(SelectionPatch::new().year(year));
    }

    /// Selects a month.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::InvalidMonth`] outside 1-12; nothing is
    /// merged in that case.
    pub fn set_month(&self, month: u8) -> Result<(), DashboardError> {
        if !is_valid_month(month) {
            return Err(DashboardError::InvalidMonth(month));
        }
        self.merge(SelectionPatch::new().month(month));
        Ok(())
    }

    /// Selects a metric.
    pub fn set_metric(&self, metric: Metric) {
        self.merge(SelectionPatch::new().metric(metric));
    }

    /// Clears the selected region.
    pub fn reset_region(&self) {
        self.merge(SelectionPatch::new().clear_region());
    }

    /// Map click on `key`: selects it, or deselects it if already selected.
    pub fn click_region(&self, key: &str) {
        let patch = toggle_region(&self.store.snapshot(), key);
        if let Some(Some(selected)) = &patch.selected_region
            && self.data.dataset.region(selected).is_none()
        {
            log::warn!("Region '{selected}' is not on the map");
        }
        self.merge(patch);
    }

    /// Line chart click on `month`.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::InvalidMonth`] outside 1-12.
    pub fn click_month(&self, month: u8) -> Result<(), DashboardError> {
        let patch = select_month(month).ok_or(DashboardError::InvalidMonth(month))?;
        self.merge(patch);
        Ok(())
    }

    /// Shows the tooltip for `key` on `panel` at `position`. Returns the
    /// tooltip, or `None` (and hides any current one) when the panel has no
    /// such mark. Never changes the selection.
    pub fn hover(&self, panel: Panel, key: &str, position: (f64, f64)) -> Option<Tooltip> {
        let tooltip = match panel {
            Panel::Map => self.map.tooltip(key),
            Panel::Line => self.line.tooltip(key),
            Panel::Bars => self.bars.tooltip(key),
            Panel::Scatter => self.scatter.tooltip(key),
        }
        .map(|t| t.at(position.0, position.1));
        self.tooltip.replace(tooltip.clone());
        tooltip
    }

    /// Hides the tooltip.
    pub fn clear_hover(&self) {
        self.tooltip.replace(None);
    }

    /// Currently shown tooltip.
    #[must_use]
    pub fn tooltip(&self) -> Option<Tooltip> {
        self.tooltip.borrow().clone()
    }

    /// Latest frame of every panel.
    #[must_use]
    pub fn frames(&self) -> Vec<PanelFrame> {
        self.recorder.frames()
    }

    /// Latest frame of `panel`.
    #[must_use]
    pub fn frame(&self, panel: Panel) -> Option<PanelFrame> {
        self.recorder.latest(panel)
    }

    /// Total frames rendered in this session.
    #[must_use]
    pub fn frames_rendered(&self) -> u64 {
        self.recorder.rendered()
    }
}

fn initial_year(config: &DashboardConfig, dataset: &Dataset) -> Option<i32> {
    let years = dataset.available_years();
    match config.selection.year {
        Some(year) if years.contains(&year) => Some(year),
        Some(year) => {
            log::warn!("Configured year {year} is not in the data; using the latest year");
            years.last().copied()
        }
        None => years.last().copied(),
    }
}

#[cfg(test)]
mod tests {
    use tourism_map_dashboard_models::{DatasetMeta, MonthlyMetricRow, NationalMonthRow, OriginRow};
    use tourism_map_normalize::normalize_region_key;
    use tourism_map_source::RegionRecord;
    use tourism_map_views::{BarsScene, PanelScene, ScatterScene};

    use super::*;

    fn square(x: f64) -> geo::MultiPolygon<f64> {
        geo::MultiPolygon(vec![geo::Polygon::new(
            geo::LineString::from(vec![(x, 0.0), (x + 1.0, 0.0), (x + 1.0, 1.0), (x, 1.0), (x, 0.0)]),
            vec![],
        )])
    }

    fn monthly(name: &str, arrivals: f64, nights: f64) -> MonthlyMetricRow {
        MonthlyMetricRow {
            region_key: normalize_region_key(name),
            year: 2023,
            month: 6,
            arrivals: Some(arrivals),
            nights: Some(nights),
        }
    }

    fn origin(name: &str, country: &str, arrivals: f64) -> OriginRow {
        OriginRow {
            region_key: normalize_region_key(name),
            region_label: name.to_string(),
            year: 2023,
            month: 6,
            origin_country: country.to_string(),
            arrivals: Some(arrivals),
            nights: None,
        }
    }

    fn dataset() -> Dataset {
        let region = |name: &str, x| RegionRecord {
            key: normalize_region_key(name),
            label: name.to_string(),
            geometry: square(x),
        };
        Dataset {
            regions: vec![region("region-a", 0.0), region("region-b", 2.0)],
            monthly: vec![monthly("region-a", 100.0, 300.0), monthly("region-b", 50.0, 900.0)],
            national: vec![NationalMonthRow {
                year: 2023,
                month: 6,
                total_arrivals: Some(150.0),
                total_nights: Some(1200.0),
                domestic_arrivals: None,
                domestic_nights: None,
                foreign_arrivals: None,
                foreign_nights: None,
            }],
            origins: vec![
                origin("region-a", "Germany", 60.0),
                origin("region-a", "Total", 100.0),
                origin("region-a", "Austria", 40.0),
                origin("region-b", "Italy", 50.0),
            ],
            intensity: Vec::new(),
            meta: DatasetMeta {
                years_table13: vec![2022, 2023],
                ..DatasetMeta::default()
            },
        }
    }

    fn start() -> Dashboard {
        let mut config = DashboardConfig::default();
        config.selection.month = 6;
        Dashboard::from_dataset(config, dataset(), Vec::new())
    }

    fn bars(dashboard: &Dashboard) -> BarsScene {
        match dashboard.frame(Panel::Bars).unwrap().scene {
            PanelScene::Bars(scene) => scene,
            other => panic!("unexpected scene {other:?}"),
        }
    }

    #[test]
    fn start_renders_every_panel_once_with_latest_year() {
        let dashboard = start();
        assert_eq!(dashboard.state().year, Some(2023));
        assert_eq!(dashboard.frames().len(), 4);
        assert_eq!(dashboard.frames_rendered(), 4);
        let panels: Vec<Panel> = dashboard.frames().iter().map(PanelFrame::panel).collect();
        assert_eq!(panels, Panel::ALL.to_vec());
    }

    #[test]
    fn selecting_region_a_ranks_its_origins() {
        let dashboard = start();
        dashboard.click_region("region-a");

        assert_eq!(dashboard.state().region(), Some("region a"));
        assert_eq!(dashboard.frames_rendered(), 8);

        let scene = bars(&dashboard);
        let countries: Vec<&str> = scene.bars().iter().map(|b| b.country.as_str()).collect();
        assert_eq!(countries, vec!["Germany", "Austria"]);

        let PanelScene::Map(map) = dashboard.frame(Panel::Map).unwrap().scene else {
            panic!("expected map scene");
        };
        assert_eq!(map.selected.as_deref(), Some("region a"));
        assert!(scene.bars().len() <= dashboard.config().views.top_n);
        let BarsScene::Ranked { region_label, year, month, metric, .. } = &scene else {
            panic!("expected ranked bars");
        };
        assert_eq!(region_label, "region-a");
        assert_eq!((*year, *month, *metric), (Some(2023), 6, Metric::Arrivals));
        assert!((map.domain.max - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn switching_metric_rescales_map() {
        let dashboard = start();
        dashboard.set_metric(Metric::Nights);
        let PanelScene::Map(map) = dashboard.frame(Panel::Map).unwrap().scene else {
            panic!("expected map scene");
        };
        assert!((map.domain.max - 900.0).abs() < f64::EPSILON);
        assert_eq!(map.regions[1].fill, dashboard.config().views.color_high);
    }

    #[test]
    fn clicking_selected_region_again_resets_bars() {
        let dashboard = start();
        dashboard.click_region("region-b");
        assert_eq!(bars(&dashboard).bars()[0].country, "Italy");

        dashboard.click_region("region-b");
        assert!(matches!(bars(&dashboard), BarsScene::Empty { .. }));

        dashboard.click_region("region-a");
        dashboard.reset_region();
        assert_eq!(dashboard.state().selected_region, None);
        assert!(matches!(bars(&dashboard), BarsScene::Empty { .. }));

        let PanelScene::Scatter(scatter) = dashboard.frame(Panel::Scatter).unwrap().scene else {
            panic!("expected scatter scene");
        };
        assert!(matches!(scatter, ScatterScene::Cleared { .. }));
    }

    #[test]
    fn each_control_issues_one_merge() {
        let dashboard = start();
        let before = dashboard.frames_rendered();
        dashboard.set_year(2022);
        dashboard.set_month(7).unwrap();
        dashboard.click_month(8).unwrap();
        dashboard.set_metric(Metric::Nights);
        dashboard.reset_region();
        assert_eq!(dashboard.frames_rendered(), before + 5 * 4);

        assert!(matches!(
            dashboard.set_month(13).unwrap_err(),
            DashboardError::InvalidMonth(13)
        ));
        assert!(dashboard.click_month(0).is_err());
        assert_eq!(dashboard.frames_rendered(), before + 5 * 4);
        assert_eq!(dashboard.state().month, 8);
    }

    #[test]
    fn hover_never_changes_selection() {
        let dashboard = start();
        let before = dashboard.state();
        let tip = dashboard.hover(Panel::Map, "region a", (10.0, 20.0)).unwrap();
        assert_eq!(tip.position, (10.0, 20.0));
        assert_eq!(tip.lines, vec!["Tourist arrivals: 100"]);
        assert_eq!(dashboard.tooltip(), Some(tip));
        assert_eq!(dashboard.state(), before);

        assert!(dashboard.hover(Panel::Bars, "Germany", (0.0, 0.0)).is_none());
        assert!(dashboard.tooltip().is_none());

        dashboard.hover(Panel::Map, "region b", (0.0, 0.0));
        dashboard.clear_hover();
        assert!(dashboard.tooltip().is_none());
    }

    #[test]
    fn configured_year_falls_back_to_latest() {
        let mut config = DashboardConfig::default();
        config.selection.year = Some(1990);
        let dashboard = Dashboard::from_dataset(config, dataset(), Vec::new());
        assert_eq!(dashboard.state().year, Some(2023));

        let mut config = DashboardConfig::default();
        config.selection.year = Some(2022);
        let dashboard = Dashboard::from_dataset(config, dataset(), Vec::new());
        assert_eq!(dashboard.state().year, Some(2022));
    }

    #[test]
    fn extra_sinks_see_every_frame() {
        let extra = Rc::new(FrameRecorder::default());
        let dashboard = Dashboard::from_dataset(
            DashboardConfig::default(),
            dataset(),
            vec![extra.clone()],
        );
        dashboard.set_metric(Metric::Nights);
        assert_eq!(extra.rendered(), 8);
        assert_eq!(extra.frames(), dashboard.frames());
    }

    #[test]
    fn dropping_the_dashboard_unsubscribes_views() {
        let dashboard = start();
        let store = dashboard.store.clone();
        assert_eq!(store.observer_count(), 4);
        drop(dashboard);
        assert_eq!(store.observer_count(), 0);
    }

    #[tokio::test]
    async fn start_fails_on_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = DashboardConfig::default();
        config.files = tourism_map_source::SourceFiles::in_dir(dir.path());
        let err = Dashboard::start(config, &tourism_map_source::null_progress())
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::Source(SourceError::Io { .. })));
    }

    fn write_files(dir: &std::path::Path, arrivals: u32) -> tourism_map_source::SourceFiles {
        use tourism_map_source::SourceKind;

        let files = tourism_map_source::SourceFiles::in_dir(dir);
        let regions = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"name":"Istarska"},
             "geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,1],[0,0]]]}}]}"#;
        let monthly = format!("county_key,year,month,arrivals,nights\nistarska,2023,6,{arrivals},1\n");
        let contents = [
            (SourceKind::Regions, regions.to_string()),
            (SourceKind::Monthly, monthly),
            (SourceKind::National, "year,month,total_arrivals,total_nights\n".to_string()),
            (
                SourceKind::Origins,
                "county_key,county_label,origin_country,year,month,arrivals,nights\n".to_string(),
            ),
            (
                SourceKind::Intensity,
                "spatial_level,spatial_unit,county_key,year,nights_per_100,nights_per_km2,permanent_beds\n"
                    .to_string(),
            ),
            (SourceKind::Meta, r#"{"years_table13":[2023]}"#.to_string()),
        ];
        for (kind, text) in contents {
            std::fs::write(files.path(kind), text).unwrap();
        }
        files
    }

    #[tokio::test]
    async fn reload_rebuilds_and_keeps_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = DashboardConfig::default();
        config.files = write_files(dir.path(), 10);
        config.selection.month = 6;
        let progress = tourism_map_source::null_progress();

        let mut dashboard = Dashboard::start(config, &progress).await.unwrap();
        dashboard.click_region("istarska");

        write_files(dir.path(), 99);
        dashboard.reload(&progress).await.unwrap();

        assert_eq!(dashboard.state().region(), Some("istarska"));
        let PanelScene::Map(map) = dashboard.frame(Panel::Map).unwrap().scene else {
            panic!("expected map scene");
        };
        assert_eq!(map.regions[0].value, Some(99.0));
    }
}
