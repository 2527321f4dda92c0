#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The four linked chart views.
//!
//! Each view turns the shared data plus the current [`SelectionState`] into
//! a serializable scene of keyed marks. Drawing the scene is left to a
//! [`RenderSink`]; what a view owns is the derivation and the enter/update/
//! exit diff against the scene it produced last time.
//!
//! Views never write to the store themselves. Clicks are translated into a
//! [`SelectionPatch`](tourism_map_dashboard_models::SelectionPatch) by the
//! functions in [`interaction`] and merged by the caller.

pub mod bars;
pub mod binding;
pub mod config;
pub mod interaction;
pub mod line;
pub mod map;
pub mod scale;
pub mod scatter;
pub mod tooltip;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tourism_map_dashboard_models::SelectionState;
use tourism_map_index::DerivedIndexes;
use tourism_map_normalize::normalize_region_key;
use tourism_map_source::Dataset;

pub use bars::{BarsScene, BarsView};
pub use binding::{FrameRecorder, Panel, PanelFrame, PanelScene, RenderSink, ViewBinding};
pub use config::ViewConfig;
pub use line::{LineScene, LineView};
pub use map::{MapScene, MapView};
pub use scatter::{ScatterScene, ScatterView};
pub use tooltip::Tooltip;

/// A keyed visual element. Marks with equal keys in consecutive scenes are
/// the same element.
pub trait Mark: PartialEq {
    /// Stable identity of the mark.
    fn key(&self) -> String;
}

/// Output of a view: something that can list its marks.
pub trait Scene {
    /// Element type of the scene.
    type Mark: Mark;

    /// Every mark in draw order.
    fn marks(&self) -> Vec<&Self::Mark>;

    /// Whether the scene draws nothing.
    fn is_empty(&self) -> bool {
        self.marks().is_empty()
    }
}

/// Keys of the marks that entered, changed, left or stayed the same between
/// two scenes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkDiff {
    /// New keys.
    pub entered: Vec<String>,
    /// Keys present in both scenes with different content.
    pub updated: Vec<String>,
    /// Keys that disappeared.
    pub exited: Vec<String>,
    /// Keys present in both scenes with equal content.
    pub unchanged: Vec<String>,
}

impl MarkDiff {
    /// Whether nothing entered, changed or left.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.entered.is_empty() && self.updated.is_empty() && self.exited.is_empty()
    }
}

/// Diffs two mark lists by key. Output keys follow the order of `next`
/// (entered, updated, unchanged) and of `prev` (exited).
#[must_use]
pub fn diff_marks<M: Mark>(prev: &[&M], next: &[&M]) -> MarkDiff {
    let previous: BTreeMap<String, &M> = prev.iter().map(|m| (m.key(), *m)).collect();
    let mut diff = MarkDiff::default();
    let mut seen = std::collections::BTreeSet::new();

    for mark in next {
        let key = mark.key();
        match previous.get(&key) {
            None => diff.entered.push(key.clone()),
            Some(old) if *old == *mark => diff.unchanged.push(key.clone()),
            Some(_) => diff.updated.push(key.clone()),
        }
        seen.insert(key);
    }
    for mark in prev {
        let key = mark.key();
        if !seen.contains(&key) {
            diff.exited.push(key);
        }
    }

    diff
}

/// A freshly computed scene and its diff against the previous one.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewUpdate<S> {
    /// The new scene.
    pub scene: S,
    /// Changes relative to the previous scene.
    pub diff: MarkDiff,
}

/// Read-only inputs of one update.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    /// Loaded data.
    pub dataset: &'a Dataset,
    /// Indexes derived from `dataset`.
    pub indexes: &'a DerivedIndexes,
    /// Selection after the merge being rendered.
    pub state: &'a SelectionState,
}

impl ViewContext<'_> {
    /// Canonical key of the selected region, the join key of every view.
    #[must_use]
    pub fn selected_key(&self) -> Option<String> {
        self.state.region().map(normalize_region_key)
    }
}

/// Dataset plus its indexes, shared by every view of a session.
#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    /// Loaded data.
    pub dataset: Dataset,
    /// Indexes derived from `dataset`.
    pub indexes: DerivedIndexes,
}

impl DashboardData {
    /// Builds the indexes for `dataset`.
    #[must_use]
    pub fn new(dataset: Dataset) -> Self {
        let indexes = DerivedIndexes::build(&dataset);
        Self { dataset, indexes }
    }

    /// Context for rendering `state`.
    #[must_use]
    pub const fn context<'a>(&'a self, state: &'a SelectionState) -> ViewContext<'a> {
        ViewContext {
            dataset: &self.dataset,
            indexes: &self.indexes,
            state,
        }
    }
}

/// A chart that can be re-derived from the selection.
pub trait ChartView {
    /// What the view produces.
    type Scene: Scene + Clone;

    /// Short name for log messages.
    fn name(&self) -> &'static str;

    /// Derives the scene for `ctx`. Must not panic on stale selections.
    fn compute(&self, ctx: &ViewContext<'_>) -> Self::Scene;

    /// Scene produced by the previous update.
    fn last_scene(&self) -> Option<&Self::Scene>;

    /// Remembers `scene` as the previous scene.
    fn set_last_scene(&mut self, scene: Self::Scene);

    /// Computes a new scene and diffs it against the last one.
    fn update(&mut self, ctx: &ViewContext<'_>) -> ViewUpdate<Self::Scene> {
        let scene = self.compute(ctx);
        let diff = {
            let previous = self.last_scene().map(Scene::marks).unwrap_or_default();
            diff_marks(&previous, &scene.marks())
        };
        log::trace!(
            "[{}] {} entered, {} updated, {} exited",
            self.name(),
            diff.entered.len(),
            diff.updated.len(),
            diff.exited.len()
        );
        self.set_last_scene(scene.clone());
        ViewUpdate { scene, diff }
    }
}

/// Formats a count with thousands separators, no decimals.
#[must_use]
pub fn format_count(value: f64) -> String {
    #[allow(clippy::cast_possible_truncation)]
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Formats an optional value, `"no data"` when missing.
#[must_use]
pub fn format_value(value: Option<f64>) -> String {
    value.map_or_else(|| "no data".to_string(), format_count)
}

#[cfg(test)]
mod tests {
    use geo::{LineString, MultiPolygon, Polygon};
    use tourism_map_dashboard_models::{
        IntensityRow, MonthlyMetricRow, OriginRow, SpatialLevel,
    };
    use tourism_map_source::RegionRecord;

    use super::*;
    use crate::bars::BarsView;
    use crate::config::ViewConfig;
    use crate::line::LineView;
    use crate::map::MapView;
    use crate::scatter::ScatterView;

    #[derive(Debug, Clone, PartialEq)]
    struct Dot(&'static str, i32);

    impl Mark for Dot {
        fn key(&self) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn diff_classifies_every_key() {
        let a = Dot("a", 1);
        let b = Dot("b", 1);
        let b2 = Dot("b", 2);
        let c = Dot("c", 1);
        let d = Dot("d", 1);

        let diff = diff_marks(&[&a, &b, &c], &[&b2, &c, &d]);
        assert_eq!(diff.entered, vec!["d"]);
        assert_eq!(diff.updated, vec!["b"]);
        assert_eq!(diff.unchanged, vec!["c"]);
        assert_eq!(diff.exited, vec!["a"]);
        assert!(!diff.is_noop());
    }

    #[test]
    fn first_render_enters_everything() {
        let a = Dot("a", 1);
        let diff = diff_marks::<Dot>(&[], &[&a]);
        assert_eq!(diff.entered, vec!["a"]);
        assert!(diff_marks(&[&a], &[&a]).is_noop());
    }

    #[test]
    fn formats_counts() {
        assert_eq!(format_count(0.0), "0");
        assert_eq!(format_count(999.4), "999");
        assert_eq!(format_count(1234.0), "1,234");
        assert_eq!(format_count(1_234_567.0), "1,234,567");
        assert_eq!(format_count(-1000.0), "-1,000");
        assert_eq!(format_value(None), "no data");
    }

    fn istria() -> DashboardData {
        DashboardData::new(Dataset {
            regions: vec![RegionRecord {
                key: "istarska".to_string(),
                label: "Istarska županija".to_string(),
                geometry: MultiPolygon::new(vec![Polygon::new(
                    LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]),
                    vec![],
                )]),
            }],
            monthly: vec![MonthlyMetricRow {
                region_key: "istarska".to_string(),
                year: 2023,
                month: 6,
                arrivals: Some(500.0),
                nights: Some(2000.0),
            }],
            origins: vec![OriginRow {
                region_key: "istarska".to_string(),
                region_label: "Istarska županija".to_string(),
                year: 2023,
                month: 6,
                origin_country: "Germany".to_string(),
                arrivals: Some(300.0),
                nights: None,
            }],
            intensity: vec![IntensityRow {
                spatial_level: SpatialLevel::Municipality,
                spatial_unit: "Poreč".to_string(),
                county_key: "istarska".to_string(),
                year: 2023,
                nights_per_100: Some(100.0),
                nights_per_km2: Some(50.0),
                permanent_beds: Some(400.0),
                nights: None,
                arrivals: None,
            }],
            ..Dataset::default()
        })
    }

    #[test]
    fn every_view_joins_on_the_canonical_key() {
        let data = istria();
        let state = SelectionState {
            year: Some(2023),
            month: 6,
            selected_region: Some("Istarska županija".to_string()),
            ..SelectionState::default()
        };
        let ctx = data.context(&state);
        assert_eq!(ctx.selected_key().as_deref(), Some("istarska"));

        let config = ViewConfig::default();
        let map = MapView::new(&data.dataset, &config).update(&ctx).scene;
        let line = LineView::new(&config).update(&ctx).scene;
        let bars = BarsView::new(&config).update(&ctx).scene;
        let scatter = ScatterView::new(&config).update(&ctx).scene;

        assert_eq!(map.selected.as_deref(), Some("istarska"));
        let region = line.region.unwrap();
        assert_eq!(region.key, "istarska");
        assert_eq!(region.label, "Istarska županija");
        assert_eq!(region.points.len(), 1);
        assert_eq!(bars.bars().len(), 1);
        assert_eq!(scatter.points().len(), 1);
    }

    #[test]
    fn no_selection_has_no_key() {
        let data = DashboardData::default();
        let state = SelectionState::default();
        assert_eq!(data.context(&state).selected_key(), None);
    }
}
