//! Glue between the selection store and a view.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};
use tourism_map_dashboard_models::SelectionState;
use tourism_map_state::StateObserver;

use crate::tooltip::{Hover, Tooltip};
use crate::{
    BarsScene, ChartView, DashboardData, LineScene, MapScene, MarkDiff, ScatterScene,
};

/// The dashboard's four panels.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Panel {
    /// Choropleth.
    Map,
    /// Monthly series.
    Line,
    /// Origin countries.
    Bars,
    /// Intensity scatter.
    Scatter,
}

impl Panel {
    /// All panels in render order.
    pub const ALL: [Self; 4] = [Self::Map, Self::Line, Self::Bars, Self::Scatter];
}

/// Any panel's scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "panel", content = "scene", rename_all = "snake_case")]
pub enum PanelScene {
    /// Map scene.
    Map(MapScene),
    /// Line scene.
    Line(LineScene),
    /// Bars scene.
    Bars(BarsScene),
    /// Scatter scene.
    Scatter(ScatterScene),
}

impl PanelScene {
    /// Panel this scene belongs to.
    #[must_use]
    pub const fn panel(&self) -> Panel {
        match self {
            Self::Map(_) => Panel::Map,
            Self::Line(_) => Panel::Line,
            Self::Bars(_) => Panel::Bars,
            Self::Scatter(_) => Panel::Scatter,
        }
    }
}

impl Hover for PanelScene {
    fn tooltip(&self, key: &str) -> Option<Tooltip> {
        match self {
            Self::Map(scene) => scene.tooltip(key),
            Self::Line(scene) => scene.tooltip(key),
            Self::Bars(scene) => scene.tooltip(key),
            Self::Scatter(scene) => scene.tooltip(key),
        }
    }
}

impl From<MapScene> for PanelScene {
    fn from(scene: MapScene) -> Self {
        Self::Map(scene)
    }
}

impl From<LineScene> for PanelScene {
    fn from(scene: LineScene) -> Self {
        Self::Line(scene)
    }
}

impl From<BarsScene> for PanelScene {
    fn from(scene: BarsScene) -> Self {
        Self::Bars(scene)
    }
}

impl From<ScatterScene> for PanelScene {
    fn from(scene: ScatterScene) -> Self {
        Self::Scatter(scene)
    }
}

/// What a sink receives after each update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelFrame {
    /// Number of the update this frame answers, starting at 1.
    pub sequence: u64,
    /// The new scene.
    #[serde(flatten)]
    pub scene: PanelScene,
    /// Changes relative to the previous frame.
    pub diff: MarkDiff,
}

impl PanelFrame {
    /// Panel this frame belongs to.
    #[must_use]
    pub const fn panel(&self) -> Panel {
        self.scene.panel()
    }
}

/// Drawing surface for frames.
pub trait RenderSink {
    /// Draws `frame`.
    fn render(&self, frame: PanelFrame);
}

/// A sink that keeps the latest frame of every panel.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    frames: RefCell<Vec<PanelFrame>>,
    rendered: std::cell::Cell<u64>,
}

impl FrameRecorder {
    /// Latest frame of `panel`.
    #[must_use]
    pub fn latest(&self, panel: Panel) -> Option<PanelFrame> {
        self.frames
            .borrow()
            .iter()
            .find(|f| f.panel() == panel)
            .cloned()
    }

    /// Latest frame of every panel that has rendered, in panel order.
    #[must_use]
    pub fn frames(&self) -> Vec<PanelFrame> {
        let mut frames = self.frames.borrow().clone();
        frames.sort_by_key(PanelFrame::panel);
        frames
    }

    /// Total number of frames received.
    #[must_use]
    pub fn rendered(&self) -> u64 {
        self.rendered.get()
    }
}

impl RenderSink for FrameRecorder {
    fn render(&self, frame: PanelFrame) {
        self.rendered.set(self.rendered.get() + 1);
        let mut frames = self.frames.borrow_mut();
        if let Some(existing) = frames.iter_mut().find(|f| f.panel() == frame.panel()) {
            *existing = frame;
        } else {
            frames.push(frame);
        }
    }
}

/// Re-renders one view on every state change.
pub struct ViewBinding<V> {
    view: RefCell<V>,
    data: Rc<DashboardData>,
    sink: Rc<dyn RenderSink>,
    sequence: std::cell::Cell<u64>,
}

impl<V> std::fmt::Debug for ViewBinding<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewBinding")
            .field("sequence", &self.sequence.get())
            .finish_non_exhaustive()
    }
}

impl<V> ViewBinding<V>
where
    V: ChartView,
    V::Scene: Into<PanelScene>,
{
    /// Binds `view` to `data`, sending frames to `sink`.
    pub fn new(view: V, data: Rc<DashboardData>, sink: Rc<dyn RenderSink>) -> Rc<Self> {
        Rc::new(Self {
            view: RefCell::new(view),
            data,
            sink,
            sequence: std::cell::Cell::new(0),
        })
    }

    /// Runs one update for `state` and forwards the frame.
    pub fn render(&self, state: &SelectionState) {
        let update = {
            let mut view = self.view.borrow_mut();
            view.update(&self.data.context(state))
        };
        let sequence = self.sequence.get() + 1;
        self.sequence.set(sequence);
        self.sink.render(PanelFrame {
            sequence,
            scene: update.scene.into(),
            diff: update.diff,
        });
    }

    /// Tooltip for `key` in the last rendered scene.
    #[must_use]
    pub fn tooltip(&self, key: &str) -> Option<Tooltip>
    where
        V::Scene: Hover,
    {
        self.view.borrow().last_scene()?.tooltip(key)
    }

    /// Number of updates run so far.
    #[must_use]
    pub fn updates(&self) -> u64 {
        self.sequence.get()
    }
}

impl<V> StateObserver for ViewBinding<V>
where
    V: ChartView,
    V::Scene: Into<PanelScene>,
{
    fn on_state_changed(&self, state: &SelectionState) {
        self.render(state);
    }
}
