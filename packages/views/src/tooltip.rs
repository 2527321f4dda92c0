//! Hover tooltips built from the last rendered scene.

use serde::Serialize;

/// Floating tooltip content plus its anchor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    /// First line, usually the hovered element's name.
    pub title: String,
    /// Detail lines.
    pub lines: Vec<String>,
    /// Pointer position in surface coordinates.
    pub position: (f64, f64),
}

impl Tooltip {
    /// Tooltip anchored at the origin.
    #[must_use]
    pub fn new(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            title: title.into(),
            lines,
            position: (0.0, 0.0),
        }
    }

    /// Moves the anchor.
    #[must_use]
    pub const fn at(mut self, x: f64, y: f64) -> Self {
        self.position = (x, y);
        self
    }

    /// Plain-text rendering, one line per row.
    #[must_use]
    pub fn to_text(&self) -> String {
        std::iter::once(self.title.as_str())
            .chain(self.lines.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Scenes that can describe one of their marks.
pub trait Hover {
    /// Tooltip for the mark keyed `key`, `None` if there is no such mark.
    fn tooltip(&self, key: &str) -> Option<Tooltip>;
}
