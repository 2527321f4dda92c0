//! Translation of clicks into selection patches.
//!
//! These are free functions rather than view methods so the caller can
//! merge the patch after every view borrow has ended.

use tourism_map_dashboard_models::calendar::is_valid_month;
use tourism_map_dashboard_models::{SelectionPatch, SelectionState};
use tourism_map_normalize::normalize_region_key;

/// Map click: selects `key`, or deselects it if it is already selected.
#[must_use]
pub fn toggle_region(state: &SelectionState, key: &str) -> SelectionPatch {
    let key = normalize_region_key(key);
    if state.region() == Some(key.as_str()) {
        SelectionPatch::new().clear_region()
    } else {
        SelectionPatch::new().region(key)
    }
}

/// Line chart click on a month. `None` for an invalid month.
#[must_use]
pub fn select_month(month: u8) -> Option<SelectionPatch> {
    is_valid_month(month).then(|| SelectionPatch::new().month(month))
}
