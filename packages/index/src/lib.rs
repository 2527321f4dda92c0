#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Lookup structures derived from a loaded [`Dataset`].
//!
//! Built once after the data load and never patched; a reload builds a new
//! [`DerivedIndexes`] from scratch.

pub mod region_month;
pub mod settlement;

pub use region_month::{MetricTotals, RegionMonthIndex};
pub use settlement::SettlementRegionMap;

use tourism_map_source::Dataset;

/// All derived indexes for one dataset.
#[derive(Debug, Clone, Default)]
pub struct DerivedIndexes {
    /// Region totals per month.
    pub region_month: RegionMonthIndex,
    /// Settlement → region.
    pub settlements: SettlementRegionMap,
}

impl DerivedIndexes {
    /// Builds every index from `dataset`.
    #[must_use]
    pub fn build(dataset: &Dataset) -> Self {
        let region_month = RegionMonthIndex::build(&dataset.monthly);
        let settlements = SettlementRegionMap::build(&dataset.intensity);
        log::info!(
            "Built indexes: {} periods, {} settlements",
            region_month.len(),
            settlements.len()
        );
        Self {
            region_month,
            settlements,
        }
    }
}
