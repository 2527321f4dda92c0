//! Settlement → owning region mapping.

use std::collections::BTreeMap;

use tourism_map_dashboard_models::IntensityRow;
use tourism_map_normalize::normalize_region_key;

/// Many-to-one map from a normalized settlement name to its region key.
///
/// Built from municipality-level intensity rows only. When the same
/// settlement appears under two different regions the first mapping seen
/// is kept and the conflict is logged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettlementRegionMap {
    settlements: BTreeMap<String, String>,
    collisions: usize,
}

impl SettlementRegionMap {
    /// Builds the map from `rows` in order.
    #[must_use]
    pub fn build(rows: &[IntensityRow]) -> Self {
        let mut settlements: BTreeMap<String, String> = BTreeMap::new();
        let mut collisions = 0_usize;

        for row in rows.iter().filter(|r| r.is_municipality()) {
            let settlement = normalize_region_key(&row.spatial_unit);
            let region = normalize_region_key(&row.county_key);
            if settlement.is_empty() || region.is_empty() {
                continue;
            }

            match settlements.get(&settlement) {
                Some(existing) if *existing != region => {
                    log::warn!(
                        "[index] Settlement '{}' maps to both '{existing}' and '{region}'; keeping '{existing}'",
                        row.spatial_unit
                    );
                    collisions += 1;
                }
                Some(_) => {}
                None => {
                    settlements.insert(settlement, region);
                }
            }
        }

        log::debug!(
            "[index] Settlement map has {} entries ({collisions} collisions)",
            settlements.len()
        );

        Self {
            settlements,
            collisions,
        }
    }

    /// Region owning `settlement`. The name is normalized before lookup.
    #[must_use]
    pub fn region_of(&self, settlement: &str) -> Option<&str> {
        self.settlements
            .get(&normalize_region_key(settlement))
            .map(String::as_str)
    }

    /// Number of conflicting mappings that were ignored.
    #[must_use]
    pub const fn collisions(&self) -> usize {
        self.collisions
    }

    /// Number of mapped settlements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.settlements.len()
    }

    /// Whether no settlement is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.settlements.is_empty()
    }
}
