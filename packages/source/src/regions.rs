//! County boundary loading from a `GeoJSON` feature collection.

use std::collections::BTreeMap;

use geo::MultiPolygon;
use geojson::{Feature, GeoJson, JsonObject};
use tourism_map_normalize::normalize_region_key;

use crate::SourceError;
use crate::files::SourceKind;

const KEY_PROPERTIES: &[&str] = &["county_key", "region_key", "key"];
const LABEL_PROPERTIES: &[&str] = &["county_label", "label", "ZUP_NAZIV", "name", "NAME"];

/// One drawable region.
#[derive(Debug, Clone)]
pub struct RegionRecord {
    /// Canonical key.
    pub key: String,
    /// Display label from the boundary file.
    pub label: String,
    /// Boundary in lon/lat.
    pub geometry: MultiPolygon<f64>,
}

/// Case-insensitive string property lookup, first name that is set wins.
fn string_property<'a>(properties: &'a JsonObject, names: &[&str]) -> Option<&'a str> {
    names.iter().find_map(|name| {
        properties
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .and_then(|(_, v)| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    })
}

fn feature_geometry(feature: &Feature) -> Option<MultiPolygon<f64>> {
    let geometry = feature.geometry.clone()?;
    match geo::Geometry::<f64>::try_from(geometry).ok()? {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}

/// Parses the boundary file.
///
/// Each feature's key is its `county_key` property if present, otherwise
/// its name normalized. Features sharing a key are merged into one
/// multipolygon under the first feature's label. Features without a
/// polygonal geometry or without any name are skipped with a warning.
///
/// # Errors
///
/// Returns [`SourceError::GeoJson`] if the text is not valid `GeoJSON` and
/// [`SourceError::NotFeatureCollection`] if it is not a feature collection.
pub fn parse_regions(text: &str) -> Result<Vec<RegionRecord>, SourceError> {
    let geojson: GeoJson = text.parse().map_err(|source| SourceError::GeoJson {
        kind: SourceKind::Regions,
        source: Box::new(source),
    })?;

    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(SourceError::NotFeatureCollection);
    };

    let mut order: Vec<String> = Vec::new();
    let mut by_key: BTreeMap<String, RegionRecord> = BTreeMap::new();
    let mut skipped = 0_usize;

    for (i, feature) in collection.features.iter().enumerate() {
        let empty = JsonObject::new();
        let properties = feature.properties.as_ref().unwrap_or(&empty);

        let label = string_property(properties, LABEL_PROPERTIES);
        let key = string_property(properties, KEY_PROPERTIES)
            .or(label)
            .map(normalize_region_key)
            .filter(|k| !k.is_empty());

        let Some(key) = key else {
            log::warn!("[regions] Feature {i} has no name; skipping");
            skipped += 1;
            continue;
        };
        let Some(geometry) = feature_geometry(feature) else {
            log::warn!("[regions] Feature '{key}' has no polygon geometry; skipping");
            skipped += 1;
            continue;
        };

        if let Some(existing) = by_key.get_mut(&key) {
            log::debug!("[regions] Merging duplicate feature for '{key}'");
            existing.geometry.0.extend(geometry.0);
            continue;
        }

        order.push(key.clone());
        by_key.insert(
            key.clone(),
            RegionRecord {
                label: label.map_or_else(|| key.clone(), str::to_string),
                key,
                geometry,
            },
        );
    }

    if skipped > 0 {
        log::warn!("[regions] Skipped {skipped} features");
    }
    log::info!("[regions] Loaded {} regions", order.len());

    Ok(order
        .into_iter()
        .filter_map(|key| by_key.remove(&key))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64) -> String {
        format!(
            "{{\"type\":\"Polygon\",\"coordinates\":[[[{x},0],[{x1},0],[{x1},1],[{x},1],[{x},0]]]}}",
            x1 = x + 1.0
        )
    }

    fn collection(features: &[String]) -> String {
        format!(
            "{{\"type\":\"FeatureCollection\",\"features\":[{}]}}",
            features.join(",")
        )
    }

    fn feature(properties: &str, geometry: &str) -> String {
        format!("{{\"type\":\"Feature\",\"properties\":{properties},\"geometry\":{geometry}}}")
    }

    #[test]
    fn keys_come_from_names_when_no_key_property() {
        let text = collection(&[
            feature("{\"ZUP_NAZIV\":\"Istarska županija\"}", &square(0.0)),
            feature("{\"name\":\"Grad Zagreb\"}", &square(2.0)),
        ]);
        let regions = parse_regions(&text).unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].key, "istarska");
        assert_eq!(regions[0].label, "Istarska županija");
        assert_eq!(regions[1].key, "grad zagreb");
    }

    #[test]
    fn explicit_key_property_wins() {
        let text = collection(&[feature(
            "{\"COUNTY_KEY\":\"zadarska\",\"county_label\":\"Zadarska\"}",
            &square(0.0),
        )]);
        let regions = parse_regions(&text).unwrap();
        assert_eq!(regions[0].key, "zadarska");
        assert_eq!(regions[0].label, "Zadarska");
    }

    #[test]
    fn duplicate_keys_merge_polygons() {
        let text = collection(&[
            feature("{\"name\":\"Istarska\"}", &square(0.0)),
            feature("{\"name\":\"Istarska županija\"}", &square(5.0)),
        ]);
        let regions = parse_regions(&text).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].geometry.0.len(), 2);
        assert_eq!(regions[0].label, "Istarska");
    }

    #[test]
    fn features_without_geometry_are_skipped() {
        let text = collection(&[
            feature("{\"name\":\"Istarska\"}", "null"),
            feature("{\"name\":\"Zadarska\"}", &square(0.0)),
            feature("{}", &square(1.0)),
        ]);
        let regions = parse_regions(&text).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].key, "zadarska");
    }

    #[test]
    fn rejects_non_collections() {
        let err = parse_regions(&square(0.0)).unwrap_err();
        assert!(matches!(err, SourceError::NotFeatureCollection));
        assert!(matches!(
            parse_regions("not json").unwrap_err(),
            SourceError::GeoJson { .. }
        ));
    }
}
