//! County boundary file simplification.
//!
//! Keeps the geometry and reduces the properties to `county_key`,
//! `county_label` (diacritics stripped) and `NUTS` when present.

use geojson::{Feature, FeatureCollection, GeoJson, JsonObject, JsonValue};
use tourism_map_normalize::{normalize_region_key, strip_diacritics};

use crate::IngestError;

/// Property holding the Croatian county name.
const NAME_PROPERTY: &str = "ZUP_NAZIV";
/// Fallback name property.
const FALLBACK_NAME_PROPERTY: &str = "name";
/// NUTS code property.
const NUTS_PROPERTY: &str = "NUTS";

fn string_property<'a>(feature: &'a Feature, name: &str) -> Option<&'a str> {
    feature
        .property(name)
        .and_then(JsonValue::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn simplify_feature(feature: Feature) -> Feature {
    let label = string_property(&feature, NAME_PROPERTY)
        .or_else(|| string_property(&feature, FALLBACK_NAME_PROPERTY))
        .unwrap_or_default()
        .to_string();
    if label.is_empty() {
        log::warn!("[boundaries] Feature without {NAME_PROPERTY} or {FALLBACK_NAME_PROPERTY}");
    }

    let mut properties = JsonObject::new();
    properties.insert(
        "county_key".to_string(),
        JsonValue::from(normalize_region_key(&label)),
    );
    properties.insert(
        "county_label".to_string(),
        JsonValue::from(strip_diacritics(&label)),
    );
    if let Some(nuts) = feature.property(NUTS_PROPERTY) {
        properties.insert(NUTS_PROPERTY.to_string(), nuts.clone());
    }

    Feature {
        bbox: None,
        geometry: feature.geometry,
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Parses the raw boundary file and simplifies every feature.
///
/// # Errors
///
/// Returns [`IngestError::GeoJson`] if the file is not a `GeoJSON` feature
/// collection.
pub fn simplify(bytes: &[u8]) -> Result<FeatureCollection, IngestError> {
    let text = String::from_utf8_lossy(bytes);
    let geojson: GeoJson = text.parse().map_err(|e| IngestError::GeoJson(Box::new(e)))?;
    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(IngestError::NotFeatureCollection);
    };

    let features: Vec<Feature> = collection
        .features
        .into_iter()
        .map(simplify_feature)
        .collect();
    log::info!("[boundaries] {} features", features.len());

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"ZUP_NAZIV": "Ličko-senjska županija", "NUTS": "HR032", "OBJECTID": 9},
                "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}
            },
            {
                "type": "Feature",
                "properties": {"name": "Grad Zagreb"},
                "geometry": null
            }
        ]
    }"#;

    #[test]
    fn keeps_key_label_and_nuts_only() {
        let collection = simplify(RAW.as_bytes()).unwrap();
        assert_eq!(collection.features.len(), 2);

        let lika = &collection.features[0];
        assert_eq!(
            lika.property("county_key").and_then(JsonValue::as_str),
            Some("licko senjska")
        );
        assert_eq!(
            lika.property("county_label").and_then(JsonValue::as_str),
            Some("Licko-senjska zupanija")
        );
        assert_eq!(
            lika.property("NUTS").and_then(JsonValue::as_str),
            Some("HR032")
        );
        assert!(lika.property("OBJECTID").is_none());
        assert!(lika.geometry.is_some());
    }

    #[test]
    fn falls_back_to_name_property() {
        let collection = simplify(RAW.as_bytes()).unwrap();
        let zagreb = &collection.features[1];
        assert_eq!(
            zagreb.property("county_key").and_then(JsonValue::as_str),
            Some("grad zagreb")
        );
        assert!(zagreb.property("NUTS").is_none());
    }

    #[test]
    fn rejects_non_collections() {
        let point = r#"{"type": "Point", "coordinates": [15.9, 45.8]}"#;
        assert!(matches!(
            simplify(point.as_bytes()).unwrap_err(),
            IngestError::NotFeatureCollection
        ));
        assert!(matches!(
            simplify(b"not json").unwrap_err(),
            IngestError::GeoJson(_)
        ));
    }
}
