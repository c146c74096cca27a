//! GeoJSON feature collection returned by the WFS quake search.
//!
//! Property keys are lowercase and any of them can be `null`; null reads as
//! the zero value.

use qsearch_common::time::deserialize_null_default;
use qsearch_common::{Feature, Result};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FeatureCollection {
    #[serde(deserialize_with = "deserialize_null_default")]
    features: Vec<WfsFeature>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WfsFeature {
    #[serde(deserialize_with = "deserialize_null_default")]
    properties: Properties,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Properties {
    #[serde(rename = "publicid", deserialize_with = "deserialize_null_default")]
    public_id: String,
    #[serde(rename = "eventtype", deserialize_with = "deserialize_null_default")]
    event_type: String,
    #[serde(rename = "origintime", deserialize_with = "deserialize_null_default")]
    origin_time: String,
    #[serde(rename = "modificationtime", deserialize_with = "deserialize_null_default")]
    modification_time: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    latitude: f64,
    #[serde(deserialize_with = "deserialize_null_default")]
    longitude: f64,
    #[serde(deserialize_with = "deserialize_null_default")]
    depth: f64,
    #[serde(deserialize_with = "deserialize_null_default")]
    magnitude: f64,
    #[serde(rename = "evaluationmethod", deserialize_with = "deserialize_null_default")]
    evaluation_method: String,
    #[serde(rename = "evaluationstatus", deserialize_with = "deserialize_null_default")]
    evaluation_status: String,
    #[serde(rename = "evaluationmode", deserialize_with = "deserialize_null_default")]
    evaluation_mode: String,
    #[serde(rename = "earthmodel", deserialize_with = "deserialize_null_default")]
    earth_model: String,
    #[serde(rename = "depthtype", deserialize_with = "deserialize_null_default")]
    depth_type: String,
    #[serde(rename = "originerror", deserialize_with = "deserialize_null_default")]
    origin_error: f64,
    #[serde(rename = "usedphasecount", deserialize_with = "deserialize_null_default")]
    used_phase_count: i64,
    #[serde(rename = "usedstationcount", deserialize_with = "deserialize_null_default")]
    used_station_count: i64,
    #[serde(rename = "minimumdistance", deserialize_with = "deserialize_null_default")]
    minimum_distance: f64,
    #[serde(rename = "azimuthalgap", deserialize_with = "deserialize_null_default")]
    azimuthal_gap: f64,
    #[serde(rename = "magnitudetype", deserialize_with = "deserialize_null_default")]
    magnitude_type: String,
    #[serde(rename = "magnitudeuncertainty", deserialize_with = "deserialize_null_default")]
    magnitude_uncertainty: f64,
    #[serde(rename = "magnitudestationcount", deserialize_with = "deserialize_null_default")]
    magnitude_station_count: i64,
}

impl From<Properties> for Feature {
    fn from(p: Properties) -> Self {
        Feature {
            public_id: p.public_id,
            event_type: p.event_type,
            origin_time: p.origin_time,
            modification_time: p.modification_time,
            latitude: p.latitude,
            longitude: p.longitude,
            depth: p.depth,
            magnitude: p.magnitude,
            evaluation_method: p.evaluation_method,
            evaluation_status: p.evaluation_status,
            evaluation_mode: p.evaluation_mode,
            earth_model: p.earth_model,
            depth_type: p.depth_type,
            origin_error: p.origin_error,
            used_phase_count: p.used_phase_count,
            used_station_count: p.used_station_count,
            minimum_distance: p.minimum_distance,
            azimuthal_gap: p.azimuthal_gap,
            magnitude_type: p.magnitude_type,
            magnitude_uncertainty: p.magnitude_uncertainty,
            magnitude_station_count: p.magnitude_station_count,
        }
    }
}

/// Decode a feature collection body into features, in document order.
pub fn decode_features(body: &[u8]) -> Result<Vec<Feature>> {
    let collection: FeatureCollection = serde_json::from_slice(body)?;
    Ok(collection
        .features
        .into_iter()
        .map(|f| Feature::from(f.properties))
        .collect())
}
