use quakewave_core::{FeedError, RawEvent};
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    id: Option<String>,
    properties: Properties,
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct Properties {
    #[serde(default)]
    time: Option<i64>,
    #[serde(default)]
    mag: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: Vec<f64>,
}

/// Decodes a USGS GeoJSON `FeatureCollection` into raw events.
///
/// Features without an origin time or with fewer than two coordinates are
/// skipped. The storage order of the payload is preserved.
pub fn decode(payload: &str) -> Result<Vec<RawEvent>, FeedError> {
    let collection: FeatureCollection =
        serde_json::from_str(payload).map_err(|error| FeedError::Malformed(error.to_string()))?;

    let mut events = Vec::with_capacity(collection.features.len());
    for feature in collection.features {
        let id = feature.id.as_deref().unwrap_or("<unnamed>");
        let Some(timestamp_ms) = feature.properties.time else {
            warn!(id, "skipping feature without origin time");
            continue;
        };
        let coordinates = feature
            .geometry
            .as_ref()
            .map(|geometry| geometry.coordinates.as_slice())
            .unwrap_or_default();
        let [longitude, latitude, ..] = coordinates else {
            warn!(id, "skipping feature without coordinates");
            continue;
        };
        events.push(RawEvent::new(
            timestamp_ms,
            feature.properties.mag,
            *longitude as f32,
            *latitude as f32,
        ));
    }
    Ok(events)
}
