//! Handoff to the playback layer: GeoJSON point features and the live
//! gap readout.

use geojson::{Feature, FeatureCollection, GeoJson, Value};
use serde_json::{to_value, Map};

use crate::error::Result;
use crate::model::{AlignmentResult, DerivedSample, RiderLabel, Track};

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

fn sample_feature(label: &RiderLabel, sample: &DerivedSample) -> Result<Feature> {
    let mut props = Map::new();
    props.insert(
        "time".to_string(),
        to_value(sample.sample.timestamp.format(TIME_FORMAT).to_string())?,
    );
    props.insert("rider".to_string(), to_value(&label.name)?);
    props.insert("speed_kmh".to_string(), to_value(sample.speed_kmh)?);
    props.insert("cumulative_km".to_string(), to_value(sample.cumulative_km)?);
    props.insert(
        "popup".to_string(),
        to_value(format!(
            "{}<br>Speed: {} km/h<br>Distance: {} km",
            label.name, sample.speed_kmh, sample.cumulative_km
        ))?,
    );
    if let Some(color) = label.color.as_ref() {
        props.insert("color".to_string(), to_value(color)?);
    }

    Ok(Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(Value::from(&sample.sample.point))),
        id: None,
        properties: Some(props),
        foreign_members: None,
    })
}

/// one point feature per sample, in track order
pub fn track_features(track: &Track) -> Result<Vec<Feature>> {
    track
        .points()
        .iter()
        .map(|sample| sample_feature(track.label(), sample))
        .collect()
}

/// the features of all tracks, concatenated in the given order
pub fn feature_collection(tracks: &[&Track]) -> Result<GeoJson> {
    let mut features = Vec::with_capacity(tracks.iter().map(|t| t.len()).sum());
    for track in tracks {
        features.extend(track_features(track)?);
    }
    Ok(GeoJson::FeatureCollection(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }))
}

/// Text of the live readout, e.g. `gap: +12 sec | A: 31.2 km/h, 4.10 km | B: ...`
pub fn gap_readout(result: &AlignmentResult, a: &RiderLabel, b: &RiderLabel) -> String {
    let gap = result.time_gap_seconds.round() as i64;
    let sign = if gap > 0 { "+" } else { "" };
    format!(
        "gap: {}{} sec | {}: {:.1} km/h, {:.2} km | {}: {:.1} km/h, {:.2} km",
        sign,
        gap,
        a.name,
        result.a.speed_kmh,
        result.a.cumulative_km,
        b.name,
        result.b.speed_kmh,
        result.b.cumulative_km
    )
}
