//! Field-name → string views of parsed entities, for user-selectable tabular
//! output. Each view has a fixed vocabulary that callers validate selections
//! against before fetching anything.

use std::collections::HashMap;

use crate::error::{CatalogError, Result};
use crate::time::format_time;
use crate::types::{Arrival, EventDocument, Feature, Origin, Pick};

pub type FieldMap = HashMap<&'static str, String>;

/// A selectable output field and a short description for help text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub description: &'static str,
}

const fn field(name: &'static str, description: &'static str) -> Field {
    Field { name, description }
}

pub const EVENT_FIELDS: &[Field] = &[
    field("EventID", "e.g., 2014p072856"),
    field("EventType", "e.g., earthquake"),
    field("OriginTime", "e.g., 2014-07-23T06:04:43.625Z"),
    field("ModificationTime", "e.g., 2014-07-23T06:07:12.232Z"),
    field("Latitude", "e.g., -39.648535"),
    field("Longitude", "e.g., 173.47803"),
    field("Depth", "km"),
    field("Magnitude", "preferred magnitude value"),
    field("EvaluationMethod", "e.g., NonLinLoc"),
    field("EvaluationStatus", "e.g., confirmed"),
    field("EvaluationMode", "e.g., automatic"),
    field("EarthModel", "e.g., nz3drx"),
    field("DepthType", "e.g., operator assigned"),
    field("OriginError", "km"),
    field("UsedPhaseCount", "phases used in the location"),
    field("UsedStationCount", "stations used in the location"),
    field("MinimumDistance", "degrees"),
    field("AzimuthalGap", "degrees"),
    field("MagnitudeType", "e.g., M"),
    field("MagnitudeUncertainty", "preferred magnitude uncertainty"),
    field("MagnitudeStationCount", "stations contributing to the magnitude"),
];

pub const PICK_FIELDS: &[Field] = &[
    field("EventID", "e.g., 2014p072856"),
    field("NetworkCode", "e.g., NZ"),
    field("StationCode", "e.g., SNZO"),
    field("ChannelCode", "e.g., HHZ"),
    field("LocationCode", "e.g., 10"),
    field("PhaseHint", "e.g., P"),
    field("PhaseTime", "e.g., 2012-01-27T04:06:29.798393Z"),
];

pub const ARRIVAL_FIELDS: &[Field] = &[
    field("EventID", "e.g., 2014p072856"),
    field("NetworkCode", "e.g., NZ"),
    field("StationCode", "e.g., SNZO"),
    field("ChannelCode", "e.g., HHZ"),
    field("LocationCode", "e.g., 10"),
    field("Phase", "e.g., P"),
    field("PhaseTime", "e.g., 2012-01-27T04:06:29.798393Z"),
    field("PhaseOriginOffset", "PhaseTime - OriginTime (s)"),
    field("TimeResidual", "s"),
    field("TimeWeight", "weight of the arrival in the location"),
];

/// Split a comma separated selection and check every name is in `vocabulary`.
pub fn parse_selection(selection: &str, vocabulary: &[Field]) -> Result<Vec<&'static str>> {
    selection
        .split(',')
        .map(|name| {
            vocabulary
                .iter()
                .find(|f| f.name == name)
                .map(|f| f.name)
                .ok_or_else(|| CatalogError::Validation(format!("Invalid format key: {name}")))
        })
        .collect()
}

/// Sorted, comma separated field names for help text.
pub fn describe(vocabulary: &[Field]) -> String {
    let mut names: Vec<&str> = vocabulary.iter().map(|f| f.name).collect();
    names.sort_unstable();
    names.join(",")
}

pub fn event_fields(feature: &Feature) -> FieldMap {
    let p = feature;
    HashMap::from([
        ("EventID", p.public_id.clone()),
        ("EventType", p.event_type.clone()),
        ("OriginTime", p.origin_time.clone()),
        ("ModificationTime", p.modification_time.clone()),
        ("Latitude", p.latitude.to_string()),
        ("Longitude", p.longitude.to_string()),
        ("Depth", format!("{:.6}", p.depth)),
        ("Magnitude", p.magnitude.to_string()),
        ("EvaluationMethod", p.evaluation_method.clone()),
        ("EvaluationStatus", p.evaluation_status.clone()),
        ("EvaluationMode", p.evaluation_mode.clone()),
        ("EarthModel", p.earth_model.clone()),
        ("DepthType", p.depth_type.clone()),
        ("OriginError", p.origin_error.to_string()),
        ("UsedPhaseCount", p.used_phase_count.to_string()),
        ("UsedStationCount", p.used_station_count.to_string()),
        ("MinimumDistance", p.minimum_distance.to_string()),
        ("AzimuthalGap", p.azimuthal_gap.to_string()),
        ("MagnitudeType", p.magnitude_type.clone()),
        ("MagnitudeUncertainty", p.magnitude_uncertainty.to_string()),
        ("MagnitudeStationCount", p.magnitude_station_count.to_string()),
    ])
}

pub fn pick_fields(event_id: &str, pick: &Pick) -> FieldMap {
    HashMap::from([
        ("EventID", event_id.to_string()),
        ("NetworkCode", pick.waveform_id.network_code.clone()),
        ("StationCode", pick.waveform_id.station_code.clone()),
        ("ChannelCode", pick.waveform_id.channel_code.clone()),
        ("LocationCode", pick.waveform_id.location_code.clone()),
        ("PhaseHint", pick.phase_hint.clone()),
        ("PhaseTime", pick.time.value.as_ref().map(format_time).unwrap_or_default()),
    ])
}

/// An arrival whose pick did not resolve keeps its own fields and leaves the
/// pick-derived ones empty.
pub fn arrival_fields(event_id: &str, origin: &Origin, arrival: &Arrival) -> FieldMap {
    let pick = arrival.pick.as_deref();
    let waveform = pick.map(|p| p.waveform_id.clone()).unwrap_or_default();
    let pick_time = pick.and_then(|p| p.time.value);

    let offset = match (pick_time, origin.time.value) {
        (Some(picked), Some(origin_time)) => {
            let delta = picked - origin_time;
            let seconds = delta.num_microseconds().map_or_else(
                || delta.num_milliseconds() as f64 / 1e3,
                |us| us as f64 / 1e6,
            );
            format!("{seconds:.6}")
        }
        _ => String::new(),
    };

    HashMap::from([
        ("EventID", event_id.to_string()),
        ("NetworkCode", waveform.network_code),
        ("StationCode", waveform.station_code),
        ("ChannelCode", waveform.channel_code),
        ("LocationCode", waveform.location_code),
        ("Phase", arrival.phase.clone()),
        ("PhaseTime", pick_time.as_ref().map(format_time).unwrap_or_default()),
        ("PhaseOriginOffset", offset),
        ("TimeResidual", format!("{:.6}", arrival.time_residual)),
        ("TimeWeight", format!("{:.6}", arrival.time_weight)),
    ])
}

/// Every pick in the document, ordered by pick id.
pub fn pick_rows(event_id: &str, event: &EventDocument) -> Vec<FieldMap> {
    let mut picks: Vec<&Pick> = event.picks.values().map(|p| p.as_ref()).collect();
    picks.sort_by(|a, b| a.public_id.cmp(&b.public_id));
    picks.into_iter().map(|p| pick_fields(event_id, p)).collect()
}

/// Arrivals of the preferred origin, in document order. Empty when the
/// preferred origin did not resolve.
pub fn arrival_rows(event_id: &str, event: &EventDocument) -> Vec<FieldMap> {
    match &event.preferred_origin {
        Some(origin) => origin
            .arrivals
            .iter()
            .map(|a| arrival_fields(event_id, origin, a))
            .collect(),
        None => Vec::new(),
    }
}

/// Project a field map onto a selection, in selection order.
pub fn select(map: &FieldMap, selection: &[&str]) -> Vec<String> {
    selection
        .iter()
        .map(|name| map.get(name).cloned().unwrap_or_default())
        .collect()
}
