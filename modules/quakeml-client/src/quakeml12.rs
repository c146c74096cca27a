//! QuakeML 1.2 (`q:quakeml/eventParameters/event`).
//!
//! Magnitudes hang off the event; origins carry arrivals only.

use qsearch_common::time::deserialize_empty_default;
use qsearch_common::{CatalogError, Magnitude, RawArrival, RawEvent, RawOrigin, Result};
use serde::Deserialize;

use crate::wire::{XmlPick, XmlReal, XmlTime};

#[derive(Debug, Default, Deserialize)]
struct QuakeMl {
    #[serde(rename = "eventParameters", default)]
    event_parameters: EventParameters,
}

#[derive(Debug, Default, Deserialize)]
struct EventParameters {
    #[serde(rename = "event", default)]
    events: Vec<Event>,
}

#[derive(Debug, Default, Deserialize)]
struct Event {
    #[serde(rename = "@publicID", default)]
    public_id: String,
    #[serde(rename = "preferredOriginID", default)]
    preferred_origin_id: String,
    #[serde(rename = "preferredMagnitudeID", default)]
    preferred_magnitude_id: String,
    #[serde(rename = "origin", default)]
    origins: Vec<Origin>,
    #[serde(rename = "magnitude", default)]
    magnitudes: Vec<XmlMagnitude>,
    #[serde(rename = "pick", default)]
    picks: Vec<XmlPick>,
}

#[derive(Debug, Default, Deserialize)]
struct Origin {
    #[serde(rename = "@publicID", default)]
    public_id: String,
    #[serde(default)]
    time: XmlTime,
    #[serde(rename = "arrival", default)]
    arrivals: Vec<Arrival>,
}

#[derive(Debug, Default, Deserialize)]
struct Arrival {
    #[serde(rename = "pickID", default)]
    pick_id: String,
    #[serde(default)]
    phase: String,
    #[serde(default, deserialize_with = "deserialize_empty_default")]
    azimuth: f64,
    #[serde(default, deserialize_with = "deserialize_empty_default")]
    distance: f64,
    #[serde(rename = "timeResidual", default, deserialize_with = "deserialize_empty_default")]
    time_residual: f64,
    #[serde(rename = "timeWeight", default, deserialize_with = "deserialize_empty_default")]
    time_weight: f64,
}

#[derive(Debug, Default, Deserialize)]
struct XmlMagnitude {
    #[serde(rename = "@publicID", default)]
    public_id: String,
    #[serde(default)]
    mag: XmlReal,
    #[serde(rename = "type", default)]
    magnitude_type: String,
    #[serde(rename = "methodID", default)]
    method_id: String,
    #[serde(rename = "stationCount", default, deserialize_with = "deserialize_empty_default")]
    station_count: i64,
}

impl From<XmlMagnitude> for Magnitude {
    fn from(m: XmlMagnitude) -> Self {
        Magnitude {
            public_id: m.public_id,
            mag: m.mag.into(),
            magnitude_type: m.magnitude_type,
            method_id: m.method_id,
            station_count: m.station_count,
        }
    }
}

impl From<Arrival> for RawArrival {
    fn from(a: Arrival) -> Self {
        RawArrival {
            pick_id: a.pick_id,
            phase: a.phase,
            azimuth: a.azimuth,
            distance: a.distance,
            time_residual: a.time_residual,
            time_weight: a.time_weight,
        }
    }
}

impl From<Event> for RawEvent {
    fn from(e: Event) -> Self {
        RawEvent {
            public_id: e.public_id,
            preferred_origin_id: e.preferred_origin_id,
            preferred_magnitude_id: e.preferred_magnitude_id,
            origins: e
                .origins
                .into_iter()
                .map(|o| RawOrigin {
                    public_id: o.public_id,
                    time: o.time.into(),
                    arrivals: o.arrivals.into_iter().map(Into::into).collect(),
                    magnitudes: Vec::new(),
                })
                .collect(),
            magnitudes: e.magnitudes.into_iter().map(Into::into).collect(),
            picks: e.picks.into_iter().map(Into::into).collect(),
        }
    }
}

/// Decode a QuakeML 1.2 document. Only the first event is read; a document
/// with none decodes to an empty event, which the linker rejects.
pub fn decode(text: &str) -> Result<RawEvent> {
    let doc: QuakeMl =
        quick_xml::de::from_str(text).map_err(|e| CatalogError::Decode(e.to_string()))?;
    Ok(doc
        .event_parameters
        .events
        .into_iter()
        .next()
        .map(RawEvent::from)
        .unwrap_or_default())
}
