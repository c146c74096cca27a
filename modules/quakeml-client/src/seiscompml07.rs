//! SeisComPML 0.7 (`seiscomp/EventParameters`).
//!
//! Picks, origins and the event are siblings under `EventParameters`.
//! Magnitudes are nested in the origin that produced them, with the value in
//! a `magnitude` element, and arrival weights are plain `weight`.

use qsearch_common::time::deserialize_empty_default;
use qsearch_common::{CatalogError, Magnitude, RawArrival, RawEvent, RawOrigin, Result};
use serde::Deserialize;

use crate::wire::{XmlPick, XmlReal, XmlTime};

#[derive(Debug, Default, Deserialize)]
struct SeisComp {
    #[serde(rename = "EventParameters", default)]
    event_parameters: EventParameters,
}

#[derive(Debug, Default, Deserialize)]
struct EventParameters {
    #[serde(rename = "event", default)]
    events: Vec<Event>,
    #[serde(rename = "origin", default)]
    origins: Vec<Origin>,
    #[serde(rename = "pick", default)]
    picks: Vec<XmlPick>,
}

#[derive(Debug, Default, Deserialize)]
struct Event {
    #[serde(rename = "@publicID", default)]
    public_id: String,
    #[serde(rename = "preferredOriginID", default)]
    preferred_origin_id: String,
    #[serde(rename = "preferredMagnitudeID", default)]
    preferred_magnitude_id: String,
}

#[derive(Debug, Default, Deserialize)]
struct Origin {
    #[serde(rename = "@publicID", default)]
    public_id: String,
    #[serde(default)]
    time: XmlTime,
    #[serde(rename = "arrival", default)]
    arrivals: Vec<Arrival>,
    #[serde(rename = "magnitude", default)]
    magnitudes: Vec<XmlMagnitude>,
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
    #[serde(default, deserialize_with = "deserialize_empty_default")]
    weight: f64,
}

#[derive(Debug, Default, Deserialize)]
struct XmlMagnitude {
    #[serde(rename = "@publicID", default)]
    public_id: String,
    #[serde(rename = "magnitude", default)]
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

impl From<Origin> for RawOrigin {
    fn from(o: Origin) -> Self {
        RawOrigin {
            public_id: o.public_id,
            time: o.time.into(),
            arrivals: o
                .arrivals
                .into_iter()
                .map(|a| RawArrival {
                    pick_id: a.pick_id,
                    phase: a.phase,
                    azimuth: a.azimuth,
                    distance: a.distance,
                    time_residual: a.time_residual,
                    time_weight: a.weight,
                })
                .collect(),
            magnitudes: o.magnitudes.into_iter().map(Into::into).collect(),
        }
    }
}

/// Decode a SeisComPML 0.7 document. The first `event` supplies the
/// identifiers; every origin and pick in the parameter set is kept.
pub fn decode(text: &str) -> Result<RawEvent> {
    let doc: SeisComp =
        quick_xml::de::from_str(text).map_err(|e| CatalogError::Decode(e.to_string()))?;
    let params = doc.event_parameters;
    let event = params.events.into_iter().next().unwrap_or_default();

    Ok(RawEvent {
        public_id: event.public_id,
        preferred_origin_id: event.preferred_origin_id,
        preferred_magnitude_id: event.preferred_magnitude_id,
        origins: params.origins.into_iter().map(Into::into).collect(),
        magnitudes: Vec::new(),
        picks: params.picks.into_iter().map(Into::into).collect(),
    })
}
