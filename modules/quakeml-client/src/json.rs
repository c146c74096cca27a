//! QuakeML-JSON: the QuakeML 1.2 event rendered as a single JSON object,
//! keyed with the XML element names. Any value may be `null`.

use chrono::{DateTime, Utc};
use qsearch_common::time::{deserialize_null_default, deserialize_opt_time};
use qsearch_common::{
    Magnitude, Pick, RawArrival, RawEvent, RawOrigin, RealQuantity, Result, TimeQuantity,
    WaveformId,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Event {
    #[serde(rename = "publicID", deserialize_with = "deserialize_null_default")]
    public_id: String,
    #[serde(rename = "preferredOriginID", deserialize_with = "deserialize_null_default")]
    preferred_origin_id: String,
    #[serde(rename = "preferredMagnitudeID", deserialize_with = "deserialize_null_default")]
    preferred_magnitude_id: String,
    #[serde(rename = "origin", deserialize_with = "deserialize_null_default")]
    origins: Vec<Origin>,
    #[serde(rename = "magnitude", deserialize_with = "deserialize_null_default")]
    magnitudes: Vec<JsonMagnitude>,
    #[serde(rename = "pick", deserialize_with = "deserialize_null_default")]
    picks: Vec<JsonPick>,
}

#[derive(Debug, Default, Deserialize)]
struct Time {
    #[serde(default, deserialize_with = "deserialize_opt_time")]
    value: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    uncertainty: f64,
}

#[derive(Debug, Default, Deserialize)]
struct Real {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    value: f64,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    uncertainty: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Origin {
    #[serde(rename = "publicID", deserialize_with = "deserialize_null_default")]
    public_id: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    time: Time,
    #[serde(rename = "arrival", deserialize_with = "deserialize_null_default")]
    arrivals: Vec<Arrival>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Arrival {
    #[serde(rename = "pickID", deserialize_with = "deserialize_null_default")]
    pick_id: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    phase: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    azimuth: f64,
    #[serde(deserialize_with = "deserialize_null_default")]
    distance: f64,
    #[serde(deserialize_with = "deserialize_null_default")]
    time_residual: f64,
    #[serde(deserialize_with = "deserialize_null_default")]
    time_weight: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct JsonMagnitude {
    #[serde(rename = "publicID", deserialize_with = "deserialize_null_default")]
    public_id: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    mag: Real,
    #[serde(rename = "type", deserialize_with = "deserialize_null_default")]
    magnitude_type: String,
    #[serde(rename = "methodID", deserialize_with = "deserialize_null_default")]
    method_id: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    station_count: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct JsonWaveformId {
    #[serde(deserialize_with = "deserialize_null_default")]
    network_code: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    station_code: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    location_code: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    channel_code: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct JsonPick {
    #[serde(rename = "publicID", deserialize_with = "deserialize_null_default")]
    public_id: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    time: Time,
    #[serde(rename = "waveformID", deserialize_with = "deserialize_null_default")]
    waveform_id: JsonWaveformId,
    #[serde(deserialize_with = "deserialize_null_default")]
    phase_hint: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    evaluation_mode: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    evaluation_status: String,
}

fn time(t: Time) -> TimeQuantity {
    TimeQuantity {
        value: t.value,
        uncertainty: t.uncertainty,
    }
}

impl From<JsonMagnitude> for Magnitude {
    fn from(m: JsonMagnitude) -> Self {
        Magnitude {
            public_id: m.public_id,
            mag: RealQuantity {
                value: m.mag.value,
                uncertainty: m.mag.uncertainty,
            },
            magnitude_type: m.magnitude_type,
            method_id: m.method_id,
            station_count: m.station_count,
        }
    }
}

impl From<JsonPick> for Pick {
    fn from(p: JsonPick) -> Self {
        Pick {
            public_id: p.public_id,
            time: time(p.time),
            waveform_id: WaveformId {
                network_code: p.waveform_id.network_code,
                station_code: p.waveform_id.station_code,
                location_code: p.waveform_id.location_code,
                channel_code: p.waveform_id.channel_code,
            },
            phase_hint: p.phase_hint,
            evaluation_mode: p.evaluation_mode,
            evaluation_status: p.evaluation_status,
        }
    }
}

impl From<Origin> for RawOrigin {
    fn from(o: Origin) -> Self {
        RawOrigin {
            public_id: o.public_id,
            time: time(o.time),
            arrivals: o
                .arrivals
                .into_iter()
                .map(|a| RawArrival {
                    pick_id: a.pick_id,
                    phase: a.phase,
                    azimuth: a.azimuth,
                    distance: a.distance,
                    time_residual: a.time_residual,
                    time_weight: a.time_weight,
                })
                .collect(),
            magnitudes: Vec::new(),
        }
    }
}

pub fn decode(body: &[u8]) -> Result<RawEvent> {
    let event: Event = serde_json::from_slice(body)?;
    Ok(RawEvent {
        public_id: event.public_id,
        preferred_origin_id: event.preferred_origin_id,
        preferred_magnitude_id: event.preferred_magnitude_id,
        origins: event.origins.into_iter().map(Into::into).collect(),
        magnitudes: event.magnitudes.into_iter().map(Into::into).collect(),
        picks: event.picks.into_iter().map(Into::into).collect(),
    })
}
