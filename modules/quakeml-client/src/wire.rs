//! XML elements shared by QuakeML 1.2 and SeisComPML 0.7.
//!
//! quick-xml matches on local names, so the namespace prefix a catalog uses
//! does not matter. Every field defaults so a sparse document still decodes;
//! the linker decides whether what arrived is usable.

use chrono::{DateTime, Utc};
use qsearch_common::time::{deserialize_empty_default, deserialize_opt_time};
use qsearch_common::{Pick, RealQuantity, TimeQuantity, WaveformId};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct XmlTime {
    #[serde(default, deserialize_with = "deserialize_opt_time")]
    pub value: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_empty_default")]
    pub uncertainty: f64,
}

impl From<XmlTime> for TimeQuantity {
    fn from(t: XmlTime) -> Self {
        TimeQuantity {
            value: t.value,
            uncertainty: t.uncertainty,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct XmlReal {
    #[serde(default, deserialize_with = "deserialize_empty_default")]
    pub value: f64,
    #[serde(default, deserialize_with = "deserialize_empty_default")]
    pub uncertainty: f64,
}

impl From<XmlReal> for RealQuantity {
    fn from(r: XmlReal) -> Self {
        RealQuantity {
            value: r.value,
            uncertainty: r.uncertainty,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct XmlWaveformId {
    #[serde(rename = "@networkCode", default)]
    pub network_code: String,
    #[serde(rename = "@stationCode", default)]
    pub station_code: String,
    #[serde(rename = "@locationCode", default)]
    pub location_code: String,
    #[serde(rename = "@channelCode", default)]
    pub channel_code: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct XmlPick {
    #[serde(rename = "@publicID", default)]
    pub public_id: String,
    #[serde(default)]
    pub time: XmlTime,
    #[serde(rename = "waveformID", default)]
    pub waveform_id: XmlWaveformId,
    #[serde(rename = "phaseHint", default)]
    pub phase_hint: String,
    #[serde(rename = "evaluationMode", default)]
    pub evaluation_mode: String,
    #[serde(rename = "evaluationStatus", default)]
    pub evaluation_status: String,
}

impl From<XmlPick> for Pick {
    fn from(p: XmlPick) -> Self {
        Pick {
            public_id: p.public_id,
            time: p.time.into(),
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
