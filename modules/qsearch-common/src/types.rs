use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

// --- Shared value types ---

/// A time value with its uncertainty in seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeQuantity {
    pub value: Option<DateTime<Utc>>,
    pub uncertainty: f64,
}

/// A scalar value with its uncertainty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RealQuantity {
    pub value: f64,
    pub uncertainty: f64,
}

/// The station/channel a waveform (and so a pick) came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct WaveformId {
    pub network_code: String,
    pub station_code: String,
    pub location_code: String,
    pub channel_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Pick {
    pub public_id: String,
    pub time: TimeQuantity,
    pub waveform_id: WaveformId,
    pub phase_hint: String,
    pub evaluation_mode: String,
    pub evaluation_status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Magnitude {
    pub public_id: String,
    pub mag: RealQuantity,
    pub magnitude_type: String,
    pub method_id: String,
    pub station_count: i64,
}

// --- Flat (decoded, un-linked) documents ---
//
// Every dialect decoder produces these. Nothing here is cross-referenced yet:
// arrivals carry a pick id and the event carries preferred ids as strings.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawArrival {
    pub pick_id: String,
    pub phase: String,
    pub azimuth: f64,
    pub distance: f64,
    pub time_residual: f64,
    pub time_weight: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawOrigin {
    pub public_id: String,
    pub time: TimeQuantity,
    pub arrivals: Vec<RawArrival>,
    /// Magnitudes nested under the origin (SeisComPML).
    pub magnitudes: Vec<Magnitude>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEvent {
    pub public_id: String,
    pub preferred_origin_id: String,
    pub preferred_magnitude_id: String,
    pub origins: Vec<RawOrigin>,
    /// Magnitudes declared at event level (QuakeML).
    pub magnitudes: Vec<Magnitude>,
    pub picks: Vec<Pick>,
}

// --- Linked event graph ---

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arrival {
    pub pick_id: String,
    pub phase: String,
    pub azimuth: f64,
    pub distance: f64,
    pub time_residual: f64,
    pub time_weight: f64,
    /// The pick this arrival refers to. `None` until linked, and left `None`
    /// when the pick id is not present in the document.
    pub pick: Option<Arc<Pick>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Origin {
    pub public_id: String,
    pub time: TimeQuantity,
    pub arrivals: Vec<Arrival>,
    pub magnitudes: Vec<Arc<Magnitude>>,
}

/// A fully linked seismic event. Immutable once built by [`crate::link`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventDocument {
    pub public_id: String,
    pub preferred_origin_id: String,
    pub preferred_magnitude_id: String,
    pub origins: HashMap<String, Arc<Origin>>,
    pub magnitudes: HashMap<String, Arc<Magnitude>>,
    pub picks: HashMap<String, Arc<Pick>>,
    pub preferred_origin: Option<Arc<Origin>>,
    pub preferred_magnitude: Option<Arc<Magnitude>>,
}

// --- WFS quake search ---

/// One record from the WFS quake-search feature collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Feature {
    pub public_id: String,
    pub event_type: String,
    pub origin_time: String,
    pub modification_time: String,
    pub latitude: f64,
    pub longitude: f64,
    pub depth: f64,
    pub magnitude: f64,
    pub evaluation_method: String,
    pub evaluation_status: String,
    pub evaluation_mode: String,
    pub earth_model: String,
    pub depth_type: String,
    pub origin_error: f64,
    pub used_phase_count: i64,
    pub used_station_count: i64,
    pub minimum_distance: f64,
    pub azimuthal_gap: f64,
    pub magnitude_type: String,
    pub magnitude_uncertainty: f64,
    pub magnitude_station_count: i64,
}
