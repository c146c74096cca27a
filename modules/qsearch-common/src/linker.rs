// Second pass over a decoded document: resolve the string ids the dialects
// leave behind into shared references.
//
// Unresolved references (a preferred id, or an arrival pick id, that names
// nothing in the document) become `None` rather than an error, and are only
// traced at debug level.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::IncompleteDocument;
use crate::types::{Arrival, EventDocument, Magnitude, Origin, Pick, RawArrival, RawEvent, RawOrigin};

/// Link a decoded event into an [`EventDocument`].
pub fn link(raw: RawEvent) -> Result<EventDocument, IncompleteDocument> {
    if raw.preferred_origin_id.is_empty() {
        return Err(IncompleteDocument::MissingPreferredOrigin);
    }
    if raw.preferred_magnitude_id.is_empty() {
        return Err(IncompleteDocument::MissingPreferredMagnitude);
    }
    if raw.origins.is_empty() {
        return Err(IncompleteDocument::NoOrigins);
    }

    let has_magnitudes =
        !raw.magnitudes.is_empty() || raw.origins.iter().any(|o| !o.magnitudes.is_empty());
    if !has_magnitudes {
        return Err(IncompleteDocument::NoMagnitudes);
    }

    let RawEvent {
        public_id,
        preferred_origin_id,
        preferred_magnitude_id,
        origins: raw_origins,
        magnitudes: raw_magnitudes,
        picks: raw_picks,
    } = raw;

    let picks: HashMap<String, Arc<Pick>> = raw_picks
        .into_iter()
        .map(|p| (p.public_id.clone(), Arc::new(p)))
        .collect();

    let mut magnitudes: HashMap<String, Arc<Magnitude>> = raw_magnitudes
        .into_iter()
        .map(|m| (m.public_id.clone(), Arc::new(m)))
        .collect();

    let mut origins = HashMap::with_capacity(raw_origins.len());
    for raw_origin in raw_origins {
        let resolve_picks = raw_origin.public_id == preferred_origin_id;
        let origin = link_origin(raw_origin, resolve_picks, &picks, &mut magnitudes);
        origins.insert(origin.public_id.clone(), Arc::new(origin));
    }

    let preferred_origin = origins.get(&preferred_origin_id).cloned();
    if preferred_origin.is_none() {
        debug!(
            event = public_id.as_str(),
            origin = preferred_origin_id.as_str(),
            "Preferred origin not present in document"
        );
    }

    let preferred_magnitude = magnitudes.get(&preferred_magnitude_id).cloned();
    if preferred_magnitude.is_none() {
        debug!(
            event = public_id.as_str(),
            magnitude = preferred_magnitude_id.as_str(),
            "Preferred magnitude not present in document"
        );
    }

    Ok(EventDocument {
        public_id,
        preferred_origin_id,
        preferred_magnitude_id,
        origins,
        magnitudes,
        picks,
        preferred_origin,
        preferred_magnitude,
    })
}

fn link_origin(
    raw: RawOrigin,
    resolve_picks: bool,
    picks: &HashMap<String, Arc<Pick>>,
    magnitudes: &mut HashMap<String, Arc<Magnitude>>,
) -> Origin {
    let nested: Vec<Arc<Magnitude>> = raw
        .magnitudes
        .into_iter()
        .map(|m| {
            let m = Arc::new(m);
            magnitudes.insert(m.public_id.clone(), m.clone());
            m
        })
        .collect();

    let arrivals = raw
        .arrivals
        .into_iter()
        .map(|a| {
            let pick = if resolve_picks {
                let pick = picks.get(&a.pick_id).cloned();
                if pick.is_none() {
                    debug!(
                        origin = raw.public_id.as_str(),
                        pick = a.pick_id.as_str(),
                        "Arrival references a pick not present in document"
                    );
                }
                pick
            } else {
                None
            };
            link_arrival(a, pick)
        })
        .collect();

    Origin {
        public_id: raw.public_id,
        time: raw.time,
        arrivals,
        magnitudes: nested,
    }
}

fn link_arrival(raw: RawArrival, pick: Option<Arc<Pick>>) -> Arrival {
    Arrival {
        pick_id: raw.pick_id,
        phase: raw.phase,
        azimuth: raw.azimuth,
        distance: raw.distance,
        time_residual: raw.time_residual,
        time_weight: raw.time_weight,
        pick,
    }
}
