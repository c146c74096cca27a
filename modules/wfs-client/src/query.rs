use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Months, Utc};
use qsearch_common::time::format_filter_time;
use qsearch_common::{CatalogError, Result};
use regex::Regex;
use typed_builder::TypedBuilder;

/// Phase-count filter value meaning "no filter".
pub const UNSET_PHASE_COUNT: i64 = -999;

/// Magnitude filter value meaning "no filter".
pub const UNSET_MAGNITUDE: f64 = -999.9;

static EVENT_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]+$").expect("event id pattern is valid")
});

/// A WFS quake search.
///
/// A non-empty `event_id` selects a single event and every other field is
/// ignored. Otherwise the search covers `start..=end`, narrowed by whichever
/// filters are not at their unset values.
#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct Query {
    #[builder(default, setter(into))]
    pub event_id: String,
    #[builder(default = DateTime::<Utc>::UNIX_EPOCH)]
    pub start: DateTime<Utc>,
    #[builder(default = DateTime::<Utc>::UNIX_EPOCH)]
    pub end: DateTime<Utc>,
    #[builder(default = UNSET_PHASE_COUNT)]
    pub min_used_phase_count: i64,
    #[builder(default = UNSET_MAGNITUDE)]
    pub min_magnitude: f64,
    /// `minlon,minlat,maxlon,maxlat`, passed through as given.
    #[builder(default, setter(into))]
    pub bbox: String,
}

impl Query {
    pub fn by_event_id(event_id: impl Into<String>) -> Self {
        Query::builder().event_id(event_id).build()
    }

    pub fn by_time(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Query::builder().start(start).end(end).build()
    }

    pub fn is_by_event_id(&self) -> bool {
        !self.event_id.is_empty()
    }

    /// Reject ids outside `[a-z0-9]+` and inverted time windows.
    pub fn validate(&self) -> Result<()> {
        if self.is_by_event_id() {
            if !EVENT_ID.is_match(&self.event_id) {
                return Err(CatalogError::Validation(format!(
                    "Invalid eventid: {}",
                    self.event_id
                )));
            }
            return Ok(());
        }
        if self.start > self.end {
            return Err(CatalogError::Validation(
                "start must be before end".to_string(),
            ));
        }
        Ok(())
    }

    /// The CQL filter, clauses joined with `+AND+`.
    pub fn filter(&self) -> String {
        if self.is_by_event_id() {
            return format!("publicid=='{}'", self.event_id);
        }

        let mut clauses = vec![
            format!("origintime>='{}'", format_filter_time(&self.start)),
            format!("origintime<='{}'", format_filter_time(&self.end)),
        ];
        if self.min_used_phase_count != UNSET_PHASE_COUNT {
            clauses.push(format!("usedphasecount>={}", self.min_used_phase_count));
        }
        if self.min_magnitude != UNSET_MAGNITUDE {
            clauses.push(format!("magnitude>={}", self.min_magnitude));
        }
        if !self.bbox.is_empty() {
            clauses.push(format!("BBOX(origin_geom,{})", self.bbox));
        }
        clauses.join("+AND+")
    }

    /// The full request URL against `base`.
    pub fn url(&self, base: &str) -> String {
        format!("{base}&cql_filter={}", self.filter())
    }

    /// Split a time search into calendar-year pieces. Neighbouring pieces share
    /// their boundary second, so an event on it can come back twice.
    ///
    /// For `Y = end.year - start.year` this yields `[start+i, start+i+1]` years
    /// for `i in 0..Y`, then `[start+Y, end]`. Identifier searches and
    /// single-year spans come back unchanged.
    pub fn chunks(&self) -> Vec<Query> {
        if self.is_by_event_id() {
            return vec![self.clone()];
        }

        let years = (self.end.year() - self.start.year()).max(0) as u32;
        let mut chunks = Vec::with_capacity(years as usize + 1);
        for i in 0..years {
            chunks.push(Query {
                start: add_years(self.start, i),
                end: add_years(self.start, i + 1),
                ..self.clone()
            });
        }
        chunks.push(Query {
            start: add_years(self.start, years),
            end: self.end,
            ..self.clone()
        });
        chunks
    }
}

// Feb 29 clamps to Feb 28 in non-leap years.
fn add_years(t: DateTime<Utc>, years: u32) -> DateTime<Utc> {
    t.checked_add_months(Months::new(years * 12))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    fn window() -> Query {
        Query::by_time(t(2014, 1, 27, 3, 6, 25), t(2014, 1, 27, 4, 6, 25))
    }

    const WINDOW: &str = "cql_filter=origintime>='2014-01-27T03:06:25'+AND+origintime<='2014-01-27T04:06:25'";

    #[test]
    fn event_id_filter() {
        let q = Query::by_event_id("2014p562279");
        assert!(q.url(qsearch_common::config::DEFAULT_WFS_URL)
            .ends_with("cql_filter=publicid=='2014p562279'"));
    }

    #[test]
    fn event_id_wins_over_time_fields() {
        let q = Query {
            event_id: "2014p562279".into(),
            min_used_phase_count: 60,
            ..window()
        };
        assert_eq!(q.filter(), "publicid=='2014p562279'");
    }

    #[test]
    fn time_window_with_no_filters() {
        assert!(window().url("http://wfs.test/ows?x=1").ends_with(WINDOW));
    }

    #[test]
    fn optional_clauses_in_fixed_order() {
        let cases = [
            (60, UNSET_MAGNITUDE, "", "+AND+usedphasecount>=60"),
            (UNSET_PHASE_COUNT, 6.1, "", "+AND+magnitude>=6.1"),
            (60, 6.1, "", "+AND+usedphasecount>=60+AND+magnitude>=6.1"),
            (
                60,
                6.1,
                "174,-41,175,-42",
                "+AND+usedphasecount>=60+AND+magnitude>=6.1+AND+BBOX(origin_geom,174,-41,175,-42)",
            ),
        ];
        for (phases, magnitude, bbox, suffix) in cases {
            let q = Query {
                min_used_phase_count: phases,
                min_magnitude: magnitude,
                bbox: bbox.to_string(),
                ..window()
            };
            let url = q.url("http://wfs.test/ows?x=1");
            assert!(url.ends_with(&format!("{WINDOW}{suffix}")), "got {url}");
        }
    }

    #[test]
    fn whole_magnitudes_render_without_fraction() {
        let q = Query {
            min_magnitude: 6.0,
            ..window()
        };
        assert!(q.filter().ends_with("+AND+magnitude>=6"));
    }

    #[test]
    fn same_year_is_one_chunk() {
        assert_eq!(window().chunks(), vec![window()]);
    }

    #[test]
    fn two_year_span_is_three_chunks_sharing_boundaries() {
        let q = Query {
            min_magnitude: 4.0,
            ..Query::by_time(t(2012, 3, 1, 0, 0, 0), t(2014, 6, 1, 0, 0, 0))
        };
        let chunks = q.chunks();

        let bounds: Vec<_> = chunks.iter().map(|c| (c.start, c.end)).collect();
        assert_eq!(
            bounds,
            vec![
                (t(2012, 3, 1, 0, 0, 0), t(2013, 3, 1, 0, 0, 0)),
                (t(2013, 3, 1, 0, 0, 0), t(2014, 3, 1, 0, 0, 0)),
                (t(2014, 3, 1, 0, 0, 0), t(2014, 6, 1, 0, 0, 0)),
            ]
        );
        assert!(chunks.iter().all(|c| c.min_magnitude == 4.0));
    }

    #[test]
    fn leap_day_clamps() {
        let q = Query::by_time(t(2012, 2, 29, 12, 0, 0), t(2014, 1, 1, 0, 0, 0));
        let chunks = q.chunks();
        assert_eq!(chunks[0].end, t(2013, 2, 28, 12, 0, 0));
        assert_eq!(chunks[1].end, t(2014, 2, 28, 12, 0, 0));
    }

    #[test]
    fn end_before_anniversary_is_kept_inverted() {
        let q = Query::by_time(t(2013, 12, 1, 0, 0, 0), t(2014, 1, 15, 0, 0, 0));
        let chunks = q.chunks();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].start, t(2014, 12, 1, 0, 0, 0));
        assert_eq!(chunks[1].end, t(2014, 1, 15, 0, 0, 0));
    }

    #[test]
    fn validation() {
        assert!(Query::by_event_id("2014p562279").validate().is_ok());
        assert!(matches!(
            Query::by_event_id("2014P562279").validate(),
            Err(CatalogError::Validation(_))
        ));
        assert!(window().validate().is_ok());
        let inverted = Query::by_time(t(2014, 2, 1, 0, 0, 0), t(2014, 1, 1, 0, 0, 0));
        assert!(matches!(
            inverted.validate(),
            Err(CatalogError::Validation(_))
        ));
    }
}
