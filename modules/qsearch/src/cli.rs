use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use qsearch_common::fields::{self, Field, ARRIVAL_FIELDS, EVENT_FIELDS, PICK_FIELDS};
use qsearch_common::{CatalogError, Result};
use quakeml_client::Dialect;
use wfs_client::{Query, UNSET_MAGNITUDE, UNSET_PHASE_COUNT};

/// Search the GeoNet quake catalog. Progress goes to stderr, CSV to stdout.
#[derive(Debug, Parser)]
#[command(name = "qsearch", version)]
pub struct Cli {
    /// A GeoNet event id, e.g. 2012p070732. Not needed with --start and --end.
    #[arg(long)]
    pub eventid: Option<String>,

    /// Search start, RFC 3339 to the second, e.g. 2014-02-22T04:06:25Z.
    #[arg(long, value_parser = parse_rfc3339)]
    pub start: Option<DateTime<Utc>>,

    /// Search end, RFC 3339 to the second, e.g. 2014-02-22T05:06:25Z.
    #[arg(long, value_parser = parse_rfc3339)]
    pub end: Option<DateTime<Utc>>,

    /// Minimum used phase count (>=).
    #[arg(long, default_value_t = UNSET_PHASE_COUNT, allow_negative_numbers = true)]
    pub min_used_phase_count: i64,

    /// Minimum magnitude (>=).
    #[arg(long, default_value_t = UNSET_MAGNITUDE, allow_negative_numbers = true)]
    pub min_magnitude: f64,

    /// Bounding box as minlon,minlat,maxlon,maxlat, e.g. 174,-41,175,-42.
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub bbox: String,

    /// Print event rows. Needs --event-format.
    #[arg(long)]
    pub event: bool,

    /// Comma separated event fields.
    #[arg(long, default_value = "", long_help = format_help(EVENT_FIELDS))]
    pub event_format: String,

    /// Print a row per pick. Needs --picks-format.
    #[arg(long)]
    pub picks: bool,

    /// Comma separated pick fields.
    #[arg(long, default_value = "", long_help = format_help(PICK_FIELDS))]
    pub picks_format: String,

    /// Print the preferred origin's arrivals. Needs --arrivals-format.
    #[arg(long)]
    pub preferred_origin_arrivals: bool,

    /// Comma separated arrival fields.
    #[arg(long, default_value = "", long_help = format_help(ARRIVAL_FIELDS))]
    pub arrivals_format: String,

    /// Print a header line before each table.
    #[arg(long)]
    pub header: bool,

    /// Where pick and arrival detail comes from.
    #[arg(long, value_enum, default_value_t = CatalogArg::Quakeml)]
    pub catalog: CatalogArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CatalogArg {
    Quakeml,
    Seiscompml,
}

impl From<CatalogArg> for Dialect {
    fn from(arg: CatalogArg) -> Self {
        match arg {
            CatalogArg::Quakeml => Dialect::QuakeMl12,
            CatalogArg::Seiscompml => Dialect::SeisComPml07,
        }
    }
}

/// A validated invocation. Each table is `Some(selection)` when requested.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub query: Query,
    pub event: Option<Vec<&'static str>>,
    pub picks: Option<Vec<&'static str>>,
    pub arrivals: Option<Vec<&'static str>>,
    pub header: bool,
    pub dialect: Dialect,
}

impl Request {
    /// Detail documents are only fetched for pick or arrival output.
    pub fn needs_details(&self) -> bool {
        self.picks.is_some() || self.arrivals.is_some()
    }
}

impl Cli {
    /// Check every flag before anything is fetched.
    pub fn into_request(self) -> Result<Request> {
        let event = table(
            "--event",
            "--event-format",
            self.event,
            &self.event_format,
            EVENT_FIELDS,
        )?;
        let picks = table(
            "--picks",
            "--picks-format",
            self.picks,
            &self.picks_format,
            PICK_FIELDS,
        )?;
        let arrivals = table(
            "--preferred-origin-arrivals",
            "--arrivals-format",
            self.preferred_origin_arrivals,
            &self.arrivals_format,
            ARRIVAL_FIELDS,
        )?;

        let query = match (self.start, self.end, self.eventid) {
            (Some(start), Some(end), _) => Query {
                min_used_phase_count: self.min_used_phase_count,
                min_magnitude: self.min_magnitude,
                bbox: self.bbox,
                ..Query::by_time(start, end)
            },
            (_, _, Some(eventid)) if !eventid.is_empty() => Query::by_event_id(eventid),
            _ => {
                return Err(CatalogError::Validation(
                    "either --eventid or both --start and --end are required".to_string(),
                ))
            }
        };
        query.validate()?;

        Ok(Request {
            query,
            event,
            picks,
            arrivals,
            header: self.header,
            dialect: self.catalog.into(),
        })
    }
}

fn table(
    flag: &str,
    format_flag: &str,
    enabled: bool,
    format: &str,
    vocabulary: &[Field],
) -> Result<Option<Vec<&'static str>>> {
    if !enabled {
        return Ok(None);
    }
    if format.is_empty() {
        return Err(CatalogError::Validation(format!(
            "{flag} selected but no {format_flag} provided"
        )));
    }
    fields::parse_selection(format, vocabulary).map(Some)
}

fn parse_rfc3339(raw: &str) -> std::result::Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("{raw:?} is not an RFC 3339 time: {e}"))
}

fn format_help(vocabulary: &[Field]) -> String {
    format!(
        "Comma separated, any order, from: {}",
        fields::describe(vocabulary)
    )
}
