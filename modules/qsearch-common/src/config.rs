use std::env;
use std::time::Duration;

use tracing::info;

use crate::error::{CatalogError, Result};

pub const DEFAULT_WFS_URL: &str = "http://wfs.geonet.org.nz/geonet/ows?service=WFS&version=1.0.0&request=GetFeature&typeName=geonet:quake_search_v1&outputFormat=json";
pub const DEFAULT_QUAKEML_URL: &str = "http://quakeml.geonet.org.nz/quakeml/1.2/";
pub const DEFAULT_SEISCOMPML_URL: &str =
    "http://seiscompml07.s3-website-ap-southeast-2.amazonaws.com/";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // Catalog endpoints
    pub wfs_url: String,
    pub quakeml_url: String,
    pub seiscompml_url: String,

    // Worker pools
    pub id_workers: usize,
    pub range_workers: usize,

    // HTTP
    pub http_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wfs_url: DEFAULT_WFS_URL.to_string(),
            quakeml_url: DEFAULT_QUAKEML_URL.to_string(),
            seiscompml_url: DEFAULT_SEISCOMPML_URL.to_string(),
            id_workers: 15,
            range_workers: 10,
            http_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to the
    /// public GeoNet endpoints and default pool sizes.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. `from_env` is this with
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let timeout_secs: u64 = parse_var(&lookup, "QSEARCH_HTTP_TIMEOUT_SECS", 30)?;

        let config = Self {
            wfs_url: lookup("QSEARCH_WFS_URL").unwrap_or(defaults.wfs_url),
            quakeml_url: lookup("QSEARCH_QUAKEML_URL").unwrap_or(defaults.quakeml_url),
            seiscompml_url: lookup("QSEARCH_SEISCOMPML_URL").unwrap_or(defaults.seiscompml_url),
            id_workers: parse_var(&lookup, "QSEARCH_ID_WORKERS", defaults.id_workers)?,
            range_workers: parse_var(&lookup, "QSEARCH_RANGE_WORKERS", defaults.range_workers)?,
            http_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
        };

        if config.id_workers == 0 || config.range_workers == 0 {
            return Err(CatalogError::Config(
                "worker counts must be at least 1".to_string(),
            ));
        }

        Ok(config)
    }

    /// Log the effective settings.
    pub fn log_summary(&self) {
        info!(
            wfs_url = self.wfs_url.as_str(),
            quakeml_url = self.quakeml_url.as_str(),
            seiscompml_url = self.seiscompml_url.as_str(),
            id_workers = self.id_workers,
            range_workers = self.range_workers,
            http_timeout_secs = self.http_timeout.map(|d| d.as_secs()).unwrap_or(0),
            "Loaded config"
        );
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| CatalogError::Config(format!("{key} must be a number, got {raw:?}"))),
        None => Ok(default),
    }
}
