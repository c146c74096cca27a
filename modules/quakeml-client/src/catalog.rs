use qsearch_common::{link, Config, EventDocument, Result};
use qsearch_pipeline::{Decoder, RequestTarget};

use crate::dialect::Dialect;

/// Where detail documents for an event live and what format they are in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    base_url: String,
    suffix: &'static str,
    dialect: Dialect,
}

impl Catalog {
    /// The GeoNet QuakeML 1.2 service: `<base>/<publicid>`.
    pub fn quakeml12(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            suffix: "",
            dialect: Dialect::QuakeMl12,
        }
    }

    /// The SeisComPML 0.7 bucket: `<base>/<publicid>.xml`.
    pub fn seiscompml07(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            suffix: ".xml",
            dialect: Dialect::SeisComPml07,
        }
    }

    pub fn from_config(dialect: Dialect, config: &Config) -> Self {
        match dialect {
            Dialect::QuakeMl12 => Self::quakeml12(config.quakeml_url.clone()),
            Dialect::SeisComPml07 => Self::seiscompml07(config.seiscompml_url.clone()),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn url_for(&self, public_id: &str) -> String {
        let sep = if self.base_url.ends_with('/') { "" } else { "/" };
        format!("{}{}{}{}", self.base_url, sep, public_id, self.suffix)
    }

    /// A request target keyed by the public id it was asked for.
    pub fn target(&self, public_id: &str) -> RequestTarget {
        RequestTarget::new(public_id, self.url_for(public_id))
    }
}

/// Decodes and links one detail document per target.
#[derive(Debug, Clone, Copy)]
pub struct EventDecoder {
    dialect: Dialect,
}

impl EventDecoder {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }
}

impl Decoder for EventDecoder {
    type Item = EventDocument;

    fn decode(&self, target: &RequestTarget, body: &[u8]) -> Result<Vec<(String, EventDocument)>> {
        let raw = self.dialect.decode(body)?;
        let event = link(raw)?;
        Ok(vec![(target.key().to_string(), event)])
    }
}
