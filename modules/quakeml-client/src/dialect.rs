use qsearch_common::{CatalogError, RawEvent, Result};

use crate::{json, quakeml12, seiscompml07};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// The document format a detail catalog serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    QuakeMl12,
    SeisComPml07,
}

impl Dialect {
    /// Decode a fetched body into a flat event. Bodies that open with `{` are
    /// QuakeML-JSON whatever the catalog's usual dialect. A leading UTF-8 byte
    /// order mark is ignored.
    pub fn decode(self, body: &[u8]) -> Result<RawEvent> {
        let body = body.strip_prefix(UTF8_BOM).unwrap_or(body);
        if is_json(body) {
            return json::decode(body);
        }

        let text = std::str::from_utf8(body)
            .map_err(|e| CatalogError::Decode(format!("body is not UTF-8: {e}")))?;
        match self {
            Dialect::QuakeMl12 => quakeml12::decode(text),
            Dialect::SeisComPml07 => seiscompml07::decode(text),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Dialect::QuakeMl12 => "quakeml-1.2",
            Dialect::SeisComPml07 => "seiscompml-0.7",
        }
    }
}

fn is_json(body: &[u8]) -> bool {
    let body = body.strip_prefix(UTF8_BOM).unwrap_or(body);
    body.iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'{')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_json_after_leading_whitespace() {
        assert!(is_json(b"  \n{\"publicID\": \"x\"}"));
        assert!(!is_json(b"<?xml version=\"1.0\"?>"));
        assert!(!is_json(b""));
    }

    #[test]
    fn json_body_wins_over_catalog_dialect() {
        let raw = Dialect::SeisComPml07
            .decode(br#"{"publicID": "2014p562279", "preferredOriginID": "o1"}"#)
            .unwrap();
        assert_eq!(raw.public_id, "2014p562279");
        assert_eq!(raw.preferred_origin_id, "o1");
    }

    #[test]
    fn json_after_byte_order_mark() {
        assert!(is_json(b"\xEF\xBB\xBF{\"publicID\": \"x\"}"));

        let raw = Dialect::QuakeMl12
            .decode(b"\xEF\xBB\xBF{\"publicID\": \"2014p562279\"}")
            .unwrap();
        assert_eq!(raw.public_id, "2014p562279");
    }

    #[test]
    fn xml_after_byte_order_mark() {
        let raw = Dialect::QuakeMl12
            .decode(b"\xEF\xBB\xBF<quakeml><eventParameters><event publicID=\"e1\"/></eventParameters></quakeml>")
            .unwrap();
        assert_eq!(raw.public_id, "e1");
    }

    #[test]
    fn non_utf8_body_is_a_decode_error() {
        let err = Dialect::QuakeMl12.decode(&[0x3c, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
    }
}
