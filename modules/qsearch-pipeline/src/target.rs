use qsearch_common::CatalogError;

/// One concrete request for the worker pool. `key` identifies the target in
/// results (a public id for detail documents, the URL itself for searches).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestTarget {
    key: String,
    url: String,
}

impl RequestTarget {
    pub fn new(key: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            url: url.into(),
        }
    }

    /// A target keyed by its own URL.
    pub fn url(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            key: url.clone(),
            url,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn as_url(&self) -> &str {
        &self.url
    }
}

/// What a worker hands to the aggregator for one target.
#[derive(Debug)]
pub enum FetchResult<T> {
    /// Decoded entries, each keyed for merging into the final collection.
    Parsed { key: String, entries: Vec<(String, T)> },
    Failed { key: String, error: CatalogError },
}
