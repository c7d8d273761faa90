use crate::{Error, Result};
use indexmap::IndexMap;
use url::form_urlencoded;

/// Query parameters exactly as they occurred in the input.
///
/// Every occurrence of a key contributes one entry, in input order. Keys are
/// case-sensitive and keep the order of their first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParameterSet {
    params: IndexMap<String, Vec<String>>,
}

impl RawParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw, percent-encoded query string (`k1=v1&k2=v2`)
    ///
    /// Pairs without `=` and pairs with an empty key are skipped. A leading `?`
    /// is ignored.
    pub fn parse(query: &str) -> Self {
        tracing::debug!("Parsing query string ({} bytes)", query.len());

        let query = query.strip_prefix('?').unwrap_or(query);
        let mut set = Self::new();

        for pair in query.split('&') {
            if !pair.contains('=') {
                if !pair.is_empty() {
                    tracing::trace!("Skipping bare key without value: {}", pair);
                }
                continue;
            }

            // A single pair holds no '&', so the decoder yields exactly one entry
            if let Some((key, value)) = form_urlencoded::parse(pair.as_bytes()).next() {
                set.push(key.into_owned(), value.into_owned());
            }
        }

        tracing::debug!("Parsed {} parameter keys", set.len());
        set
    }

    /// Parse a query string received as raw bytes
    ///
    /// Fails when the bytes are not valid UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self::parse(utf8(bytes, "query string")?))
    }

    /// Parse `key=value` lines received as raw bytes
    ///
    /// Fails when the bytes are not valid UTF-8.
    pub fn from_line_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self::from_lines(utf8(bytes, "parameter text")?))
    }

    /// Parse the query part of a full URL or request path
    ///
    /// Everything after the first `?` up to an optional `#fragment` is parsed.
    /// Input without `?` yields an empty set.
    pub fn from_url(url: &str) -> Self {
        match url.split_once('?') {
            Some((_, rest)) => {
                let query = rest.split('#').next().unwrap_or_default();
                Self::parse(query)
            }
            None => {
                tracing::debug!("No query string in {}", url);
                Self::new()
            }
        }
    }

    /// Parse newline-separated `key=value` lines
    ///
    /// Lines are trimmed and taken literally (no percent-decoding). Lines without
    /// `=`, with an empty key or with an empty value are skipped.
    pub fn from_lines(text: &str) -> Self {
        tracing::debug!("Parsing key=value lines");

        let mut set = Self::new();
        for line in text.lines().map(str::trim) {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            if key.is_empty() || value.is_empty() {
                continue;
            }
            set.push(key.to_string(), value.to_string());
        }

        tracing::debug!("Parsed {} parameter keys from lines", set.len());
        set
    }

    /// Build a set from already-decoded key/value pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut set = Self::new();
        for (key, value) in pairs {
            set.push(key.into(), value.into());
        }
        set
    }

    /// Record one occurrence of `key`. Empty keys are ignored.
    pub fn push(&mut self, key: String, value: String) {
        if key.is_empty() {
            tracing::trace!("Skipping parameter with empty key");
            return;
        }
        self.params.entry(key).or_default().push(value);
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.params.get(key).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.params
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

fn utf8<'a>(bytes: &'a [u8], what: &str) -> Result<&'a str> {
    std::str::from_utf8(bytes)
        .map_err(|e| Error::Parse(format!("{} is not valid UTF-8: {}", what, e)))
}
