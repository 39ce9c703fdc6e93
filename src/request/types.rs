//! Request description types

use super::compose::compose_url;
use crate::error::Result;
use serde::Serialize;
use std::fmt;
use url::Url;

/// Description of one logical call: ordered path segments plus query
/// parameters, resolved against a connector endpoint at dispatch time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UriRequest {
    /// Path segments appended to the endpoint, in order
    pub segments: Vec<String>,
    /// Query parameters; the last occurrence of a key wins
    pub query: Vec<(String, String)>,
}

impl UriRequest {
    /// Create an empty request (resolves to the endpoint itself)
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a path segment
    #[must_use]
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Append several path segments
    #[must_use]
    pub fn segments<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.segments.extend(segments.into_iter().map(Into::into));
        self
    }

    /// Append a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Resolve this request against an endpoint into a validated URL.
    ///
    /// Duplicate query keys are merged last-write-wins, keeping the position
    /// of the first occurrence. Any query carried by the endpoint itself is
    /// replaced by the request's parameters.
    pub fn to_url(&self, endpoint: &str) -> Result<Url> {
        let composed = compose_url(endpoint, &self.segments);
        let mut url = Url::parse(&composed)?;

        if !self.query.is_empty() {
            let mut merged: Vec<(&str, &str)> = Vec::new();
            for (key, value) in &self.query {
                match merged.iter_mut().find(|(k, _)| *k == key.as_str()) {
                    Some(slot) => slot.1 = value,
                    None => merged.push((key, value)),
                }
            }

            url.set_query(None);
            url.query_pairs_mut().extend_pairs(merged);
        }

        Ok(url)
    }
}

impl fmt::Display for UriRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "{self:?}"),
        }
    }
}
