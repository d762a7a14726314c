//! Query-string helpers for list endpoints.
//!
//! VPSie paginates with plain `offset`/`limit` parameters appended to the
//! request path, so the core only needs to render pairs into a query string.

use std::fmt::Display;

use url::form_urlencoded;

/// Ordered query parameters, rendered form-encoded.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, String)>,
}

impl QueryParams {
    /// Empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `key=value`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Display) {
        self.entries.push((key.into(), value.to_string()));
    }

    /// Add `key=value` if `value` is set.
    pub fn insert_opt(&mut self, key: impl Into<String>, value: Option<impl Display>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as an `application/x-www-form-urlencoded` string.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.entries)
            .finish()
    }

    /// Append to `path`, respecting any query it already carries.
    #[must_use]
    pub fn append_to(&self, path: &str) -> String {
        if self.is_empty() {
            return path.to_string();
        }
        let separator = if path.contains('?') { '&' } else { '?' };
        format!("{path}{separator}{}", self.to_query_string())
    }
}

/// Pagination options accepted by list endpoints.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    /// Number of records to skip.
    pub offset: Option<u32>,
    /// Maximum number of records to return.
    pub limit: Option<u32>,
}

impl ListOptions {
    /// Options for a single page.
    #[must_use]
    pub const fn page(offset: u32, limit: u32) -> Self {
        Self {
            offset: Some(offset),
            limit: Some(limit),
        }
    }

    /// The next page of the same size, or `None` without a limit.
    #[must_use]
    pub fn next_page(&self) -> Option<Self> {
        let limit = self.limit?;
        Some(Self::page(self.offset.unwrap_or(0).saturating_add(limit), limit))
    }

    /// Pagination as query parameters; unset fields are omitted.
    #[must_use]
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.insert_opt("offset", self.offset);
        params.insert_opt("limit", self.limit);
        params
    }

    /// Append the pagination parameters to `path`.
    #[must_use]
    pub fn apply(&self, path: &str) -> String {
        self.to_params().append_to(path)
    }
}
