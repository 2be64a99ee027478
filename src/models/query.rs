//! Query builder models and structures

use std::fmt;

use super::dataset::{DEFAULT_BASE_URL, Dataset};

/// Clause asking the API to report the total match count in `metadata.count`
pub const INLINE_COUNT: &str = "$inlinecount=allpages";

/// Right-hand side of an equality filter
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl FilterValue {
    /// Render as an encoded OData literal. Only text is quoted.
    ///
    /// Floats keep their decimal point (`5.0`). NaN and infinities have no
    /// OData literal; they come out as `NaN`/`inf` and the API rejects them.
    fn to_literal(&self) -> String {
        match self {
            Self::Text(s) => format!("%27{}%27", urlencoding::encode(&s.replace('\'', "''"))),
            Self::Float(n) => format!("{:?}", n),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{}", n),
            Self::Float(n) => write!(f, "{}", n),
            Self::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u32> for FilterValue {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Equality filters keyed by field name, kept in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    entries: Vec<(String, FilterValue)>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Set `field` to `value`, replacing an earlier value for the same field in place
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FilterValue>) {
        let field = field.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == field) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((field, value)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<FilterValue>> FromIterator<(K, V)> for Filters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut filters = Filters::new();
        for (k, v) in iter {
            filters.insert(k, v);
        }
        filters
    }
}

/// Build the `$filter=` clause, or `None` when there is nothing to filter on.
pub fn filter_clause(filters: &Filters) -> Option<String> {
    if filters.is_empty() {
        return None;
    }

    let body = filters
        .iter()
        .map(|(field, value)| format!("{}%20eq%20{}", field, value.to_literal()))
        .collect::<Vec<_>>()
        .join("%20and%20");

    Some(format!("$filter={}", body))
}

/// Build the `$select=` clause, or `None` when every field is wanted.
pub fn select_clause<S: AsRef<str>>(selects: &[S]) -> Option<String> {
    if selects.is_empty() {
        return None;
    }

    let body = selects
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(",");

    Some(format!("$select={}", body))
}

/// Compose the query URL for an endpoint.
///
/// A non-empty `raw_filter` (which should start with `$filter=`) wins over the
/// clause derived from `filters`. The inline count clause is always present.
pub fn build_url<S: AsRef<str>>(
    endpoint: &str,
    filters: &Filters,
    selects: &[S],
    raw_filter: Option<&str>,
) -> String {
    let filter = match raw_filter {
        Some(raw) if !raw.is_empty() => Some(raw.to_string()),
        _ => filter_clause(filters),
    };

    let parts: Vec<String> = [filter, select_clause(selects), Some(INLINE_COUNT.to_string())]
        .into_iter()
        .flatten()
        .collect();

    format!("{}?{}", endpoint, parts.join("&"))
}

/// A query definition for a dataset
#[derive(Debug, Clone)]
pub struct Query {
    /// Dataset to query
    pub dataset: Dataset,
    /// Equality filters
    pub filters: Filters,
    /// Columns to select (empty = all)
    pub select: Vec<String>,
    /// Hand-written `$filter=` clause overriding `filters`
    pub raw_filter: Option<String>,
}

impl Query {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            filters: Filters::new(),
            select: Vec::new(),
            raw_filter: None,
        }
    }

    pub fn filter(mut self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filters.insert(field, value);
        self
    }

    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn raw_filter(mut self, clause: impl Into<String>) -> Self {
        self.raw_filter = Some(clause.into());
        self
    }

    /// Build the full query URL against the public API
    pub fn url(&self) -> String {
        self.build_url(DEFAULT_BASE_URL)
    }

    /// Build the full query URL against `base_url`
    pub fn build_url(&self, base_url: &str) -> String {
        build_url(
            &self.dataset.endpoint_at(base_url),
            &self.filters,
            self.select.as_slice(),
            self.raw_filter.as_deref(),
        )
    }

    /// URL used for counting matches; the selection does not affect the count
    pub fn count_url(&self, base_url: &str) -> String {
        build_url::<String>(
            &self.dataset.endpoint_at(base_url),
            &self.filters,
            &[],
            self.raw_filter.as_deref(),
        )
    }
}
