use serde_json::Value as Json;

/// Ordered filter parameters for list endpoints.
///
/// Values stay as JSON until the request is built so callers can pass ids,
/// dates and flags without stringifying them first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    params: Vec<(String, Json)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Json>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn with_opt<V: Into<Json>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    /// Builds a query from a JSON object, keeping its key order. Anything
    /// that is not an object yields an empty query.
    pub fn from_value(value: Json) -> Self {
        match value {
            Json::Object(map) => Self {
                params: map.into_iter().collect(),
            },
            _ => Self::default(),
        }
    }

    /// A given `sort` replaces any `sort` already in the query.
    pub fn sorted(mut self, sort: Option<&str>) -> Self {
        match sort.filter(|s| !s.is_empty()) {
            Some(sort) => {
                self.params.retain(|(key, _)| key != "sort");
                self.with("sort", sort)
            }
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs().is_empty()
    }

    /// The pairs that end up in the query string. Null and empty values are
    /// dropped, everything else is stringified.
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .filter_map(|(key, value)| stringify(value).map(|v| (key.clone(), v)))
            .collect()
    }
}

fn stringify(value: &Json) -> Option<String> {
    match value {
        Json::Null => None,
        Json::String(s) if s.is_empty() => None,
        Json::String(s) => Some(s.clone()),
        Json::Number(n) => Some(n.to_string()),
        Json::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}
