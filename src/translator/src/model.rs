//! Remote storage data model as seen by the translation code
//!
//! These types mirror the remote-read/remote-write protobuf messages without
//! depending on them, so the translation stays independent of the wire codec.

use std::collections::BTreeMap;
use std::fmt;

/// Label name holding the metric name
pub const METRIC_NAME_LABEL: &str = "__name__";

/// How a matcher compares a label value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchType {
    Equal,
    NotEqual,
    RegexMatch,
    RegexNoMatch,
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::RegexMatch => "=~",
            Self::RegexNoMatch => "!~",
        };
        f.write_str(op)
    }
}

/// A single label matcher of a remote-read query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMatcher {
    pub name: String,
    /// May be empty; an empty value matches series without the label
    pub value: String,
    pub match_type: MatchType,
}

impl LabelMatcher {
    pub fn new(name: impl Into<String>, value: impl Into<String>, match_type: MatchType) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            match_type,
        }
    }
}

impl fmt::Display for LabelMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{:?}", self.name, self.match_type, self.value)
    }
}

/// A remote-read query: matchers plus an inclusive time range
///
/// `start_ms <= end_ms` is not checked here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub matchers: Vec<LabelMatcher>,
    pub start_ms: i64,
    pub end_ms: i64,
}

impl Query {
    pub fn new(matchers: Vec<LabelMatcher>, start_ms: i64, end_ms: i64) -> Self {
        Self {
            matchers,
            start_ms,
            end_ms,
        }
    }
}

/// A sample value with its timestamp in milliseconds
///
/// `value` may be NaN or infinite, including the Prometheus stale marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp_ms: i64,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp_ms: i64, value: f64) -> Self {
        Self {
            timestamp_ms,
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label {
    pub name: String,
    pub value: String,
}

impl Label {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Label name to value mapping with unique names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet(BTreeMap<String, String>);

impl LabelSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<N, V>(pairs: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }

    /// Build a set from wire labels; a repeated name keeps its last value
    pub fn from_labels(labels: &[Label]) -> Self {
        Self::from_pairs(labels.iter().map(|l| (l.name.clone(), l.value.clone())))
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Value of `name`, treating an empty value like an absent label
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Canonical identity of this label set
    pub fn key(&self) -> SeriesKey {
        SeriesKey(self.labels())
    }

    /// Labels sorted by name
    pub fn labels(&self) -> Vec<Label> {
        self.0
            .iter()
            .map(|(name, value)| Label::new(name.clone(), value.clone()))
            .collect()
    }
}

/// Canonical, order-independent identity of a series
///
/// Holds the labels sorted by name. Two label sets built from the same pairs
/// in any order yield equal keys, and keys order deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeriesKey(Vec<Label>);

impl SeriesKey {
    pub fn labels(&self) -> &[Label] {
        &self.0
    }

    pub fn into_labels(self) -> Vec<Label> {
        self.0
    }
}

impl From<&LabelSet> for SeriesKey {
    fn from(set: &LabelSet) -> Self {
        set.key()
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, label) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={:?}", label.name, label.value)?;
        }
        f.write_str("}")
    }
}

/// A label set with its samples, oldest first
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    pub labels: Vec<Label>,
    pub samples: Vec<Sample>,
}

impl TimeSeries {
    /// Series whose labels are sorted by name
    pub fn new(labels: LabelSet, samples: Vec<Sample>) -> Self {
        Self {
            labels: labels.labels(),
            samples,
        }
    }

    /// Series keeping the wire order of `labels`
    pub fn from_labels(labels: Vec<Label>, samples: Vec<Sample>) -> Self {
        Self { labels, samples }
    }

    pub fn label_set(&self) -> LabelSet {
        LabelSet::from_labels(&self.labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_key_ignores_insertion_order() {
        let a = LabelSet::from_pairs([("job", "api"), ("__name__", "up")]);
        let b = LabelSet::from_pairs([("__name__", "up"), ("job", "api")]);
        assert_eq!(a.key(), b.key());
        assert_eq!(a.key().labels()[0].name, "__name__");
    }

    #[test]
    fn test_series_key_display() {
        let set = LabelSet::from_pairs([("job", "a\"b"), ("__name__", "up")]);
        assert_eq!(set.key().to_string(), r#"{__name__="up", job="a\"b"}"#);
        assert_eq!(LabelSet::new().key().to_string(), "{}");
    }

    #[test]
    fn test_non_empty_treats_empty_as_absent() {
        let set = LabelSet::from_pairs([("a", ""), ("b", "x")]);
        assert_eq!(set.non_empty("a"), None);
        assert_eq!(set.non_empty("b"), Some("x"));
        assert_eq!(set.non_empty("c"), None);
    }

    #[test]
    fn test_from_labels_keeps_last_duplicate() {
        let set = LabelSet::from_labels(&[Label::new("a", "1"), Label::new("a", "2")]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("a"), Some("2"));
    }

    #[test]
    fn test_matcher_display() {
        let m = LabelMatcher::new("job", "api.*", MatchType::RegexNoMatch);
        assert_eq!(m.to_string(), r#"job!~"api.*""#);
    }
}
