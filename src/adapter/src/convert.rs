//! Conversions between the remote storage wire types and the translator model

use common::prometheus::proto::{self, label_matcher};
use translator::{Label, LabelMatcher, MatchType, Query, Sample, TimeSeries};

use crate::error::{AdapterError, Result};

pub fn match_type_from_proto(value: i32) -> Result<MatchType> {
    match label_matcher::Type::try_from(value) {
        Ok(label_matcher::Type::Eq) => Ok(MatchType::Equal),
        Ok(label_matcher::Type::Neq) => Ok(MatchType::NotEqual),
        Ok(label_matcher::Type::Re) => Ok(MatchType::RegexMatch),
        Ok(label_matcher::Type::Nre) => Ok(MatchType::RegexNoMatch),
        Err(_) => Err(AdapterError::UnknownMatcherType(value)),
    }
}

pub fn query_from_proto(query: &proto::Query) -> Result<Query> {
    let matchers = query
        .matchers
        .iter()
        .map(|m| {
            Ok(LabelMatcher::new(
                m.name.clone(),
                m.value.clone(),
                match_type_from_proto(m.r#type)?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Query::new(matchers, query.start_timestamp_ms, query.end_timestamp_ms))
}

/// Incoming series keep their wire label order
pub fn series_from_proto(series: proto::TimeSeries) -> TimeSeries {
    let labels = series
        .labels
        .into_iter()
        .map(|l| Label::new(l.name, l.value))
        .collect();
    let samples = series
        .samples
        .into_iter()
        .map(|s| Sample::new(s.timestamp, s.value))
        .collect();
    TimeSeries::from_labels(labels, samples)
}

pub fn series_to_proto(series: TimeSeries) -> proto::TimeSeries {
    proto::TimeSeries {
        labels: series
            .labels
            .into_iter()
            .map(|l| proto::Label {
                name: l.name,
                value: l.value,
            })
            .collect(),
        samples: series
            .samples
            .into_iter()
            .map(|s| proto::Sample {
                value: s.value,
                timestamp: s.timestamp_ms,
            })
            .collect(),
    }
}
