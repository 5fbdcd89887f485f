//! Rebuilding time series from flat result rows
//!
//! The store returns one row per sample. Rows are grouped by their label set
//! into series; series come out ordered by their [`SeriesKey`], and samples
//! keep the order of the rows (the query orders them by timestamp).

use std::collections::BTreeMap;

use serde_json::Value;

use crate::column::{Column, TIMESTAMP_COLUMN, VALUE_RAW_COLUMN, decode_value_raw};
use crate::error::{Result, TranslateError};
use crate::model::{LabelSet, Sample, SeriesKey, TimeSeries};
use crate::statement::ResultTable;

/// Classified columns of a result table
#[derive(Debug)]
struct ColumnLayout {
    columns: Vec<Column>,
    value_raw: usize,
    timestamp: usize,
}

impl ColumnLayout {
    fn new(names: &[String]) -> Result<Self> {
        let columns: Vec<Column> = names.iter().map(|n| Column::parse(n)).collect();
        let position = |wanted: &Column, name: &'static str| {
            columns
                .iter()
                .position(|c| c == wanted)
                .ok_or(TranslateError::MissingColumn(name))
        };
        let value_raw = position(&Column::ValueRaw, VALUE_RAW_COLUMN)?;
        let timestamp = position(&Column::Timestamp, TIMESTAMP_COLUMN)?;

        Ok(Self {
            columns,
            value_raw,
            timestamp,
        })
    }

    fn labels(&self, row_index: usize, row: &[Value]) -> Result<LabelSet> {
        let mut labels = LabelSet::new();
        for (column, cell) in self.columns.iter().zip(row) {
            let Column::Label(name) = column else {
                continue;
            };
            match cell {
                Value::Null => {}
                // Empty and absent labels are the same series
                Value::String(value) if value.is_empty() => {}
                Value::String(value) => labels.insert(name.clone(), value.clone()),
                other => {
                    return Err(TranslateError::NotAString {
                        row: row_index,
                        column: name.clone(),
                        value: other.to_string(),
                    });
                }
            }
        }
        Ok(labels)
    }
}

fn integer_cell(row: usize, column: &str, cell: &Value) -> Result<i64> {
    cell.as_i64().ok_or_else(|| TranslateError::NotAnInteger {
        row,
        column: column.to_string(),
        value: cell.to_string(),
    })
}

/// Group result rows into time series
///
/// A row without any non-null label cell belongs to the series with no
/// labels. A row that does not fit the column layout fails the whole
/// assembly; no series are returned in that case.
pub fn assemble_time_series(table: &ResultTable) -> Result<Vec<TimeSeries>> {
    if table.rows.is_empty() {
        return Ok(Vec::new());
    }

    let layout = ColumnLayout::new(&table.cols)?;
    let mut series: BTreeMap<SeriesKey, Vec<Sample>> = BTreeMap::new();

    for (index, row) in table.rows.iter().enumerate() {
        if row.len() != layout.columns.len() {
            return Err(TranslateError::RowWidth {
                row: index,
                expected: layout.columns.len(),
                actual: row.len(),
            });
        }

        let labels = layout.labels(index, row)?;
        let timestamp_ms = integer_cell(index, TIMESTAMP_COLUMN, &row[layout.timestamp])?;
        let raw = integer_cell(index, VALUE_RAW_COLUMN, &row[layout.value_raw])?;

        series
            .entry(labels.key())
            .or_default()
            .push(Sample::new(timestamp_ms, decode_value_raw(raw)));
    }

    Ok(series
        .into_iter()
        .map(|(key, samples)| TimeSeries::from_labels(key.into_labels(), samples))
        .collect())
}
