//! Remote-write batch to bulk `INSERT` translation

use std::collections::BTreeSet;

use tracing::debug;

use crate::column::{Column, encode_value_raw};
use crate::escape::escape_label_name;
use crate::model::{LabelSet, TimeSeries};
use crate::statement::{SqlRequest, SqlValue};

/// Human readable rendering of a sample value for the `value` column
///
/// Text survives the JSON transport for NaN and the infinities, which JSON
/// numbers cannot express.
pub fn format_sample_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        format!("{value:.6}")
    }
}

/// Build one bulk `INSERT` covering every sample of `series`
///
/// The statement has a column for every label name used in the batch, sorted
/// by name, followed by `value`, `valueRaw` and `timestamp`. Each sample
/// becomes one argument row; labels a series lacks, or carries with an empty
/// value, are bound as `NULL`.
pub fn write_to_sql(table: &str, series: &[TimeSeries]) -> SqlRequest {
    let label_sets: Vec<LabelSet> = series.iter().map(TimeSeries::label_set).collect();
    let names: BTreeSet<&str> = label_sets.iter().flat_map(LabelSet::names).collect();

    let mut columns: Vec<String> = names.iter().map(|name| escape_label_name(name)).collect();
    let fixed = [Column::Value, Column::ValueRaw, Column::Timestamp];
    columns.extend(fixed.map(|c| c.sql_identifier()));
    let placeholders = vec!["?"; columns.len()].join(", ");
    let stmt = format!(
        "INSERT INTO {table} ({}) VALUES ({placeholders})",
        columns.join(", ")
    );

    let sample_count: usize = series.iter().map(|ts| ts.samples.len()).sum();
    let mut bulk_args = Vec::with_capacity(sample_count);

    for (ts, labels) in series.iter().zip(&label_sets) {
        for sample in &ts.samples {
            let mut row = Vec::with_capacity(columns.len());
            for name in &names {
                let value = labels.non_empty(name);
                row.push(value.map_or(SqlValue::Null, SqlValue::from));
            }
            row.push(SqlValue::Text(format_sample_value(sample.value)));
            row.push(SqlValue::Integer(encode_value_raw(sample.value)));
            row.push(SqlValue::Integer(sample.timestamp_ms));
            bulk_args.push(row);
        }
    }

    debug!(
        series = series.len(),
        samples = sample_count,
        label_columns = names.len(),
        "Translated remote-write batch"
    );

    SqlRequest::bulk(stmt, bulk_args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Label, Sample};

    fn series(labels: &[(&str, &str)], samples: &[(i64, f64)]) -> TimeSeries {
        TimeSeries::from_labels(
            labels.iter().map(|(n, v)| Label::new(*n, *v)).collect(),
            samples.iter().map(|(t, v)| Sample::new(*t, *v)).collect(),
        )
    }

    #[test]
    fn test_format_sample_value() {
        assert_eq!(format_sample_value(1.5), "1.500000");
        assert_eq!(format_sample_value(-0.25), "-0.250000");
        assert_eq!(format_sample_value(f64::NAN), "NaN");
        assert_eq!(format_sample_value(f64::INFINITY), "+Inf");
        assert_eq!(format_sample_value(f64::NEG_INFINITY), "-Inf");
    }

    #[test]
    fn test_label_union_binds_null_for_missing_labels() {
        let batch = vec![
            series(&[("a", "1")], &[(1000, 1.0)]),
            series(&[("b", "2")], &[(2000, 2.0)]),
        ];

        let request = write_to_sql("metrics", &batch);
        assert_eq!(
            request.stmt,
            r#"INSERT INTO metrics ("la", "lb", "value", "valueRaw", "timestamp") VALUES (?, ?, ?, ?, ?)"#
        );

        let rows = request.bulk_args.unwrap();
        assert_eq!(
            rows,
            vec![
                vec![
                    SqlValue::from("1"),
                    SqlValue::Null,
                    SqlValue::from("1.000000"),
                    SqlValue::Integer(encode_value_raw(1.0)),
                    SqlValue::Integer(1000),
                ],
                vec![
                    SqlValue::Null,
                    SqlValue::from("2"),
                    SqlValue::from("2.000000"),
                    SqlValue::Integer(encode_value_raw(2.0)),
                    SqlValue::Integer(2000),
                ],
            ]
        );
    }

    #[test]
    fn test_one_row_per_sample() {
        let batch = vec![
            series(&[("__name__", "up")], &[(1, 1.0), (2, 1.0), (3, 0.0)]),
            series(&[("__name__", "down")], &[(1, 0.0), (2, 0.0)]),
            series(&[("__name__", "idle")], &[]),
        ];
        let request = write_to_sql("metrics", &batch);
        assert_eq!(request.row_count(), 5);
    }

    #[test]
    fn test_label_order_and_duplicates_are_normalized() {
        let labels = [("job", "api"), ("__name__", "up"), ("job", "web")];
        let batch = vec![series(&labels, &[(5, 1.0)])];
        let request = write_to_sql("metrics", &batch);
        let prefix = r#"INSERT INTO metrics ("l__name__", "ljob", "value""#;
        assert!(request.stmt.starts_with(prefix));
        let rows = request.bulk_args.unwrap();
        assert_eq!(rows[0][0], SqlValue::from("up"));
        assert_eq!(rows[0][1], SqlValue::from("web"));
    }

    #[test]
    fn test_empty_label_value_is_bound_as_null() {
        let batch = vec![series(&[("__name__", "up"), ("env", "")], &[(5, 1.0)])];
        let request = write_to_sql("metrics", &batch);
        assert!(request.stmt.contains(r#""lenv""#));
        assert_eq!(request.bulk_args.unwrap()[0][1], SqlValue::Null);
    }

    #[test]
    fn test_special_values_keep_their_bits() {
        let stale = f64::from_bits(0x7ff0_0000_0000_0002);
        let samples = [
            (1, f64::NAN),
            (2, f64::INFINITY),
            (3, f64::NEG_INFINITY),
            (4, stale),
        ];
        let batch = vec![series(&[("__name__", "m")], &samples)];
        let rows = write_to_sql("metrics", &batch).bulk_args.unwrap();

        let expected = [
            ("NaN", f64::NAN),
            ("+Inf", f64::INFINITY),
            ("-Inf", f64::NEG_INFINITY),
            ("NaN", stale),
        ];
        for (row, (text, value)) in rows.iter().zip(expected) {
            assert_eq!(row[1], SqlValue::from(text));
            assert_eq!(row[2], SqlValue::Integer(value.to_bits() as i64));
        }
    }

    #[test]
    fn test_series_without_labels() {
        let batch = vec![series(&[], &[(9, 3.0)])];
        let request = write_to_sql("metrics", &batch);
        assert_eq!(
            request.stmt,
            r#"INSERT INTO metrics ("value", "valueRaw", "timestamp") VALUES (?, ?, ?)"#
        );
        assert_eq!(request.bulk_args.unwrap()[0].len(), 3);
    }

    #[test]
    fn test_label_names_are_escaped() {
        let batch = vec![series(&[("we\"ird", "it's")], &[(1, 1.0)])];
        let request = write_to_sql("metrics", &batch);
        assert!(request.stmt.contains(r#""lwe\"ird""#));
        // Bound values are passed as-is, the store does not parse them
        assert_eq!(request.bulk_args.unwrap()[0][0], SqlValue::from("it's"));
    }
}
