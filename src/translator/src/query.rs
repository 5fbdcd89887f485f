//! Remote-read query to `SELECT` translation

use tracing::debug;

use crate::column::TIMESTAMP_COLUMN;
use crate::error::Result;
use crate::matcher::matcher_to_predicate;
use crate::model::Query;
use crate::statement::SqlRequest;

/// Build the `SELECT` for `query` against `table`
///
/// All matcher predicates and both time bounds are joined with `AND`. Rows
/// are ordered by timestamp so samples can be appended to their series as
/// they arrive. No limit is applied; the whole matching set is requested.
/// Values are inlined as escaped literals, so the statement has no bound
/// arguments.
pub fn query_to_sql(table: &str, query: &Query) -> Result<SqlRequest> {
    let mut predicates = Vec::with_capacity(query.matchers.len() + 2);
    for matcher in &query.matchers {
        predicates.push(matcher_to_predicate(matcher)?);
    }
    predicates.push(format!("({TIMESTAMP_COLUMN} <= {})", query.end_ms));
    predicates.push(format!("({TIMESTAMP_COLUMN} >= {})", query.start_ms));

    let stmt = format!(
        "SELECT * FROM {table} WHERE {} ORDER BY {TIMESTAMP_COLUMN}",
        predicates.join(" AND ")
    );

    debug!(
        matchers = query.matchers.len(),
        start_ms = query.start_ms,
        end_ms = query.end_ms,
        "Translated remote-read query"
    );

    Ok(SqlRequest::statement(stmt))
}
