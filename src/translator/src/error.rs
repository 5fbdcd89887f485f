use thiserror::Error;

/// Errors raised while translating between remote storage and SQL
#[derive(Debug, Error)]
pub enum TranslateError {
    /// A regex matcher carried a pattern the regex engine rejects
    #[error("invalid regular expression {pattern:?} for label {label:?}: {source}")]
    InvalidRegex {
        label: String,
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },

    /// The result table lacks a column the assembler needs
    #[error("result table is missing the {0:?} column")]
    MissingColumn(&'static str),

    /// A result row does not have one cell per column
    #[error("result row {row} has {actual} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// A cell expected to hold an exact integer held something else
    #[error("column {column:?} in row {row} is not a 64-bit integer: {value}")]
    NotAnInteger {
        row: usize,
        column: String,
        value: String,
    },

    /// A label cell held something other than a string or null
    #[error("label column {column:?} in row {row} is not a string: {value}")]
    NotAString {
        row: usize,
        column: String,
        value: String,
    },
}

impl TranslateError {
    /// Whether the error was caused by the caller's input rather than by the
    /// store or the adapter
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidRegex { .. })
    }
}

pub type Result<T> = std::result::Result<T, TranslateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        let pattern = String::from("(");
        let source = regex::Regex::new(&pattern).unwrap_err();
        let err = TranslateError::InvalidRegex {
            label: "job".to_string(),
            pattern,
            source: Box::new(source),
        };
        assert!(err.is_client_error());
        assert!(err.to_string().contains("job"));

        assert!(!TranslateError::MissingColumn("valueRaw").is_client_error());
    }
}
