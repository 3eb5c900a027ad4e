//! Error types for tabular ingestion.
//!
//! Every fallible operation in the crate returns [`IngestError`]. The variants
//! line up with the points where extraction can stop:
//!
//! - `UnsupportedFormat` is raised before any byte of the source is read
//! - `Coercion` is raised at the row boundary and ends a record sequence
//! - `EmptyTable` is raised when the table path sees no data rows
//! - `Io` and `Workbook` come from the underlying stream or workbook reader
//!
//! Malformed quoting in delimited text is not an error; the tokenizer
//! recovers and logs instead.

use thiserror::Error;

/// Result type alias using `IngestError`.
pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File extension is not one of the supported text or workbook kinds
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A normalized row could not be converted into the target record
    ///
    /// `row` holds the JSON form of the offending row.
    #[error("Unable to coerce row {row}: {message}")]
    Coercion { row: String, message: String },

    /// The table path finished without a single data row
    #[error("Empty table: {0}")]
    EmptyTable(String),

    #[error("Workbook error: {message}")]
    Workbook {
        message: String,
        #[source]
        source: Option<calamine::Error>,
    },

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl IngestError {
    pub fn coercion(row: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Coercion {
            row: row.into(),
            message: message.into(),
        }
    }

    pub fn workbook(message: impl Into<String>) -> Self {
        Self::Workbook {
            message: message.into(),
            source: None,
        }
    }
}

impl From<calamine::Error> for IngestError {
    fn from(err: calamine::Error) -> Self {
        // Real IO errors bubble up unchanged
        match err {
            calamine::Error::Io(io_err) => Self::Io(io_err),
            other => Self::Workbook {
                message: other.to_string(),
                source: Some(other),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coercion_message_includes_row() {
        let err = IngestError::coercion(r#"{"id":"x"}"#, "invalid digit found in string");
        let message = err.to_string();
        assert!(message.contains(r#"{"id":"x"}"#));
        assert!(message.contains("invalid digit"));
    }

    #[test]
    fn test_calamine_io_error_stays_io() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated");
        let err: IngestError = calamine::Error::Io(io).into();
        assert!(matches!(err, IngestError::Io(_)));
    }

    #[test]
    fn test_calamine_message_error_becomes_workbook() {
        let err: IngestError = calamine::Error::Msg("bad sheet").into();
        match err {
            IngestError::Workbook { message, source } => {
                assert!(message.contains("bad sheet"));
                assert!(source.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
