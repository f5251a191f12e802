use mono2notion_core::DateFormatError;
use thiserror::Error;

/// Failures before any record reaches delivery. Each one aborts the invocation.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("cannot fetch statement {location}: {reason}")]
    Fetch { location: String, reason: String },

    /// `row` is the 1-based data row; 0 means the header or the file itself.
    #[error("malformed statement at row {row}: {reason}")]
    Parse { row: u64, reason: String },

    #[error("row {row}: {source}")]
    DateFormat {
        row: u64,
        #[source]
        source: DateFormatError,
    },
}

impl IngestError {
    pub(crate) fn fetch(location: impl Into<String>, reason: impl ToString) -> Self {
        Self::Fetch {
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn parse(row: u64, reason: impl ToString) -> Self {
        Self::Parse {
            row,
            reason: reason.to_string(),
        }
    }
}
