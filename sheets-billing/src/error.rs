//! Error types shared by the range adapter and the table mapper

use thiserror::Error;

/// Failure of a tabular-store operation
#[derive(Error, Debug)]
pub enum StoreError {
    /// No row in `table` carries the requested identifier
    #[error("{table} record not found: {id}")]
    NotFound { table: &'static str, id: String },

    /// The backing spreadsheet service did not answer (network, auth, quota)
    #[error("sheet service unavailable while trying to {operation} '{range}': {source}")]
    RemoteUnavailable {
        range: String,
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl StoreError {
    pub fn not_found(table: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            table,
            id: id.into(),
        }
    }

    pub fn remote(
        range: impl Into<String>,
        operation: &'static str,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::RemoteUnavailable {
            range: range.into(),
            operation,
            source: source.into(),
        }
    }

    /// Check if this error is an absence signal rather than a failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if the remote service failed
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::RemoteUnavailable { .. })
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
