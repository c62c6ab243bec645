use thiserror::Error;

/// Top-level error type for the export service.
#[derive(Error, Debug)]
pub enum RollbookError {
    /// The record store was unreachable or a query failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The store holds no student records; nothing to export.
    #[error("No records found")]
    NoRecords,

    /// A document serializer failed.
    #[error("Document generation failed: {0}")]
    Document(String),

    /// Runtime faults outside the pipeline proper (task join, etc.).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RollbookError {
    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }

    pub fn document(err: impl std::fmt::Display) -> Self {
        Self::Document(err.to_string())
    }

    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::Internal(err.to_string())
    }
}
