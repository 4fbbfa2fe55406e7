//! Error types for transformer setup and per-row transformation.

use crate::validation::ValidationWarnings;
use mask_core::{ParameterError, RecordError};
use mask_generator::GeneratorError;
use thiserror::Error;

/// Errors raised while configuring a transformer. All of them are fatal for
/// the column: no row is processed.
#[derive(Error, Debug)]
pub enum SetupError {
    /// Configuration rejected; carries every finding, fatal or not.
    #[error("Invalid configuration: {0}")]
    Validation(ValidationWarnings),

    /// Generator could not be created (entropy failure).
    #[error("Generator error: {0}")]
    Generation(#[from] GeneratorError),

    /// Parameter could not be read.
    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),

    /// No transformer with this name in the registry.
    #[error("Unknown transformer '{0}'")]
    UnknownTransformer(String),
}

/// Errors raised while transforming a single row.
#[derive(Error, Debug)]
pub enum TransformError {
    /// Generator failed. Fatal for the run.
    #[error("Generator error on column '{column}': {source}")]
    Generation {
        column: String,
        #[source]
        source: GeneratorError,
    },

    /// Dynamic bound invalid for this row. Fails only this row.
    #[error("Range error on column '{column}' in row {}: {message}", .row.as_deref().unwrap_or("<unknown>"))]
    Range {
        column: String,
        row: Option<String>,
        message: String,
    },

    /// Reading or writing the row failed.
    #[error("Record error on column '{column}': {source}")]
    Record {
        column: String,
        #[source]
        source: RecordError,
    },

    /// Transform was cancelled before completing; the row is unmodified.
    #[error("Transform cancelled")]
    Cancelled,

    /// Transform called before the dispatch was finalized.
    #[error("Transformer '{0}' used before finalize()")]
    NotFinalized(String),
}

impl TransformError {
    /// Whether the error affects only the current row.
    pub fn is_row_scoped(&self) -> bool {
        matches!(self, Self::Range { .. } | Self::Record { .. })
    }
}
