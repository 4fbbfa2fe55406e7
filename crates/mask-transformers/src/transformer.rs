//! Transformer trait and setup context.

use crate::error::TransformError;
use crate::validation::ValidationWarnings;
use mask_core::{ColumnLookup, RowAccess};
use mask_generator::{HashFunction, Salt};
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;

/// A configured column transformer.
///
/// Lifecycle: built by a factory, [`finalize`](Transformer::finalize)d once,
/// then driven row by row. A transformer owns its generator and is never
/// shared between threads; it may be moved to a worker.
pub trait Transformer: Send {
    /// Registered name, used in logs and errors.
    fn name(&self) -> &str;

    /// Columns written by this transformer, keyed by index.
    fn affected_columns(&self) -> &BTreeMap<usize, String>;

    /// Fix the processing mode. Must be called exactly once before
    /// [`transform`](Transformer::transform).
    fn finalize(&mut self) -> Result<(), TransformError>;

    /// Transform one row in place.
    ///
    /// On error the row is left as it was before the call.
    fn transform(
        &mut self,
        row: &mut dyn RowAccess,
        cancel: &CancellationToken,
    ) -> Result<(), TransformError>;
}

/// Everything a factory may consult while building a transformer.
#[derive(Clone, Copy)]
pub struct SetupContext<'a> {
    pub columns: &'a dyn ColumnLookup,
    pub salt: Option<&'a Salt>,
    pub hash_function: HashFunction,
}

impl<'a> SetupContext<'a> {
    pub fn new(columns: &'a dyn ColumnLookup) -> Self {
        Self {
            columns,
            salt: None,
            hash_function: HashFunction::default(),
        }
    }

    pub fn with_salt(mut self, salt: Option<&'a Salt>) -> Self {
        self.salt = salt.filter(|s| !s.is_empty());
        self
    }

    pub fn with_hash_function(mut self, hash_function: HashFunction) -> Self {
        self.hash_function = hash_function;
        self
    }
}

/// A freshly built transformer plus its non-fatal findings.
pub struct Built {
    pub transformer: Box<dyn Transformer>,
    pub warnings: ValidationWarnings,
}
