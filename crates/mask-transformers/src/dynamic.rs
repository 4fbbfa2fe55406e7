//! Per-row range resolution.

use crate::limiter::{Limiter, LimiterError};
use mask_core::{IntWidth, Parameter, ParameterError, RowAccess};

/// Error resolving a row's limiter. Scoped to that row only.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error("dynamic parameter {bound} resolved to null and has no default")]
    Null { bound: &'static str },

    #[error("requested dynamic parameter {bound} value {value} is out of range of {width}")]
    OutOfWidth {
        bound: &'static str,
        value: i64,
        width: IntWidth,
    },

    #[error(transparent)]
    Limiter(#[from] LimiterError),
}

/// Where one side of the range comes from.
#[derive(Debug, Clone)]
pub enum BoundSource {
    /// Fixed at setup
    Static(i64),
    /// Read from another column of the row
    Dynamic(Parameter),
}

impl BoundSource {
    fn resolve(
        &self,
        bound: &'static str,
        width: IntWidth,
        row: &dyn RowAccess,
    ) -> Result<i64, ResolveError> {
        let value = match self {
            Self::Static(value) => *value,
            Self::Dynamic(param) => param
                .scan_dynamic_int(row)?
                .ok_or(ResolveError::Null { bound })?,
        };
        if !width.contains(value) {
            return Err(ResolveError::OutOfWidth {
                bound,
                value,
                width,
            });
        }
        Ok(value)
    }
}

/// Builds a fresh [`Limiter`] for every row from that row's values.
///
/// No caching: bounds may legitimately differ from row to row.
#[derive(Debug, Clone)]
pub struct DynamicRangeResolver {
    width: IntWidth,
    min: BoundSource,
    max: BoundSource,
}

impl DynamicRangeResolver {
    pub fn new(width: IntWidth, min: BoundSource, max: BoundSource) -> Self {
        Self { width, min, max }
    }

    /// Resolve the limiter for `row`.
    pub fn resolve(&self, row: &dyn RowAccess) -> Result<Limiter, ResolveError> {
        let min = self.min.resolve("min", self.width, row)?;
        let max = self.max.resolve("max", self.width, row)?;
        Ok(Limiter::new(min, max, self.width)?)
    }
}
