//! Validated inclusive range limits.

use mask_core::IntWidth;

/// Error constructing a [`Limiter`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LimiterError {
    /// Lower bound above upper bound
    #[error("min value {min} is greater than max value {max}")]
    InvertedBounds { min: i64, max: i64 },

    /// Bound not representable in the declared width
    #[error("{bound} value {value} is out of range of {width}")]
    OutOfWidth {
        bound: &'static str,
        value: i64,
        width: IntWidth,
    },
}

/// Inclusive `[min, max]` bound for a declared integer width.
///
/// Immutable once constructed. `min <= max` and both bounds are
/// representable in `width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limiter {
    min: i64,
    max: i64,
    width: IntWidth,
}

impl Limiter {
    pub fn new(min: i64, max: i64, width: IntWidth) -> Result<Self, LimiterError> {
        if !width.contains(min) {
            return Err(LimiterError::OutOfWidth {
                bound: "min",
                value: min,
                width,
            });
        }
        if !width.contains(max) {
            return Err(LimiterError::OutOfWidth {
                bound: "max",
                value: max,
                width,
            });
        }
        if min > max {
            return Err(LimiterError::InvertedBounds { min, max });
        }
        Ok(Self { min, max, width })
    }

    /// Limiter spanning the whole representable range of `width`.
    pub fn for_width(width: IntWidth) -> Self {
        Self {
            min: width.min_value(),
            max: width.max_value(),
            width,
        }
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn width(&self) -> IntWidth {
        self.width
    }

    /// Clamp `value` into `[min, max]`.
    pub fn clamp(&self, value: i64) -> i64 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }
}
