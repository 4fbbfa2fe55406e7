//! Integer noise engine.
//!
//! Each value is moved by a random percentage of itself, drawn from the
//! configured band, in a random direction:
//!
//! ```text
//! bytes  = generator(value)                 16 bytes
//! r      = lower + frac(bytes[0..8]) * (upper - lower)
//! sign   = bytes[8] & 1 ? -1 : +1
//! result = clamp(saturate(value + sign * round(value * r)))
//! ```
//!
//! The intermediate is computed in `i128`, saturated into the column width
//! and only then clamped into the limiter, so the result never wraps.

use crate::limiter::Limiter;
use mask_generator::{Generator, GeneratorError};

/// Bytes the engine consumes per value: 8 for the ratio, 1 for the sign,
/// padded to a supported projection size.
pub const NOISE_BYTE_LENGTH: usize = 16;

/// Error constructing a [`NoiseBand`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NoiseBandError {
    #[error("ratio {0} is outside [0, 1]")]
    OutOfRange(f64),

    #[error("lower ratio {lower} is greater than upper ratio {upper}")]
    Inverted { lower: f64, upper: f64 },
}

/// Interval `[lower, upper)` the perturbation percentage is drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseBand {
    lower: f64,
    upper: f64,
}

impl NoiseBand {
    pub fn new(lower: f64, upper: f64) -> Result<Self, NoiseBandError> {
        for ratio in [lower, upper] {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(NoiseBandError::OutOfRange(ratio));
            }
        }
        if lower > upper {
            return Err(NoiseBandError::Inverted { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Map 64 random bits uniformly onto the band.
    ///
    /// The top 53 bits become a fraction in `[0, 1)`. The result stays
    /// strictly below `upper` unless the band is degenerate.
    pub fn ratio_from_bits(&self, bits: u64) -> f64 {
        let fraction = (bits >> 11) as f64 / (1u64 << 53) as f64;
        let ratio = self.lower + fraction * (self.upper - self.lower);
        if ratio >= self.upper && self.lower < self.upper {
            // Rounding can land on upper; step to the next f64 below it.
            // upper > lower >= 0 here, so upper is positive and finite
            return f64::from_bits(self.upper.to_bits() - 1);
        }
        ratio
    }
}

/// Apply a signed ratio to `value` under `limiter`.
///
/// Saturates to the limiter's width before clamping.
pub fn perturb(value: i64, ratio: f64, negative: bool, limiter: &Limiter) -> i64 {
    // f64 -> i128 casts saturate
    let delta = (value as f64 * ratio).round() as i128;
    let candidate = if negative {
        value as i128 - delta
    } else {
        value as i128 + delta
    };
    limiter.clamp(limiter.width().saturate(candidate))
}

/// Draws noise for integer values from a generator.
pub struct NoiseEngine {
    band: NoiseBand,
    generator: Box<dyn Generator>,
}

impl NoiseEngine {
    /// Create an engine. The generator must produce at least
    /// [`NOISE_BYTE_LENGTH`] bytes per call.
    pub fn new(band: NoiseBand, generator: Box<dyn Generator>) -> Result<Self, GeneratorError> {
        if generator.size() < NOISE_BYTE_LENGTH {
            return Err(GeneratorError::ShortOutput {
                required: NOISE_BYTE_LENGTH,
                available: generator.size(),
            });
        }
        Ok(Self { band, generator })
    }

    /// Compute the noised value of `value`, bounded by `limiter`.
    pub fn transform(&mut self, value: i64, limiter: &Limiter) -> Result<i64, GeneratorError> {
        let bytes = self.generator.generate(&value.to_le_bytes())?;
        let short = || GeneratorError::ShortOutput {
            required: NOISE_BYTE_LENGTH,
            available: bytes.len(),
        };
        let ratio_bits: [u8; 8] = bytes
            .get(..8)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(short)?;
        let sign_byte = *bytes.get(8).ok_or_else(short)?;

        let ratio = self.band.ratio_from_bits(u64::from_le_bytes(ratio_bits));
        let negative = sign_byte & 1 == 1;
        Ok(perturb(value, ratio, negative, limiter))
    }
}
