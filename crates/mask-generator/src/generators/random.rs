//! Seeded random generator.

use crate::generator::{Generator, GeneratorError};
use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};

/// Generator backed by a seeded `StdRng`.
///
/// The input bytes are ignored: each call returns the next `size` bytes of
/// the stream. Two instances seeded from the OS produce unrelated streams.
pub struct SeededRandom {
    rng: StdRng,
    size: usize,
}

impl SeededRandom {
    /// Seed from the operating system's secure entropy source.
    pub fn from_entropy(size: usize) -> Result<Self, GeneratorError> {
        let mut seed = [0u8; 8];
        OsRng
            .try_fill_bytes(&mut seed)
            .map_err(|e| GeneratorError::Entropy(e.to_string()))?;
        Ok(Self::with_seed(u64::from_le_bytes(seed), size))
    }

    /// Seed explicitly. Used for reproducible tests.
    pub fn with_seed(seed: u64, size: usize) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            size,
        }
    }
}

impl Generator for SeededRandom {
    fn generate(&mut self, _input: &[u8]) -> Result<Vec<u8>, GeneratorError> {
        let mut out = vec![0u8; self.size];
        self.rng.fill_bytes(&mut out);
        Ok(out)
    }

    fn size(&self) -> usize {
        self.size
    }
}
