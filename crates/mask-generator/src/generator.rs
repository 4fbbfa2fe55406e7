//! Generator trait and engine selection.

use crate::generators::hash::{HashFunction, KeyedHash};
use crate::generators::projector::Projector;
use crate::generators::random::SeededRandom;
use crate::salt::Salt;
use std::fmt;
use std::str::FromStr;

/// Error type for generator operations.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Secure entropy source failed
    #[error("Unable to read from entropy source: {0}")]
    Entropy(String),

    /// Projection to an unsupported output size was requested
    #[error("Unsupported projected output size {size} (expected one of 4, 8, 16)")]
    UnsupportedProjection { size: usize },

    /// Generator produced fewer bytes than its consumer needs
    #[error("Generator produces {available} bytes, {required} are required")]
    ShortOutput { required: usize, available: usize },

    /// Unknown engine name
    #[error("Unknown engine '{0}' (expected 'random' or 'hash')")]
    UnknownEngine(String),

    /// Unknown hash function name
    #[error("Unknown hash function '{0}'")]
    UnknownHashFunction(String),
}

/// Produces a fixed-size byte block from input bytes.
///
/// `size()` is fixed at construction and every successful `generate` call
/// returns exactly that many bytes. Generators are `Send` so a transformer
/// can be moved to a worker thread, but a single instance is never shared
/// between threads.
pub trait Generator: Send {
    /// Generate `size()` bytes for `input`.
    fn generate(&mut self, input: &[u8]) -> Result<Vec<u8>, GeneratorError>;

    /// Number of bytes produced per call.
    fn size(&self) -> usize;
}

impl<G: Generator + ?Sized> Generator for Box<G> {
    fn generate(&mut self, input: &[u8]) -> Result<Vec<u8>, GeneratorError> {
        (**self).generate(input)
    }

    fn size(&self) -> usize {
        (**self).size()
    }
}

/// Generation engine selected per column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Engine {
    /// Seeded RNG, not reproducible across runs
    #[default]
    Random,
    /// Keyed hash of salt and input, reproducible across runs
    Hash,
}

impl FromStr for Engine {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(Self::Random),
            "hash" | "keyed-hash" => Ok(Self::Hash),
            other => Err(GeneratorError::UnknownEngine(other.to_string())),
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => f.write_str("random"),
            Self::Hash => f.write_str("hash"),
        }
    }
}

/// Build a generator producing exactly `size` bytes per call.
///
/// For [`Engine::Hash`] a [`Projector`] is interposed whenever the hash
/// function's natural digest size differs from `size`. A missing salt hashes
/// with an empty salt.
pub fn build_generator(
    engine: Engine,
    size: usize,
    salt: Option<&Salt>,
    hash_function: HashFunction,
) -> Result<Box<dyn Generator>, GeneratorError> {
    match engine {
        Engine::Random => Ok(Box::new(SeededRandom::from_entropy(size)?)),
        Engine::Hash => {
            let base = KeyedHash::new(salt.cloned().unwrap_or_default(), hash_function);
            if base.size() == size {
                Ok(Box::new(base))
            } else {
                tracing::debug!(
                    "Projecting {} digest of {} bytes to {} bytes",
                    hash_function,
                    base.size(),
                    size
                );
                Ok(Box::new(Projector::new(base, size)?))
            }
        }
    }
}
