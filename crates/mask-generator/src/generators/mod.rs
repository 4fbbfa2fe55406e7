//! Concrete generator implementations.
//!
//! - [`random::SeededRandom`] - seeded RNG, deterministic within one instance
//! - [`hash::KeyedHash`] - hash of salt and input, deterministic across runs
//! - [`projector::Projector`] - second hash stage fixing the output size

pub mod hash;
pub mod projector;
pub mod random;
