//! Byte generators for the noise-mask transformers.
//!
//! A [`Generator`] turns optional input bytes into a fixed-size byte block.
//! Transformers consume that block to derive their random decisions, so the
//! choice of generator decides whether masking is reproducible.
//!
//! # Architecture
//!
//! ```text
//!            input bytes (e.g. original value)
//!                      │
//!        ┌─────────────┴──────────────┐
//!        ▼                            ▼
//! ┌──────────────┐          ┌───────────────────┐
//! │ SeededRandom │          │     KeyedHash     │
//! │ (StdRng,     │          │ H(salt || input)  │
//! │  OS seed)    │          └─────────┬─────────┘
//! └──────┬───────┘                    │ natural digest size
//!        │                            ▼
//!        │                  ┌───────────────────┐
//!        │                  │     Projector     │
//!        │                  │ BLAKE3 XOF→4/8/16 │
//!        │                  └─────────┬─────────┘
//!        ▼                            ▼
//!             bytes[size requested at setup]
//! ```
//!
//! # Example
//!
//! ```rust
//! use mask_generator::{build_generator, Engine, HashFunction, Salt};
//!
//! let salt = Salt::from_bytes(b"run-secret".to_vec());
//! let mut generator = build_generator(Engine::Hash, 8, Some(&salt), HashFunction::Sha256).unwrap();
//!
//! let first = generator.generate(b"42").unwrap();
//! let second = generator.generate(b"42").unwrap();
//! assert_eq!(first.len(), 8);
//! assert_eq!(first, second);
//! ```
//!
//! # Engines
//!
//! - `random` - process-local seeded RNG, not reproducible across runs
//! - `hash` - keyed hash of salt and input, reproducible given the same salt

pub mod generator;
pub mod generators;
pub mod salt;

// Re-exports for convenience
pub use generator::{build_generator, Engine, Generator, GeneratorError};
pub use generators::hash::{HashFunction, KeyedHash};
pub use generators::projector::{Projector, PROJECTOR_SIZES};
pub use generators::random::SeededRandom;
pub use salt::{Salt, SaltDecodeError};
