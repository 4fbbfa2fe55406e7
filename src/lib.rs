//! NoiseMask Library
//!
//! Masks integer columns of exported rows by adding bounded percentage
//! noise, either randomly or reproducibly under a shared salt.
//!
//! # Features
//!
//! - Per-column `NoiseInt` transformers with static or per-row limits
//! - Reproducible masking: `engine: hash` maps equal inputs to equal outputs
//! - Type-safe results: values never leave their column's integer width
//! - Streaming JSONL input and output
//!
//! # Crates
//!
//! - `mask_core` - column types, records, table definitions, parameters
//! - `mask_generator` - seeded random and keyed hash byte generators
//! - `mask_transformers` - noise engine, limiters and the transformer registry
//!
//! # CLI Usage
//!
//! ```bash
//! # Mask a JSONL export with a shared salt
//! NOISE_MASK_SALT=$(noise-mask generate-salt) \
//!   noise-mask mask --config mask.yaml --input rows.jsonl --output masked.jsonl
//!
//! # List available transformers and their parameters
//! noise-mask transformers
//! ```

pub mod config;
pub mod jsonl;
pub mod pipeline;

pub use config::MaskConfig;
pub use jsonl::{mask_path, mask_stream, MaskOptions, MaskStats};
pub use pipeline::MaskPipeline;
