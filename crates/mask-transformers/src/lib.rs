//! Column transformers for the noise-mask framework.
//!
//! Transformers are looked up by name in a [`TransformerRegistry`], bound
//! against a table and their user configuration, finalized, then driven row
//! by row through [`Transformer::transform`].
//!
//! # Architecture
//!
//! ```text
//!  TransformerConfig ──► bind_parameters ──► factory ──► Box<dyn Transformer>
//!                          │                   │
//!                 ValidationWarnings    NoiseEngine + Generator
//!                                              │
//!                               finalize: Static(Limiter)
//!                                      or Dynamic(DynamicRangeResolver)
//! ```
//!
//! # Example
//!
//! ```rust
//! use mask_core::{Record, TableDefinition, UniversalValue};
//! use mask_transformers::{SetupContext, TransformerConfig, TransformerRegistry};
//! use tokio_util::sync::CancellationToken;
//!
//! let table = TableDefinition::from_yaml(r#"
//! name: payments
//! columns:
//!   - name: amount
//!     type: int
//! "#).unwrap();
//! let config: TransformerConfig = serde_yaml::from_str(r#"
//! name: NoiseInt
//! params:
//!   column: amount
//!   min: 0
//!   max: 2000
//! "#).unwrap();
//!
//! let registry = TransformerRegistry::with_defaults();
//! let mut built = registry.instantiate(&SetupContext::new(&table), &config).unwrap();
//! built.transformer.finalize().unwrap();
//!
//! let mut row = Record::new("payments", 0, vec![UniversalValue::Int32(1000)]);
//! built.transformer.transform(&mut row, &CancellationToken::new()).unwrap();
//! assert_ne!(row.get(0), Some(&UniversalValue::Int32(1000)));
//! ```

pub mod definition;
pub mod dynamic;
pub mod error;
pub mod limiter;
pub mod noise;
pub mod noise_int;
pub mod registry;
pub mod transformer;
pub mod validation;

// Re-exports for convenience
pub use definition::{
    bind_parameters, ColumnProperties, DynamicModeProperties, DynamicParamConfig,
    ParameterDefinition, Parameters, TransformerConfig,
};
pub use dynamic::{BoundSource, DynamicRangeResolver, ResolveError};
pub use error::{SetupError, TransformError};
pub use limiter::{Limiter, LimiterError};
pub use noise::{perturb, NoiseBand, NoiseBandError, NoiseEngine, NOISE_BYTE_LENGTH};
pub use noise_int::NoiseIntTransformer;
pub use registry::{RegistryError, TransformerDefinition, TransformerFactory, TransformerRegistry};
pub use transformer::{Built, SetupContext, Transformer};
pub use validation::{Severity, ValidationWarning, ValidationWarnings};
