//! Core types for the noise-mask framework.
//!
//! This crate provides the collaborator types the column transformers are
//! written against:
//!
//! - [`UniversalType`] and [`IntWidth`] - column storage classes
//! - [`UniversalValue`] and [`Record`] - row values and field access
//! - [`TableDefinition`] and [`ColumnBinding`] - schema and column lookup
//! - [`Parameter`] - scanned transformer parameters, static or dynamic
//!
//! # Architecture
//!
//! ```text
//! mask-core (this crate)
//!    │
//!    ├─── mask-generator     (byte generators, no dependency on rows)
//!    │
//!    └─── mask-transformers  (reads/writes records through RowAccess,
//!                             resolves columns through ColumnLookup)
//! ```
//!
//! # Example
//!
//! ```rust
//! use mask_core::{ColumnBinding, IntWidth, TableDefinition};
//!
//! let table = TableDefinition::from_yaml(r#"
//! name: payments
//! primary_key: id
//! columns:
//!   - name: id
//!     type: big_int
//!   - name: amount
//!     type: int
//! "#).unwrap();
//!
//! let binding = ColumnBinding::resolve(&table, "amount").unwrap();
//! assert_eq!(binding.index, 1);
//! assert_eq!(binding.width, IntWidth::Int32);
//! ```

pub mod json;
pub mod params;
pub mod schema;
pub mod types;
pub mod values;

// Re-exports for convenience
pub use params::{DynamicBinding, Parameter, ParameterError};
pub use schema::{ColumnBinding, ColumnDefinition, ColumnLookup, SchemaError, TableDefinition};
pub use types::{IntWidth, UniversalType};
pub use values::{Record, RecordError, RowAccess, UniversalValue};
