//! Table definitions and column lookup.
//!
//! A [`TableDefinition`] describes the columns of the rows flowing through a
//! masking run. Transformers resolve the columns they touch once, at setup,
//! into a [`ColumnBinding`] and keep only the index afterwards.

use crate::types::{IntWidth, UniversalType};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for schema operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading schema file
    #[error("Failed to read schema file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Column not found in table schema
    #[error("Column '{column}' not found in table '{table}'")]
    ColumnNotFound { table: String, column: String },

    /// Column exists but is not a 16/32/64-bit integer
    #[error("Column '{column}' has type {column_type}, expected an integer type")]
    NotAnIntegerColumn {
        column: String,
        column_type: UniversalType,
    },

    /// Two columns share a name
    #[error("Duplicate column '{column}' in table '{table}'")]
    DuplicateColumn { table: String, column: String },
}

// ============================================================================
// Definitions
// ============================================================================

/// Column definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnDefinition {
    /// Column name
    pub name: String,

    /// Column type
    #[serde(rename = "type")]
    pub column_type: UniversalType,

    /// Whether this column is nullable
    #[serde(default)]
    pub nullable: bool,
}

impl ColumnDefinition {
    /// Create a new column definition.
    pub fn new(name: impl Into<String>, column_type: UniversalType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: false,
        }
    }

    /// Create a new nullable column definition.
    pub fn nullable(name: impl Into<String>, column_type: UniversalType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: true,
        }
    }
}

/// Table definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableDefinition {
    /// Table name
    pub name: String,

    /// Column whose value identifies a row in error reports
    #[serde(default)]
    pub primary_key: Option<String>,

    /// Column definitions, in row order
    pub columns: Vec<ColumnDefinition>,
}

impl TableDefinition {
    /// Create a new table definition.
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDefinition>) -> Self {
        Self {
            name: name.into(),
            primary_key: None,
            columns,
        }
    }

    /// Set the primary key column.
    pub fn with_primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = Some(column.into());
        self
    }

    /// Load a table definition from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a table definition from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        let table: Self = serde_yaml::from_str(yaml)?;
        table.validate()?;
        Ok(table)
    }

    /// Check column names are unique and the primary key exists.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for (idx, column) in self.columns.iter().enumerate() {
            if self.columns[..idx].iter().any(|c| c.name == column.name) {
                return Err(SchemaError::DuplicateColumn {
                    table: self.name.clone(),
                    column: column.name.clone(),
                });
            }
        }
        if let Some(pk) = &self.primary_key {
            if self.column_by_name(pk).is_none() {
                return Err(SchemaError::ColumnNotFound {
                    table: self.name.clone(),
                    column: pk.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Column lookup capability.
pub trait ColumnLookup {
    /// Name of the table being looked up, for error messages.
    fn table_name(&self) -> &str;

    /// Find a column by name, returning its index and definition.
    fn column_by_name(&self, name: &str) -> Option<(usize, &ColumnDefinition)>;
}

impl ColumnLookup for TableDefinition {
    fn table_name(&self) -> &str {
        &self.name
    }

    fn column_by_name(&self, name: &str) -> Option<(usize, &ColumnDefinition)> {
        self.columns
            .iter()
            .enumerate()
            .find(|(_, column)| column.name == name)
    }
}

/// An integer column resolved against a table definition.
///
/// Resolved once at setup and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBinding {
    /// Column index in the row
    pub index: usize,

    /// Column name
    pub name: String,

    /// Declared integer width
    pub width: IntWidth,
}

impl ColumnBinding {
    /// Resolve an integer column by name.
    pub fn resolve(lookup: &dyn ColumnLookup, name: &str) -> Result<Self, SchemaError> {
        let (index, column) =
            lookup
                .column_by_name(name)
                .ok_or_else(|| SchemaError::ColumnNotFound {
                    table: lookup.table_name().to_string(),
                    column: name.to_string(),
                })?;
        let width = column
            .column_type
            .int_width()
            .ok_or_else(|| SchemaError::NotAnIntegerColumn {
                column: name.to_string(),
                column_type: column.column_type,
            })?;
        Ok(Self {
            index,
            name: column.name.clone(),
            width,
        })
    }
}
