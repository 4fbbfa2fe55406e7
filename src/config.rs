//! Masking run configuration.
//!
//! ```yaml
//! table:
//!   name: payments
//!   primary_key: id
//!   columns:
//!     - name: id
//!       type: big_int
//!     - name: amount
//!       type: int
//! hash_function: sha256
//! transformers:
//!   - name: NoiseInt
//!     params:
//!       column: amount
//!       engine: hash
//! ```

use anyhow::{Context, Result};
use mask_core::TableDefinition;
use mask_generator::HashFunction;
use mask_transformers::TransformerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_hash_function() -> String {
    HashFunction::default().to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskConfig {
    /// Columns of the rows being masked
    pub table: TableDefinition,

    /// Hash used by every `hash` engine in the run
    #[serde(default = "default_hash_function")]
    pub hash_function: String,

    /// Transformers, applied in order
    #[serde(default)]
    pub transformers: Vec<TransformerConfig>,
}

impl MaskConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read mask config from {path:?}"))?;
        Self::from_yaml(&content).with_context(|| format!("Invalid mask config {path:?}"))
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).context("Failed to parse mask config")?;
        config.table.validate()?;
        config.hash_function()?;
        if config.transformers.is_empty() {
            tracing::warn!(
                "No transformers configured for table '{}', rows pass through unchanged",
                config.table.name
            );
        }
        Ok(config)
    }

    pub fn hash_function(&self) -> Result<HashFunction> {
        self.hash_function
            .parse()
            .with_context(|| format!("Invalid hash_function '{}'", self.hash_function))
    }
}
