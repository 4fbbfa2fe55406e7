//! Ordered application of configured transformers to records.

use crate::config::MaskConfig;
use anyhow::{Context, Result};
use mask_core::{Record, TableDefinition};
use mask_generator::Salt;
use mask_transformers::{
    Severity, SetupContext, TransformError, Transformer, TransformerRegistry,
};
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Finalized transformers for one table.
pub struct MaskPipeline {
    table: TableDefinition,
    transformers: Vec<Box<dyn Transformer>>,
    affected: BTreeMap<usize, String>,
}

impl MaskPipeline {
    /// Instantiate and finalize every transformer in `config`.
    ///
    /// Advisory warnings are logged. Any fatal warning aborts the build and
    /// the error lists every finding for that transformer.
    pub fn build(
        registry: &TransformerRegistry,
        config: &MaskConfig,
        salt: Option<&Salt>,
    ) -> Result<Self> {
        let ctx = SetupContext::new(&config.table)
            .with_salt(salt)
            .with_hash_function(config.hash_function()?);

        let mut transformers = Vec::with_capacity(config.transformers.len());
        let mut writers: BTreeMap<usize, String> = BTreeMap::new();
        let mut affected: BTreeMap<usize, String> = BTreeMap::new();

        for (position, transformer_config) in config.transformers.iter().enumerate() {
            let name = &transformer_config.name;
            let built = registry
                .instantiate(&ctx, transformer_config)
                .with_context(|| {
                    format!("Failed to configure transformer #{} '{name}'", position + 1)
                })?;

            for warning in built.warnings.iter() {
                match warning.severity {
                    Severity::Info => info!("Transformer '{name}': {warning}"),
                    _ => warn!("Transformer '{name}': {warning}"),
                }
            }

            let mut transformer = built.transformer;
            transformer
                .finalize()
                .with_context(|| format!("Failed to finalize transformer '{name}'"))?;

            for (index, column) in transformer.affected_columns() {
                if let Some(previous) = writers.insert(*index, name.clone()) {
                    warn!("Column '{column}' is written by both '{previous}' and '{name}'");
                }
                affected.insert(*index, column.clone());
            }
            transformers.push(transformer);
        }

        info!(
            "Configured {} transformer(s) for table '{}'",
            transformers.len(),
            config.table.name
        );

        Ok(Self {
            table: config.table.clone(),
            transformers,
            affected,
        })
    }

    pub fn table(&self) -> &TableDefinition {
        &self.table
    }

    /// Union of every transformer's write-set, keyed by column index.
    pub fn affected_columns(&self) -> &BTreeMap<usize, String> {
        &self.affected
    }

    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }

    /// Apply every transformer to `record`.
    ///
    /// Works on a copy; `record` is only replaced once all transformers
    /// succeeded.
    pub fn process(
        &mut self,
        record: &mut Record,
        cancel: &CancellationToken,
    ) -> Result<(), TransformError> {
        let mut working = record.clone();
        for transformer in &mut self.transformers {
            transformer.transform(&mut working, cancel)?;
        }
        *record = working;
        Ok(())
    }
}
