//! Transformer definitions and lookup by name.

use crate::definition::{bind_parameters, ParameterDefinition, Parameters, TransformerConfig};
use crate::error::SetupError;
use crate::transformer::{Built, SetupContext};
use std::collections::BTreeMap;

/// Builds a transformer from bound parameters.
pub type TransformerFactory = fn(&SetupContext<'_>, &Parameters) -> Result<Built, SetupError>;

/// Error registering a definition.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Transformer '{0}' is already registered")]
    Duplicate(String),
}

/// Static description of a transformer plus its factory.
#[derive(Clone)]
pub struct TransformerDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Vec<ParameterDefinition>,
    pub factory: TransformerFactory,
}

impl TransformerDefinition {
    /// Bind `config` and run the factory.
    ///
    /// Binding findings are merged into the returned warnings. If any of
    /// them is fatal the factory is not called.
    pub fn instantiate(
        &self,
        ctx: &SetupContext<'_>,
        config: &TransformerConfig,
    ) -> Result<Built, SetupError> {
        let (parameters, mut warnings) = bind_parameters(&self.parameters, config, ctx.columns);
        if warnings.is_fatal() {
            return Err(SetupError::Validation(warnings));
        }

        let mut built = (self.factory)(ctx, &parameters)?;
        warnings.extend(built.warnings);
        built.warnings = warnings;
        Ok(built)
    }
}

impl std::fmt::Debug for TransformerDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformerDefinition")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// Transformer definitions keyed by name.
#[derive(Debug, Default, Clone)]
pub struct TransformerRegistry {
    definitions: BTreeMap<&'static str, TransformerDefinition>,
}

impl TransformerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in transformer.
    pub fn with_defaults() -> Self {
        let definitions = [crate::noise_int::definition()];
        Self {
            definitions: definitions.into_iter().map(|d| (d.name, d)).collect(),
        }
    }

    pub fn register(&mut self, definition: TransformerDefinition) -> Result<(), RegistryError> {
        if self.definitions.contains_key(definition.name) {
            return Err(RegistryError::Duplicate(definition.name.to_string()));
        }
        self.definitions.insert(definition.name, definition);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TransformerDefinition> {
        self.definitions.get(name)
    }

    /// Look up `config.name` and instantiate it.
    pub fn instantiate(
        &self,
        ctx: &SetupContext<'_>,
        config: &TransformerConfig,
    ) -> Result<Built, SetupError> {
        self.get(&config.name)
            .ok_or_else(|| SetupError::UnknownTransformer(config.name.clone()))?
            .instantiate(ctx, config)
    }

    pub fn definitions(&self) -> impl Iterator<Item = &TransformerDefinition> {
        self.definitions.values()
    }
}
