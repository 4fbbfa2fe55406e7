//! Parameter definitions and binding.
//!
//! A transformer declares its parameters as [`ParameterDefinition`]s. At
//! setup, [`bind_parameters`] matches the user's [`TransformerConfig`]
//! against those definitions and the table, producing scanned
//! [`Parameter`]s plus every validation finding along the way.

use crate::validation::{ValidationWarning, ValidationWarnings};
use mask_core::{
    ColumnBinding, ColumnLookup, DynamicBinding, Parameter, ParameterError, UniversalType,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// User configuration for one transformer instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformerConfig {
    /// Registered transformer name
    pub name: String,

    /// Static parameter values
    #[serde(default)]
    pub params: BTreeMap<String, serde_yaml::Value>,

    /// Parameters read per row from another column
    #[serde(default)]
    pub dynamic_params: BTreeMap<String, DynamicParamConfig>,
}

/// Dynamic parameter source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicParamConfig {
    /// Source column in the same row
    pub column: String,

    /// Value used when the source column is null
    #[serde(default)]
    pub default: Option<i64>,
}

/// Parameter names a column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnProperties {
    /// Whether the transformer writes this column
    pub affected: bool,
    /// Column types accepted; empty accepts all
    pub allowed_types: Vec<UniversalType>,
}

/// Parameter may be read per row from another column.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicModeProperties {
    /// Source column types accepted
    pub compatible_types: Vec<UniversalType>,
}

/// Declaration of one transformer parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub default: Option<serde_yaml::Value>,
    pub column: Option<ColumnProperties>,
    pub dynamic_mode: Option<DynamicModeProperties>,
}

impl ParameterDefinition {
    pub fn new(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            required: false,
            default: None,
            column: None,
            dynamic_mode: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<serde_yaml::Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_column(mut self, properties: ColumnProperties) -> Self {
        self.column = Some(properties);
        self
    }

    pub fn with_dynamic_mode(mut self, properties: DynamicModeProperties) -> Self {
        self.dynamic_mode = Some(properties);
        self
    }
}

/// Bound parameters of one transformer instance.
#[derive(Debug, Clone, Default)]
pub struct Parameters {
    values: BTreeMap<String, Parameter>,
    affected: BTreeMap<usize, String>,
}

impl Parameters {
    pub fn get(&self, name: &str) -> Result<&Parameter, ParameterError> {
        self.values
            .get(name)
            .ok_or_else(|| ParameterError::NotDefined(name.to_string()))
    }

    pub fn insert(&mut self, parameter: Parameter) {
        self.values.insert(parameter.name().to_string(), parameter);
    }

    /// Columns named by parameters marked `affected`, keyed by index.
    pub fn affected_columns(&self) -> &BTreeMap<usize, String> {
        &self.affected
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn param_warning(message: &str, name: &str) -> ValidationWarning {
    ValidationWarning::error(message).with_meta("ParameterName", name)
}

/// Match `config` against `definitions`, resolving column references
/// through `lookup`.
///
/// Parameters with fatal findings are left out of the result; check
/// [`ValidationWarnings::is_fatal`] before using it.
pub fn bind_parameters(
    definitions: &[ParameterDefinition],
    config: &TransformerConfig,
    lookup: &dyn ColumnLookup,
) -> (Parameters, ValidationWarnings) {
    let mut warnings = ValidationWarnings::new();
    let mut parameters = Parameters::default();

    for name in config.params.keys().chain(config.dynamic_params.keys()) {
        if !definitions.iter().any(|d| d.name == name.as_str()) {
            warnings.push(param_warning("parameter does not exist", name));
        }
    }

    for definition in definitions {
        let name = definition.name;
        let value = config.params.get(name).cloned();

        if let Some(dynamic) = config.dynamic_params.get(name) {
            let Some(mode) = &definition.dynamic_mode else {
                warnings.push(param_warning("parameter does not support dynamic mode", name));
                continue;
            };
            if value.is_some() {
                warnings.push(param_warning(
                    "parameter cannot be both static and dynamic",
                    name,
                ));
                continue;
            }
            match bind_dynamic_column(lookup, &dynamic.column, mode) {
                Ok(column) => parameters.insert(Parameter::dynamic(
                    name,
                    DynamicBinding {
                        column,
                        default: dynamic.default,
                    },
                )),
                Err(message) => warnings.push(
                    param_warning(&message, name).with_meta("DynamicParameterColumn", &dynamic.column),
                ),
            }
            continue;
        }

        let value = value.or_else(|| definition.default.clone());
        if definition.required && value.is_none() {
            warnings.push(param_warning("parameter is required", name));
            continue;
        }

        if let (Some(properties), Some(value)) = (&definition.column, &value) {
            let Some(column_name) = value.as_str() else {
                warnings.push(param_warning("column parameter must be a column name", name));
                continue;
            };
            match lookup.column_by_name(column_name) {
                None => {
                    warnings.push(
                        param_warning("column does not exist", name)
                            .with_meta("ColumnName", column_name),
                    );
                    continue;
                }
                Some((_, column))
                    if !properties.allowed_types.is_empty()
                        && !properties.allowed_types.contains(&column.column_type) =>
                {
                    warnings.push(
                        param_warning("unsupported column type", name)
                            .with_meta("ColumnName", column_name)
                            .with_meta("ColumnType", column.column_type),
                    );
                    continue;
                }
                Some((index, column)) => {
                    if properties.affected {
                        parameters.affected.insert(index, column.name.clone());
                    }
                }
            }
        }

        parameters.insert(Parameter::new(name, value));
    }

    (parameters, warnings)
}

fn bind_dynamic_column(
    lookup: &dyn ColumnLookup,
    column: &str,
    mode: &DynamicModeProperties,
) -> Result<ColumnBinding, String> {
    let (_, definition) = lookup
        .column_by_name(column)
        .ok_or_else(|| "dynamic parameter column does not exist".to_string())?;
    if !mode.compatible_types.contains(&definition.column_type) {
        return Err(format!(
            "dynamic parameter column type {} is not compatible",
            definition.column_type
        ));
    }
    ColumnBinding::resolve(lookup, column).map_err(|e| e.to_string())
}
