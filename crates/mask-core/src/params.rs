//! Transformer parameters.
//!
//! A [`Parameter`] carries either a static literal (taken from configuration
//! or from the parameter's default) or a binding to another column of the
//! same row, in which case its value is read per row.

use crate::schema::ColumnBinding;
use crate::values::{RecordError, RowAccess};
use serde::de::DeserializeOwned;

/// Error type for parameter scanning.
#[derive(Debug, thiserror::Error)]
pub enum ParameterError {
    /// Parameter is not present in the bound parameter set
    #[error("Parameter '{0}' is not defined")]
    NotDefined(String),

    /// Required value is missing
    #[error("Parameter '{0}' has no value")]
    Missing(String),

    /// Literal could not be decoded into the requested type
    #[error("Unable to scan parameter '{name}': {source}")]
    Decode {
        name: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// Static scan attempted on a dynamic parameter
    #[error("Parameter '{0}' is dynamic and must be scanned from a row")]
    IsDynamic(String),

    /// Dynamic scan attempted on a static parameter
    #[error("Parameter '{0}' is not dynamic")]
    NotDynamic(String),

    /// Reading the source column failed
    #[error("Unable to read dynamic parameter '{name}' from column '{column}': {source}")]
    Row {
        name: String,
        column: String,
        #[source]
        source: RecordError,
    },
}

/// Binding of a dynamic parameter to another column of the row.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicBinding {
    /// Source column
    pub column: ColumnBinding,

    /// Value used when the source column is null
    pub default: Option<i64>,
}

/// A scanned transformer parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    value: Option<serde_yaml::Value>,
    dynamic: Option<DynamicBinding>,
}

impl Parameter {
    /// Create a static parameter.
    pub fn new(name: impl Into<String>, value: Option<serde_yaml::Value>) -> Self {
        Self {
            name: name.into(),
            value,
            dynamic: None,
        }
    }

    /// Create a parameter read per row from another column.
    pub fn dynamic(name: impl Into<String>, binding: DynamicBinding) -> Self {
        Self {
            name: name.into(),
            value: None,
            dynamic: Some(binding),
        }
    }

    /// Parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the value is sourced per row.
    pub fn is_dynamic(&self) -> bool {
        self.dynamic.is_some()
    }

    /// Whether a static value (or default) is present.
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Dynamic binding, if any.
    pub fn binding(&self) -> Option<&DynamicBinding> {
        self.dynamic.as_ref()
    }

    /// Scan the static value into `T`.
    ///
    /// Returns `Ok(None)` when the parameter has neither a value nor a
    /// default. Quoted scalars (`"0.2"`) are re-read as YAML so that defaults
    /// written as strings scan into numbers.
    pub fn scan<T: DeserializeOwned>(&self) -> Result<Option<T>, ParameterError> {
        if self.is_dynamic() {
            return Err(ParameterError::IsDynamic(self.name.clone()));
        }
        let Some(value) = &self.value else {
            return Ok(None);
        };
        let decoded = match serde_yaml::from_value::<T>(value.clone()) {
            Ok(decoded) => decoded,
            Err(err) => match value {
                serde_yaml::Value::String(raw) => {
                    serde_yaml::from_str::<T>(raw).map_err(|_| ParameterError::Decode {
                        name: self.name.clone(),
                        source: err,
                    })?
                }
                _ => {
                    return Err(ParameterError::Decode {
                        name: self.name.clone(),
                        source: err,
                    })
                }
            },
        };
        Ok(Some(decoded))
    }

    /// Scan the static value, failing when it is absent.
    pub fn scan_required<T: DeserializeOwned>(&self) -> Result<T, ParameterError> {
        self.scan()?
            .ok_or_else(|| ParameterError::Missing(self.name.clone()))
    }

    /// Read a dynamic integer value from `row`.
    ///
    /// A null source column yields the binding's default, or `None` if it
    /// has none.
    pub fn scan_dynamic_int(&self, row: &dyn RowAccess) -> Result<Option<i64>, ParameterError> {
        let binding = self
            .dynamic
            .as_ref()
            .ok_or_else(|| ParameterError::NotDynamic(self.name.clone()))?;
        let value = row
            .scan_int(binding.column.index)
            .map_err(|source| ParameterError::Row {
                name: self.name.clone(),
                column: binding.column.name.clone(),
                source,
            })?;
        Ok(value.or(binding.default))
    }
}
