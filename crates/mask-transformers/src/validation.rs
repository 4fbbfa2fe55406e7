//! Setup-time validation warnings.
//!
//! Configuration checks do not stop at the first problem: every finding is
//! collected as a [`ValidationWarning`] so a single run reports all of them.
//! Warnings with [`Severity::Error`] are fatal and abort construction of the
//! transformer; the rest are advisory and are logged by the caller.

use std::collections::BTreeMap;
use std::fmt;

/// How serious a validation finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => f.write_str("info"),
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// A single validation finding with context metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    pub severity: Severity,
    pub message: String,
    /// Context such as `ParameterName` or `ColumnName`
    pub meta: BTreeMap<String, String>,
}

impl ValidationWarning {
    /// A fatal finding.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// An advisory finding.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            meta: BTreeMap::new(),
        }
    }

    /// Attach a metadata entry.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.meta.insert(key.into(), value.to_string());
        self
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)?;
        if !self.meta.is_empty() {
            let meta: Vec<String> = self.meta.iter().map(|(k, v)| format!("{k}={v}")).collect();
            write!(f, " ({})", meta.join(", "))?;
        }
        Ok(())
    }
}

/// Collected findings of one setup pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationWarnings(Vec<ValidationWarning>);

impl ValidationWarnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, warning: ValidationWarning) {
        self.0.push(warning);
    }

    pub fn extend(&mut self, other: ValidationWarnings) {
        self.0.extend(other.0);
    }

    /// Whether any finding is fatal.
    pub fn is_fatal(&self) -> bool {
        self.0.iter().any(ValidationWarning::is_fatal)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationWarning> {
        self.0.iter()
    }
}

impl fmt::Display for ValidationWarnings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, warning) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{warning}")?;
        }
        Ok(())
    }
}

impl IntoIterator for ValidationWarnings {
    type Item = ValidationWarning;
    type IntoIter = std::vec::IntoIter<ValidationWarning>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<ValidationWarning> for ValidationWarnings {
    fn from_iter<I: IntoIterator<Item = ValidationWarning>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
