//! Value representations and row access.
//!
//! A [`Record`] is one row of a table, with columns addressed by index in
//! the order of the table definition. Transformers never touch the
//! representation directly; they go through [`RowAccess`].

use crate::types::IntWidth;
use serde::{Deserialize, Serialize};

/// Error type for row field access.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// Column index past the end of the row
    #[error("Column index {index} out of bounds for row with {len} columns")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Column does not hold an integer
    #[error("Column {index} holds a {found} value, expected an integer")]
    NotAnInteger { index: usize, found: &'static str },

    /// Value does not fit the stored width
    #[error("Value {value} does not fit {width} column {index}")]
    OutOfRange {
        index: usize,
        value: i64,
        width: IntWidth,
    },
}

/// A single column value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UniversalValue {
    /// Null value
    Null,

    /// Boolean value
    Bool(bool),

    /// 16-bit signed integer
    Int16(i16),

    /// 32-bit signed integer
    Int32(i32),

    /// 64-bit signed integer
    Int64(i64),

    /// 64-bit floating point
    Float64(f64),

    /// Text value
    Text(String),
}

impl UniversalValue {
    /// Build an integer value of the given width.
    pub fn int(width: IntWidth, value: i64) -> Option<Self> {
        match width {
            IntWidth::Int16 => i16::try_from(value).ok().map(Self::Int16),
            IntWidth::Int32 => i32::try_from(value).ok().map(Self::Int32),
            IntWidth::Int64 => Some(Self::Int64(value)),
        }
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get this value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int16(i) => Some(*i as i64),
            Self::Int32(i) => Some(*i as i64),
            Self::Int64(i) => Some(*i),
            _ => None,
        }
    }

    /// Width of this value, if it is an integer.
    pub fn int_width(&self) -> Option<IntWidth> {
        match self {
            Self::Int16(_) => Some(IntWidth::Int16),
            Self::Int32(_) => Some(IntWidth::Int32),
            Self::Int64(_) => Some(IntWidth::Int64),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int16(_) => "int16",
            Self::Int32(_) => "int32",
            Self::Int64(_) => "int64",
            Self::Float64(_) => "float64",
            Self::Text(_) => "text",
        }
    }
}

/// Field access capability the transformers are written against.
pub trait RowAccess {
    /// Read the integer at `index`. Null reads as `Ok(None)`.
    fn scan_int(&self, index: usize) -> Result<Option<i64>, RecordError>;

    /// Overwrite the integer at `index`, keeping the stored width.
    fn set_int(&mut self, index: usize, value: i64) -> Result<(), RecordError>;

    /// Identifier of this row for error reporting, if one is known.
    fn row_id(&self) -> Option<String>;
}

/// One row of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Table name
    pub table: String,

    /// Position of this row in its stream (1-based line number for JSONL)
    pub index: u64,

    /// Row identifier (rendered primary key), if the table has one
    pub id: Option<String>,

    /// Column values in table-definition order
    pub values: Vec<UniversalValue>,
}

impl Record {
    /// Create a new record.
    pub fn new(table: impl Into<String>, index: u64, values: Vec<UniversalValue>) -> Self {
        Self {
            table: table.into(),
            index,
            id: None,
            values,
        }
    }

    /// Attach a row identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Get a value by column index.
    pub fn get(&self, index: usize) -> Option<&UniversalValue> {
        self.values.get(index)
    }

    fn value_at(&self, index: usize) -> Result<&UniversalValue, RecordError> {
        self.values.get(index).ok_or(RecordError::IndexOutOfBounds {
            index,
            len: self.values.len(),
        })
    }
}

impl RowAccess for Record {
    fn scan_int(&self, index: usize) -> Result<Option<i64>, RecordError> {
        let value = self.value_at(index)?;
        if value.is_null() {
            return Ok(None);
        }
        value.as_i64().map(Some).ok_or(RecordError::NotAnInteger {
            index,
            found: value.kind(),
        })
    }

    fn set_int(&mut self, index: usize, value: i64) -> Result<(), RecordError> {
        let current = self.value_at(index)?;
        let width = current.int_width().unwrap_or(IntWidth::Int64);
        if !current.is_null() && current.int_width().is_none() {
            return Err(RecordError::NotAnInteger {
                index,
                found: current.kind(),
            });
        }
        let replacement = UniversalValue::int(width, value).ok_or(RecordError::OutOfRange {
            index,
            value,
            width,
        })?;
        self.values[index] = replacement;
        Ok(())
    }

    fn row_id(&self) -> Option<String> {
        self.id.clone().or_else(|| Some(format!("#{}", self.index)))
    }
}
