//! Column storage classes understood by the masking transformers.
//!
//! `UniversalType` is intentionally small: the noise transformers only care
//! whether a column is an integer and, if so, how wide it is. The remaining
//! variants exist so a table definition can describe the columns that are
//! carried through a row untouched.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Storage class of a column.
///
/// # YAML Format
///
/// Types are written as simple strings. Several spellings are accepted for
/// the integer classes so definitions exported from PostgreSQL (`int2`,
/// `int4`, `int8`) load without translation:
///
/// ```yaml
/// type: small_int
/// type: int4
/// type: bigint
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniversalType {
    /// Boolean value
    Bool,

    /// 16-bit signed integer
    Int16,

    /// 32-bit signed integer
    Int32,

    /// 64-bit signed integer
    Int64,

    /// 64-bit IEEE 754 floating point
    Float64,

    /// Unlimited text
    Text,
}

impl UniversalType {
    /// Canonical name used when serializing.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int16 => "small_int",
            Self::Int32 => "int",
            Self::Int64 => "big_int",
            Self::Float64 => "double",
            Self::Text => "text",
        }
    }

    /// Integer width of this type, if it is an integer type.
    pub fn int_width(&self) -> Option<IntWidth> {
        match self {
            Self::Int16 => Some(IntWidth::Int16),
            Self::Int32 => Some(IntWidth::Int32),
            Self::Int64 => Some(IntWidth::Int64),
            _ => None,
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "bool" | "boolean" => Some(Self::Bool),
            "small_int" | "smallint" | "int2" | "int16" => Some(Self::Int16),
            "int" | "integer" | "int4" | "int32" => Some(Self::Int32),
            "big_int" | "bigint" | "int8" | "int64" => Some(Self::Int64),
            "double" | "float8" | "float64" => Some(Self::Float64),
            "text" => Some(Self::Text),
            _ => None,
        }
    }
}

impl fmt::Display for UniversalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for UniversalType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for UniversalType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown simple type: {value}")))
    }
}

/// Declared width of an integer column.
///
/// All arithmetic is carried out in `i64`/`i128`; the width decides which
/// part of that range a value may occupy once it is written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    Int16,
    Int32,
    Int64,
}

impl IntWidth {
    /// Width in bits.
    pub fn bits(&self) -> u32 {
        match self {
            Self::Int16 => 16,
            Self::Int32 => 32,
            Self::Int64 => 64,
        }
    }

    /// Smallest representable value.
    pub fn min_value(&self) -> i64 {
        match self {
            Self::Int16 => i16::MIN as i64,
            Self::Int32 => i32::MIN as i64,
            Self::Int64 => i64::MIN,
        }
    }

    /// Largest representable value.
    pub fn max_value(&self) -> i64 {
        match self {
            Self::Int16 => i16::MAX as i64,
            Self::Int32 => i32::MAX as i64,
            Self::Int64 => i64::MAX,
        }
    }

    /// Whether `value` is representable in this width.
    pub fn contains(&self, value: i64) -> bool {
        (self.min_value()..=self.max_value()).contains(&value)
    }

    /// Saturate a wide intermediate into this width. Never wraps.
    pub fn saturate(&self, value: i128) -> i64 {
        value.clamp(self.min_value() as i128, self.max_value() as i128) as i64
    }
}

impl fmt::Display for IntWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "int{}", self.bits())
    }
}
