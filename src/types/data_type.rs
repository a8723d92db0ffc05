//! This module defines the canonical, type-safe representation of the element
//! types a lighttable column can hold.

use crate::error::LightTableError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of element types supported by the column storage.
///
/// Declared column types arrive from import sources as free-form names; they are
/// resolved to this enum exactly once, at table construction, so that every later
/// dispatch is a plain `match`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DataType {
    Int16,
    Int32,
    Int64,
    UInt8,
    Float64,
    Decimal,
    Boolean,
    DateTime,
    Guid,
    String,
    Binary,
}

impl DataType {
    /// Every supported element type, in declaration order.
    pub const ALL: [DataType; 11] = [
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::UInt8,
        Self::Float64,
        Self::Decimal,
        Self::Boolean,
        Self::DateTime,
        Self::Guid,
        Self::String,
        Self::Binary,
    ];

    /// Resolves a declared type name into a `DataType`.
    ///
    /// Accepts the canonical names (case-insensitive) plus the usual aliases.
    ///
    /// # Errors
    /// Returns `LightTableError::UnsupportedType` carrying the original name if it
    /// is not recognized.
    pub fn from_type_name(type_name: &str) -> Result<Self, LightTableError> {
        let normalized = type_name.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "int16" | "i16" | "short" => Ok(Self::Int16),
            "int32" | "i32" | "int" => Ok(Self::Int32),
            "int64" | "i64" | "long" => Ok(Self::Int64),
            "uint8" | "u8" | "byte" => Ok(Self::UInt8),
            "float64" | "f64" | "double" => Ok(Self::Float64),
            "decimal" => Ok(Self::Decimal),
            "boolean" | "bool" => Ok(Self::Boolean),
            "datetime" => Ok(Self::DateTime),
            "guid" | "uuid" => Ok(Self::Guid),
            "string" | "utf8" => Ok(Self::String),
            "binary" | "byte[]" => Ok(Self::Binary),
            _ => Err(LightTableError::UnsupportedType(type_name.to_string())),
        }
    }

    /// The canonical name, accepted back by `from_type_name`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::UInt8 => "UInt8",
            Self::Float64 => "Float64",
            Self::Decimal => "Decimal",
            Self::Boolean => "Boolean",
            Self::DateTime => "DateTime",
            Self::Guid => "Guid",
            Self::String => "String",
            Self::Binary => "Binary",
        }
    }

    /// Returns `true` if aggregates over this type compute a value rather than null.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Int16 | Self::Int32 | Self::Int64 | Self::UInt8 | Self::Float64 | Self::Decimal
        )
    }

    /// Returns `true` if the element type has a fixed-width, plain-old-data layout
    /// that can be bulk-imported from raw little-endian bytes.
    pub fn is_fixed_width(&self) -> bool {
        matches!(
            self,
            Self::Int16 | Self::Int32 | Self::Int64 | Self::UInt8 | Self::Float64
        )
    }
}

/// Provides the canonical string representation for a `DataType`.
impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_names_roundtrip() {
        for dt in DataType::ALL {
            assert_eq!(DataType::from_type_name(dt.name()).unwrap(), dt);
        }
    }

    #[test]
    fn test_aliases_are_case_insensitive() {
        assert_eq!(DataType::from_type_name("INT").unwrap(), DataType::Int32);
        assert_eq!(DataType::from_type_name(" Long ").unwrap(), DataType::Int64);
        assert_eq!(DataType::from_type_name("byte[]").unwrap(), DataType::Binary);
        assert_eq!(DataType::from_type_name("Uuid").unwrap(), DataType::Guid);
    }

    #[test]
    fn test_unknown_type_keeps_original_name() {
        match DataType::from_type_name("TimeSpan") {
            Err(LightTableError::UnsupportedType(name)) => assert_eq!(name, "TimeSpan"),
            other => panic!("Expected UnsupportedType, got {:?}", other),
        }
    }

    #[test]
    fn test_numeric_classification() {
        let numeric: Vec<_> = DataType::ALL.iter().filter(|d| d.is_numeric()).collect();
        assert_eq!(numeric.len(), 6);
        assert!(!DataType::DateTime.is_numeric());
        assert!(DataType::Float64.is_fixed_width());
        assert!(!DataType::Decimal.is_fixed_width());
    }

    #[test]
    fn test_serde_uses_variant_names() {
        let json = serde_json::to_string(&DataType::Guid).unwrap();
        assert_eq!(json, "\"Guid\"");
        let back: DataType = serde_json::from_str("\"Float64\"").unwrap();
        assert_eq!(back, DataType::Float64);
    }
}
