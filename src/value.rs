//! Typed field values.
//!
//! Every field group declares a type next to its raw value. [`FieldType`]
//! names the supported declarations and [`FieldValue`] holds a value that has
//! been checked against its declaration.
//!
//! ## Examples
//!
//! ```rust
//! use tagson::{FieldType, FieldValue};
//!
//! let count = FieldValue::coerce(FieldType::Int, "0042").unwrap();
//! assert_eq!(count.to_json(), "42");
//!
//! let label = FieldValue::coerce(FieldType::String, "hello").unwrap();
//! assert_eq!(label.to_json(), "\"hello\"");
//!
//! assert!(FieldValue::coerce(FieldType::Int, "five").is_err());
//! ```

use num_bigint::BigUint;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A declared field type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldType {
    Int,
    String,
}

impl FieldType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            FieldType::Int => "int",
            FieldType::String => "string",
        }
    }
}

impl FromStr for FieldType {
    type Err = CoerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" => Ok(FieldType::Int),
            "string" => Ok(FieldType::String),
            other => Err(CoerceError::UnknownType(other.to_string())),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a raw value does not fit its declared type.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CoerceError {
    #[error("Field value is not an integer")]
    NotAnInteger(String),

    #[error("Unknown field type")]
    UnknownType(String),
}

impl CoerceError {
    /// The text that failed to coerce.
    #[must_use]
    pub fn offending(&self) -> &str {
        match self {
            CoerceError::NotAnInteger(text) | CoerceError::UnknownType(text) => text,
        }
    }
}

/// A field value checked against its declared type.
///
/// Integers are unsigned and unbounded; they are stored in canonical form, so
/// leading zeros disappear on output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    Integer(BigUint),
    String(String),
}

impl FieldValue {
    /// Checks `raw` against `ty`.
    ///
    /// # Errors
    ///
    /// Returns [`CoerceError::NotAnInteger`] if an `int` value is empty or has
    /// anything but ASCII digits.
    pub fn coerce(ty: FieldType, raw: &str) -> Result<Self, CoerceError> {
        match ty {
            FieldType::String => Ok(FieldValue::String(raw.to_string())),
            FieldType::Int => {
                if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(CoerceError::NotAnInteger(raw.to_string()));
                }
                raw.parse::<BigUint>()
                    .map(FieldValue::Integer)
                    .map_err(|_| CoerceError::NotAnInteger(raw.to_string()))
            }
        }
    }

    #[must_use]
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Integer(_) => FieldType::Int,
            FieldValue::String(_) => FieldType::String,
        }
    }

    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(self, FieldValue::Integer(_))
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            FieldValue::Integer(_) => None,
        }
    }

    /// Renders the value as a JSON literal; strings are quoted and escaped.
    #[must_use]
    pub fn to_json(&self) -> String {
        match self {
            FieldValue::Integer(n) => n.to_string(),
            FieldValue::String(s) => quote(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<u64> for FieldValue {
    fn from(n: u64) -> Self {
        FieldValue::Integer(BigUint::from(n))
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}

/// Quotes and escapes `s` as a JSON string.
pub(crate) fn quote(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}
