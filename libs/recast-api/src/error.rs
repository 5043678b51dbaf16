use std::fmt;

use crate::schema::TypeInfo;

/// Error kind for converter failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionErrorKind {
    /// Converter claimed support for a value it cannot handle.
    Unsupported,
    /// Input was of the right type but its content cannot be converted
    /// (parse failure, overflow, ...).
    InvalidValue,
    /// Converter returned a value that is not of the requested target type.
    WrongType,
}

/// Error returned by `TypeConverter::convert`.
///
/// Always propagates to the caller of the copy; the engine never retries.
#[derive(Debug, thiserror::Error)]
#[error("{kind:?}: {message}")]
pub struct ConversionError {
    pub kind: ConversionErrorKind,
    pub message: String,
}

impl ConversionError {
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self { kind: ConversionErrorKind::Unsupported, message: msg.into() }
    }

    pub fn invalid_value(msg: impl Into<String>) -> Self {
        Self { kind: ConversionErrorKind::InvalidValue, message: msg.into() }
    }

    pub fn wrong_type(target: TypeInfo) -> Self {
        Self {
            kind: ConversionErrorKind::WrongType,
            message: format!("converter output is not of type {target}"),
        }
    }

    /// Add context to the error, preserving the original kind.
    ///
    /// Produces: `"context: original message"`.
    pub fn with_context(self, ctx: impl fmt::Display) -> Self {
        Self {
            kind: self.kind,
            message: format!("{ctx}: {}", self.message),
        }
    }
}

// ---------------------------------------------------------------------------
// From impls: std conversion errors → ConversionError::InvalidValue
// ---------------------------------------------------------------------------

impl From<std::num::ParseIntError> for ConversionError {
    fn from(e: std::num::ParseIntError) -> Self {
        Self::invalid_value(e.to_string())
    }
}

impl From<std::num::ParseFloatError> for ConversionError {
    fn from(e: std::num::ParseFloatError) -> Self {
        Self::invalid_value(e.to_string())
    }
}

impl From<std::str::ParseBoolError> for ConversionError {
    fn from(e: std::str::ParseBoolError) -> Self {
        Self::invalid_value(e.to_string())
    }
}

impl From<std::char::ParseCharError> for ConversionError {
    fn from(e: std::char::ParseCharError) -> Self {
        Self::invalid_value(e.to_string())
    }
}

impl From<std::num::TryFromIntError> for ConversionError {
    fn from(e: std::num::TryFromIntError) -> Self {
        Self::invalid_value(e.to_string())
    }
}

/// Raised by field accessors when a write cannot be honoured.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("field '{field}' is not nullable")]
    NotNullable { field: &'static str },

    #[error("field '{field}' expects a value of type {expected}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
    },
}

/// The destination type has no zero-argument construction path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot instantiate {type_name}: {reason}")]
pub struct InstantiationError {
    pub type_name: &'static str,
    pub reason: String,
}

impl InstantiationError {
    pub fn new(ty: TypeInfo, reason: impl Into<String>) -> Self {
        Self {
            type_name: ty.name(),
            reason: reason.into(),
        }
    }
}
