//! Schema and validation errors.

use std::fmt;

use thiserror::Error;

/// Result type for schema consistency checks.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors found when checking a schema's own consistency.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SchemaError {
    /// Invalid byte width for the field kind.
    #[error("field {field}: invalid byte width {width}")]
    InvalidWidth { field: &'static str, width: usize },

    /// Declared size disagrees with the sum of the field widths.
    #[error("schema {schema}: declared size {declared} but fields add up to {natural}")]
    SizeMismatch {
        schema: &'static str,
        declared: usize,
        natural: usize,
    },

    /// Declared size is not a multiple of four.
    #[error("schema {schema}: size {size} is not a multiple of 4")]
    UnalignedSize { schema: &'static str, size: usize },

    /// A variable-length field in a fixed-size schema, or one that is not last.
    #[error("schema {schema}: dynamic field {field} must be the last field of a variable-size schema")]
    MisplacedDynamicField {
        schema: &'static str,
        field: &'static str,
    },
}

/// Category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationCategory {
    ValueOutOfRange,
    StringTooLong,
    StringTooShort,
    UnmappableCharacter,
    ArrayTooLong,
    RequiredFieldMissing,
}

impl ValidationCategory {
    /// Returns the category's stable upper-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValueOutOfRange => "VALUE_OUT_OF_RANGE",
            Self::StringTooLong => "STRING_TOO_LONG",
            Self::StringTooShort => "STRING_TOO_SHORT",
            Self::UnmappableCharacter => "UNMAPPABLE_CHARACTER",
            Self::ArrayTooLong => "ARRAY_TOO_LONG",
            Self::RequiredFieldMissing => "REQUIRED_FIELD_MISSING",
        }
    }
}

impl fmt::Display for ValidationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outgoing message violated its schema.
///
/// Raised before encoding; the message is rejected and never sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{category} in field {field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub category: ValidationCategory,
    pub message: String,
}

impl ValidationError {
    pub(crate) fn new(
        field: &'static str,
        category: ValidationCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field,
            category,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display() {
        let err = ValidationError::new(
            "Prefix",
            ValidationCategory::ValueOutOfRange,
            "64 exceeds maximum 63",
        );
        let msg = err.to_string();
        assert!(msg.contains("VALUE_OUT_OF_RANGE"));
        assert!(msg.contains("Prefix"));
        assert!(msg.contains("64"));
    }

    #[test]
    fn schema_error_display() {
        let err = SchemaError::SizeMismatch {
            schema: "IS_VER",
            declared: 24,
            natural: 20,
        };
        let msg = err.to_string();
        assert!(msg.contains("IS_VER"));
        assert!(msg.contains("24"));
        assert!(msg.contains("20"));
    }

    #[test]
    fn category_names_are_stable() {
        assert_eq!(ValidationCategory::StringTooLong.as_str(), "STRING_TOO_LONG");
        assert_eq!(
            ValidationCategory::RequiredFieldMissing.to_string(),
            "REQUIRED_FIELD_MISSING"
        );
    }
}
