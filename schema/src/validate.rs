//! Validation of populated outgoing messages against their schema.

use bytestream::{charset, ByteError};

use crate::error::{ValidationCategory, ValidationError};
use crate::field::{ArrayLength, FieldDescriptor, FieldKind};
use crate::schema::MessageSchema;

/// A populated field, as reported by an outgoing message in schema order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Unsigned(u64),
    Signed(i64),
    Float(f32),
    Text(&'a str),
    /// Number of elements in an array field.
    Array(usize),
    /// A nested structure; its own fields are full-width types.
    Structure,
    /// Reserved bytes, always written as zero.
    Reserved,
    /// A required value that was not supplied.
    Missing,
}

/// Walks `schema` against `values` and reports the first violation.
///
/// `values` must list one entry per schema field, in schema order. A field
/// with no corresponding value is reported as missing.
pub fn validate(schema: &MessageSchema, values: &[FieldValue<'_>]) -> Result<(), ValidationError> {
    for (idx, field) in schema.fields.iter().enumerate() {
        match values.get(idx) {
            Some(value) => validate_field(field, value)?,
            None => {
                return Err(ValidationError::new(
                    field.name,
                    ValidationCategory::RequiredFieldMissing,
                    format!("{} supplies no value for this field", schema.name),
                ))
            }
        }
    }
    Ok(())
}

/// Validates a single value against its descriptor.
pub fn validate_field(field: &FieldDescriptor, value: &FieldValue<'_>) -> Result<(), ValidationError> {
    match *value {
        FieldValue::Missing => Err(ValidationError::new(
            field.name,
            ValidationCategory::RequiredFieldMissing,
            "value is required",
        )),
        FieldValue::Reserved | FieldValue::Structure => Ok(()),
        FieldValue::Unsigned(value) => check_unsigned(field, value),
        FieldValue::Signed(value) => check_signed(field, value),
        FieldValue::Float(_) => Ok(()),
        FieldValue::Text(text) => check_text(field, text),
        FieldValue::Array(count) => check_array(field, count),
    }
}

fn check_unsigned(field: &FieldDescriptor, value: u64) -> Result<(), ValidationError> {
    if let Some(max) = field.max_value {
        if value > max {
            return Err(ValidationError::new(
                field.name,
                ValidationCategory::ValueOutOfRange,
                format!("{value} exceeds maximum {max}"),
            ));
        }
    }
    let width_max = unsigned_width_max(field);
    if value > width_max {
        return Err(ValidationError::new(
            field.name,
            ValidationCategory::ValueOutOfRange,
            format!("{value} does not fit in {} bytes", field.byte_width),
        ));
    }
    Ok(())
}

fn check_signed(field: &FieldDescriptor, value: i64) -> Result<(), ValidationError> {
    if let Some(max) = field.max_value {
        if value > 0 && value.unsigned_abs() > max {
            return Err(ValidationError::new(
                field.name,
                ValidationCategory::ValueOutOfRange,
                format!("{value} exceeds maximum {max}"),
            ));
        }
    }
    let (min, max) = signed_width_range(field);
    if value < min || value > max {
        return Err(ValidationError::new(
            field.name,
            ValidationCategory::ValueOutOfRange,
            format!("{value} does not fit in {} signed bytes", field.byte_width),
        ));
    }
    Ok(())
}

fn check_text(field: &FieldDescriptor, text: &str) -> Result<(), ValidationError> {
    let len = charset::encoded_len(text).map_err(|err| match err {
        ByteError::UnmappableChar { ch } => ValidationError::new(
            field.name,
            ValidationCategory::UnmappableCharacter,
            format!("character {ch:?} is not in the wire code page"),
        ),
        other => ValidationError::new(
            field.name,
            ValidationCategory::UnmappableCharacter,
            other.to_string(),
        ),
    })?;

    if let Some(exact) = field.exact_length {
        if len > exact {
            return Err(ValidationError::new(
                field.name,
                ValidationCategory::StringTooLong,
                format!("{len} characters, exactly {exact} required"),
            ));
        }
        if len < exact {
            return Err(ValidationError::new(
                field.name,
                ValidationCategory::StringTooShort,
                format!("{len} characters, exactly {exact} required"),
            ));
        }
    }

    let capacity = field.text_capacity();
    if len > capacity {
        return Err(ValidationError::new(
            field.name,
            ValidationCategory::StringTooLong,
            format!("{len} characters, at most {capacity} fit"),
        ));
    }
    Ok(())
}

fn check_array(field: &FieldDescriptor, count: usize) -> Result<(), ValidationError> {
    let capacity = match field.array {
        ArrayLength::Scalar => 1,
        ArrayLength::Fixed(len) => len,
        ArrayLength::Dynamic { max } => max,
    };
    if count > capacity {
        return Err(ValidationError::new(
            field.name,
            ValidationCategory::ArrayTooLong,
            format!("{count} elements, at most {capacity} allowed"),
        ));
    }
    Ok(())
}

const fn unsigned_width_max(field: &FieldDescriptor) -> u64 {
    let width = match field.kind {
        FieldKind::Float | FieldKind::Char | FieldKind::Structure => return u64::MAX,
        _ => field.byte_width,
    };
    if width >= 8 {
        u64::MAX
    } else {
        (1u64 << (width * 8)) - 1
    }
}

const fn signed_width_range(field: &FieldDescriptor) -> (i64, i64) {
    match field.byte_width {
        1 => (i8::MIN as i64, i8::MAX as i64),
        2 => (i16::MIN as i64, i16::MAX as i64),
        4 => (i32::MIN as i64, i32::MAX as i64),
        _ => (i64::MIN, i64::MAX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SizeRule;

    const FIELDS: &[FieldDescriptor] = &[
        FieldDescriptor::byte("Prefix").max(63),
        FieldDescriptor::chars("UName", 24),
        FieldDescriptor::signed_word("AngVel"),
        FieldDescriptor::byte("NumP"),
        FieldDescriptor::structure("Info", 6).dynamic_array(4),
    ];

    const SCHEMA: MessageSchema = MessageSchema::new(
        "TEST",
        250,
        SizeRule::Variable {
            base: 32,
            element_width: 6,
            max_count: 4,
        },
        FIELDS,
    );

    fn values<'a>(prefix: u64, name: &'a str, count: usize) -> Vec<FieldValue<'a>> {
        vec![
            FieldValue::Unsigned(prefix),
            FieldValue::Text(name),
            FieldValue::Signed(-300),
            FieldValue::Unsigned(count as u64),
            FieldValue::Array(count),
        ]
    }

    #[test]
    fn valid_message_passes() {
        validate(&SCHEMA, &values(10, "driver", 2)).unwrap();
    }

    #[test]
    fn max_value_is_inclusive() {
        validate(&SCHEMA, &values(63, "a", 0)).unwrap();
        let err = validate(&SCHEMA, &values(64, "a", 0)).unwrap_err();
        assert_eq!(err.field, "Prefix");
        assert_eq!(err.category, ValidationCategory::ValueOutOfRange);
    }

    #[test]
    fn char_field_keeps_room_for_nul() {
        let ok = "x".repeat(23);
        validate(&SCHEMA, &values(0, &ok, 0)).unwrap();
        let too_long = "x".repeat(24);
        let err = validate(&SCHEMA, &values(0, &too_long, 0)).unwrap_err();
        assert_eq!(err.field, "UName");
        assert_eq!(err.category, ValidationCategory::StringTooLong);
    }

    #[test]
    fn unmappable_text_rejected() {
        let err = validate(&SCHEMA, &values(0, "\u{4e2d}", 0)).unwrap_err();
        assert_eq!(err.category, ValidationCategory::UnmappableCharacter);
    }

    #[test]
    fn dynamic_array_bounded() {
        validate(&SCHEMA, &values(0, "a", 4)).unwrap();
        let mut vals = values(0, "a", 4);
        vals[4] = FieldValue::Array(5);
        let err = validate(&SCHEMA, &vals).unwrap_err();
        assert_eq!(err.field, "Info");
        assert_eq!(err.category, ValidationCategory::ArrayTooLong);
    }

    #[test]
    fn byte_width_bounds_numbers() {
        let field = FieldDescriptor::byte("PLID");
        assert!(validate_field(&field, &FieldValue::Unsigned(255)).is_ok());
        let err = validate_field(&field, &FieldValue::Unsigned(256)).unwrap_err();
        assert_eq!(err.category, ValidationCategory::ValueOutOfRange);

        let field = FieldDescriptor::signed_word("AngVel");
        assert!(validate_field(&field, &FieldValue::Signed(-32768)).is_ok());
        assert!(validate_field(&field, &FieldValue::Signed(32768)).is_err());
    }

    #[test]
    fn exact_length_enforced() {
        let field = FieldDescriptor::chars("CName", 4).exact(3);
        assert!(validate_field(&field, &FieldValue::Text("XRT")).is_ok());
        assert_eq!(
            validate_field(&field, &FieldValue::Text("XR")).unwrap_err().category,
            ValidationCategory::StringTooShort
        );
        assert_eq!(
            validate_field(&field, &FieldValue::Text("XRTR")).unwrap_err().category,
            ValidationCategory::StringTooLong
        );
    }

    #[test]
    fn missing_values_reported() {
        let mut vals = values(0, "a", 0);
        vals[1] = FieldValue::Missing;
        let err = validate(&SCHEMA, &vals).unwrap_err();
        assert_eq!(err.field, "UName");
        assert_eq!(err.category, ValidationCategory::RequiredFieldMissing);

        let err = validate(&SCHEMA, &values(0, "a", 0)[..3]).unwrap_err();
        assert_eq!(err.field, "NumP");
        assert_eq!(err.category, ValidationCategory::RequiredFieldMissing);
    }

    #[test]
    fn first_violation_wins() {
        let too_long = "x".repeat(30);
        let err = validate(&SCHEMA, &values(99, &too_long, 9)).unwrap_err();
        assert_eq!(err.field, "Prefix");
    }
}
