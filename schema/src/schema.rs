//! Message schemas and size rules.

use bytestream::align4;

use crate::error::{SchemaError, SchemaResult};
use crate::field::{ArrayLength, FieldDescriptor, FieldKind};
use crate::HEADER_SIZE;

/// How a message's wire size is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SizeRule {
    /// Always exactly this many bytes.
    Fixed(usize),
    /// `align4(base + count * element_width)` for `count <= max_count`.
    Variable {
        base: usize,
        element_width: usize,
        max_count: usize,
    },
}

/// Wire layout of one message type.
///
/// Field order is wire order. The header (size, type, request id) precedes
/// `fields` and is counted in every size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MessageSchema {
    pub name: &'static str,
    pub type_tag: u8,
    pub size: SizeRule,
    pub fields: &'static [FieldDescriptor],
}

impl MessageSchema {
    /// Creates a schema. Consistency is checked by [`check`](Self::check).
    #[must_use]
    pub const fn new(
        name: &'static str,
        type_tag: u8,
        size: SizeRule,
        fields: &'static [FieldDescriptor],
    ) -> Self {
        Self {
            name,
            type_tag,
            size,
            fields,
        }
    }

    /// Header plus every fixed-width field, before alignment.
    #[must_use]
    pub fn natural_size(&self) -> usize {
        HEADER_SIZE
            + self
                .fields
                .iter()
                .map(FieldDescriptor::fixed_wire_width)
                .sum::<usize>()
    }

    /// Wire size for `count` dynamic elements, or `None` if `count` exceeds
    /// the schema maximum. Fixed schemas ignore `count`.
    #[must_use]
    pub const fn size_for(&self, count: usize) -> Option<usize> {
        match self.size {
            SizeRule::Fixed(size) => Some(size),
            SizeRule::Variable {
                base,
                element_width,
                max_count,
            } => {
                if count > max_count {
                    None
                } else {
                    Some(align4(base + count * element_width))
                }
            }
        }
    }

    /// Largest size this schema can produce.
    #[must_use]
    pub const fn max_size(&self) -> usize {
        match self.size {
            SizeRule::Fixed(size) => size,
            SizeRule::Variable {
                base,
                element_width,
                max_count,
            } => align4(base + max_count * element_width),
        }
    }

    /// Maximum dynamic element count (0 for fixed schemas).
    #[must_use]
    pub const fn max_count(&self) -> usize {
        match self.size {
            SizeRule::Fixed(_) => 0,
            SizeRule::Variable { max_count, .. } => max_count,
        }
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Checks that the declared size agrees with the field list.
    pub fn check(&self) -> SchemaResult<()> {
        for field in self.fields {
            check_width(field)?;
        }

        let dynamic: Vec<_> = self
            .fields
            .iter()
            .enumerate()
            .filter(|(_, field)| field.length_is_dynamic())
            .collect();

        let natural = self.natural_size();
        match self.size {
            SizeRule::Fixed(declared) => {
                if let Some((_, field)) = dynamic.first() {
                    return Err(SchemaError::MisplacedDynamicField {
                        schema: self.name,
                        field: field.name,
                    });
                }
                if declared % 4 != 0 {
                    return Err(SchemaError::UnalignedSize {
                        schema: self.name,
                        size: declared,
                    });
                }
                if align4(natural) != declared {
                    return Err(SchemaError::SizeMismatch {
                        schema: self.name,
                        declared,
                        natural,
                    });
                }
            }
            SizeRule::Variable { base, .. } => {
                let last = self.fields.len().saturating_sub(1);
                if let Some((_, field)) = dynamic.iter().find(|(idx, _)| *idx != last) {
                    return Err(SchemaError::MisplacedDynamicField {
                        schema: self.name,
                        field: field.name,
                    });
                }
                if base != natural {
                    return Err(SchemaError::SizeMismatch {
                        schema: self.name,
                        declared: base,
                        natural,
                    });
                }
            }
        }
        Ok(())
    }
}

fn check_width(field: &FieldDescriptor) -> SchemaResult<()> {
    let valid = match field.kind {
        FieldKind::Byte => field.byte_width == 1,
        FieldKind::Word => field.byte_width == 2,
        FieldKind::DWord | FieldKind::Float => field.byte_width == 4,
        FieldKind::Unsigned => matches!(field.byte_width, 1 | 2 | 4 | 8),
        FieldKind::Char | FieldKind::Structure => field.byte_width > 0,
    };
    let valid_array = !matches!(field.array, ArrayLength::Fixed(0));
    if valid && valid_array {
        Ok(())
    } else {
        Err(SchemaError::InvalidWidth {
            field: field.name,
            width: field.byte_width,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VER_FIELDS: &[FieldDescriptor] = &[
        FieldDescriptor::reserved("Zero", 1),
        FieldDescriptor::chars("Version", 8).unterminated(),
        FieldDescriptor::chars("Product", 6).unterminated(),
        FieldDescriptor::byte("InSimVer"),
        FieldDescriptor::reserved("Spare", 1),
    ];

    const DYNAMIC_FIELDS: &[FieldDescriptor] = &[
        FieldDescriptor::byte("Value"),
        FieldDescriptor::chars("Tag", 4),
        FieldDescriptor::byte("Count"),
        FieldDescriptor::word("Items").dynamic_array(10),
    ];

    #[test]
    fn fixed_schema_checks() {
        let schema = MessageSchema::new("IS_VER", 2, SizeRule::Fixed(20), VER_FIELDS);
        assert_eq!(schema.natural_size(), 20);
        schema.check().unwrap();
        assert_eq!(schema.size_for(7), Some(20));
        assert_eq!(schema.max_size(), 20);
    }

    #[test]
    fn fixed_schema_size_mismatch() {
        let schema = MessageSchema::new("IS_VER", 2, SizeRule::Fixed(24), VER_FIELDS);
        assert!(matches!(
            schema.check().unwrap_err(),
            SchemaError::SizeMismatch {
                declared: 24,
                natural: 20,
                ..
            }
        ));
    }

    #[test]
    fn unaligned_fixed_size_rejected() {
        let schema = MessageSchema::new("ODD", 9, SizeRule::Fixed(18), VER_FIELDS);
        assert!(matches!(
            schema.check().unwrap_err(),
            SchemaError::UnalignedSize { size: 18, .. }
        ));
    }

    #[test]
    fn variable_size_formula() {
        let schema = MessageSchema::new(
            "DYN",
            200,
            SizeRule::Variable {
                base: 9,
                element_width: 2,
                max_count: 10,
            },
            DYNAMIC_FIELDS,
        );
        schema.check().unwrap();
        assert_eq!(schema.size_for(0), Some(12));
        assert_eq!(schema.size_for(2), Some(16));
        assert_eq!(schema.size_for(10), Some(32));
        assert_eq!(schema.size_for(11), None);
        assert_eq!(schema.max_count(), 10);
    }

    #[test]
    fn dynamic_field_must_be_last() {
        const FIELDS: &[FieldDescriptor] = &[
            FieldDescriptor::word("Items").dynamic_array(4),
            FieldDescriptor::byte("After"),
        ];
        let schema = MessageSchema::new(
            "BAD",
            201,
            SizeRule::Variable {
                base: 4,
                element_width: 2,
                max_count: 4,
            },
            FIELDS,
        );
        assert!(matches!(
            schema.check().unwrap_err(),
            SchemaError::MisplacedDynamicField { field: "Items", .. }
        ));
    }

    #[test]
    fn dynamic_field_in_fixed_schema_rejected() {
        let schema = MessageSchema::new("BAD", 202, SizeRule::Fixed(12), DYNAMIC_FIELDS);
        assert!(matches!(
            schema.check().unwrap_err(),
            SchemaError::MisplacedDynamicField { .. }
        ));
    }

    #[test]
    fn invalid_widths_rejected() {
        const FIELDS: &[FieldDescriptor] = &[FieldDescriptor::unsigned("Odd", 3)];
        let schema = MessageSchema::new("BAD", 203, SizeRule::Fixed(8), FIELDS);
        assert!(matches!(
            schema.check().unwrap_err(),
            SchemaError::InvalidWidth { width: 3, .. }
        ));
    }

    #[test]
    fn field_lookup() {
        let schema = MessageSchema::new("IS_VER", 2, SizeRule::Fixed(20), VER_FIELDS);
        assert_eq!(schema.field("InSimVer").map(|f| f.byte_width), Some(1));
        assert!(schema.field("Nope").is_none());
    }
}
