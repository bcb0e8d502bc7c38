//! Message schemas, outgoing validation and bitmask fields for the InSim codec.
//!
//! This crate describes what a message looks like on the wire:
//! - Field descriptors (kind, width, signedness, array shape, bounds)
//! - Message schemas with fixed or count-driven sizes
//! - Validation of populated outgoing messages
//! - Typed bitmask sets over 8, 16 and 32-bit integers
//!
//! # Design Principles
//!
//! - **Static schemas** - Every schema is a `const`; no reflection over Rust types.
//! - **Declaration order is wire order** - Fields are listed exactly as they are laid out.
//! - **Outbound only validation** - Inbound bytes are a decode concern, never validated here.

mod error;
mod field;
mod flags;
mod schema;
mod validate;

pub use error::{SchemaError, SchemaResult, ValidationCategory, ValidationError};
pub use field::{ArrayLength, FieldDescriptor, FieldKind};
pub use flags::{BitFlag, FlagRepr, Flags};
pub use schema::{MessageSchema, SizeRule};
pub use validate::{validate, validate_field, FieldValue};

/// Size of the packet header (size, type, request id) in bytes.
pub const HEADER_SIZE: usize = 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = FieldDescriptor::byte("a");
        let _ = FieldKind::Structure;
        let _ = SizeRule::Fixed(4);
        let _ = ValidationCategory::ArrayTooLong;
        let _: Flags<NoFlags> = Flags::empty();
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum NoFlags {}

    impl BitFlag for NoFlags {
        type Repr = u8;
        const ALL: &'static [Self] = &[];

        fn bit(self) -> u32 {
            match self {}
        }
    }

    #[test]
    fn header_only_schema() {
        const SCHEMA: MessageSchema = MessageSchema::new(
            "HEADER",
            1,
            SizeRule::Fixed(4),
            &[FieldDescriptor::reserved("Zero", 1)],
        );
        assert_eq!(SCHEMA.natural_size(), HEADER_SIZE + 1);
        SCHEMA.check().unwrap();
        validate(&SCHEMA, &[FieldValue::Reserved]).unwrap();
    }
}
