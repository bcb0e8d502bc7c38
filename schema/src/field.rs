//! Field descriptors.

/// The wire representation of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FieldKind {
    /// One-byte integer.
    Byte,
    /// Two-byte little-endian integer.
    Word,
    /// Four-byte little-endian integer.
    DWord,
    /// Four-byte IEEE-754 float.
    Float,
    /// Character array in the wire code page.
    Char,
    /// Unsigned integer of an explicit byte width.
    Unsigned,
    /// Nested structure with its own layout.
    Structure,
}

/// How many elements a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ArrayLength {
    /// A single element.
    Scalar,
    /// Exactly this many elements, unused slots zero-filled.
    Fixed(usize),
    /// Up to `max` elements; the field's wire length follows its content.
    Dynamic { max: usize },
}

/// Description of one schema field.
///
/// Immutable; a schema's fields are listed in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Width of one element in bytes. For character fields this is the whole
    /// field capacity (or 1 for dynamic text).
    pub byte_width: usize,
    pub signed: bool,
    pub array: ArrayLength,
    /// Inclusive upper bound for numeric values.
    pub max_value: Option<u64>,
    /// Required encoded length for character fields.
    pub exact_length: Option<usize>,
    /// Character fields reserve their last byte for a NUL.
    pub terminated: bool,
    /// Reserved/alignment bytes: written as zero, skipped on decode.
    pub reserved: bool,
}

impl FieldDescriptor {
    const fn base(name: &'static str, kind: FieldKind, byte_width: usize) -> Self {
        Self {
            name,
            kind,
            byte_width,
            signed: false,
            array: ArrayLength::Scalar,
            max_value: None,
            exact_length: None,
            terminated: false,
            reserved: false,
        }
    }

    #[must_use]
    pub const fn byte(name: &'static str) -> Self {
        Self::base(name, FieldKind::Byte, 1)
    }

    #[must_use]
    pub const fn signed_byte(name: &'static str) -> Self {
        Self::base(name, FieldKind::Byte, 1).signed()
    }

    #[must_use]
    pub const fn word(name: &'static str) -> Self {
        Self::base(name, FieldKind::Word, 2)
    }

    #[must_use]
    pub const fn signed_word(name: &'static str) -> Self {
        Self::base(name, FieldKind::Word, 2).signed()
    }

    #[must_use]
    pub const fn dword(name: &'static str) -> Self {
        Self::base(name, FieldKind::DWord, 4)
    }

    #[must_use]
    pub const fn signed_dword(name: &'static str) -> Self {
        Self::base(name, FieldKind::DWord, 4).signed()
    }

    #[must_use]
    pub const fn float(name: &'static str) -> Self {
        Self::base(name, FieldKind::Float, 4).signed()
    }

    /// An unsigned integer `width` bytes wide.
    #[must_use]
    pub const fn unsigned(name: &'static str, width: usize) -> Self {
        Self::base(name, FieldKind::Unsigned, width)
    }

    /// A NUL-terminated character field of `width` bytes.
    #[must_use]
    pub const fn chars(name: &'static str, width: usize) -> Self {
        let mut field = Self::base(name, FieldKind::Char, width);
        field.terminated = true;
        field
    }

    /// Text whose wire length follows its content, up to `max` bytes
    /// including the terminating NUL.
    #[must_use]
    pub const fn dynamic_chars(name: &'static str, max: usize) -> Self {
        let mut field = Self::base(name, FieldKind::Char, 1);
        field.terminated = true;
        field.array = ArrayLength::Dynamic { max };
        field
    }

    /// A nested structure `width` bytes wide.
    #[must_use]
    pub const fn structure(name: &'static str, width: usize) -> Self {
        Self::base(name, FieldKind::Structure, width)
    }

    /// `width` reserved bytes.
    #[must_use]
    pub const fn reserved(name: &'static str, width: usize) -> Self {
        let mut field = Self::base(name, FieldKind::Byte, 1);
        field.array = ArrayLength::Fixed(width);
        field.reserved = true;
        field
    }

    #[must_use]
    pub const fn signed(mut self) -> Self {
        self.signed = true;
        self
    }

    /// Sets the inclusive upper bound.
    #[must_use]
    pub const fn max(mut self, max_value: u64) -> Self {
        self.max_value = Some(max_value);
        self
    }

    /// Requires text of exactly `len` encoded bytes.
    #[must_use]
    pub const fn exact(mut self, len: usize) -> Self {
        self.exact_length = Some(len);
        self
    }

    /// Lets text use every byte of the field, with no terminating NUL.
    #[must_use]
    pub const fn unterminated(mut self) -> Self {
        self.terminated = false;
        self
    }

    /// Makes this a fixed-capacity array of `len` elements.
    #[must_use]
    pub const fn array(mut self, len: usize) -> Self {
        self.array = ArrayLength::Fixed(len);
        self
    }

    /// Makes this a count-prefixed array of at most `max` elements.
    #[must_use]
    pub const fn dynamic_array(mut self, max: usize) -> Self {
        self.array = ArrayLength::Dynamic { max };
        self
    }

    #[must_use]
    pub const fn is_array(&self) -> bool {
        !matches!(self.array, ArrayLength::Scalar)
    }

    /// Declared element count (capacity for dynamic arrays).
    #[must_use]
    pub const fn array_length(&self) -> usize {
        match self.array {
            ArrayLength::Scalar => 1,
            ArrayLength::Fixed(len) | ArrayLength::Dynamic { max: len } => len,
        }
    }

    #[must_use]
    pub const fn length_is_dynamic(&self) -> bool {
        matches!(self.array, ArrayLength::Dynamic { .. })
    }

    #[must_use]
    pub const fn element_is_structure(&self) -> bool {
        matches!(self.kind, FieldKind::Structure)
    }

    /// Bytes this field always occupies. Dynamic fields contribute nothing
    /// here; their bytes are accounted for by the schema's size rule.
    #[must_use]
    pub const fn fixed_wire_width(&self) -> usize {
        match self.array {
            ArrayLength::Scalar => self.byte_width,
            ArrayLength::Fixed(len) => self.byte_width * len,
            ArrayLength::Dynamic { .. } => 0,
        }
    }

    /// Capacity in bytes available to text, after any terminator.
    #[must_use]
    pub const fn text_capacity(&self) -> usize {
        let total = match self.array {
            ArrayLength::Dynamic { max } => max,
            _ => self.byte_width,
        };
        if self.terminated {
            total.saturating_sub(1)
        } else {
            total
        }
    }
}
