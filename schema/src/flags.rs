//! Typed bitmask fields.
//!
//! A flag enum lists one variant per defined bit. [`Flags`] holds a set of
//! those variants and converts to and from the 8, 16 or 32-bit integer the
//! wire carries. Bits with no variant are dropped on decode; callers that
//! need them can ask for [`Flags::undefined_bits`] before building the set.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;
use std::marker::PhantomData;
use std::ops::{BitAnd, BitOr, BitOrAssign, Sub};

/// Unsigned integer type a bitmask is carried in.
pub trait FlagRepr: Copy + Eq + fmt::Debug + Default + 'static {
    /// Width of the wire field in bits.
    const BITS: u32;

    fn to_u32(self) -> u32;

    /// Narrows `value`; callers only pass masks that fit.
    fn from_u32(value: u32) -> Self;
}

impl FlagRepr for u8 {
    const BITS: u32 = 8;

    fn to_u32(self) -> u32 {
        u32::from(self)
    }

    fn from_u32(value: u32) -> Self {
        value as Self
    }
}

impl FlagRepr for u16 {
    const BITS: u32 = 16;

    fn to_u32(self) -> u32 {
        u32::from(self)
    }

    fn from_u32(value: u32) -> Self {
        value as Self
    }
}

impl FlagRepr for u32 {
    const BITS: u32 = 32;

    fn to_u32(self) -> u32 {
        self
    }

    fn from_u32(value: u32) -> Self {
        value
    }
}

/// An enum whose variants name bit positions of a wire integer.
///
/// Every variant must map to a distinct position below `Repr::BITS`.
pub trait BitFlag: Copy + Eq + fmt::Debug + 'static {
    type Repr: FlagRepr;

    /// Every defined variant, in bit order.
    const ALL: &'static [Self];

    /// Bit position of this variant.
    fn bit(self) -> u32;

    /// Mask with exactly this variant's bit set.
    fn mask(self) -> u32 {
        1u32 << self.bit()
    }
}

/// Mask of every defined bit of `E`.
fn defined_mask<E: BitFlag>() -> u32 {
    E::ALL.iter().fold(0, |acc, flag| acc | flag.mask())
}

/// A set of `E` variants.
pub struct Flags<E: BitFlag> {
    bits: u32,
    _flag: PhantomData<E>,
}

impl<E: BitFlag> Flags<E> {
    const fn from_bits(bits: u32) -> Self {
        Self {
            bits,
            _flag: PhantomData,
        }
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self::from_bits(0)
    }

    /// Every defined variant.
    #[must_use]
    pub fn all() -> Self {
        Self::from_bits(defined_mask::<E>())
    }

    /// Builds a set from a wire value, ignoring bits with no variant.
    #[must_use]
    pub fn from_wire(raw: E::Repr) -> Self {
        let raw = raw.to_u32();
        let bits = E::ALL
            .iter()
            .filter(|flag| raw & flag.mask() != 0)
            .fold(0, |acc, flag| acc | flag.mask());
        Self::from_bits(bits)
    }

    /// Wire value with one bit per present variant.
    #[must_use]
    pub fn to_wire(self) -> E::Repr {
        E::Repr::from_u32(self.bits)
    }

    /// Bits of `raw` that [`from_wire`](Self::from_wire) would drop.
    #[must_use]
    pub fn undefined_bits(raw: E::Repr) -> E::Repr {
        E::Repr::from_u32(raw.to_u32() & !defined_mask::<E>())
    }

    #[must_use]
    pub fn contains(self, flag: E) -> bool {
        self.bits & flag.mask() != 0
    }

    /// True if every variant of `other` is also in `self`.
    #[must_use]
    pub const fn contains_all(self, other: Self) -> bool {
        self.bits & other.bits == other.bits
    }

    pub fn insert(&mut self, flag: E) {
        self.bits |= flag.mask();
    }

    pub fn remove(&mut self, flag: E) {
        self.bits &= !flag.mask();
    }

    /// Inserts or removes `flag`.
    pub fn set(&mut self, flag: E, present: bool) {
        if present {
            self.insert(flag);
        } else {
            self.remove(flag);
        }
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self::from_bits(self.bits | other.bits)
    }

    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self::from_bits(self.bits & !other.bits)
    }

    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self::from_bits(self.bits & other.bits)
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Present variants, in bit order.
    pub fn iter(self) -> impl Iterator<Item = E> {
        E::ALL.iter().copied().filter(move |flag| self.contains(*flag))
    }
}

impl<E: BitFlag> Clone for Flags<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: BitFlag> Copy for Flags<E> {}

impl<E: BitFlag> PartialEq for Flags<E> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<E: BitFlag> Eq for Flags<E> {}

impl<E: BitFlag> Hash for Flags<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits.hash(state);
    }
}

impl<E: BitFlag> Default for Flags<E> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<E: BitFlag> fmt::Debug for Flags<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<E: BitFlag> From<E> for Flags<E> {
    fn from(flag: E) -> Self {
        Self::from_bits(flag.mask())
    }
}

impl<E: BitFlag, const N: usize> From<[E; N]> for Flags<E> {
    fn from(flags: [E; N]) -> Self {
        flags.into_iter().collect()
    }
}

impl<E: BitFlag> FromIterator<E> for Flags<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        let mut flags = Self::empty();
        for flag in iter {
            flags.insert(flag);
        }
        flags
    }
}

impl<E: BitFlag> Extend<E> for Flags<E> {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        for flag in iter {
            self.insert(flag);
        }
    }
}

impl<E: BitFlag> BitOr for Flags<E> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl<E: BitFlag> BitOr<E> for Flags<E> {
    type Output = Self;

    fn bitor(mut self, rhs: E) -> Self {
        self.insert(rhs);
        self
    }
}

impl<E: BitFlag> BitOrAssign<E> for Flags<E> {
    fn bitor_assign(&mut self, rhs: E) {
        self.insert(rhs);
    }
}

impl<E: BitFlag> BitAnd for Flags<E> {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        self.intersection(rhs)
    }
}

impl<E: BitFlag> Sub for Flags<E> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.difference(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Car {
        Blue,
        Yellow,
        Lag,
        First,
        Last,
    }

    impl BitFlag for Car {
        type Repr = u8;
        const ALL: &'static [Self] = &[Self::Blue, Self::Yellow, Self::Lag, Self::First, Self::Last];

        fn bit(self) -> u32 {
            match self {
                Self::Blue => 0,
                Self::Yellow => 1,
                Self::Lag => 5,
                Self::First => 6,
                Self::Last => 7,
            }
        }
    }

    #[test]
    fn from_wire_keeps_defined_bits() {
        let flags = Flags::<Car>::from_wire(0b1110_0011);
        assert!(flags.contains(Car::Blue));
        assert!(flags.contains(Car::Yellow));
        assert!(flags.contains(Car::Lag));
        assert!(flags.contains(Car::Last));
        assert_eq!(flags.to_wire(), 0b1110_0011);
    }

    #[test]
    fn undefined_bits_dropped_but_reported() {
        let raw = 0b0001_1101;
        let flags = Flags::<Car>::from_wire(raw);
        assert_eq!(flags.to_wire(), 0b0000_0001);
        assert_eq!(Flags::<Car>::undefined_bits(raw), 0b0001_1100);
    }

    #[test]
    fn set_operations() {
        let a = Flags::from([Car::Blue, Car::First]);
        let b = Flags::from([Car::First, Car::Last]);
        assert_eq!(a | b, Flags::from([Car::Blue, Car::First, Car::Last]));
        assert_eq!(a & b, Flags::from(Car::First));
        assert_eq!(a - b, Flags::from(Car::Blue));
        assert!((a | b).contains_all(a));
        assert_eq!((a | b).len(), 3);
    }

    #[test]
    fn insert_remove() {
        let mut flags = Flags::<Car>::empty();
        assert!(flags.is_empty());
        flags.insert(Car::Lag);
        flags |= Car::Yellow;
        assert_eq!(flags.iter().collect::<Vec<_>>(), vec![Car::Yellow, Car::Lag]);
        flags.remove(Car::Lag);
        flags.set(Car::Last, true);
        assert_eq!(flags.to_wire(), 0b1000_0010);
    }

    #[test]
    fn debug_lists_members() {
        let flags = Flags::from([Car::Blue, Car::Last]);
        assert_eq!(format!("{flags:?}"), "{Blue, Last}");
    }

    #[test]
    fn every_member_contained_in_its_singleton() {
        for flag in Car::ALL {
            assert!(Flags::from([*flag]).contains(*flag));
        }
        assert_eq!(Flags::<Car>::all().to_wire(), 0b1110_0011);
    }
}
