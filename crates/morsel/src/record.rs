//! # Token Record Codec
//!
//! The compact representation of one emitted unit. The reference
//! encoding is a bit-packed 16-bit meta field; here each attribute is
//! a named field so the invariants are visible in the type.

use core::ops::Range;

use crate::absorb::Absorbed;

/// Nesting depth is folded into `0..DEPTH_FOLD` by modulus.
///
/// Lossy by design: collisions at fold boundaries are accepted.
pub const DEPTH_FOLD: u8 = 8;

/// FNV-1a offset basis.
const FNV_BASIS: u32 = 0x811c_9dc5;
/// FNV-1a prime.
const FNV_PRIME: u32 = 0x0100_0193;

/// Case-insensitive 32-bit content hash of a unit's text.
///
/// FNV-1a over the ASCII-lowercased bytes, so `Foo`, `FOO` and `foo`
/// share one hash (and one registry entry).
pub fn token_hash(bytes: &[u8]) -> u32 {
    let mut h = FNV_BASIS;
    for &b in bytes {
        h ^= u32::from(b.to_ascii_lowercase());
        h = h.wrapping_mul(FNV_PRIME);
    }
    h
}

/// The unit-kind tag of a record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TokenKind {
    /// An identifier fragment or whole word.
    #[default]
    Word,
    /// A fragment of textual content (comment, string, preprocessor blob).
    Text,
    /// A numeric literal.
    Number,
    /// Any other atomic unit (operators, punctuation, unknown kinds).
    Other,
}

/// The casing class of a word fragment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Casing {
    /// No uppercase letters.
    #[default]
    Lower,
    /// Exactly one uppercase letter, in first position.
    Capitalized,
    /// Every byte is an uppercase letter.
    Upper,
    /// Any other mix.
    Camel,
}

impl Casing {
    /// Classify the casing of a fragment.
    pub fn classify(bytes: &[u8]) -> Self {
        let caps = bytes.iter().filter(|b| b.is_ascii_uppercase()).count();

        if caps == 0 {
            Casing::Lower
        } else if caps == bytes.len() {
            Casing::Upper
        } else if caps == 1 && bytes[0].is_ascii_uppercase() {
            Casing::Capitalized
        } else {
            Casing::Camel
        }
    }
}

/// One emitted unit of output.
///
/// Invariants: `length > 0`; `offset + length` never exceeds the source
/// size; `depth < DEPTH_FOLD`. Records are immutable after append,
/// except for `has_joiner` which may be backpatched by the output
/// buffer (see [`crate::buffer::TokenBuffer::mark_joiner_on_last`]).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TokenRecord {
    /// Case-insensitive content hash of the unit's text.
    pub hash: u32,

    /// Byte offset in the source.
    pub offset: u32,

    /// Byte length in the source.
    pub length: u16,

    /// The unit-kind tag.
    pub kind: TokenKind,

    /// The casing class.
    pub casing: Casing,

    /// The unit was preceded by non-break whitespace.
    pub pre_space: bool,

    /// The unit was preceded by a line break.
    pub pre_break: bool,

    /// The unit was produced by splitting on a joining character,
    /// and the joiner followed it.
    pub has_joiner: bool,

    /// Nesting depth, folded modulo [`DEPTH_FOLD`].
    pub depth: u8,

    /// Absorbed following symbols.
    pub absorbed: Absorbed,
}

impl TokenRecord {
    /// The source byte range this record covers.
    pub fn span(&self) -> Range<usize> {
        let start = self.offset as usize;
        start..start + self.length as usize
    }

    /// The record's text within its source.
    pub fn text<'a>(
        &self,
        source: &'a [u8],
    ) -> &'a [u8] {
        &source[self.span()]
    }
}
