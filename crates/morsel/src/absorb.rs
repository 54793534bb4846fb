//! # Symbol Absorption
//!
//! Instead of emitting records for `;`, `,`, `(`, `)` and `*`, the
//! punctuation following a token is encoded as a set of flags on that
//! token's record. The flag scan and the driver-side suppression check
//! are one coupled protocol: absorbing without suppressing (or vice
//! versa) produces duplicated or missing punctuation.

/// Absorbed-symbol flags for one token record.
///
/// Each flag marks that the next significant source byte after the
/// record's span is the corresponding punctuation character.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Absorbed {
    /// A following `;`.
    pub semi: bool,
    /// A following `,`.
    pub comma: bool,
    /// A following `(`.
    pub open: bool,
    /// A following `)`.
    pub close: bool,
    /// A following `*` (pointer star).
    pub star: bool,
}

impl Absorbed {
    /// Look ahead in `source` from `from`, skipping whitespace, and
    /// absorb the first non-whitespace byte if it is one of the five
    /// absorbable symbols.
    ///
    /// Lookahead only; never consumes or emits anything.
    pub fn scan(
        source: &[u8],
        from: usize,
    ) -> Self {
        let mut pos = from;
        while pos < source.len() && source[pos].is_ascii_whitespace() {
            pos += 1;
        }

        let mut absorbed = Self::default();
        if pos < source.len() {
            match source[pos] {
                b';' => absorbed.semi = true,
                b',' => absorbed.comma = true,
                b'(' => absorbed.open = true,
                b')' => absorbed.close = true,
                b'*' => absorbed.star = true,
                _ => {}
            }
        }
        absorbed
    }

    /// The suppression check: does this flag set already account for
    /// a leaf starting with `byte`?
    ///
    /// The driver must suppress emission for such a leaf, or the
    /// punctuation would appear twice in the output.
    pub fn covers(
        &self,
        byte: u8,
    ) -> bool {
        match byte {
            b';' => self.semi,
            b',' => self.comma,
            b'(' => self.open,
            b')' => self.close,
            b'*' => self.star,
            _ => false,
        }
    }

    /// True when no symbol was absorbed.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
