//! # Plain Source Lexer
//!
//! A minimal single-pass lexer standing in for the external parser.
//! It produces `(offset, length, kind, depth)` leaves in document
//! order over C-family source, tracking nesting depth from braces.
//!
//! This is glue, not grammar: anything it cannot classify becomes a
//! single-byte symbol leaf, which the pipeline emits atomically.

use morsel::pipeline::{Leaf, LeafKind};

/// Iterator of leaves over raw source bytes.
pub struct PlainLexer<'a> {
    source: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> PlainLexer<'a> {
    /// Lex a source buffer from the beginning.
    pub fn new(source: &'a [u8]) -> Self {
        Self {
            source,
            pos: 0,
            depth: 0,
        }
    }

    fn leaf(
        &self,
        offset: usize,
        end: usize,
        kind: LeafKind,
    ) -> Leaf {
        Leaf {
            offset,
            length: end - offset,
            kind,
            depth: self.depth,
        }
    }

    /// Advance to the end of the current line, honoring backslash
    /// continuations.
    fn take_line(&mut self) -> usize {
        while self.pos < self.source.len() {
            if self.source[self.pos] == b'\n' {
                if self.pos > 0 && self.source[self.pos - 1] == b'\\' {
                    self.pos += 1;
                    continue;
                }
                break;
            }
            self.pos += 1;
        }
        self.pos
    }

    fn take_block_comment(&mut self) -> usize {
        self.pos += 2;
        while self.pos < self.source.len() {
            if self.source[self.pos] == b'/' && self.source[self.pos - 1] == b'*' {
                self.pos += 1;
                break;
            }
            self.pos += 1;
        }
        self.pos
    }

    fn take_quoted(
        &mut self,
        quote: u8,
    ) -> usize {
        self.pos += 1;
        while self.pos < self.source.len() {
            match self.source[self.pos] {
                b'\\' => self.pos += 2,
                b if b == quote => {
                    self.pos += 1;
                    break;
                }
                _ => self.pos += 1,
            }
        }
        self.pos.min(self.source.len())
    }

    fn take_while<F: Fn(u8) -> bool>(
        &mut self,
        accept: F,
    ) -> usize {
        while self.pos < self.source.len() && accept(self.source[self.pos]) {
            self.pos += 1;
        }
        self.pos
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_number_byte(b: u8) -> bool {
    // Good enough for hex, exponents, and suffixes.
    b.is_ascii_alphanumeric() || b == b'.'
}

impl Iterator for PlainLexer<'_> {
    type Item = Leaf;

    fn next(&mut self) -> Option<Leaf> {
        while self.pos < self.source.len() {
            let start = self.pos;
            let b = self.source[start];
            let next = self.source.get(start + 1).copied();

            if b.is_ascii_whitespace() {
                self.pos += 1;
                continue;
            }

            if b == b'#' {
                let end = self.take_line();
                return Some(self.leaf(start, end, LeafKind::Preproc));
            }

            if b == b'/' && next == Some(b'/') {
                let end = self.take_line();
                return Some(self.leaf(start, end, LeafKind::Comment));
            }

            if b == b'/' && next == Some(b'*') {
                let end = self.take_block_comment();
                return Some(self.leaf(start, end, LeafKind::Comment));
            }

            if b == b'"' || b == b'\'' {
                let end = self.take_quoted(b);
                return Some(self.leaf(start, end, LeafKind::StringLiteral));
            }

            if is_ident_start(b) {
                let end = self.take_while(is_ident_byte);
                return Some(self.leaf(start, end, LeafKind::Identifier));
            }

            if b.is_ascii_digit() {
                let end = self.take_while(is_number_byte);
                return Some(self.leaf(start, end, LeafKind::Number));
            }

            // Single-byte symbol; braces adjust depth so that a brace
            // body nests one deeper than its opener.
            self.pos += 1;
            if b == b'}' {
                self.depth = self.depth.saturating_sub(1);
            }
            let leaf = self.leaf(start, self.pos, LeafKind::Symbol);
            if b == b'{' {
                self.depth += 1;
            }
            return Some(leaf);
        }
        None
    }
}
