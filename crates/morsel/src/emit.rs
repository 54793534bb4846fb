//! # Record Emission
//!
//! The single emission point shared by the splitter and the driver.
//! Every record, whatever produced it, takes the same path: symbol
//! absorption lookahead, vocabulary registration, buffer append.

use crate::absorb::Absorbed;
use crate::buffer::TokenBuffer;
use crate::errors::{MorselError, MorselResult};
use crate::record::TokenRecord;
use crate::registry::VocabRegistry;

/// Borrowed emission context for one run.
pub struct Emitter<'a> {
    source: &'a [u8],
    buffer: &'a mut TokenBuffer,
    registry: &'a mut VocabRegistry,
}

impl<'a> Emitter<'a> {
    /// Bundle the source, output buffer, and registry for emission.
    pub fn new(
        source: &'a [u8],
        buffer: &'a mut TokenBuffer,
        registry: &'a mut VocabRegistry,
    ) -> Self {
        Self {
            source,
            buffer,
            registry,
        }
    }

    /// The raw source bytes for the run.
    pub fn source(&self) -> &'a [u8] {
        self.source
    }

    /// Emit one record: absorb any trailing symbol, register its
    /// hash/text, and append it to the output buffer.
    pub fn emit(
        &mut self,
        mut record: TokenRecord,
    ) -> MorselResult<()> {
        // Refuse before registering, so the registry never records a
        // token the buffer dropped.
        if self.buffer.len() >= self.buffer.capacity() {
            return Err(MorselError::BufferOverflow {
                capacity: self.buffer.capacity(),
            });
        }

        record.absorbed = Absorbed::scan(self.source, record.span().end);
        self.registry.register(record.hash, record.text(self.source))?;
        self.buffer.push(record)
    }

    /// Backpatch the joiner flag onto the last emitted record.
    pub fn mark_joiner_on_last(&mut self) {
        self.buffer.mark_joiner_on_last();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::token_hash;
    use crate::registry::RegistryConfig;

    fn word(
        source: &[u8],
        offset: u32,
        length: u16,
    ) -> TokenRecord {
        let text = &source[offset as usize..(offset + length as u32) as usize];
        TokenRecord {
            hash: token_hash(text),
            offset,
            length,
            ..Default::default()
        }
    }

    #[test]
    fn test_emit_absorbs_and_registers() {
        let source = b"foo();";
        let mut buffer = TokenBuffer::for_source(source);
        let mut registry =
            VocabRegistry::in_memory(RegistryConfig::default().with_capacity(16));

        let mut emitter = Emitter::new(source, &mut buffer, &mut registry);
        emitter.emit(word(source, 0, 3)).unwrap();

        let record = buffer.records()[0];
        assert!(record.absorbed.open);
        assert!(!record.absorbed.semi);
        assert!(registry.contains(token_hash(b"foo")));
    }

    #[test]
    fn test_overflow_skips_registration() {
        let source = b"ab";
        let mut buffer = TokenBuffer::with_capacity(1);
        let mut registry =
            VocabRegistry::in_memory(RegistryConfig::default().with_capacity(16));

        let mut emitter = Emitter::new(source, &mut buffer, &mut registry);
        emitter.emit(word(source, 0, 1)).unwrap();
        emitter.emit(word(source, 1, 1)).unwrap_err();

        assert!(!registry.contains(token_hash(b"b")));
        assert_eq!(buffer.len(), 1);
    }
}
