//! # Output Buffer
//!
//! An ordered, append-only sequence of token records with a hard
//! capacity. Pre-sizing to the source length in bytes is a safe upper
//! bound, since no emitted unit is shorter than one byte.

use crate::errors::{MorselError, MorselResult};
use crate::record::TokenRecord;

/// Capacity-bounded record buffer for one run.
#[derive(Debug)]
pub struct TokenBuffer {
    records: Vec<TokenRecord>,
    capacity: usize,
}

impl TokenBuffer {
    /// Create a buffer with a hard record capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Create a buffer sized for a source; one slot per source byte.
    pub fn for_source(source: &[u8]) -> Self {
        Self::with_capacity(source.len())
    }

    /// Append a record.
    ///
    /// At capacity this returns [`MorselError::BufferOverflow`] rather
    /// than silently dropping the record.
    pub fn push(
        &mut self,
        record: TokenRecord,
    ) -> MorselResult<()> {
        if self.records.len() >= self.capacity {
            return Err(MorselError::BufferOverflow {
                capacity: self.capacity,
            });
        }
        self.records.push(record);
        Ok(())
    }

    /// Set the joiner flag on the most recently appended record.
    ///
    /// This is the one sanctioned mutate-after-append path: a joining
    /// character marks the record emitted before it. No-op when empty.
    pub fn mark_joiner_on_last(&mut self) {
        if let Some(last) = self.records.last_mut() {
            last.has_joiner = true;
        }
    }

    /// The most recently appended record.
    pub fn last(&self) -> Option<&TokenRecord> {
        self.records.last()
    }

    /// The appended records, in emission order.
    pub fn records(&self) -> &[TokenRecord] {
        &self.records
    }

    /// The number of appended records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no records have been appended.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The hard record capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Consume the buffer, yielding the records.
    pub fn into_records(self) -> Vec<TokenRecord> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MorselError;

    fn record(offset: u32) -> TokenRecord {
        TokenRecord {
            offset,
            length: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_push_and_overflow() {
        let mut buffer = TokenBuffer::with_capacity(2);
        buffer.push(record(0)).unwrap();
        buffer.push(record(1)).unwrap();

        let err = buffer.push(record(2)).unwrap_err();
        assert!(matches!(
            err,
            MorselError::BufferOverflow { capacity: 2 }
        ));
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_joiner_backpatch() {
        let mut buffer = TokenBuffer::with_capacity(4);

        // No-op on an empty buffer.
        buffer.mark_joiner_on_last();

        buffer.push(record(0)).unwrap();
        buffer.push(record(1)).unwrap();
        buffer.mark_joiner_on_last();

        assert!(!buffer.records()[0].has_joiner);
        assert!(buffer.records()[1].has_joiner);
    }

    #[test]
    fn test_for_source() {
        let buffer = TokenBuffer::for_source(b"hello");
        assert_eq!(buffer.capacity(), 5);
        assert!(buffer.is_empty());
    }
}
