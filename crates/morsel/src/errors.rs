//! # Error Types

/// Errors from morsel operations.
#[derive(Debug, thiserror::Error)]
pub enum MorselError {
    /// The output buffer reached its fixed capacity.
    ///
    /// The reference engine silently dropped overflow records;
    /// here the condition is surfaced to the caller instead.
    #[error("token buffer full ({capacity} records)")]
    BufferOverflow {
        /// The buffer capacity that was exhausted.
        capacity: usize,
    },

    /// The registry hash table has no free slot left for a new entry.
    #[error("vocabulary registry saturated ({capacity} slots)")]
    RegistrySaturated {
        /// The slot capacity that was exhausted.
        capacity: usize,
    },

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for morsel operations.
pub type MorselResult<T> = core::result::Result<T, MorselError>;
