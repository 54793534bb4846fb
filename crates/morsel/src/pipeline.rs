//! # Tokenization Pipeline
//!
//! The driver contract: walk leaf units from an external parser in
//! document order, route each through the splitter, symbol absorption,
//! and the registry, and accumulate records in the output buffer.
//!
//! The pipeline does not parse grammar. Any front end able to supply
//! `(offset, length, kind, depth)` leaves in left-to-right document
//! order satisfies the [`LeafSource`] capability.

use crate::buffer::TokenBuffer;
use crate::emit::Emitter;
use crate::entropy::BigramModel;
use crate::errors::MorselResult;
use crate::protected::{ProtectedVocab, SEED_WORDS};
use crate::record::{TokenKind, TokenRecord, token_hash};
use crate::registry::VocabRegistry;
use crate::splitter::{Splitter, SplitterConfig};

/// Node-kind label of a leaf, as supplied by the front end.
///
/// Used only to choose a processing route; unknown syntax should map
/// to [`LeafKind::Symbol`] and degrade to atomic emission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeafKind {
    /// An identifier-like unit; subject to sub-token splitting.
    Identifier,
    /// A comment; resegmented as a textual blob.
    Comment,
    /// A string or character literal; resegmented as a textual blob.
    StringLiteral,
    /// A preprocessor directive or macro body; resegmented as a blob.
    Preproc,
    /// A numeric literal; emitted atomically.
    Number,
    /// Any other atomic unit: operators, punctuation, unknown kinds.
    Symbol,
}

/// One leaf lexical unit from the front end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Leaf {
    /// Byte offset in the source.
    pub offset: usize,
    /// Byte length; zero-length leaves are skipped.
    pub length: usize,
    /// The node-kind label.
    pub kind: LeafKind,
    /// Structural nesting depth of the leaf's traversal path.
    pub depth: usize,
}

/// A source of leaf units in document order.
pub trait LeafSource: Iterator<Item = Leaf> {}

impl<T: Iterator<Item = Leaf>> LeafSource for T {}

/// One tokenization run over one source.
///
/// Owns the entropy model, protected vocabulary, registry, and output
/// buffer exclusively; processing is a single linear pass with no
/// suspension points. Split decisions depend on model state mutated by
/// all prior leaves, so leaf order is part of the contract.
pub struct Pipeline<'a> {
    source: &'a [u8],
    model: BigramModel,
    protected: ProtectedVocab,
    registry: VocabRegistry,
    buffer: TokenBuffer,
    splitter: Splitter,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline with the default policy and protected vocabulary.
    pub fn new(
        source: &'a [u8],
        registry: VocabRegistry,
    ) -> Self {
        Self::with_options(
            source,
            registry,
            SplitterConfig::default(),
            ProtectedVocab::default(),
        )
    }

    /// Create a pipeline with an explicit policy and vocabulary.
    ///
    /// The model is pre-seeded here with the protected words and the
    /// domain seed list, so common words read as expected from the
    /// first leaf onward.
    pub fn with_options(
        source: &'a [u8],
        registry: VocabRegistry,
        config: SplitterConfig,
        protected: ProtectedVocab,
    ) -> Self {
        let mut model = BigramModel::new();
        let seeds: Vec<&str> = protected
            .words()
            .chain(SEED_WORDS.iter().copied())
            .collect();
        model.seed(&seeds, config.seed_repetitions);
        log::debug!(
            "seeded model with {} words x{} repetitions",
            seeds.len(),
            config.seed_repetitions
        );

        Self {
            source,
            model,
            protected,
            registry,
            buffer: TokenBuffer::for_source(source),
            splitter: Splitter::new(config),
        }
    }

    /// Process every leaf from a source.
    pub fn run<I>(
        &mut self,
        leaves: I,
    ) -> MorselResult<()>
    where
        I: IntoIterator<Item = Leaf>,
        I::IntoIter: LeafSource,
    {
        for leaf in leaves {
            self.process_leaf(leaf)?;
        }
        Ok(())
    }

    /// Process one leaf unit.
    ///
    /// Zero-length leaves are skipped. A leaf whose first byte was
    /// already absorbed by the previous record is suppressed entirely;
    /// the absorption encoding and this check are one protocol.
    pub fn process_leaf(
        &mut self,
        leaf: Leaf,
    ) -> MorselResult<()> {
        if leaf.length == 0 {
            return Ok(());
        }

        let source = self.source;
        let first = source[leaf.offset];

        if let Some(prev) = self.buffer.last() {
            if prev.absorbed.covers(first) {
                return Ok(());
            }
        }

        let before = (leaf.offset > 0).then(|| source[leaf.offset - 1]);
        let pre_space =
            before.is_some_and(|b| b.is_ascii_whitespace() && b != b'\n');
        let pre_break = before == Some(b'\n');

        let config = *self.splitter.config();
        let depth = (leaf.depth % config.depth_fold as usize) as u8;
        let text = &source[leaf.offset..leaf.offset + leaf.length];

        let mut emitter =
            Emitter::new(source, &mut self.buffer, &mut self.registry);

        match leaf.kind {
            LeafKind::Identifier => self.splitter.split_identifier(
                &mut self.model,
                &self.protected,
                &mut emitter,
                leaf.offset,
                leaf.length,
                depth,
                pre_space,
            ),

            LeafKind::Comment | LeafKind::StringLiteral | LeafKind::Preproc => {
                self.splitter
                    .split_blob(&mut emitter, leaf.offset, leaf.length, depth)
            }

            LeafKind::Number | LeafKind::Symbol => {
                // Oversized atomic blobs get bounded the same way as
                // textual content, unless the whole leaf is protected.
                if leaf.length > config.blob_limit
                    && !self.protected.contains(text)
                {
                    self.splitter.split_blob(
                        &mut emitter,
                        leaf.offset,
                        leaf.length,
                        depth,
                    )
                } else {
                    let kind = if leaf.kind == LeafKind::Number
                        || first.is_ascii_digit()
                    {
                        TokenKind::Number
                    } else {
                        TokenKind::Other
                    };

                    emitter.emit(TokenRecord {
                        hash: token_hash(text),
                        offset: leaf.offset as u32,
                        length: leaf.length.min(u16::MAX as usize) as u16,
                        kind,
                        depth,
                        pre_space,
                        pre_break,
                        ..Default::default()
                    })
                }
            }
        }
    }

    /// The records emitted so far, in order.
    pub fn records(&self) -> &[TokenRecord] {
        self.buffer.records()
    }

    /// The raw source bytes for the run.
    pub fn source(&self) -> &'a [u8] {
        self.source
    }

    /// The vocabulary registry.
    pub fn registry(&self) -> &VocabRegistry {
        &self.registry
    }

    /// The entropy model.
    pub fn model(&self) -> &BigramModel {
        &self.model
    }

    /// Finish the run, yielding the output buffer and the registry.
    pub fn finish(self) -> (TokenBuffer, VocabRegistry) {
        (self.buffer, self.registry)
    }
}
