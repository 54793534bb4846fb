//! # Identifier Splitter
//!
//! Re-segments identifier-like spans into morphemes using three cues,
//! in priority order: the underscore joiner (structural, always wins),
//! camel-case transitions (structural), and bigram surprise
//! (statistical, guarded against pathological fragmentation).
//!
//! The splitter never fails on its own input; every heuristic
//! ambiguity degrades to the conservative choice. Its only error path
//! is resource exhaustion propagated from emission.

use crate::emit::Emitter;
use crate::entropy::BigramModel;
use crate::errors::MorselResult;
use crate::protected::ProtectedVocab;
use crate::record::{Casing, TokenKind, TokenRecord, token_hash};

/// Default surprise threshold for the primary splitting policy.
pub const DEFAULT_SURPRISE_THRESHOLD: f32 = 5.0;

/// Stricter threshold used by the debugging/analysis policy.
pub const STRICT_SURPRISE_THRESHOLD: f32 = 5.5;

/// Splitting policy configuration.
///
/// All values are heuristic constants carried from the reference
/// engine with no stated derivation; they are named and overridable,
/// and no "correct" value is implied.
#[derive(Clone, Copy, Debug)]
pub struct SplitterConfig {
    /// Surprise score above which a statistical split is permitted.
    pub surprise_threshold: f32,

    /// Minimum left-fragment length for an unprotected statistical split.
    pub min_left: usize,

    /// Minimum remaining right-side length for a statistical split.
    pub min_right: usize,

    /// Model pre-training repetitions per seed word.
    pub seed_repetitions: usize,

    /// Non-identifier leaves longer than this are resegmented.
    pub blob_limit: usize,

    /// Modulus folding nesting depth into the record's small range.
    pub depth_fold: u8,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            surprise_threshold: DEFAULT_SURPRISE_THRESHOLD,
            min_left: 4,
            min_right: 3,
            seed_repetitions: 20,
            blob_limit: 32,
            depth_fold: 8,
        }
    }
}

impl SplitterConfig {
    /// The stricter debugging policy: splits need more surprise.
    pub fn strict() -> Self {
        Self::default().with_surprise_threshold(STRICT_SURPRISE_THRESHOLD)
    }

    /// Override the surprise threshold.
    pub fn with_surprise_threshold(
        self,
        surprise_threshold: f32,
    ) -> Self {
        Self {
            surprise_threshold,
            ..self
        }
    }

    /// Override the fragment-length safety guard.
    pub fn with_fragment_guard(
        self,
        min_left: usize,
        min_right: usize,
    ) -> Self {
        Self {
            min_left,
            min_right,
            ..self
        }
    }

    /// Override the seed repetition count.
    pub fn with_seed_repetitions(
        self,
        seed_repetitions: usize,
    ) -> Self {
        Self {
            seed_repetitions,
            ..self
        }
    }

    /// Override the oversized-blob guard.
    pub fn with_blob_limit(
        self,
        blob_limit: usize,
    ) -> Self {
        Self { blob_limit, ..self }
    }
}

/// The sub-token segmentation engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct Splitter {
    config: SplitterConfig,
}

impl Splitter {
    /// Create a splitter with the given policy.
    pub fn new(config: SplitterConfig) -> Self {
        Self { config }
    }

    /// The active policy.
    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    /// Split one identifier-like span into morpheme records.
    ///
    /// The emitted fragments cover `offset..offset + length` end to
    /// end, with no gaps and no overlaps; joining underscores are
    /// encoded as flags rather than fragments. The model is trained on
    /// the whole span exactly once as a side effect.
    ///
    /// `pre_space` applies only to the first fragment; later fragments
    /// are contiguous with their predecessor.
    pub fn split_identifier(
        &self,
        model: &mut BigramModel,
        protected: &ProtectedVocab,
        emitter: &mut Emitter<'_>,
        offset: usize,
        length: usize,
        depth: u8,
        pre_space: bool,
    ) -> MorselResult<()> {
        let source = emitter.source();
        let text = &source[offset..offset + length];

        // Protected words are never split; casing and joiner stay unset.
        if protected.contains(text) {
            let record = TokenRecord {
                hash: token_hash(text),
                offset: offset as u32,
                length: clamp_len(length),
                depth,
                pre_space,
                ..Default::default()
            };
            emitter.emit(record)?;
            model.train(text);
            return Ok(());
        }

        model.train(text);

        let mut start = 0;
        let mut emitted = 0;

        for i in 0..length {
            let cur = text[i];

            // The joiner ends the pending fragment and is itself never
            // a record; it marks the fragment emitted before it.
            if cur == b'_' {
                if i > start {
                    self.emit_word(
                        emitter,
                        offset,
                        start..i,
                        depth,
                        emitted == 0 && pre_space,
                    )?;
                    emitted += 1;
                }
                if emitted > 0 {
                    emitter.mark_joiner_on_last();
                }
                start = i + 1;
                continue;
            }

            if i + 1 < length {
                let next = text[i + 1];

                let mut split = cur.is_ascii_lowercase() && next.is_ascii_uppercase();

                if !split {
                    let surprise = model.surprise(cur, next);
                    if surprise > self.config.surprise_threshold {
                        let left = (i + 1) - start;
                        let right = length - (i + 1);

                        // Split freely when the left side alone is a
                        // reserved word; otherwise guard against tiny
                        // fragments.
                        if protected.contains(&text[start..=i]) {
                            split = true;
                        } else if left >= self.config.min_left
                            && right >= self.config.min_right
                        {
                            split = true;
                        }

                        if split {
                            log::trace!(
                                "entropy split {:?} (surprise {surprise:.2})",
                                String::from_utf8_lossy(&text[start..=i]),
                            );
                        }
                    }
                }

                if split {
                    self.emit_word(
                        emitter,
                        offset,
                        start..i + 1,
                        depth,
                        emitted == 0 && pre_space,
                    )?;
                    emitted += 1;
                    start = i + 1;
                }
            }
        }

        if start < length {
            self.emit_word(
                emitter,
                offset,
                start..length,
                depth,
                emitted == 0 && pre_space,
            )?;
        }

        Ok(())
    }

    /// Resegment an oversized or textual blob on whitespace and
    /// punctuation, one record per maximal run of content bytes.
    ///
    /// Applies to comments, string literals, preprocessor text, and
    /// any non-identifier leaf past the blob limit; it bounds record
    /// size without consulting the model.
    pub fn split_blob(
        &self,
        emitter: &mut Emitter<'_>,
        offset: usize,
        length: usize,
        depth: u8,
    ) -> MorselResult<()> {
        let source = emitter.source();
        let text = &source[offset..offset + length];

        let mut start = 0;
        for i in 0..length {
            let cur = text[i];
            if cur.is_ascii_whitespace() || cur.is_ascii_punctuation() {
                if i > start {
                    self.emit_text(emitter, offset, start..i, depth)?;
                }
                start = i + 1;
            }
        }
        if start < length {
            self.emit_text(emitter, offset, start..length, depth)?;
        }

        Ok(())
    }

    fn emit_word(
        &self,
        emitter: &mut Emitter<'_>,
        offset: usize,
        fragment: core::ops::Range<usize>,
        depth: u8,
        pre_space: bool,
    ) -> MorselResult<()> {
        let bytes = &emitter.source()[offset + fragment.start..offset + fragment.end];

        emitter.emit(TokenRecord {
            hash: token_hash(bytes),
            offset: (offset + fragment.start) as u32,
            length: clamp_len(fragment.len()),
            kind: TokenKind::Word,
            casing: Casing::classify(bytes),
            depth,
            pre_space,
            ..Default::default()
        })
    }

    fn emit_text(
        &self,
        emitter: &mut Emitter<'_>,
        offset: usize,
        fragment: core::ops::Range<usize>,
        depth: u8,
    ) -> MorselResult<()> {
        let bytes = &emitter.source()[offset + fragment.start..offset + fragment.end];

        emitter.emit(TokenRecord {
            hash: token_hash(bytes),
            offset: (offset + fragment.start) as u32,
            length: clamp_len(fragment.len()),
            kind: TokenKind::Text,
            depth,
            ..Default::default()
        })
    }
}

/// The record length field is fixed-width; oversized spans saturate.
fn clamp_len(length: usize) -> u16 {
    length.min(u16::MAX as usize) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::TokenBuffer;
    use crate::registry::{RegistryConfig, VocabRegistry};

    struct Fixture {
        model: BigramModel,
        protected: ProtectedVocab,
        buffer: TokenBuffer,
        registry: VocabRegistry,
    }

    impl Fixture {
        fn untrained(source: &[u8]) -> Self {
            Self {
                model: BigramModel::new(),
                protected: ProtectedVocab::default(),
                buffer: TokenBuffer::for_source(source),
                registry: VocabRegistry::in_memory(
                    RegistryConfig::default().with_capacity(1024),
                ),
            }
        }

        fn split(
            &mut self,
            source: &[u8],
            offset: usize,
            length: usize,
        ) {
            let splitter = Splitter::default();
            let mut emitter =
                Emitter::new(source, &mut self.buffer, &mut self.registry);
            splitter
                .split_identifier(
                    &mut self.model,
                    &self.protected,
                    &mut emitter,
                    offset,
                    length,
                    0,
                    true,
                )
                .unwrap();
        }

        fn texts<'s>(
            &self,
            source: &'s [u8],
        ) -> Vec<&'s [u8]> {
            self.buffer
                .records()
                .iter()
                .map(|r| r.text(source))
                .collect()
        }
    }

    #[test]
    fn test_joiner_split() {
        let source = b"get_user_id";
        let mut fx = Fixture::untrained(source);
        fx.split(source, 0, source.len());

        assert_eq!(fx.texts(source), vec![b"get".as_ref(), b"user", b"id"]);

        let records = fx.buffer.records();
        assert!(records[0].has_joiner);
        assert!(records[1].has_joiner);
        assert!(!records[2].has_joiner);

        // Only the first fragment inherits the leading-space flag.
        assert!(records[0].pre_space);
        assert!(!records[1].pre_space);
        assert!(!records[2].pre_space);
    }

    #[test]
    fn test_camel_split_is_model_independent() {
        let source = b"userID";
        let mut fx = Fixture::untrained(source);
        fx.split(source, 0, source.len());
        assert_eq!(fx.texts(source), vec![b"user".as_ref(), b"ID"]);

        // Same result with a heavily trained model.
        let mut fx = Fixture::untrained(source);
        for _ in 0..100 {
            fx.model.train(b"userid");
        }
        fx.split(source, 0, source.len());
        assert_eq!(fx.texts(source), vec![b"user".as_ref(), b"ID"]);

        let records = fx.buffer.records();
        assert_eq!(records[0].casing, Casing::Lower);
        assert_eq!(records[1].casing, Casing::Upper);
    }

    #[test]
    fn test_protected_word_never_splits() {
        for casing in ["typedef", "Typedef", "TYPEDEF"] {
            let source = casing.as_bytes();
            let mut fx = Fixture::untrained(source);
            fx.split(source, 0, source.len());

            assert_eq!(fx.buffer.len(), 1);
            let record = fx.buffer.records()[0];
            assert_eq!(record.span(), 0..source.len());
            assert_eq!(record.casing, Casing::Lower);
            assert!(!record.has_joiner);
        }
    }

    #[test]
    fn test_protected_match_still_trains() {
        let source = b"while";
        let mut fx = Fixture::untrained(source);
        fx.split(source, 0, source.len());

        assert_eq!(fx.model.total(b'w'), 1);
    }

    #[test]
    fn test_single_byte_span() {
        let source = b"x";
        let mut fx = Fixture::untrained(source);
        fx.split(source, 0, source.len());

        assert_eq!(fx.texts(source), vec![b"x".as_ref()]);
    }

    #[test]
    fn test_leading_and_trailing_joiners() {
        let source = b"_name_";
        let mut fx = Fixture::untrained(source);
        fx.split(source, 0, source.len());

        assert_eq!(fx.texts(source), vec![b"name".as_ref()]);
        assert!(fx.buffer.records()[0].has_joiner);
    }

    #[test]
    fn test_coverage_no_gaps_no_overlaps() {
        for ident in ["parseHTTPResponse", "a_b_c", "x", "__init__", "value2"] {
            let source = ident.as_bytes();
            let mut fx = Fixture::untrained(source);
            fx.split(source, 0, source.len());

            // Concatenated spans reconstruct the span, minus joiners.
            let mut rebuilt = Vec::new();
            let mut cursor = 0;
            for record in fx.buffer.records() {
                let span = record.span();
                assert!(span.start >= cursor, "overlap in {ident}");
                for gap in &source[cursor..span.start] {
                    assert_eq!(*gap, b'_', "gap in {ident}");
                }
                rebuilt.extend_from_slice(record.text(source));
                cursor = span.end;
            }
            for tail in &source[cursor..] {
                assert_eq!(*tail, b'_', "gap at end of {ident}");
            }
            let expected: Vec<u8> =
                source.iter().copied().filter(|b| *b != b'_').collect();
            assert_eq!(rebuilt, expected, "coverage failure in {ident}");
        }
    }

    #[test]
    fn test_statistical_split_with_trained_model() {
        // Train heavily on two words so the transition between them is
        // the surprising one.
        let mut fx = Fixture::untrained(b"");
        fx.model.seed(&["parse", "buffer"], 200);

        let source = b"parsebuffer";
        fx.buffer = TokenBuffer::for_source(source);
        fx.split(source, 0, source.len());

        assert!(
            fx.buffer.len() >= 2,
            "expected a statistical split, got {:?}",
            fx.texts(source),
        );
        assert_eq!(fx.texts(source)[0], b"parse");
    }

    #[test]
    fn test_fragment_guard_blocks_short_splits() {
        // Even with surprising transitions everywhere, short spans must
        // not shatter: left >= 4 and right >= 3 is required when the
        // left side is not protected.
        let mut fx = Fixture::untrained(b"");
        fx.protected = ProtectedVocab::empty();
        // 'a' is only ever followed by 'x', so 'a' -> 'b' is surprising.
        fx.model.seed(&["ax"], 100);

        let source = b"abcd";
        fx.buffer = TokenBuffer::for_source(source);
        fx.split(source, 0, source.len());

        assert_eq!(fx.texts(source), vec![b"abcd".as_ref()]);
    }

    #[test]
    fn test_blob_resegmentation() {
        let source = b"#define MAX_LEN (1024 * 8)";
        let mut fx = Fixture::untrained(source);

        let splitter = Splitter::default();
        let mut emitter = Emitter::new(source, &mut fx.buffer, &mut fx.registry);
        splitter.split_blob(&mut emitter, 0, source.len(), 2).unwrap();

        let texts = fx.texts(source);
        assert_eq!(
            texts,
            vec![
                b"define".as_ref(),
                b"MAX",
                b"LEN",
                b"1024",
                b"8",
            ]
        );
        for record in fx.buffer.records() {
            assert_eq!(record.kind, TokenKind::Text);
            assert_eq!(record.depth, 2);
        }
    }

    #[test]
    fn test_strict_config() {
        let config = SplitterConfig::strict();
        assert_eq!(config.surprise_threshold, STRICT_SURPRISE_THRESHOLD);
        assert_eq!(config.min_left, 4);
    }
}
