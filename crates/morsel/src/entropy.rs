//! # Online Character-Bigram Surprise Model
//!
//! Tracks how often each byte follows each other byte, and answers
//! "how unusual is the transition `a -> b` given everything seen so far?"
//!
//! The model is streaming: it is trained online as leaves are processed,
//! so later split decisions see evidence from earlier text in the same
//! file. This order dependence is intentional.

/// Minimum outgoing observations for a byte before its transitions
/// are judged at all. Below this, every transition reads as unsurprising.
pub const EVIDENCE_FLOOR: u32 = 5;

/// Additive smoothing applied to the transition count.
const SMOOTHING: f32 = 0.1;

const TABLE: usize = 256;

/// Per-byte-pair frequency table with a surprise query.
///
/// State is `counts[a][b]` (observations of `b` following `a`) and
/// `totals[a]` (all outgoing observations of `a`). The invariant
/// `totals[a] == sum(counts[a][*])` holds because both are only
/// mutated together by [`BigramModel::train`].
pub struct BigramModel {
    /// Row-major on the previous byte; `TABLE * TABLE` entries.
    counts: Box<[u32]>,
    totals: Box<[u32]>,
}

impl Default for BigramModel {
    fn default() -> Self {
        Self::new()
    }
}

impl BigramModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self {
            counts: vec![0; TABLE * TABLE].into_boxed_slice(),
            totals: vec![0; TABLE].into_boxed_slice(),
        }
    }

    /// Observe every adjacent byte pair in `text`.
    ///
    /// No-op for inputs shorter than 2 bytes. Never fails.
    pub fn train(
        &mut self,
        text: &[u8],
    ) {
        for pair in text.windows(2) {
            let (a, b) = (pair[0] as usize, pair[1] as usize);
            self.counts[a * TABLE + b] += 1;
            self.totals[a] += 1;
        }
    }

    /// Train each word `repetitions` times, so common domain words are
    /// treated as "expected" and do not trigger spurious statistical splits.
    ///
    /// ## Arguments
    /// * `words` - the seed word list.
    /// * `repetitions` - the training repetition count; a tunable, not derived.
    pub fn seed<S: AsRef<[u8]>>(
        &mut self,
        words: &[S],
        repetitions: usize,
    ) {
        for _ in 0..repetitions {
            for word in words {
                self.train(word.as_ref());
            }
        }
    }

    /// Surprise score for observing `next` after `cur`.
    ///
    /// Returns `-log2(p)` of the smoothed transition probability; higher
    /// means more statistically unusual, which the splitter reads as a
    /// soft boundary signal.
    ///
    /// If `cur` has fewer than [`EVIDENCE_FLOOR`] outgoing observations
    /// there is not enough evidence to judge, and the score is `0.0`.
    pub fn surprise(
        &self,
        cur: u8,
        next: u8,
    ) -> f32 {
        let total = self.totals[cur as usize];
        if total < EVIDENCE_FLOOR {
            return 0.0;
        }

        let count = self.counts[cur as usize * TABLE + next as usize] as f32;
        let p = (count + SMOOTHING) / (total as f32 + 1.0);
        -p.log2()
    }

    /// Total outgoing observations for a byte.
    pub fn total(
        &self,
        cur: u8,
    ) -> u32 {
        self.totals[cur as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_input_is_noop() {
        let mut model = BigramModel::new();
        model.train(b"");
        model.train(b"x");

        assert_eq!(model.total(b'x'), 0);
    }

    #[test]
    fn test_totals_match_counts() {
        let mut model = BigramModel::new();
        model.train(b"abcabd");

        // 'a' is followed by 'b' twice; 'b' by 'c' and 'd' once each.
        assert_eq!(model.total(b'a'), 2);
        assert_eq!(model.total(b'b'), 2);
        assert_eq!(model.total(b'c'), 1);
        assert_eq!(model.total(b'd'), 0);
    }

    #[test]
    fn test_low_evidence_suppression() {
        let mut model = BigramModel::new();
        for _ in 0..(EVIDENCE_FLOOR - 1) {
            model.train(b"ab");
        }
        assert_eq!(model.surprise(b'a', b'z'), 0.0);

        model.train(b"ab");
        assert!(model.surprise(b'a', b'z') > 0.0);
    }

    #[test]
    fn test_common_pair_less_surprising() {
        let mut model = BigramModel::new();
        for _ in 0..50 {
            model.train(b"ab");
        }
        model.train(b"ac");

        assert!(model.surprise(b'a', b'b') < model.surprise(b'a', b'c'));
        assert!(model.surprise(b'a', b'z') > model.surprise(b'a', b'c'));
    }

    #[test]
    fn test_seed_repetitions() {
        let mut model = BigramModel::new();
        model.seed(&["ab", "bc"], 20);

        assert_eq!(model.total(b'a'), 20);
        assert_eq!(model.total(b'b'), 20);
    }
}
