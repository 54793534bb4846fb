//! # Protected Vocabulary
//!
//! A static, case-insensitive, exact-match set of reserved words that
//! must never be split, regardless of statistical signal.

/// Probes at or above this length degrade to "not protected".
///
/// The lookup folds the candidate into a fixed stack buffer; anything
/// that does not fit is by definition not a reserved word.
pub const MAX_PROBE_LEN: usize = 64;

/// The default protected word list for C-family source: language
/// keywords, libc names, and identifier words common enough to treat
/// as atomic. Domain data, not algorithm.
pub const DEFAULT_PROTECTED_WORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do",
    "double", "else", "enum", "extern", "float", "for", "goto", "if", "int",
    "long", "register", "return", "short", "signed", "sizeof", "static",
    "struct", "switch", "typedef", "union", "unsigned", "void", "volatile",
    "while",
    "define", "include", "ifdef", "ifndef", "endif",
    "printf", "malloc", "free", "size_t", "uint32_t", "uint8_t", "uint16_t",
    "null", "true", "false", "bool", "file", "path", "buffer", "length",
    "count", "offset", "data", "node", "tree", "parser", "cursor", "root",
];

/// A larger seed list for model pre-training: keywords plus libc and
/// syscall names whose letter transitions should read as "expected".
pub const SEED_WORDS: &[&str] = &[
    "include", "define", "ifndef", "endif", "return", "sizeof", "static",
    "inline", "struct", "typedef", "void", "char", "int", "float", "double",
    "long", "unsigned", "const", "signed", "short", "enum", "union",
    "volatile", "register", "extern", "auto", "bool", "complex", "imaginary",
    "restrict", "atomic", "goto", "break", "continue", "switch", "case",
    "default", "if", "else", "for", "do", "while", "printf", "fprintf",
    "sprintf", "snprintf", "scanf", "malloc", "calloc", "realloc", "free",
    "exit", "abort", "memcpy", "memset", "memmove", "strcpy", "strncpy",
    "strcat", "strlen", "strcmp", "strncmp", "strstr", "open", "close",
    "read", "write", "mmap", "munmap", "socket", "connect", "parser",
    "cursor", "node", "child", "sibling", "parent", "tree", "token",
];

/// Case-insensitive exact-match word set.
///
/// Stored lowercase and sorted; lookup folds the candidate into a
/// fixed buffer and binary-searches.
#[derive(Clone, Debug)]
pub struct ProtectedVocab {
    words: Vec<String>,
}

impl Default for ProtectedVocab {
    fn default() -> Self {
        Self::new(DEFAULT_PROTECTED_WORDS.iter().copied())
    }
}

impl ProtectedVocab {
    /// Build a vocabulary from a word iterator.
    ///
    /// Words are lowercased, sorted, and deduplicated. Words of
    /// [`MAX_PROBE_LEN`] bytes or more could never match a probe and
    /// are dropped.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().to_ascii_lowercase())
            .filter(|w| !w.is_empty() && w.len() < MAX_PROBE_LEN)
            .collect();
        words.sort();
        words.dedup();

        Self { words }
    }

    /// An empty vocabulary; nothing is protected.
    pub fn empty() -> Self {
        Self { words: Vec::new() }
    }

    /// Case-insensitive exact membership test.
    ///
    /// Over-length probes degrade to `false` rather than failing;
    /// this is a heuristic engine, not a strict validator.
    pub fn contains(
        &self,
        candidate: &[u8],
    ) -> bool {
        if candidate.is_empty() || candidate.len() >= MAX_PROBE_LEN {
            return false;
        }

        let mut probe = [0u8; MAX_PROBE_LEN];
        for (dst, src) in probe.iter_mut().zip(candidate) {
            *dst = src.to_ascii_lowercase();
        }
        let probe = &probe[..candidate.len()];

        self.words
            .binary_search_by(|word| word.as_bytes().cmp(probe))
            .is_ok()
    }

    /// The stored (lowercase) words, in sorted order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// The number of stored words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True if nothing is protected.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
