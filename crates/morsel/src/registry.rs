//! # Persistent Vocabulary Registry
//!
//! An append-only deduplication store keyed by the 32-bit content hash.
//! The full file is loaded into an in-memory open-addressing set at
//! startup; each newly-seen hash is appended to the file immediately,
//! so a crash loses at most the in-flight entry.
//!
//! ## File format
//!
//! A headerless sequence of records:
//! `hash (4 bytes, little-endian) ‖ length (1 byte) ‖ text (length bytes)`.
//! Text longer than 255 bytes is truncated on write. A missing file is
//! an empty registry, not an error. A truncated trailing record (a
//! crashed writer's in-flight entry) is tolerated on load.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use crate::errors::{MorselError, MorselResult};

/// Slot value standing in for a content hash of `0`, which would be
/// indistinguishable from an empty slot.
const ZERO_HASH_SENTINEL: u32 = 1;

/// Maximum stored text length per entry.
pub const MAX_ENTRY_TEXT: usize = 255;

/// Registry sizing configuration.
///
/// The reference table size of 4Mi slots is a magic constant with no
/// derivation; it is carried as the default, not as a law. The design
/// assumes capacity comfortably exceeds the distinct-vocabulary
/// cardinality of realistic corpora.
#[derive(Clone, Copy, Debug)]
pub struct RegistryConfig {
    /// Total slot count for the open-addressing set.
    pub capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            capacity: 4 * 1024 * 1024,
        }
    }
}

impl RegistryConfig {
    /// Override the slot capacity.
    pub fn with_capacity(
        self,
        capacity: usize,
    ) -> Self {
        Self { capacity }
    }
}

/// One persisted registry entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryEntry {
    /// The 32-bit content hash.
    pub hash: u32,
    /// The original-case text, truncated to [`MAX_ENTRY_TEXT`] bytes.
    pub text: Vec<u8>,
}

/// Persistent, hash-deduplicated vocabulary store.
///
/// Lookup is linear probing over a fixed-capacity table with `0` as
/// the empty marker; no deletion is ever performed, so probe chains
/// never cross tombstones. Insertion refuses at one slot short of
/// capacity so that an unsuccessful probe always terminates on an
/// empty slot.
pub struct VocabRegistry {
    slots: Box<[u32]>,
    len: usize,
    writer: Option<BufWriter<File>>,
}

impl VocabRegistry {
    /// Create an in-memory registry with no backing store.
    pub fn in_memory(config: RegistryConfig) -> Self {
        Self {
            slots: vec![0; config.capacity].into_boxed_slice(),
            len: 0,
            writer: None,
        }
    }

    /// Open a registry backed by `path`.
    ///
    /// Loads every existing entry into the in-memory set, then re-opens
    /// the file for appending. A missing file is an empty registry.
    /// Any other failure to read or append the backing store is
    /// reported once and the registry proceeds empty and without
    /// persistence rather than aborting the run.
    pub fn open<P: AsRef<Path>>(
        path: P,
        config: RegistryConfig,
    ) -> MorselResult<Self> {
        let path = path.as_ref();
        let mut registry = Self::in_memory(config);

        // Appending to a store that could not be loaded would duplicate
        // its entries, so a load failure disables persistence outright.
        let entries = match read_registry_file(path) {
            Ok(entries) => entries,
            Err(err) => {
                log::warn!(
                    "cannot read vocabulary file {}: {err}; \
                     continuing without persistence",
                    path.display()
                );
                return Ok(registry);
            }
        };

        for entry in entries {
            registry.insert_slot(entry.hash)?;
        }
        if registry.len > 0 {
            log::info!(
                "loaded {} vocabulary entries from {}",
                registry.len,
                path.display()
            );
        }

        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => registry.writer = Some(BufWriter::new(file)),
            Err(err) => {
                log::warn!(
                    "cannot append to vocabulary file {}: {err}; \
                     continuing without persistence",
                    path.display()
                );
            }
        }

        Ok(registry)
    }

    /// Linear-probe membership test.
    pub fn contains(
        &self,
        hash: u32,
    ) -> bool {
        let key = slot_key(hash);
        let mut idx = key as usize % self.slots.len();

        while self.slots[idx] != 0 {
            if self.slots[idx] == key {
                return true;
            }
            idx = (idx + 1) % self.slots.len();
        }
        false
    }

    /// Register a hash/text pair.
    ///
    /// A new hash is inserted into the set and appended to the backing
    /// store immediately (not batched). An already-seen hash is a
    /// no-op; deduplication is permanent for the life of the store.
    ///
    /// ## Returns
    /// `true` if the hash was newly registered.
    pub fn register(
        &mut self,
        hash: u32,
        text: &[u8],
    ) -> MorselResult<bool> {
        if self.contains(hash) {
            return Ok(false);
        }

        self.insert_slot(hash)?;

        if let Some(writer) = self.writer.as_mut() {
            if let Err(err) = append_entry(writer, hash, text) {
                log::warn!(
                    "vocabulary append failed: {err}; \
                     continuing without persistence"
                );
                self.writer = None;
            }
        }

        Ok(true)
    }

    /// The number of distinct hashes in the set.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no hashes are registered.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The total slot capacity.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// True when entries are being persisted to a backing store.
    pub fn is_persistent(&self) -> bool {
        self.writer.is_some()
    }

    fn insert_slot(
        &mut self,
        hash: u32,
    ) -> MorselResult<()> {
        // Keep at least one empty slot so probe loops terminate.
        if self.len + 1 >= self.slots.len() {
            return Err(MorselError::RegistrySaturated {
                capacity: self.slots.len(),
            });
        }

        let key = slot_key(hash);
        let mut idx = key as usize % self.slots.len();
        while self.slots[idx] != 0 {
            idx = (idx + 1) % self.slots.len();
        }
        self.slots[idx] = key;
        self.len += 1;
        Ok(())
    }
}

fn slot_key(hash: u32) -> u32 {
    if hash == 0 { ZERO_HASH_SENTINEL } else { hash }
}

fn append_entry<W: Write>(
    writer: &mut W,
    hash: u32,
    text: &[u8],
) -> io::Result<()> {
    let len = text.len().min(MAX_ENTRY_TEXT);
    writer.write_all(&hash.to_le_bytes())?;
    writer.write_all(&[len as u8])?;
    writer.write_all(&text[..len])?;
    writer.flush()
}

/// Read all entries from a registry file.
///
/// A missing file yields no entries. A truncated trailing record ends
/// the read without error.
pub fn read_registry_file<P: AsRef<Path>>(
    path: P
) -> MorselResult<Vec<RegistryEntry>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };

    let mut reader = BufReader::new(file);
    let mut entries = Vec::new();

    loop {
        let mut hash_bytes = [0u8; 4];
        match reader.read_exact(&mut hash_bytes) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::UnexpectedEof => break,
            Err(err) => return Err(err.into()),
        }

        let mut len_byte = [0u8; 1];
        if reader.read_exact(&mut len_byte).is_err() {
            break;
        }

        let mut text = vec![0u8; len_byte[0] as usize];
        if reader.read_exact(&mut text).is_err() {
            break;
        }

        entries.push(RegistryEntry {
            hash: u32::from_le_bytes(hash_bytes),
            text,
        });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> RegistryConfig {
        RegistryConfig::default().with_capacity(64)
    }

    #[test]
    fn test_register_dedup() {
        let mut registry = VocabRegistry::in_memory(small_config());

        assert!(!registry.contains(42));
        assert!(registry.register(42, b"answer").unwrap());
        assert!(registry.contains(42));

        // Second registration is a no-op.
        assert!(!registry.register(42, b"answer").unwrap());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_zero_hash() {
        let mut registry = VocabRegistry::in_memory(small_config());

        assert!(!registry.contains(0));
        assert!(registry.register(0, b"zero").unwrap());
        assert!(registry.contains(0));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_colliding_hashes_probe() {
        let mut registry = VocabRegistry::in_memory(small_config());

        // Same slot modulo 64; distinct hashes.
        registry.register(7, b"a").unwrap();
        registry.register(71, b"b").unwrap();
        registry.register(135, b"c").unwrap();

        assert!(registry.contains(7));
        assert!(registry.contains(71));
        assert!(registry.contains(135));
        assert!(!registry.contains(199));
    }

    #[test]
    fn test_saturation_is_loud() {
        let mut registry =
            VocabRegistry::in_memory(RegistryConfig::default().with_capacity(4));

        registry.register(1, b"a").unwrap();
        registry.register(2, b"b").unwrap();
        registry.register(3, b"c").unwrap();

        let err = registry.register(4, b"d").unwrap_err();
        assert!(matches!(
            err,
            MorselError::RegistrySaturated { capacity: 4 }
        ));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir::TempDir::new("morsel_registry").unwrap();
        let path = dir.path().join("absent.bin");

        let registry = VocabRegistry::open(&path, small_config()).unwrap();
        assert!(registry.is_empty());
        assert!(registry.is_persistent());
    }

    #[test]
    fn test_persistence_roundtrip() {
        let dir = tempdir::TempDir::new("morsel_registry").unwrap();
        let path = dir.path().join("vocab.bin");

        {
            let mut registry = VocabRegistry::open(&path, small_config()).unwrap();
            registry.register(10, b"alpha").unwrap();
            registry.register(20, b"Beta").unwrap();
            registry.register(10, b"alpha").unwrap();
        }

        let entries = read_registry_file(&path).unwrap();
        assert_eq!(
            entries,
            vec![
                RegistryEntry { hash: 10, text: b"alpha".to_vec() },
                RegistryEntry { hash: 20, text: b"Beta".to_vec() },
            ]
        );

        // Reload sees prior entries; new ones extend the file.
        let mut registry = VocabRegistry::open(&path, small_config()).unwrap();
        assert_eq!(registry.len(), 2);
        registry.register(30, b"gamma").unwrap();
        drop(registry);

        assert_eq!(read_registry_file(&path).unwrap().len(), 3);
    }

    #[test]
    fn test_text_truncation() {
        let dir = tempdir::TempDir::new("morsel_registry").unwrap();
        let path = dir.path().join("vocab.bin");

        let long = vec![b'x'; 400];
        let mut registry = VocabRegistry::open(&path, small_config()).unwrap();
        registry.register(99, &long).unwrap();
        drop(registry);

        let entries = read_registry_file(&path).unwrap();
        assert_eq!(entries[0].text.len(), MAX_ENTRY_TEXT);
    }

    #[test]
    fn test_unreadable_store_degrades() {
        let dir = tempdir::TempDir::new("morsel_registry").unwrap();

        // A directory at the store path exists but cannot be read as a
        // registry file; the run proceeds without persistence.
        let registry = VocabRegistry::open(dir.path(), small_config()).unwrap();
        assert!(registry.is_empty());
        assert!(!registry.is_persistent());
    }

    #[test]
    fn test_degraded_mode_still_deduplicates() {
        let dir = tempdir::TempDir::new("morsel_registry").unwrap();

        let mut registry =
            VocabRegistry::open(dir.path(), small_config()).unwrap();
        assert!(!registry.is_persistent());

        assert!(registry.register(42, b"answer").unwrap());
        assert!(!registry.register(42, b"answer").unwrap());
        assert!(registry.contains(42));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_truncated_tail_tolerated() {
        use std::io::Write;

        let dir = tempdir::TempDir::new("morsel_registry").unwrap();
        let path = dir.path().join("vocab.bin");

        {
            let mut registry = VocabRegistry::open(&path, small_config()).unwrap();
            registry.register(10, b"whole").unwrap();
        }

        // Simulate a crashed writer: hash and length, no text.
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(&55u32.to_le_bytes()).unwrap();
        file.write_all(&[200u8]).unwrap();
        drop(file);

        let registry = VocabRegistry::open(&path, small_config()).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(10));
        assert!(!registry.contains(55));
    }
}
