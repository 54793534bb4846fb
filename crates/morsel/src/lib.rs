//! # `morsel` Source Sub-Word Tokenizer
//!
//! `morsel` re-segments the leaf lexical units of a parsed source file
//! into sub-word "morphemes", using an online character-bigram surprise
//! model alongside structural cues (underscores, camel-case), a
//! protected reserved-word vocabulary, and fragment-length guards.
//!
//! Every emitted unit is packed into a compact [`record::TokenRecord`]
//! with symbol-absorption flags, and deduplicated across runs against a
//! persistent on-disk vocabulary.
//!
//! See:
//! * [`pipeline`] to run a tokenization pass over leaf units.
//! * [`splitter`] for the segmentation policy and its tunables.
//! * [`entropy`] for the bigram surprise model.
//! * [`registry`] for the persistent vocabulary store.
//!
//! Segmentation is deterministic and reproducible given a fixed model
//! state and fixed input; it is not guaranteed optimal or unique.
//!
//! ```rust
//! use morsel::pipeline::{Leaf, LeafKind, Pipeline};
//! use morsel::registry::{RegistryConfig, VocabRegistry};
//!
//! let source = b"int get_user_id();";
//! let registry = VocabRegistry::in_memory(RegistryConfig::default());
//!
//! let mut pipeline = Pipeline::new(source, registry);
//! pipeline.run([
//!     Leaf { offset: 0, length: 3, kind: LeafKind::Identifier, depth: 0 },
//!     Leaf { offset: 4, length: 11, kind: LeafKind::Identifier, depth: 0 },
//! ])?;
//!
//! // "int" stays whole (protected); "get_user_id" splits on joiners.
//! assert_eq!(pipeline.records().len(), 4);
//! # Ok::<(), morsel::errors::MorselError>(())
//! ```
#![warn(missing_docs, unused)]

pub mod absorb;
pub mod buffer;
pub mod emit;
pub mod entropy;
pub mod errors;
pub mod pipeline;
pub mod protected;
pub mod record;
pub mod registry;
pub mod splitter;
