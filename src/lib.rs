#![deny(unsafe_code)]
#![deny(warnings, missing_docs, missing_debug_implementations)]
//! Collision-free single-codepoint emoji alphabets.
//!
//! A reference alphabet (one codepoint per encoding symbol) is checked against a
//! dictionary of emoji known to render. Symbols the dictionary does not list as a
//! single codepoint are substituted, position by position, from a replacement pool:
//! the dictionary's single-codepoint entries in their native order, minus every
//! codepoint that is already used, pinned by an override, or held back by one of
//! the curated lists.
//!
//! # Guarantees
//!
//! * No codepoint appears twice across the padding and main alphabets.
//! * A symbol the dictionary accepts is never replaced, even if a curated list names it.
//! * A position override always wins over the pool for its own (alphabet, position) key.
//! * The same inputs give the same output.
//! * Running out of replacements is an error, never a placeholder.
//!
//! # Passes
//!
//! The padding alphabet is reconciled first and the main alphabet second. Both
//! draw from one pool, so a replacement handed to padding can't reappear in the
//! main alphabet.

pub(crate) mod codepoint_ty;

pub mod emoji_dict;

pub mod exclusions;

pub mod replacement_pool;

pub mod classifier;

pub mod overrides;

pub mod reconcile;

pub mod source;

pub mod names;

pub mod report;

pub mod config;

pub mod pipeline;

pub mod error;

pub use codepoint_ty::{Codepoint, ParseCodepointError};

pub use classifier::{Classifier, Verdict};

pub use emoji_dict::{EmojiDict, EmojiEntry};

pub use error::{EmojisetError, EmojisetResult, NameLookupError};

pub use exclusions::{CuratedLists, ExclusionCategory, ExclusionSet};

pub use overrides::{AlphabetKind, PositionOverrides};

pub use reconcile::{Disposition, Reconciler, Reconciliation, SubstitutionRecord};

pub use replacement_pool::{PoolOrder, ReplacementPool};

/// An ordered alphabet of codepoints.
pub type Alphabet = Vec<Codepoint>;
