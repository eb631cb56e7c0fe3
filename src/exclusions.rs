//! Codepoints that must never be handed out as automatic replacements.
//!
//! Each excluded codepoint carries one category, the earliest that applies.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

use serde::Deserialize;

use crate::Codepoint;

/// Reason a codepoint may not be handed out as an automatic replacement.
///
/// Variants are declared in reporting precedence: a codepoint listed under
/// several categories is attributed to the earliest one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExclusionCategory {
    /// Present somewhere in the padding or main alphabet.
    AlreadyUsed,
    /// Pinned by a position override.
    ExplicitOverride,
    /// Valid but undesired, e.g. a near-duplicate glyph.
    Redundant,
    /// Held back for a future alphabet revision.
    FutureSpec,
    /// Takes skin-tone or gender modifiers.
    PeopleVariant,
    /// Below the configured replacement floor.
    BelowFloor,
}

impl fmt::Display for ExclusionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExclusionCategory::AlreadyUsed => "already-used",
            ExclusionCategory::ExplicitOverride => "explicit-override",
            ExclusionCategory::Redundant => "redundant",
            ExclusionCategory::FutureSpec => "future-spec",
            ExclusionCategory::PeopleVariant => "people-variant",
            ExclusionCategory::BelowFloor => "below-floor",
        })
    }
}

/// Hand-curated lists that shrink the replacement pool.
///
/// These only gate what may be offered as a replacement; they never force an
/// already acceptable symbol out of its position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CuratedLists {
    /// Near-duplicate or low-distinctiveness symbols.
    pub redundant: Vec<Codepoint>,
    /// Symbols reserved for a future revision.
    pub future: Vec<Codepoint>,
    /// Symbols that attach skin-tone or gender modifiers.
    pub people: Vec<Codepoint>,
}

/// Union of every exclusion category, remembering why each codepoint is excluded.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    reasons: HashMap<Codepoint, ExclusionCategory>,
}

impl ExclusionSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `cp` under `category`. A codepoint already present keeps the
    /// higher-precedence category.
    pub fn insert(&mut self, cp: Codepoint, category: ExclusionCategory) {
        self.reasons
            .entry(cp)
            .and_modify(|existing| {
                if category < *existing {
                    *existing = category;
                }
            })
            .or_insert(category);
    }

    /// Adds every codepoint of `iter` under `category`.
    pub fn extend<I: IntoIterator<Item = Codepoint>>(
        &mut self,
        category: ExclusionCategory,
        iter: I,
    ) {
        for cp in iter {
            self.insert(cp, category);
        }
    }

    /// Whether `cp` is excluded for any reason.
    pub fn contains(&self, cp: Codepoint) -> bool {
        self.reasons.contains_key(&cp)
    }

    /// The category `cp` is attributed to.
    pub fn category_of(&self, cp: Codepoint) -> Option<ExclusionCategory> {
        self.reasons.get(&cp).copied()
    }

    /// Number of excluded codepoints.
    pub fn len(&self) -> usize {
        self.reasons.len()
    }

    /// Whether nothing is excluded.
    pub fn is_empty(&self) -> bool {
        self.reasons.is_empty()
    }

    /// Excluded codepoint counts per category, in precedence order.
    pub fn counts(&self) -> BTreeMap<ExclusionCategory, usize> {
        let mut counts = BTreeMap::new();
        for category in self.reasons.values() {
            *counts.entry(*category).or_insert(0) += 1;
        }
        counts
    }
}
