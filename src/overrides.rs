//! Hand-pinned replacements.

use std::{collections::BTreeMap, fmt};

use serde::Deserialize;

use crate::Codepoint;

/// Which position space a symbol belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlphabetKind {
    /// The short alphabet reserved for encoding padding.
    Padding,
    /// The main encoding alphabet.
    Main,
}

impl fmt::Display for AlphabetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AlphabetKind::Padding => "padding",
            AlphabetKind::Main => "main",
        })
    }
}

/// Hand-pinned replacements keyed by (alphabet kind, position).
///
/// The two position spaces are stored apart, so a padding override can never
/// match a main-alphabet index and vice versa.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionOverrides {
    padding: BTreeMap<usize, Codepoint>,
    main: BTreeMap<usize, Codepoint>,
}

impl PositionOverrides {
    /// Creates an empty set of overrides.
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self, kind: AlphabetKind) -> &BTreeMap<usize, Codepoint> {
        match kind {
            AlphabetKind::Padding => &self.padding,
            AlphabetKind::Main => &self.main,
        }
    }

    /// Pins `codepoint` at `position`, returning the value it replaced, if any.
    pub fn insert(
        &mut self,
        kind: AlphabetKind,
        position: usize,
        codepoint: Codepoint,
    ) -> Option<Codepoint> {
        let map = match kind {
            AlphabetKind::Padding => &mut self.padding,
            AlphabetKind::Main => &mut self.main,
        };
        map.insert(position, codepoint)
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, kind: AlphabetKind, position: usize, codepoint: Codepoint) -> Self {
        self.insert(kind, position, codepoint);
        self
    }

    /// The override for this exact key.
    pub fn get(&self, kind: AlphabetKind, position: usize) -> Option<Codepoint> {
        self.map(kind).get(&position).copied()
    }

    /// Every override as `(kind, position, codepoint)`, padding first, positions ascending.
    pub fn iter(&self) -> impl Iterator<Item = (AlphabetKind, usize, Codepoint)> + '_ {
        let padding = self
            .padding
            .iter()
            .map(|(&pos, &cp)| (AlphabetKind::Padding, pos, cp));
        let main = self
            .main
            .iter()
            .map(|(&pos, &cp)| (AlphabetKind::Main, pos, cp));
        padding.chain(main)
    }

    /// Every override target value.
    pub fn targets(&self) -> impl Iterator<Item = Codepoint> + '_ {
        self.iter().map(|(_, _, cp)| cp)
    }

    /// Number of overrides across both alphabets.
    pub fn len(&self) -> usize {
        self.padding.len() + self.main.len()
    }

    /// Whether no override is configured.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
