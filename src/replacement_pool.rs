//! The ordered supply of replacement codepoints.

use std::collections::HashMap;

use serde::Deserialize;

use crate::{exclusions::ExclusionSet, Codepoint};

/// Order in which pool candidates are handed out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolOrder {
    /// Native dictionary enumeration order.
    #[default]
    Dictionary,
    /// Ascending codepoint value.
    Ascending,
}

/// Ordered, monotonically consumed set of eligible replacement codepoints.
///
/// Slots are never reordered. Removal clears a slot's validity flag and
/// `take_next` only ever moves its cursor forward, so a value leaves the pool
/// at most once.
#[derive(Debug, Clone, Default)]
pub struct ReplacementPool {
    slots: Vec<Codepoint>,
    live: Vec<bool>,
    slot_of: HashMap<Codepoint, usize>,
    cursor: usize,
    remaining: usize,
}

impl ReplacementPool {
    /// Builds the pool from `candidates` minus everything in `exclusions`,
    /// keeping the relative order of survivors. Repeated candidates collapse
    /// into their first occurrence.
    pub fn new<I: IntoIterator<Item = Codepoint>>(
        candidates: I,
        exclusions: &ExclusionSet,
    ) -> Self {
        let mut pool = ReplacementPool::default();
        for cp in candidates {
            if exclusions.contains(cp) || pool.slot_of.contains_key(&cp) {
                continue;
            }
            pool.slot_of.insert(cp, pool.slots.len());
            pool.slots.push(cp);
            pool.live.push(true);
        }
        pool.remaining = pool.slots.len();
        pool
    }

    /// Like [`new`](Self::new), but orders survivors as `order` asks.
    pub fn with_order<I: IntoIterator<Item = Codepoint>>(
        candidates: I,
        exclusions: &ExclusionSet,
        order: PoolOrder,
    ) -> Self {
        match order {
            PoolOrder::Dictionary => Self::new(candidates, exclusions),
            PoolOrder::Ascending => {
                let mut sorted = candidates.into_iter().collect::<Vec<_>>();
                sorted.sort_unstable();
                Self::new(sorted, exclusions)
            }
        }
    }

    /// Removes `cp` if it is still available. Returns whether anything was removed.
    pub fn remove(&mut self, cp: Codepoint) -> bool {
        match self.slot_of.get(&cp) {
            Some(&idx) if self.live[idx] => {
                self.live[idx] = false;
                self.remaining -= 1;
                true
            }
            _ => false,
        }
    }

    /// Hands out the next available codepoint, or `None` once exhausted.
    pub fn take_next(&mut self) -> Option<Codepoint> {
        while self.cursor < self.slots.len() {
            let idx = self.cursor;
            self.cursor += 1;
            if self.live[idx] {
                self.live[idx] = false;
                self.remaining -= 1;
                return Some(self.slots[idx]);
            }
        }
        None
    }

    /// Whether `cp` is still available.
    pub fn contains(&self, cp: Codepoint) -> bool {
        self.slot_of
            .get(&cp)
            .map(|&idx| self.live[idx])
            .unwrap_or(false)
    }

    /// Available codepoints in hand-out order.
    pub fn iter(&self) -> impl Iterator<Item = Codepoint> + '_ {
        self.slots
            .iter()
            .zip(self.live.iter())
            .skip(self.cursor)
            .filter_map(|(&cp, &live)| live.then_some(cp))
    }

    /// Number of codepoints still available.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Alias of [`remaining`](Self::remaining).
    pub fn len(&self) -> usize {
        self.remaining
    }

    /// Whether the pool is exhausted.
    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }
}
