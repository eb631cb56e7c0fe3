//! The reconciliation pass: one ordered walk per alphabet, padding first, both
//! drawing on a single shared replacement pool.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::{
    classifier::Classifier,
    error::{EmojisetError, EmojisetResult},
    exclusions::{CuratedLists, ExclusionCategory, ExclusionSet},
    overrides::{AlphabetKind, PositionOverrides},
    replacement_pool::{PoolOrder, ReplacementPool},
    Codepoint,
};

/// How the final symbol of a position was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The original symbol was acceptable and kept.
    Kept,
    /// Replaced by the next codepoint from the pool.
    Pool,
    /// Replaced by a pinned position override.
    Override,
}

impl Disposition {
    /// Whether the original symbol was kept in place.
    pub fn is_kept(self) -> bool {
        self == Disposition::Kept
    }
}

/// Audit entry for one alphabet position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionRecord {
    /// Index within its own alphabet.
    pub position: usize,
    /// Symbol of the reference alphabet.
    pub original: Codepoint,
    /// Keep, pool replacement or override.
    pub disposition: Disposition,
    /// Symbol emitted at this position.
    pub final_codepoint: Codepoint,
    /// Display name of the emitted symbol, filled in for reports.
    pub name: Option<String>,
}

impl SubstitutionRecord {
    fn new(
        position: usize,
        original: Codepoint,
        disposition: Disposition,
        final_codepoint: Codepoint,
    ) -> Self {
        SubstitutionRecord {
            position,
            original,
            disposition,
            final_codepoint,
            name: None,
        }
    }

    /// Whether the original symbol was kept.
    pub fn is_kept(&self) -> bool {
        self.disposition.is_kept()
    }
}

/// Result of one alphabet's pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphabetOutcome {
    kind: AlphabetKind,
    records: Vec<SubstitutionRecord>,
}

impl AlphabetOutcome {
    /// Which alphabet this is.
    pub fn kind(&self) -> AlphabetKind {
        self.kind
    }

    /// Per-position records in position order.
    pub fn records(&self) -> &[SubstitutionRecord] {
        &self.records
    }

    pub(crate) fn records_mut(&mut self) -> &mut [SubstitutionRecord] {
        &mut self.records
    }

    /// The emitted alphabet in position order.
    pub fn final_codepoints(&self) -> impl ExactSizeIterator<Item = Codepoint> + '_ {
        self.records.iter().map(|r| r.final_codepoint)
    }

    /// The reference alphabet in position order.
    pub fn originals(&self) -> impl ExactSizeIterator<Item = Codepoint> + '_ {
        self.records.iter().map(|r| r.original)
    }

    /// Records of substituted positions only.
    pub fn replaced(&self) -> impl Iterator<Item = &SubstitutionRecord> + '_ {
        self.records.iter().filter(|r| !r.is_kept())
    }

    /// Number of positions.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the alphabet was empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Both reconciled alphabets plus pool bookkeeping.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    /// Padding alphabet outcome.
    pub padding: AlphabetOutcome,
    /// Main alphabet outcome.
    pub main: AlphabetOutcome,
    pool_remaining: usize,
    exclusion_counts: BTreeMap<ExclusionCategory, usize>,
}

impl Reconciliation {
    pub(crate) fn outcomes_mut(&mut self) -> [&mut AlphabetOutcome; 2] {
        [&mut self.padding, &mut self.main]
    }

    /// Padding then main, each in position order.
    pub fn outcomes(&self) -> [&AlphabetOutcome; 2] {
        [&self.padding, &self.main]
    }

    /// Unconsumed pool candidates left after both passes.
    pub fn pool_remaining(&self) -> usize {
        self.pool_remaining
    }

    /// Pool exclusions per category, as computed before the passes.
    pub fn exclusion_counts(&self) -> &BTreeMap<ExclusionCategory, usize> {
        &self.exclusion_counts
    }

    /// Substituted positions across both alphabets.
    pub fn replaced_count(&self) -> usize {
        self.padding.replaced().count() + self.main.replaced().count()
    }
}

/// Drives the padding and main passes over a shared pool.
#[derive(Debug, Clone)]
pub struct Reconciler<'d> {
    classifier: Classifier<'d>,
    curated: CuratedLists,
    overrides: PositionOverrides,
    order: PoolOrder,
}

impl<'d> Reconciler<'d> {
    /// Creates an engine. Curated lists and overrides are plain data owned by the engine.
    pub fn new(
        classifier: Classifier<'d>,
        curated: CuratedLists,
        overrides: PositionOverrides,
    ) -> Self {
        Reconciler {
            classifier,
            curated,
            overrides,
            order: PoolOrder::default(),
        }
    }

    /// Hands pool candidates out in `order` instead of dictionary order.
    pub fn with_pool_order(mut self, order: PoolOrder) -> Self {
        self.order = order;
        self
    }

    /// Builds the pruned pool for these alphabets, together with the
    /// exclusions that pruned it.
    fn build_pool(
        &self,
        padding: &[Codepoint],
        main: &[Codepoint],
    ) -> (ReplacementPool, ExclusionSet) {
        let exclusions =
            self.classifier
                .build_exclusion_set(&self.curated, padding, main, &self.overrides);
        let pool = ReplacementPool::with_order(
            self.classifier.dict().all_single_codepoint_emoji(),
            &exclusions,
            self.order,
        );
        (pool, exclusions)
    }

    /// Reconciles `padding` then `main`, one record per input position.
    ///
    /// Fails before touching the pool if a symbol repeats across the two
    /// alphabets or an override target collides, and fails with
    /// [`EmojisetError::PoolExhausted`] if a replacement is needed but none is left.
    pub fn reconcile(
        &self,
        padding: &[Codepoint],
        main: &[Codepoint],
    ) -> EmojisetResult<Reconciliation> {
        let locations = locate_symbols(padding, main)?;
        self.check_overrides(&locations, padding.len(), main.len())?;

        let (mut pool, exclusions) = self.build_pool(padding, main);
        tracing::debug!(
            excluded = exclusions.len(),
            pool = pool.remaining(),
            "replacement pool ready"
        );

        let padding = self.run_pass(AlphabetKind::Padding, padding, &mut pool)?;
        let main = self.run_pass(AlphabetKind::Main, main, &mut pool)?;

        debug_assert!({
            let mut seen = HashSet::new();
            padding
                .final_codepoints()
                .chain(main.final_codepoints())
                .all(|cp| seen.insert(cp))
        });

        let reconciliation = Reconciliation {
            padding,
            main,
            pool_remaining: pool.remaining(),
            exclusion_counts: exclusions.counts(),
        };
        tracing::info!(
            padding = reconciliation.padding.len(),
            main = reconciliation.main.len(),
            replaced = reconciliation.replaced_count(),
            pool_remaining = reconciliation.pool_remaining,
            "reconciliation complete"
        );
        Ok(reconciliation)
    }

    fn check_overrides(
        &self,
        locations: &HashMap<Codepoint, (AlphabetKind, usize)>,
        padding_len: usize,
        main_len: usize,
    ) -> EmojisetResult<()> {
        let mut pinned: HashMap<Codepoint, (AlphabetKind, usize)> = HashMap::new();
        for (kind, position, codepoint) in self.overrides.iter() {
            if let Some(&(used_kind, used_position)) = locations.get(&codepoint) {
                return Err(EmojisetError::ConflictingOverride {
                    kind,
                    position,
                    codepoint,
                    reason: format!(
                        "already in the {used_kind} alphabet at position {used_position}"
                    ),
                });
            }
            if let Some((other_kind, other_position)) = pinned.insert(codepoint, (kind, position))
            {
                return Err(EmojisetError::ConflictingOverride {
                    kind,
                    position,
                    codepoint,
                    reason: format!("also pinned at {other_kind} position {other_position}"),
                });
            }
            let len = match kind {
                AlphabetKind::Padding => padding_len,
                AlphabetKind::Main => main_len,
            };
            if position >= len {
                tracing::warn!(
                    %kind,
                    position,
                    len,
                    "override position is outside its alphabet and will never apply"
                );
            }
        }
        Ok(())
    }

    fn run_pass(
        &self,
        kind: AlphabetKind,
        alphabet: &[Codepoint],
        pool: &mut ReplacementPool,
    ) -> EmojisetResult<AlphabetOutcome> {
        let mut records = Vec::with_capacity(alphabet.len());
        for (position, &original) in alphabet.iter().enumerate() {
            let pinned = self.overrides.get(kind, position);
            let record = if self.classifier.is_acceptable(original) {
                if let Some(pinned) = pinned {
                    tracing::debug!(
                        %kind,
                        position,
                        %original,
                        %pinned,
                        "symbol is acceptable, override not applied"
                    );
                }
                SubstitutionRecord::new(position, original, Disposition::Kept, original)
            } else if let Some(pinned) = pinned {
                pool.remove(pinned);
                SubstitutionRecord::new(position, original, Disposition::Override, pinned)
            } else {
                let replacement = pool.take_next().ok_or(EmojisetError::PoolExhausted {
                    kind,
                    position,
                    original,
                })?;
                SubstitutionRecord::new(position, original, Disposition::Pool, replacement)
            };
            if !record.is_kept() {
                tracing::debug!(
                    %kind,
                    position,
                    original = %record.original,
                    replacement = %record.final_codepoint,
                    "substituted"
                );
            }
            records.push(record);
        }
        Ok(AlphabetOutcome { kind, records })
    }
}

fn locate_symbols(
    padding: &[Codepoint],
    main: &[Codepoint],
) -> EmojisetResult<HashMap<Codepoint, (AlphabetKind, usize)>> {
    let mut locations = HashMap::with_capacity(padding.len() + main.len());
    let tagged = padding
        .iter()
        .enumerate()
        .map(|(pos, &cp)| (AlphabetKind::Padding, pos, cp))
        .chain(
            main.iter()
                .enumerate()
                .map(|(pos, &cp)| (AlphabetKind::Main, pos, cp)),
        );
    for (kind, position, codepoint) in tagged {
        if let Some((first_kind, first_position)) = locations.insert(codepoint, (kind, position)) {
            return Err(EmojisetError::DuplicateSymbol {
                codepoint,
                first: format!("{first_kind} position {first_position}"),
                second: format!("{kind} position {position}"),
            });
        }
    }
    Ok(locations)
}

#[cfg(test)]
mod tests {
    use super::{Disposition, Reconciler};
    use crate::{
        classifier::Classifier,
        emoji_dict::EmojiDict,
        error::EmojisetError,
        exclusions::CuratedLists,
        overrides::{AlphabetKind, PositionOverrides},
        replacement_pool::PoolOrder,
        Codepoint,
    };
    use std::collections::HashSet;

    fn cp(v: u32) -> Codepoint {
        Codepoint::from_u32(v).unwrap()
    }

    fn cps(values: &[u32]) -> Vec<Codepoint> {
        values.iter().map(|&v| cp(v)).collect()
    }

    fn reconciler(dict: &EmojiDict) -> Reconciler<'_> {
        Reconciler::new(
            Classifier::new(dict),
            CuratedLists::default(),
            PositionOverrides::new(),
        )
    }

    #[test]
    fn test_single_replacement_from_pool() {
        let dict = EmojiDict::from_singles(cps(&[0x1F000, 0x1F601]));
        let result = reconciler(&dict)
            .reconcile(&[], &cps(&[0x1F000, 0x41]))
            .unwrap();
        assert_eq!(
            cps(&[0x1F000, 0x1F601]),
            result.main.final_codepoints().collect::<Vec<_>>()
        );
        let records = result.main.records();
        assert_eq!(Disposition::Kept, records[0].disposition);
        assert_eq!(Disposition::Pool, records[1].disposition);
        assert_eq!(cp(0x41), records[1].original);
        assert_eq!(0, result.pool_remaining());
    }

    #[test]
    fn test_empty_pool_is_fatal() {
        let dict = EmojiDict::from_singles(cps(&[0x1F000]));
        let err = reconciler(&dict)
            .reconcile(&[], &cps(&[0x1F000, 0x41]))
            .unwrap_err();
        match err {
            EmojisetError::PoolExhausted {
                kind,
                position,
                original,
            } => {
                assert_eq!(AlphabetKind::Main, kind);
                assert_eq!(1, position);
                assert_eq!(cp(0x41), original);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_padding_pass_runs_first_and_shares_pool() {
        let dict = EmojiDict::from_singles(cps(&[0x1F600, 0x1F601, 0x1F602]));
        let result = reconciler(&dict)
            .reconcile(&cps(&[0x42]), &cps(&[0x41, 0x1F600]))
            .unwrap();
        assert_eq!(
            cps(&[0x1F601]),
            result.padding.final_codepoints().collect::<Vec<_>>()
        );
        assert_eq!(
            cps(&[0x1F602, 0x1F600]),
            result.main.final_codepoints().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_acceptable_symbols_are_kept_even_if_curated() {
        let dict = EmojiDict::from_singles(cps(&[0x1F466, 0x1F600, 0x1F601]));
        let curated = CuratedLists {
            people: cps(&[0x1F466]),
            redundant: cps(&[0x1F600]),
            ..CuratedLists::default()
        };
        let result = Reconciler::new(Classifier::new(&dict), curated, PositionOverrides::new())
            .reconcile(&[], &cps(&[0x1F466, 0x41]))
            .unwrap();
        let records = result.main.records();
        assert!(records[0].is_kept());
        assert_eq!(cp(0x1F466), records[0].final_codepoint);
        // redundant 1F600 is skipped as a candidate
        assert_eq!(cp(0x1F601), records[1].final_codepoint);
    }

    #[test]
    fn test_override_takes_precedence_and_is_never_reused() {
        let dict = EmojiDict::from_singles(cps(&[0x1F600, 0x1F601, 0x1F602]));
        let overrides = PositionOverrides::new().with(AlphabetKind::Main, 1, cp(0x1F600));
        let result = Reconciler::new(Classifier::new(&dict), CuratedLists::default(), overrides)
            .reconcile(&[], &cps(&[0x41, 0x42, 0x43]))
            .unwrap();
        let finals = result.main.final_codepoints().collect::<Vec<_>>();
        assert_eq!(cps(&[0x1F601, 0x1F600, 0x1F602]), finals);
        assert_eq!(Disposition::Override, result.main.records()[1].disposition);
    }

    #[test]
    fn test_override_outside_pool_still_applies() {
        // the pinned value doesn't even need to be a dictionary entry
        let dict = EmojiDict::from_singles(cps(&[0x1F600]));
        let overrides = PositionOverrides::new().with(AlphabetKind::Main, 0, cp(0x2705));
        let result = Reconciler::new(Classifier::new(&dict), CuratedLists::default(), overrides)
            .reconcile(&[], &cps(&[0x41]))
            .unwrap();
        assert_eq!(cp(0x2705), result.main.records()[0].final_codepoint);
        assert_eq!(1, result.pool_remaining());
    }

    #[test]
    fn test_override_applies_with_empty_pool() {
        let dict = EmojiDict::from_singles(cps(&[0x1F600]));
        let overrides = PositionOverrides::new().with(AlphabetKind::Main, 1, cp(0x2705));
        let result = Reconciler::new(Classifier::new(&dict), CuratedLists::default(), overrides)
            .reconcile(&[], &cps(&[0x1F600, 0x41]))
            .unwrap();
        assert_eq!(0, result.pool_remaining());
        assert_eq!(
            cps(&[0x1F600, 0x2705]),
            result.main.final_codepoints().collect::<Vec<_>>()
        );
        assert_eq!(Disposition::Override, result.main.records()[1].disposition);
    }

    #[test]
    fn test_overrides_are_namespaced_by_kind() {
        let dict = EmojiDict::from_singles(cps(&[0x1F600, 0x1F601]));
        let overrides = PositionOverrides::new().with(AlphabetKind::Padding, 0, cp(0x2705));
        let result = Reconciler::new(Classifier::new(&dict), CuratedLists::default(), overrides)
            .reconcile(&cps(&[0x1F600]), &cps(&[0x41]))
            .unwrap();
        // padding position 0 is acceptable, main position 0 must come from the pool
        assert_eq!(cp(0x1F600), result.padding.records()[0].final_codepoint);
        assert_eq!(cp(0x1F601), result.main.records()[0].final_codepoint);
        assert_eq!(Disposition::Pool, result.main.records()[0].disposition);
    }

    #[test]
    fn test_override_conflicts() {
        let dict = EmojiDict::from_singles(cps(&[0x1F600, 0x1F601]));
        let used = PositionOverrides::new().with(AlphabetKind::Main, 1, cp(0x1F600));
        let err = Reconciler::new(Classifier::new(&dict), CuratedLists::default(), used)
            .reconcile(&[], &cps(&[0x1F600, 0x41]))
            .unwrap_err();
        assert!(matches!(err, EmojisetError::ConflictingOverride { .. }));

        let twice = PositionOverrides::new()
            .with(AlphabetKind::Main, 0, cp(0x2705))
            .with(AlphabetKind::Padding, 0, cp(0x2705));
        let err = Reconciler::new(Classifier::new(&dict), CuratedLists::default(), twice)
            .reconcile(&cps(&[0x42]), &cps(&[0x41]))
            .unwrap_err();
        assert!(matches!(err, EmojisetError::ConflictingOverride { .. }));
    }

    #[test]
    fn test_duplicate_inputs_are_rejected() {
        let dict = EmojiDict::from_singles(cps(&[0x1F600, 0x1F601]));
        let err = reconciler(&dict)
            .reconcile(&cps(&[0x1F600]), &cps(&[0x41, 0x1F600]))
            .unwrap_err();
        match err {
            EmojisetError::DuplicateSymbol {
                codepoint,
                first,
                second,
            } => {
                assert_eq!(cp(0x1F600), codepoint);
                assert_eq!("padding position 0", first);
                assert_eq!("main position 1", second);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_output_is_injective_and_deterministic() {
        let singles = (0x1F600..0x1F650).collect::<Vec<u32>>();
        let dict = EmojiDict::from_singles(cps(&singles));
        let padding = cps(&[0x1F600, 0x20]);
        let main = (0x41..0x61)
            .chain(0x1F610..0x1F620)
            .map(cp)
            .collect::<Vec<_>>();
        let curated = CuratedLists {
            redundant: cps(&[0x1F601, 0x1F602]),
            future: cps(&[0x1F620]),
            people: cps(&[0x1F645, 0x1F646]),
        };
        let overrides = PositionOverrides::new()
            .with(AlphabetKind::Main, 3, cp(0x1F640))
            .with(AlphabetKind::Padding, 1, cp(0x1F641));
        let engine = Reconciler::new(Classifier::new(&dict), curated, overrides);

        let first = engine.reconcile(&padding, &main).unwrap();
        let second = engine.reconcile(&padding, &main).unwrap();
        assert_eq!(first.padding, second.padding);
        assert_eq!(first.main, second.main);

        let mut seen = HashSet::new();
        for cp in first
            .padding
            .final_codepoints()
            .chain(first.main.final_codepoints())
        {
            assert!(seen.insert(cp), "duplicate {cp}");
        }
        for record in first.main.records() {
            if main[record.position].value() >= 0x1F600 {
                assert!(record.is_kept());
            }
        }
        assert_eq!(cp(0x1F640), first.main.records()[3].final_codepoint);
        assert_eq!(cp(0x1F641), first.padding.records()[1].final_codepoint);
    }

    #[test]
    fn test_ascending_pool_order() {
        let dict = EmojiDict::from_singles(cps(&[0x1F603, 0x1F601]));
        let result = reconciler(&dict)
            .with_pool_order(PoolOrder::Ascending)
            .reconcile(&[], &cps(&[0x41]))
            .unwrap();
        assert_eq!(cp(0x1F601), result.main.records()[0].final_codepoint);
    }
}
