//! Keep-or-replace decisions for alphabet symbols.

use crate::{
    emoji_dict::EmojiDict,
    exclusions::{CuratedLists, ExclusionCategory, ExclusionSet},
    overrides::PositionOverrides,
    Codepoint,
};

/// What happens to an input symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Known single-codepoint emoji; stays in place.
    Keep,
    /// Not in the dictionary as a single codepoint; must be substituted.
    Replace,
}

/// Decides keep/replace for input symbols and which codepoints the pool may offer.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'d> {
    dict: &'d EmojiDict,
    floor: Option<Codepoint>,
}

impl<'d> Classifier<'d> {
    /// Classifier over `dict` with no replacement floor.
    pub fn new(dict: &'d EmojiDict) -> Self {
        Classifier { dict, floor: None }
    }

    /// Excludes every dictionary codepoint below `floor` from the pool.
    pub fn with_floor(mut self, floor: Option<Codepoint>) -> Self {
        self.floor = floor;
        self
    }

    /// The dictionary this classifier consults.
    pub fn dict(&self) -> &'d EmojiDict {
        self.dict
    }

    /// Dictionary membership and nothing else. Curated lists never affect this.
    pub fn is_acceptable(&self, cp: Codepoint) -> bool {
        self.dict.is_known_single_codepoint_emoji(cp)
    }

    /// [`is_acceptable`](Self::is_acceptable) as a [`Verdict`].
    pub fn classify(&self, cp: Codepoint) -> Verdict {
        if self.is_acceptable(cp) {
            Verdict::Keep
        } else {
            Verdict::Replace
        }
    }

    /// Everything that must never be offered as an automatic replacement.
    pub fn build_exclusion_set(
        &self,
        curated: &CuratedLists,
        padding: &[Codepoint],
        main: &[Codepoint],
        overrides: &PositionOverrides,
    ) -> ExclusionSet {
        let mut set = ExclusionSet::new();
        set.extend(
            ExclusionCategory::AlreadyUsed,
            padding.iter().chain(main.iter()).copied(),
        );
        set.extend(ExclusionCategory::ExplicitOverride, overrides.targets());
        set.extend(ExclusionCategory::Redundant, curated.redundant.iter().copied());
        set.extend(ExclusionCategory::FutureSpec, curated.future.iter().copied());
        set.extend(ExclusionCategory::PeopleVariant, curated.people.iter().copied());
        if let Some(floor) = self.floor {
            set.extend(
                ExclusionCategory::BelowFloor,
                self.dict
                    .all_single_codepoint_emoji()
                    .filter(|&cp| cp < floor),
            );
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::{Classifier, Verdict};
    use crate::{
        emoji_dict::EmojiDict,
        exclusions::{CuratedLists, ExclusionCategory},
        overrides::{AlphabetKind, PositionOverrides},
        Codepoint,
    };

    fn cp(v: u32) -> Codepoint {
        Codepoint::from_u32(v).unwrap()
    }

    #[test]
    fn test_curated_lists_do_not_disqualify_inputs() {
        let dict = EmojiDict::from_singles([cp(0x1F600), cp(0x1F46E)]);
        let classifier = Classifier::new(&dict);
        assert_eq!(Verdict::Keep, classifier.classify(cp(0x1F46E)));
        assert_eq!(Verdict::Replace, classifier.classify(cp(0x41)));

        let curated = CuratedLists {
            people: vec![cp(0x1F46E)],
            ..CuratedLists::default()
        };
        let set = classifier.build_exclusion_set(
            &curated,
            &[],
            &[cp(0x1F46E)],
            &PositionOverrides::new(),
        );
        assert_eq!(Some(ExclusionCategory::AlreadyUsed), set.category_of(cp(0x1F46E)));
        assert!(classifier.is_acceptable(cp(0x1F46E)));
    }

    #[test]
    fn test_exclusion_set_covers_all_categories() {
        let dict = EmojiDict::from_singles([cp(0x1F004), cp(0x1F600), cp(0x1F601)]);
        let classifier = Classifier::new(&dict).with_floor(Some(cp(0x1F005)));
        let curated = CuratedLists {
            redundant: vec![cp(0x1F602)],
            future: vec![cp(0x1FAE8)],
            people: vec![cp(0x1F466)],
        };
        let overrides = PositionOverrides::new().with(AlphabetKind::Main, 1, cp(0x1F603));
        let set = classifier.build_exclusion_set(
            &curated,
            &[cp(0x269C)],
            &[cp(0x1F600), cp(0x41)],
            &overrides,
        );
        assert_eq!(Some(ExclusionCategory::AlreadyUsed), set.category_of(cp(0x269C)));
        assert_eq!(Some(ExclusionCategory::AlreadyUsed), set.category_of(cp(0x41)));
        assert_eq!(
            Some(ExclusionCategory::ExplicitOverride),
            set.category_of(cp(0x1F603))
        );
        assert_eq!(Some(ExclusionCategory::Redundant), set.category_of(cp(0x1F602)));
        assert_eq!(Some(ExclusionCategory::FutureSpec), set.category_of(cp(0x1FAE8)));
        assert_eq!(Some(ExclusionCategory::PeopleVariant), set.category_of(cp(0x1F466)));
        assert_eq!(Some(ExclusionCategory::BelowFloor), set.category_of(cp(0x1F004)));
        assert!(!set.contains(cp(0x1F601)));
    }
}
