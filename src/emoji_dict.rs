//! The dictionary of emoji known to render, indexed for single-codepoint queries.
//!
//! Entries are read in the layout of Unicode's `emoji-test.txt`:
//!
//! ```text
//! 1F600 ; fully-qualified # 😀 E1.0 grinning face
//! 1F44B 1F3FB ; fully-qualified # 👋🏻 E1.0 waving hand: light skin tone
//! ```
//!
//! A line without `;` is taken as a bare, fully-qualified codepoint sequence.
//! Enumeration order is file order; it decides which replacement is handed out
//! first, so it must not be disturbed.

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::{
    error::{EmojisetError, EmojisetResult},
    Codepoint,
};

pub(crate) type EntryCharVec = SmallVec<[char; 8]>;

/// Status assumed for a line that names none.
pub const DEFAULT_ACCEPTED_STATUS: &str = "fully-qualified";

/// Statuses loaded unless configured otherwise.
///
/// Text-default emoji such as U+269C only occur as a lone codepoint on their
/// `unqualified` line, so that status is needed to know them at all.
pub const DEFAULT_ACCEPTED_STATUSES: [&str; 3] =
    ["fully-qualified", "minimally-qualified", "unqualified"];

/// One dictionary entry: a codepoint sequence forming a single emoji.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmojiEntry {
    chars: EntryCharVec,
    name: Option<String>,
}

impl EmojiEntry {
    /// Builds an entry, returning `None` if the sequence is not exactly one
    /// extended grapheme cluster in NFC.
    pub fn new<I: IntoIterator<Item = char>>(chars: I, name: Option<String>) -> Option<Self> {
        use unicode_segmentation::UnicodeSegmentation;

        let chars = chars.into_iter().collect::<EntryCharVec>();
        let text = chars.iter().collect::<String>();
        let mut graphemes = text.graphemes(true);
        graphemes.next()?;
        if graphemes.next().is_some() {
            return None;
        }
        if !unicode_normalization::is_nfc(&text) {
            return None;
        }
        Some(EmojiEntry { chars, name })
    }

    /// The codepoints of this entry.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// The sole codepoint, if this entry is exactly one codepoint long.
    pub fn single(&self) -> Option<Codepoint> {
        match self.chars[..] {
            [ch] => Some(Codepoint::new(ch)),
            _ => None,
        }
    }

    /// Short name carried by the dictionary, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Membership index over the emoji dictionary.
#[derive(Debug, Clone, Default)]
pub struct EmojiDict {
    entries: Vec<EmojiEntry>,
    singles: Vec<Codepoint>,
    single_entry: HashMap<Codepoint, usize>,
}

impl EmojiDict {
    /// Indexes already-built entries, keeping their order.
    pub fn from_entries<I: IntoIterator<Item = EmojiEntry>>(entries: I) -> Self {
        let mut dict = EmojiDict::default();
        for entry in entries {
            dict.push(entry);
        }
        dict
    }

    /// Convenience constructor for a dictionary made only of single codepoints.
    pub fn from_singles<I: IntoIterator<Item = Codepoint>>(singles: I) -> Self {
        Self::from_entries(
            singles
                .into_iter()
                .filter_map(|cp| EmojiEntry::new([cp.as_char()], None)),
        )
    }

    fn push(&mut self, entry: EmojiEntry) {
        let idx = self.entries.len();
        if let Some(cp) = entry.single() {
            if self.single_entry.contains_key(&cp) {
                return;
            }
            self.single_entry.insert(cp, idx);
            self.singles.push(cp);
        }
        self.entries.push(entry);
    }

    /// Parses dictionary text. Only entries whose status is listed in `accept` are kept.
    ///
    /// `origin` names the document in error messages.
    pub fn parse(text: &str, origin: &str, accept: &[&str]) -> EmojisetResult<Self> {
        let mut dict = EmojiDict::default();
        let mut dropped = 0usize;
        for (line_no, line) in text.lines().enumerate() {
            let (data, comment) = match line.split_once('#') {
                Some((data, comment)) => (data.trim(), Some(comment)),
                None => (line.trim(), None),
            };
            if data.is_empty() {
                continue;
            }
            let (sequence, status) = match data.split_once(';') {
                Some((sequence, status)) => (sequence.trim(), status.trim()),
                None => (data, DEFAULT_ACCEPTED_STATUS),
            };
            if !accept.contains(&status) {
                continue;
            }
            let chars = sequence
                .split_whitespace()
                .map(|hex| Codepoint::from_hex(hex).map(Codepoint::as_char))
                .collect::<Result<EntryCharVec, _>>()
                .map_err(|e| EmojisetError::MalformedSource {
                    origin: origin.to_owned(),
                    message: format!("line {}: {}", line_no + 1, e),
                })?;
            if chars.is_empty() {
                return Err(EmojisetError::MalformedSource {
                    origin: origin.to_owned(),
                    message: format!("line {}: empty codepoint sequence", line_no + 1),
                });
            }
            let name = comment.and_then(name_from_comment);
            match EmojiEntry::new(chars, name) {
                Some(entry) => dict.push(entry),
                None => {
                    dropped += 1;
                    tracing::warn!(
                        origin,
                        line = line_no + 1,
                        "dictionary entry is not a single NFC grapheme cluster, skipping"
                    );
                }
            }
        }
        tracing::debug!(
            origin,
            entries = dict.entries.len(),
            singles = dict.singles.len(),
            dropped,
            "parsed emoji dictionary"
        );
        Ok(dict)
    }

    /// True iff some entry is exactly the one codepoint `cp`.
    pub fn is_known_single_codepoint_emoji(&self, cp: Codepoint) -> bool {
        self.single_entry.contains_key(&cp)
    }

    /// Every single-codepoint entry in dictionary order.
    pub fn all_single_codepoint_emoji(&self) -> impl ExactSizeIterator<Item = Codepoint> + '_ {
        self.singles.iter().copied()
    }

    /// The dictionary's short name for a single-codepoint entry.
    pub fn name_of(&self, cp: Codepoint) -> Option<&str> {
        let idx = *self.single_entry.get(&cp)?;
        self.entries[idx].name()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary holds no entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// `# 😀 E1.0 grinning face` -> "grinning face"
fn name_from_comment(comment: &str) -> Option<String> {
    let mut tokens = comment.split_whitespace().peekable();
    tokens.next()?;
    if let Some(version) = tokens.peek() {
        let is_version = version
            .strip_prefix('E')
            .map(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit() || c == '.'))
            .unwrap_or(false);
        if is_version {
            tokens.next();
        }
    }
    let name = tokens.collect::<Vec<_>>().join(" ");
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::{EmojiDict, EmojiEntry, DEFAULT_ACCEPTED_STATUS, DEFAULT_ACCEPTED_STATUSES};
    use crate::Codepoint;

    const SAMPLE: &str = "\
# group: Smileys & Emotion

1F600                                                  ; fully-qualified     # 😀 E1.0 grinning face
263A FE0F                                              ; fully-qualified     # ☺️ E0.6 smiling face
263A                                                   ; unqualified         # ☺ E0.6 smiling face
1F44B 1F3FB                                            ; fully-qualified     # 👋🏻 E1.0 waving hand: light skin tone
1F3FB                                                  ; component           # 🏻 E1.0 light skin tone
1F004                                                  ; fully-qualified     # 🀄 E0.6 mahjong red dragon
1F600                                                  ; fully-qualified     # 😀 E1.0 grinning face again
";

    fn cp(v: u32) -> Codepoint {
        Codepoint::from_u32(v).unwrap()
    }

    #[test]
    fn test_parse_keeps_order_and_status() {
        let dict = EmojiDict::parse(SAMPLE, "sample", &[DEFAULT_ACCEPTED_STATUS]).unwrap();
        assert_eq!(
            vec![cp(0x1F600), cp(0x1F004)],
            dict.all_single_codepoint_emoji().collect::<Vec<_>>()
        );
        assert_eq!(4, dict.len());
        assert!(dict.is_known_single_codepoint_emoji(cp(0x1F600)));
        // only present as part of a sequence or under a rejected status
        assert!(!dict.is_known_single_codepoint_emoji(cp(0x263A)));
        assert!(!dict.is_known_single_codepoint_emoji(cp(0x1F3FB)));
        assert!(!dict.is_known_single_codepoint_emoji(cp(0x1F44B)));
    }

    #[test]
    fn test_parse_accepts_extra_status() {
        let dict =
            EmojiDict::parse(SAMPLE, "sample", &[DEFAULT_ACCEPTED_STATUS, "component"]).unwrap();
        assert!(dict.is_known_single_codepoint_emoji(cp(0x1F3FB)));
    }

    #[test]
    fn test_default_statuses_know_text_default_emoji() {
        let dict = EmojiDict::parse(SAMPLE, "sample", &DEFAULT_ACCEPTED_STATUSES).unwrap();
        assert_eq!(
            vec![cp(0x1F600), cp(0x263A), cp(0x1F004)],
            dict.all_single_codepoint_emoji().collect::<Vec<_>>()
        );
        // the FE0F sequence is an entry too, but never a single
        assert_eq!(5, dict.len());
        assert!(!dict.is_known_single_codepoint_emoji(cp(0x1F3FB)));
    }

    #[test]
    fn test_names() {
        let dict = EmojiDict::parse(SAMPLE, "sample", &[DEFAULT_ACCEPTED_STATUS]).unwrap();
        assert_eq!(Some("grinning face"), dict.name_of(cp(0x1F600)));
        assert_eq!(Some("mahjong red dragon"), dict.name_of(cp(0x1F004)));
        assert_eq!(None, dict.name_of(cp(0x41)));
    }

    #[test]
    fn test_bare_lines() {
        let dict = EmojiDict::parse("1F601\n1F602 # 😂\n", "bare", &[DEFAULT_ACCEPTED_STATUS])
            .unwrap();
        assert_eq!(2, dict.all_single_codepoint_emoji().len());
        assert_eq!(None, dict.name_of(cp(0x1F602)));
    }

    #[test]
    fn test_bad_hex_is_malformed() {
        let err = EmojiDict::parse("1F60Z ; fully-qualified\n", "bad", &[DEFAULT_ACCEPTED_STATUS])
            .unwrap_err();
        assert!(err.to_string().contains("line 1"), "{err}");
    }

    #[test]
    fn test_entry_rejects_two_clusters() {
        assert!(EmojiEntry::new(['A', 'B'], None).is_none());
        assert!(EmojiEntry::new(['\u{1F1FA}', '\u{1F1F8}'], None).is_some());
        assert!(EmojiEntry::new(['\u{212B}'], None).is_none());
    }
}
