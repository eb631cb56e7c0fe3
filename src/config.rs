//! TOML configuration: input locations, curated lists, overrides and name lookup.
//!
//! Every table is optional; an absent file means [`Config::default`].

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;

use crate::{
    emoji_dict::DEFAULT_ACCEPTED_STATUSES,
    error::{EmojisetError, EmojisetResult},
    exclusions::CuratedLists,
    overrides::{AlphabetKind, PositionOverrides},
    replacement_pool::PoolOrder,
    source::{SourceLocation, DEFAULT_DICTIONARY_URL, DEFAULT_MAPPING_URL},
    Codepoint,
};

/// Padding symbols used when the config names none.
pub const DEFAULT_PADDING: [Codepoint; 4] = [
    Codepoint::new('\u{269C}'),
    Codepoint::new('\u{1F3CD}'),
    Codepoint::new('\u{1F4D1}'),
    Codepoint::new('\u{1F64B}'),
];

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Reference alphabet document.
    pub source: LocationConfig,
    /// Emoji dictionary document.
    pub dictionary: DictionaryConfig,
    /// Replacement pool tuning.
    pub pool: PoolConfig,
    /// Padding alphabet.
    pub alphabet: AlphabetConfig,
    /// Curated exclusion lists.
    pub exclusions: CuratedLists,
    /// Per-position overrides.
    pub overrides: OverridesConfig,
    /// Display-name lookup for reports.
    pub names: NamesConfig,
    /// HTTP settings.
    pub network: NetworkConfig,
}

/// A document given either as `url` or `file`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocationConfig {
    /// Remote location.
    pub url: Option<String>,
    /// Local path; wins over `url` when both are given on the command line.
    pub file: Option<PathBuf>,
}

impl LocationConfig {
    fn resolve(&self, default_url: &str) -> SourceLocation {
        match (&self.file, &self.url) {
            (Some(file), _) => SourceLocation::File(file.clone()),
            (None, Some(url)) => SourceLocation::Url(url.clone()),
            (None, None) => SourceLocation::Url(default_url.to_owned()),
        }
    }
}

/// Dictionary location and the statuses to load.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DictionaryConfig {
    /// Remote location.
    pub url: Option<String>,
    /// Local path.
    pub file: Option<PathBuf>,
    /// `emoji-test.txt` statuses to accept.
    pub accept: Vec<String>,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        DictionaryConfig {
            url: None,
            file: None,
            accept: DEFAULT_ACCEPTED_STATUSES
                .iter()
                .map(|status| (*status).to_owned())
                .collect(),
        }
    }
}

/// Pool ordering and floor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolConfig {
    /// Hand-out order.
    pub order: PoolOrder,
    /// Dictionary codepoints below this value are never offered.
    pub floor: Option<Codepoint>,
}

/// Padding alphabet symbols.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlphabetConfig {
    /// Padding symbols in position order.
    pub padding: Vec<Codepoint>,
}

impl Default for AlphabetConfig {
    fn default() -> Self {
        AlphabetConfig {
            padding: DEFAULT_PADDING.to_vec(),
        }
    }
}

/// One pinned position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverrideEntry {
    /// Index within its alphabet.
    pub position: usize,
    /// Symbol to emit there when the original is rejected.
    pub codepoint: Codepoint,
}

/// Overrides, kept apart per alphabet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverridesConfig {
    /// Main alphabet overrides.
    pub main: Vec<OverrideEntry>,
    /// Padding alphabet overrides.
    pub padding: Vec<OverrideEntry>,
}

/// Where report names come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameSource {
    /// Names carried by the dictionary comments.
    #[default]
    Dictionary,
    /// HTTP lookup through `url_template`, cached on disk.
    Remote,
}

/// Name lookup settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamesConfig {
    /// Resolver kind.
    pub source: NameSource,
    /// URL with a `{hex}` placeholder, required for `remote`.
    pub url_template: Option<String>,
    /// Cache directory for remote names.
    pub cache_dir: Option<PathBuf>,
}

/// HTTP settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkConfig {
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> EmojisetResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| EmojisetError::ConfigRead {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml(&content, &path.display().to_string())
    }

    /// Parse TOML text; `origin` names it in errors.
    pub fn from_toml(content: &str, origin: &str) -> EmojisetResult<Self> {
        let config: Config = toml::from_str(content).map_err(|e| EmojisetError::Config {
            path: origin.to_owned(),
            message: e.to_string(),
        })?;
        config.validate(origin)?;
        Ok(config)
    }

    fn validate(&self, origin: &str) -> EmojisetResult<()> {
        let invalid = |message: String| EmojisetError::Config {
            path: origin.to_owned(),
            message,
        };
        if self.source.url.is_some() && self.source.file.is_some() {
            return Err(invalid("[source] takes either `url` or `file`, not both".into()));
        }
        if self.dictionary.url.is_some() && self.dictionary.file.is_some() {
            return Err(invalid(
                "[dictionary] takes either `url` or `file`, not both".into(),
            ));
        }
        if self.dictionary.accept.is_empty() {
            return Err(invalid("[dictionary] `accept` must name at least one status".into()));
        }
        if self.names.source == NameSource::Remote {
            match &self.names.url_template {
                Some(template) if template.contains("{hex}") => {}
                _ => {
                    return Err(invalid(
                        "[names] remote lookup needs a `url_template` containing `{hex}`".into(),
                    ))
                }
            }
        }
        self.position_overrides(origin).map(|_| ())
    }

    fn position_overrides(&self, origin: &str) -> EmojisetResult<PositionOverrides> {
        let mut overrides = PositionOverrides::new();
        let tables = [
            (AlphabetKind::Padding, &self.overrides.padding),
            (AlphabetKind::Main, &self.overrides.main),
        ];
        for (kind, entries) in tables {
            for entry in entries.iter() {
                if let Some(previous) = overrides.insert(kind, entry.position, entry.codepoint) {
                    return Err(EmojisetError::Config {
                        path: origin.to_owned(),
                        message: format!(
                            "{kind} position {} is overridden twice ({previous} and {})",
                            entry.position, entry.codepoint
                        ),
                    });
                }
            }
        }
        Ok(overrides)
    }

    /// Overrides as the engine consumes them.
    pub fn overrides(&self) -> EmojisetResult<PositionOverrides> {
        self.position_overrides("config")
    }

    /// Resolved reference alphabet location.
    pub fn source_location(&self) -> SourceLocation {
        self.source.resolve(DEFAULT_MAPPING_URL)
    }

    /// Resolved dictionary location.
    pub fn dictionary_location(&self) -> SourceLocation {
        let location = LocationConfig {
            url: self.dictionary.url.clone(),
            file: self.dictionary.file.clone(),
        };
        location.resolve(DEFAULT_DICTIONARY_URL)
    }

    /// Accepted dictionary statuses as borrowed strings.
    pub fn accepted_statuses(&self) -> Vec<&str> {
        self.dictionary.accept.iter().map(String::as_str).collect()
    }

    /// HTTP timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.network.timeout_secs)
    }

    /// The configured cache directory, or `$XDG_CACHE_HOME/emojiset/names`.
    pub fn name_cache_dir(&self) -> Option<PathBuf> {
        self.names.cache_dir.clone().or_else(default_cache_dir)
    }
}

fn default_cache_dir() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".cache")))?;
    Some(base.join("emojiset").join("names"))
}
