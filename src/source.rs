//! Loading input documents: the reference alphabet and the emoji dictionary.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::OnceLock,
    time::Duration,
};

use regex::Regex;

use crate::{
    emoji_dict::EmojiDict,
    error::{EmojisetError, EmojisetResult},
    Codepoint,
};

/// Where the reference alphabet lives unless configured otherwise.
pub const DEFAULT_MAPPING_URL: &str =
    "https://raw.githubusercontent.com/keith-turner/ecoji/master/mapping.go";

/// Where the emoji dictionary lives unless configured otherwise.
pub const DEFAULT_DICTIONARY_URL: &str = "https://unicode.org/Public/emoji/latest/emoji-test.txt";

/// A document to read, either over HTTP or from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    /// Fetched with a GET request.
    Url(String),
    /// Read from the local filesystem.
    File(PathBuf),
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::Url(url) => f.write_str(url),
            SourceLocation::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl SourceLocation {
    /// Reads the whole document as text.
    pub fn load(&self, timeout: Duration) -> EmojisetResult<String> {
        match self {
            SourceLocation::Url(url) => fetch_text(url, timeout),
            SourceLocation::File(path) => read_text(path),
        }
    }
}

/// GETs `url` and returns the body.
pub fn fetch_text(url: &str, timeout: Duration) -> EmojisetResult<String> {
    tracing::info!(url, "fetching");
    let agent = ureq::AgentBuilder::new().timeout(timeout).build();
    let response = agent
        .get(url)
        .call()
        .map_err(|e| EmojisetError::SourceUnavailable {
            url: url.into(),
            message: e.to_string(),
        })?;
    response
        .into_string()
        .map_err(|e| EmojisetError::SourceUnavailable {
            url: url.into(),
            message: format!("read body: {e}"),
        })
}

fn read_text(path: &Path) -> EmojisetResult<String> {
    tracing::info!(path = %path.display(), "reading");
    std::fs::read_to_string(path).map_err(|e| EmojisetError::SourceUnavailable {
        url: path.display().to_string(),
        message: e.to_string(),
    })
}

fn mapping_line() -> &'static Regex {
    static MAPPING_LINE: OnceLock<Regex> = OnceLock::new();
    MAPPING_LINE.get_or_init(|| {
        Regex::new(r"(?m)^\temojis\[(\d+)\] = 0x([0-9A-Z]+)\r?$").expect("mapping pattern is valid")
    })
}

/// Extracts the reference alphabet from lines of the form `\temojis[<index>] = 0x<HEX>`.
///
/// Other lines are ignored. Indices must count up from zero in document order.
pub fn parse_mapping(text: &str, origin: &str) -> EmojisetResult<Vec<Codepoint>> {
    let malformed = |message: String| EmojisetError::MalformedSource {
        origin: origin.to_owned(),
        message,
    };
    let mut alphabet = Vec::new();
    for caps in mapping_line().captures_iter(text) {
        let index = caps[1]
            .parse::<usize>()
            .map_err(|e| malformed(format!("index {:?}: {e}", &caps[1])))?;
        if index != alphabet.len() {
            return Err(malformed(format!(
                "expected emojis[{}], found emojis[{}]",
                alphabet.len(),
                index
            )));
        }
        let cp = Codepoint::from_hex(&caps[2])
            .map_err(|e| malformed(format!("emojis[{index}]: {e}")))?;
        alphabet.push(cp);
    }
    if alphabet.is_empty() {
        return Err(malformed("no `emojis[<index>] = 0x<HEX>` assignments found".into()));
    }
    tracing::debug!(origin, symbols = alphabet.len(), "parsed reference alphabet");
    Ok(alphabet)
}

/// Loads and parses the reference alphabet.
pub fn load_mapping(
    location: &SourceLocation,
    timeout: Duration,
) -> EmojisetResult<Vec<Codepoint>> {
    let text = location.load(timeout)?;
    parse_mapping(&text, &location.to_string())
}

/// Loads and parses the emoji dictionary, keeping entries whose status is in `accept`.
pub fn load_dictionary(
    location: &SourceLocation,
    accept: &[&str],
    timeout: Duration,
) -> EmojisetResult<EmojiDict> {
    let text = location.load(timeout)?;
    EmojiDict::parse(&text, &location.to_string(), accept)
}
