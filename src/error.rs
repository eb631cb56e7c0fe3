//! Diagnostic error types for alphabet generation.

use miette::Diagnostic;
use thiserror::Error;

use crate::{overrides::AlphabetKind, Codepoint};

/// Fatal errors. Any of these aborts the run before an output file is written.
#[derive(Debug, Error, Diagnostic)]
pub enum EmojisetError {
    /// A document could not be fetched or read.
    #[error("source unavailable: \"{url}\": {message}")]
    #[diagnostic(
        code(emojiset::source_unavailable),
        help("The document could not be fetched or read. Check the URL or path and the network.")
    )]
    SourceUnavailable {
        /// URL or path of the document.
        url: String,
        /// Transport or filesystem error text.
        message: String,
    },

    /// A document does not follow its grammar.
    #[error("malformed source \"{origin}\": {message}")]
    #[diagnostic(
        code(emojiset::malformed_source),
        help(
            "The document does not follow the expected grammar. Reference alphabets use \
             lines like `\\temojis[0] = 0x1F004`; dictionaries use the emoji-test.txt layout."
        )
    )]
    MalformedSource {
        /// URL or path of the document.
        origin: String,
        /// What was wrong, with the line or index where known.
        message: String,
    },

    /// A position needed a replacement and none was left.
    #[error("replacement pool exhausted at {kind} position {position} (original {original})")]
    #[diagnostic(
        code(emojiset::pool_exhausted),
        help(
            "Every eligible replacement has been used or excluded. Shrink the curated \
             exclusion lists, or pin this position with an override."
        )
    )]
    PoolExhausted {
        /// Alphabet being reconciled.
        kind: AlphabetKind,
        /// Position that could not be filled.
        position: usize,
        /// Symbol that had to be replaced there.
        original: Codepoint,
    },

    /// A symbol occurs more than once across both alphabets.
    #[error("{codepoint} appears twice: {first} and {second}")]
    #[diagnostic(
        code(emojiset::duplicate_symbol),
        help("An alphabet symbol may only appear once across the padding and main alphabets.")
    )]
    DuplicateSymbol {
        /// The repeated symbol.
        codepoint: Codepoint,
        /// Where it first occurs.
        first: String,
        /// Where it occurs again.
        second: String,
    },

    /// An override target collides with another symbol or override.
    #[error("override for {kind} position {position} ({codepoint}) conflicts: {reason}")]
    #[diagnostic(
        code(emojiset::conflicting_override),
        help("Override targets must be unique and must not already appear in either alphabet.")
    )]
    ConflictingOverride {
        /// Alphabet of the override.
        kind: AlphabetKind,
        /// Position of the override.
        position: usize,
        /// Pinned symbol.
        codepoint: Codepoint,
        /// What it collides with.
        reason: String,
    },

    /// The config file could not be read.
    #[error("failed to read config {path}")]
    #[diagnostic(
        code(emojiset::config_read),
        help("Check that the config file exists and is readable.")
    )]
    ConfigRead {
        /// Config file path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML or breaks a rule.
    #[error("invalid config {path}: {message}")]
    #[diagnostic(
        code(emojiset::config),
        help("See the sample emojiset.toml for the accepted tables and keys.")
    )]
    Config {
        /// Config file path, or a label for in-memory text.
        path: String,
        /// Parser or validation message.
        message: String,
    },

    /// Writing an output file failed.
    #[error("I/O error on {path}")]
    #[diagnostic(
        code(emojiset::io),
        help("A filesystem operation failed. Check paths and permissions.")
    )]
    Io {
        /// File or directory involved.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for fallible operations in this crate.
pub type EmojisetResult<T> = std::result::Result<T, EmojisetError>;

/// Recoverable failure to resolve a display name. Never aborts generation.
#[derive(Debug, Error)]
pub enum NameLookupError {
    /// No resolver knows a name for this codepoint.
    #[error("no name known for {0}")]
    NotFound(Codepoint),

    /// A remote lookup failed.
    #[error("name lookup for {codepoint} failed: {message}")]
    Unavailable {
        /// Codepoint being looked up.
        codepoint: Codepoint,
        /// Transport error text.
        message: String,
    },

    /// The on-disk name cache could not be read.
    #[error("name cache error for {codepoint}")]
    Cache {
        /// Codepoint being looked up.
        codepoint: Codepoint,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
