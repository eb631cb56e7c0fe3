//! Output sink: alphabet files, the legacy two-file view and the human report.

use std::{
    fmt::Write as _,
    path::{Path, PathBuf},
};

use crate::{
    error::{EmojisetError, EmojisetResult},
    reconcile::{AlphabetOutcome, Disposition, Reconciliation, SubstitutionRecord},
    Codepoint,
};

/// File name of the unmodified reference alphabet in the legacy view.
pub const LEGACY_ORIGINAL_FILE: &str = "emojisv1.txt";

/// File name of the sorted final alphabet in the legacy view.
pub const LEGACY_SORTED_FILE: &str = "emojis.txt";

/// One lowercase hex codepoint per line, each line newline-terminated.
pub fn render_alphabet<I: IntoIterator<Item = Codepoint>>(codepoints: I) -> String {
    let mut out = String::new();
    for cp in codepoints {
        let _ = writeln!(out, "{:x}", cp);
    }
    out
}

/// Writes `contents` through a temporary sibling and a rename, so a reader
/// never observes a half-written file.
pub fn write_atomically(path: &Path, contents: &str) -> EmojisetResult<()> {
    let io_err = |path: &Path, source| EmojisetError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    std::fs::write(&tmp, contents).map_err(|e| io_err(tmp.as_path(), e))?;
    std::fs::rename(&tmp, path).map_err(|e| io_err(path, e))?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "wrote");
    Ok(())
}

/// Writes one reconciled alphabet in position order.
pub fn write_alphabet(path: &Path, outcome: &AlphabetOutcome) -> EmojisetResult<()> {
    write_atomically(path, &render_alphabet(outcome.final_codepoints()))
}

/// Writes the legacy view of the main alphabet into `dir`: the untouched
/// reference alphabet and the final alphabet sorted by codepoint.
pub fn write_legacy_view(dir: &Path, reconciliation: &Reconciliation) -> EmojisetResult<()> {
    let main = &reconciliation.main;
    write_atomically(
        &dir.join(LEGACY_ORIGINAL_FILE),
        &render_alphabet(main.originals()),
    )?;
    let mut sorted = main.final_codepoints().collect::<Vec<_>>();
    sorted.sort_unstable();
    write_atomically(&dir.join(LEGACY_SORTED_FILE), &render_alphabet(sorted))
}

fn glyph(cp: Codepoint) -> String {
    if cp.as_char().is_control() || cp.as_char().is_whitespace() {
        cp.to_string()
    } else {
        cp.as_char().to_string()
    }
}

fn render_row(out: &mut String, record: &SubstitutionRecord) {
    let note = match record.disposition {
        Disposition::Override => "override",
        Disposition::Pool | Disposition::Kept => "-",
    };
    let name = record
        .name
        .as_deref()
        .map(|name| format!(" ({name})"))
        .unwrap_or_default();
    let _ = writeln!(
        out,
        "| {} | {} ({:x}) | {} ({:x}){} | {} |",
        record.position,
        glyph(record.original),
        record.original,
        glyph(record.final_codepoint),
        record.final_codepoint,
        name,
        note
    );
}

/// Markdown-like table of every substituted position, one table per alphabet.
pub fn render_report(reconciliation: &Reconciliation) -> String {
    let mut out = String::new();
    for outcome in reconciliation.outcomes() {
        let replaced = outcome.replaced().collect::<Vec<_>>();
        let _ = writeln!(
            out,
            "## {} alphabet: {} of {} replaced\n",
            outcome.kind(),
            replaced.len(),
            outcome.len()
        );
        if replaced.is_empty() {
            out.push('\n');
            continue;
        }
        out.push_str("| Index | Invalid Emoji (hex) | Replacement (hex) | Note |\n");
        out.push_str("|-------|---------------------|-------------------|------|\n");
        for record in replaced {
            render_row(&mut out, record);
        }
        out.push('\n');
    }
    let exclusions = reconciliation
        .exclusion_counts()
        .iter()
        .map(|(category, count)| format!("{category}: {count}"))
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(
        out,
        "replacement candidates left: {}; excluded: {}",
        reconciliation.pool_remaining(),
        if exclusions.is_empty() {
            "none".to_owned()
        } else {
            exclusions
        }
    );
    out
}
