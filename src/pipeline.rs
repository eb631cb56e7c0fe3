//! Config-driven runs.

use std::path::PathBuf;

use crate::{
    classifier::Classifier,
    config::Config,
    emoji_dict::EmojiDict,
    error::EmojisetResult,
    reconcile::{Reconciler, Reconciliation},
    report, Codepoint,
};

/// Files produced by a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outputs {
    /// Main alphabet file.
    pub alphabet: Option<PathBuf>,
    /// Padding alphabet file.
    pub padding: Option<PathBuf>,
    /// Directory for `emojisv1.txt` and `emojis.txt`.
    pub legacy_dir: Option<PathBuf>,
}

/// A configured engine plus the padding alphabet it runs with.
#[derive(Debug, Clone)]
pub struct Pipeline<'d> {
    reconciler: Reconciler<'d>,
    padding: Vec<Codepoint>,
}

impl<'d> Pipeline<'d> {
    /// Wires `dict` and `config` into an engine.
    pub fn from_config(dict: &'d EmojiDict, config: &Config) -> EmojisetResult<Self> {
        let classifier = Classifier::new(dict).with_floor(config.pool.floor);
        let reconciler =
            Reconciler::new(classifier, config.exclusions.clone(), config.overrides()?)
                .with_pool_order(config.pool.order);
        Ok(Pipeline {
            reconciler,
            padding: config.alphabet.padding.clone(),
        })
    }

    /// Reconciles the padding alphabet and `main`.
    pub fn run(&self, main: &[Codepoint]) -> EmojisetResult<Reconciliation> {
        self.reconciler.reconcile(&self.padding, main)
    }

    /// Reconciles and, only if that succeeds, writes every requested output.
    pub fn run_to(&self, main: &[Codepoint], outputs: &Outputs) -> EmojisetResult<Reconciliation> {
        let reconciliation = self.run(main)?;
        write_outputs(&reconciliation, outputs)?;
        Ok(reconciliation)
    }
}

/// Writes the files named in `outputs`.
pub fn write_outputs(reconciliation: &Reconciliation, outputs: &Outputs) -> EmojisetResult<()> {
    if let Some(path) = &outputs.alphabet {
        report::write_alphabet(path, &reconciliation.main)?;
    }
    if let Some(path) = &outputs.padding {
        report::write_alphabet(path, &reconciliation.padding)?;
    }
    if let Some(dir) = &outputs.legacy_dir {
        report::write_legacy_view(dir, reconciliation)?;
    }
    Ok(())
}
