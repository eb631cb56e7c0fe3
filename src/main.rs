//! emojiset CLI: reconcile a reference emoji alphabet against an emoji dictionary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::Result;

use emojiset::{
    config::{Config, NameSource},
    names::{self, CachedNames, DictNames, FirstOf, NameResolver, RemoteNames},
    pipeline::{Outputs, Pipeline},
    report,
    source,
    Classifier, Codepoint, EmojiDict, Verdict,
};

#[derive(Parser)]
#[command(name = "emojiset", version, about = "Collision-free emoji alphabet generator")]
struct Cli {
    /// TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile the reference alphabet and write the final alphabet.
    Generate {
        /// Main alphabet output file.
        #[arg(long, default_value = "emojis.txt")]
        output: PathBuf,

        /// Padding alphabet output file.
        #[arg(long)]
        padding_output: Option<PathBuf>,

        /// Write the substitution report here instead of stderr.
        #[arg(long)]
        report: Option<PathBuf>,

        /// Also write the legacy emojisv1.txt / sorted emojis.txt pair into this directory.
        #[arg(long)]
        legacy_dir: Option<PathBuf>,

        /// Read the reference alphabet from a local file.
        #[arg(long)]
        source_file: Option<PathBuf>,

        /// Read the emoji dictionary from a local file.
        #[arg(long)]
        dictionary_file: Option<PathBuf>,

        /// Skip name lookup in the report.
        #[arg(long)]
        no_names: bool,
    },

    /// List reference symbols the dictionary does not accept, without writing anything.
    Check {
        /// Read the reference alphabet from a local file.
        #[arg(long)]
        source_file: Option<PathBuf>,

        /// Read the emoji dictionary from a local file.
        #[arg(long)]
        dictionary_file: Option<PathBuf>,
    },

    /// Resolve the display name of one codepoint.
    Name {
        /// Hexadecimal codepoint, e.g. 1F600 or 0x1F600.
        codepoint: Codepoint,

        /// Read the emoji dictionary from a local file.
        #[arg(long)]
        dictionary_file: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Generate {
            output,
            padding_output,
            report: report_path,
            legacy_dir,
            source_file,
            dictionary_file,
            no_names,
        } => {
            apply_file_flags(&mut config, source_file, dictionary_file);
            let dict = load_dictionary(&config)?;
            let reference = source::load_mapping(&config.source_location(), config.timeout())?;

            let pipeline = Pipeline::from_config(&dict, &config)?;
            let outputs = Outputs {
                alphabet: Some(output),
                padding: padding_output,
                legacy_dir,
            };
            let mut reconciliation = pipeline.run_to(&reference, &outputs)?;

            if !no_names {
                let resolver = build_resolver(&config, &dict);
                let failures = names::annotate(&mut reconciliation, &resolver);
                if failures > 0 {
                    tracing::warn!(failures, "some replacements are reported without a name");
                }
            }
            let rendered = report::render_report(&reconciliation);
            match report_path {
                Some(path) => report::write_atomically(&path, &rendered)?,
                None => eprint!("{rendered}"),
            }
        }

        Commands::Check {
            source_file,
            dictionary_file,
        } => {
            apply_file_flags(&mut config, source_file, dictionary_file);
            let dict = load_dictionary(&config)?;
            let reference = source::load_mapping(&config.source_location(), config.timeout())?;
            let classifier = Classifier::new(&dict);

            let mut rejected = 0usize;
            for (position, &cp) in reference.iter().enumerate() {
                if classifier.classify(cp) == Verdict::Replace {
                    rejected += 1;
                    println!("{position}\t{cp:x}");
                }
            }
            for (position, &cp) in config.alphabet.padding.iter().enumerate() {
                if classifier.classify(cp) == Verdict::Replace {
                    rejected += 1;
                    println!("padding {position}\t{cp:x}");
                }
            }
            tracing::info!(
                symbols = reference.len(),
                rejected,
                "checked reference alphabet"
            );
        }

        Commands::Name {
            codepoint: cp,
            dictionary_file,
        } => {
            apply_file_flags(&mut config, None, dictionary_file);
            let dict = load_dictionary(&config)?;
            let resolver = build_resolver(&config, &dict);
            match resolver.resolve(cp) {
                Ok(name) => println!("{cp:x}\t{name}"),
                Err(e) => {
                    tracing::warn!(error = %e, "name lookup failed");
                    println!("{cp:x}");
                }
            }
        }
    }

    Ok(())
}

fn apply_file_flags(
    config: &mut Config,
    source_file: Option<PathBuf>,
    dictionary_file: Option<PathBuf>,
) {
    if let Some(file) = source_file {
        config.source.file = Some(file);
    }
    if let Some(file) = dictionary_file {
        config.dictionary.file = Some(file);
    }
}

fn load_dictionary(config: &Config) -> Result<EmojiDict> {
    let location = config.dictionary_location();
    let dict = source::load_dictionary(&location, &config.accepted_statuses(), config.timeout())?;
    tracing::info!(
        entries = dict.len(),
        singles = dict.all_single_codepoint_emoji().len(),
        "loaded emoji dictionary"
    );
    Ok(dict)
}

fn build_resolver<'d>(config: &Config, dict: &'d EmojiDict) -> Box<dyn NameResolver + 'd> {
    let offline = DictNames::new(dict);
    match (config.names.source, &config.names.url_template) {
        (NameSource::Remote, Some(template)) => {
            let remote = RemoteNames::new(template.clone(), config.timeout());
            match config.name_cache_dir() {
                Some(dir) => Box::new(FirstOf::new(CachedNames::new(dir, remote), offline)),
                None => Box::new(FirstOf::new(remote, offline)),
            }
        }
        _ => Box::new(offline),
    }
}
