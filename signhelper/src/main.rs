//! SignHelper - sign-language helper for the terminal
//!
//! Guesses a handful of signed words from hand landmark frames, and offers
//! a sign dictionary with text-to-sign lookup and lessons.

mod config;
pub mod dictionary;
pub mod recognition;
mod render;
pub mod session;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::dictionary::{lessons, SignDictionary};
use crate::recognition::{GestureClassifier, Translator};
use crate::render::{OutputFormat, Renderer};
use crate::session::{source, TranslationSession};

#[derive(Parser, Debug)]
#[command(name = "signhelper", version, about = "Sign-language helper")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Sign dictionary (signs.json) to use instead of the bundled one
    #[arg(long, global = true)]
    dictionary: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Translate a stream of landmark frames into a sentence
    Translate {
        /// JSON-lines frame file ("-" or omitted for stdin)
        #[arg(long)]
        frames: Option<PathBuf>,

        /// Pace frames by their timestamps and drop frames when busy
        #[arg(long)]
        realtime: bool,
    },
    /// Classify every frame, without sampling or debouncing
    Classify {
        /// JSON-lines frame file ("-" or omitted for stdin)
        #[arg(long)]
        frames: Option<PathBuf>,
    },
    /// Find the signs for a word or phrase
    Lookup {
        /// Text to translate
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Browse lessons
    Lessons {
        /// Category id to open
        category: Option<String>,
    },
    /// Show example phrases and the words the recognizer knows
    DemoPhrases,
    /// Convert an ASL-LEX 2.0 CSV into signs.json
    ImportAslLex {
        /// Path to signdata.csv
        #[arg(short, long)]
        input: PathBuf,

        /// Path of the signs.json to write
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries results
    let default_filter = if cli.verbose {
        "signhelper=debug"
    } else {
        "signhelper=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(io::stderr)
        .init();

    let config = AppConfig::load(cli.config.as_deref())
        .with_context(|| "failed to load configuration")?;

    let stdout = io::stdout();
    let mut out = Renderer::new(stdout.lock(), cli.format);

    match cli.command {
        Command::Translate { frames, realtime } => {
            let mut session_config = config.session.clone();
            session_config.realtime |= realtime;

            let frames = source::open(frames.as_deref())?;
            let translation = TranslationSession::new(
                session_config,
                GestureClassifier::new(config.classifier.clone()),
                Translator::new(config.stability.clone()),
            );
            session::install_signal_handlers();

            let mut write_error = None;
            let report = translation.run(frames, |event| {
                if write_error.is_none() {
                    if let Err(e) = out.event(event) {
                        write_error = Some(e);
                    }
                }
            })?;
            if let Some(e) = write_error {
                return Err(e).context("failed to write output");
            }
            out.report(&report)?;
        }
        Command::Classify { frames } => {
            let classifier = GestureClassifier::new(config.classifier.clone());
            let mut frames = source::open(frames.as_deref())?;
            let mut index = 0u64;
            while let Some(next) = frames.next_frame() {
                match next {
                    Ok(frame) => {
                        out.classification(index, &classifier.classify(&frame.hands))?;
                        index += 1;
                    }
                    Err(e) if e.is_recoverable() => warn!("skipping frame: {}", e),
                    Err(e) => return Err(e.into()),
                }
            }
            info!("classified {} frame(s)", index);
        }
        Command::Lookup { text } => {
            let dict = load_dictionary(&cli.dictionary, &config);
            let input = text.join(" ");
            let found = dictionary::text_to_sign(&dict, &input);
            out.signs(&input, &found)?;
        }
        Command::Lessons { category } => {
            let dict = load_dictionary(&cli.dictionary, &config);
            match category {
                Some(id) => out.lesson(&lessons::lesson_detail(&dict, &id)?)?,
                None => {
                    let challenge = lessons::daily_challenge(&dict).ok();
                    out.courses(challenge.as_ref(), &lessons::course_list(&dict))?;
                }
            }
        }
        Command::DemoPhrases => out.demo_phrases(&dictionary::DEMO_PHRASES)?,
        Command::ImportAslLex { input, output } => {
            let summary = dictionary::asl_lex::import_file(&input, &output)?;
            writeln!(
                out.into_inner(),
                "Wrote {} signs in {} categories to {}",
                summary.signs,
                summary.categories,
                output.display()
            )?;
        }
    }

    Ok(())
}

/// Dictionary from the CLI flag, then the config file, then the bundled data.
fn load_dictionary(flag: &Option<PathBuf>, config: &AppConfig) -> SignDictionary {
    let path = flag.as_deref().or(config.dictionary.path.as_deref());
    SignDictionary::load_or_fallback(path)
}
