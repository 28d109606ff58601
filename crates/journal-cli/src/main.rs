//! Journal CLI
//!
//! Thin wrapper around journal-core for command-line usage.
//!
//! ## Usage
//!
//! ```bash
//! # Record stdin lines into the journal, echoing each entry
//! tail -f chat.txt | journal record --name Bob
//!
//! # Also copy every entry to Data/Client/JournalLogs/<timestamp>_journal.txt
//! journal --save record --name Bob
//!
//! # Force font 7 (non-unicode) onto every entry
//! journal --override-font 7 --override-ascii record
//!
//! # Show or write the effective configuration
//! journal config show
//! journal config init
//!
//! # Print the journal log directory
//! journal path
//! ```
//!
//! While recording, a line consisting of `/clear` empties the journal and
//! closes the current journal file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use journal_core::{Journal, JournalConfig, SinkState};
use tokio::io::AsyncBufReadExt;

/// Journal - bounded chat journal with optional file output
#[derive(Parser)]
#[command(name = "journal")]
#[command(version)]
#[command(about = "Journal - bounded chat journal with optional file output")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Data root (default: <platform data dir>/journal)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file (default: <data root>/journal.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Save the journal to a file for this session
    #[arg(long, global = true)]
    save: bool,

    /// Override the font of every entry with this font id
    #[arg(long, global = true, value_name = "FONT")]
    override_font: Option<u8>,

    /// With --override-font, mark overridden entries as non-unicode
    #[arg(long, global = true, requires = "override_font")]
    override_ascii: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read lines from stdin and append each one to the journal
    Record {
        /// Sender name for recorded lines
        #[arg(short, long, default_value = "")]
        name: String,

        /// Hue for recorded lines
        #[arg(long, default_value_t = 0)]
        hue: u16,

        /// Record lines as non-unicode text
        #[arg(long)]
        ascii: bool,

        /// Do not echo entries as they are added
        #[arg(short, long)]
        quiet: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Print the directory journal files are written to
    Path,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as JSON
    Show,

    /// Write the effective configuration to the config file
    Init,
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Get the default data root (<platform data dir>/journal)
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("journal")
}

/// Load the config file and apply command-line overrides on top.
fn effective_config(cli: &Cli, config_path: &Path) -> Result<JournalConfig> {
    let mut config = JournalConfig::load_or_default(config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    if cli.save {
        config.save_journal_to_file = true;
    }
    if let Some(font) = cli.override_font {
        config.override_all_fonts = true;
        config.chat_font = font;
        config.override_all_fonts_is_unicode = !cli.override_ascii;
    }

    Ok(config)
}

async fn record(
    journal: &mut Journal,
    config: &JournalConfig,
    name: &str,
    hue: u16,
    is_unicode: bool,
) -> Result<()> {
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim() == "/clear" {
            journal.clear();
            tracing::info!("Journal cleared");
            continue;
        }
        journal.add(config, &line, hue, name, is_unicode);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| data_dir.join("journal.json"));
    let config = effective_config(&cli, &config_path)?;

    match cli.command {
        Commands::Record {
            name,
            hue,
            ascii,
            quiet,
        } => {
            let mut journal = Journal::new(&data_dir);
            if !quiet {
                journal.subscribe(|entry| println!("{}", entry.to_line()));
            }

            record(&mut journal, &config, &name, hue, !ascii).await?;

            println!();
            println!("Entries: {}", journal.len());
            match (journal.sink_state(), journal.sink_path()) {
                (SinkState::Open, Some(path)) => println!("Journal file: {}", path.display()),
                (SinkState::Poisoned, _) => println!("Journal file: (disabled after error)"),
                _ => println!("Journal file: (not saved)"),
            }

            journal.close_sink();
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
            ConfigAction::Init => {
                config
                    .save(&config_path)
                    .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
                println!("Config written: {}", config_path.display());
            }
        },

        Commands::Path => {
            println!("{}", Journal::new(&data_dir).log_dir().display());
        }
    }

    Ok(())
}
