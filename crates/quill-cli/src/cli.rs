use clap::{Args, Parser, Subcommand, ValueEnum};
use quill_core::Privacy;
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "quill - publish markdown notes to Mowen")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to ~/.config/quill/config.toml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Effective log level: explicit level, then `-v`, then warnings only
    pub fn level_filter(&self) -> LevelFilter {
        match (self.log_level, self.verbose) {
            (Some(level), _) => level.into(),
            (None, true) => LevelFilter::DEBUG,
            (None, false) => LevelFilter::WARN,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Publish a note (creates it the first time, updates it afterwards)
    Publish(PublishArgs),

    /// Print the document that would be sent, without uploading anything
    Convert {
        /// Markdown file
        file: PathBuf,

        /// Title (defaults to the file name)
        #[arg(short, long)]
        title: Option<String>,

        /// Summary shown under the title
        #[arg(long)]
        summary: Option<String>,
    },

    /// Print the remote identifier stored in a note
    Id {
        /// Markdown file
        file: PathBuf,
    },

    /// Show or create the configuration (defaults to 'show')
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Write a config file with default values at the config path
    Init {
        /// Overwrite an existing config file
        #[arg(short = 'F', long)]
        force: bool,
    },
}

/// Privacy of the restricted section
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PrivacyArg {
    /// Anyone can read
    Public,
    /// Only the owner can read
    Private,
    /// Public with sharing/expiry rules
    Rule,
}

impl PrivacyArg {
    /// Build the privacy value; rule fields only apply to `rule`
    pub fn to_privacy(self, no_share: bool, expire_at: i64) -> Privacy {
        match self {
            PrivacyArg::Public => Privacy::Public,
            PrivacyArg::Private => Privacy::Private,
            PrivacyArg::Rule => Privacy::Rule {
                no_share,
                expire_at,
            },
        }
    }
}

#[derive(Debug, Args)]
pub struct PublishArgs {
    /// Markdown file to publish
    pub file: PathBuf,

    /// Title (defaults to the file name)
    #[arg(short, long)]
    pub title: Option<String>,

    /// Comma-separated tags (defaults to the note's frontmatter tags)
    #[arg(long)]
    pub tags: Option<String>,

    /// Publish immediately instead of saving a draft
    #[arg(long)]
    pub auto_publish: Option<bool>,

    /// Put the note in the restricted section with this privacy
    #[arg(long, value_enum)]
    pub privacy: Option<PrivacyArg>,

    /// Disallow sharing (with --privacy rule)
    #[arg(long, requires = "privacy")]
    pub no_share: bool,

    /// Epoch seconds after which the note turns private (with --privacy rule)
    #[arg(long, requires = "privacy")]
    pub expire_at: Option<i64>,

    /// Summary shown under the title
    #[arg(long)]
    pub summary: Option<String>,

    /// Do not write the remote identifier back into the note
    #[arg(long)]
    pub no_write_back: bool,

    /// Vault root used to resolve embeds (defaults to the note's directory)
    #[arg(long)]
    pub vault: Option<PathBuf>,
}
