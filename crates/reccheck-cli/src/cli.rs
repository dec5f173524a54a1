use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use reccheck_engine::ReportFormat;

#[derive(Parser)]
#[command(name = "reccheck")]
#[command(about = "Rule checks for school record documents", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: reccheck.toml in this or a parent directory, then the user config)
    #[arg(long, global = true, env = "RECCHECK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check a record document and print the findings report
    Check {
        /// PDF or text file to check
        file: PathBuf,

        #[command(flatten)]
        names: NameArgs,

        /// Report format
        #[arg(long, value_enum, default_value_t = Format::Markdown)]
        format: Format,

        /// Write the report to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print the redacted text of a document
    Redact {
        /// PDF or text file to redact
        file: PathBuf,

        #[command(flatten)]
        names: NameArgs,
    },

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(clap::Args)]
pub struct NameArgs {
    /// Name to mask (repeatable)
    #[arg(long = "name")]
    pub names: Vec<String>,

    /// File with one name per line
    #[arg(long)]
    pub names_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write a default reccheck.toml to the current directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,

    /// Print which config file is in effect
    Path,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Markdown,
    Json,
}

impl From<Format> for ReportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Markdown => ReportFormat::Markdown,
            Format::Json => ReportFormat::Json,
        }
    }
}
