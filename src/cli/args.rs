//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `make-pot`: Extract translations and print per-chunk JSON catalogs
//! - `init`: Initialize a chunkpot configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract translations from discovered projects and print per-chunk
    /// JSON catalogs
    MakePot(MakePotCommand),
    /// Initialize a chunkpot configuration file
    Init,
}

#[derive(Debug, Args)]
pub struct MakePotCommand {
    /// Root directory to scan for projects
    #[arg(default_value = ".")]
    pub source: PathBuf,

    /// Consider only specific domains
    #[arg(long, value_delimiter = ',')]
    pub domains: Vec<String>,

    /// Ignore domains
    #[arg(long, value_delimiter = ',')]
    pub ignore_domains: Vec<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Print skip diagnostics to stderr
    #[arg(long, short)]
    pub verbose: bool,
}
