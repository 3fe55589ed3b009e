//! Command-line interface.
//!
//! Without a subcommand (or with `run`) the binary starts the kiosk UI; the
//! other subcommands are one-shot helpers that never touch the terminal UI.

mod commands;
mod common;
pub mod completions;

pub use common::*;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use indoc::indoc;
use std::path::PathBuf;

const AFTER_HELP: &str = indoc! {"
    Examples:
      genframe                         Start the picture frame
      genframe generate a red fox      Create a picture without the UI
      genframe status --json           Show the current picture as JSON

    Logs are written to the cache directory; see `genframe logs`.
"};

/// A kiosk picture frame that shows AI generated pictures
#[derive(Parser, Debug)]
#[command(
    name = "genframe",
    version,
    about = "A kiosk picture frame that shows AI generated pictures",
    long_about = None,
    after_help = AFTER_HELP,
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Use this config file instead of the default one
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable colors in the TUI (also respects NO_COLOR env var)
    #[arg(long, global = true)]
    pub no_colors: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the picture frame (the default)
    Run,
    /// Generate a new picture without the UI
    Generate {
        /// What to create; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
    },
    /// Show the current picture and configuration
    Status {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
    /// Write the default configuration if none exists
    Init,
    /// Configuration file location
    Config,
    /// Shows logs location and how to view them
    Logs,
    /// Generate shell completions
    Completions {
        /// Target shell (detected from $SHELL when omitted)
        #[arg(value_enum)]
        shell: Option<Shell>,
    },
}

impl Cli {
    /// The config file to use: `--config` or the default location.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::utils::get_config_path)
    }

    /// Whether this invocation should start the UI.
    pub fn launches_ui(&self) -> bool {
        matches!(self.command, None | Some(Commands::Run))
    }

    /// Execute a one-shot command.
    ///
    /// Returns without doing anything when the UI should be launched instead.
    pub fn execute(self) -> Result<()> {
        let config_path = self.config_path();
        match self.command {
            None | Some(Commands::Run) => Ok(()),
            Some(Commands::Generate { prompt }) => {
                commands::cmd_generate(config_path, &prompt.join(" "))
            }
            Some(Commands::Status { json }) => commands::cmd_status(config_path, json),
            Some(Commands::Init) => commands::cmd_init(&config_path),
            Some(Commands::Config) => commands::cmd_config(&config_path),
            Some(Commands::Logs) => commands::cmd_logs(),
            Some(Commands::Completions { shell }) => completions::generate(shell),
        }
    }
}
