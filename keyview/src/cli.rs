use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Help text for configuration file options, shown at the bottom of --help.
const CONFIG_HELP: &str = "\
CONFIGURATION FILE (.keyview.toml):
  Create this file in your project root to set defaults.

  [keyview]
  # What to look for
  transform_methods = [\"System.Linq.Enumerable.Select\"]
  capabilities = [\"System.Collections.Generic.IDictionary\",
                  \"System.Collections.Generic.IReadOnlyDictionary\"]
  key_component = \"Key\"
  value_component = \"Value\"

  # Path filters
  exclude_folders = [\"Migrations\"]
  analyze_generated = true   # Also check *.g.cs / <auto-generated> files

  # Semantic model (TOML), relative to this file
  model = \"keyview.model.toml\"
";

/// Options shared by every subcommand.
#[derive(Args, Debug, Default, Clone)]
pub struct CommonArgs {
    /// Paths to analyze (files or directories).
    /// When no paths are provided, defaults to the current directory.
    pub paths: Vec<PathBuf>,

    /// Semantic model file (overrides `model` in .keyview.toml).
    #[arg(long, short = 'm')]
    pub model: Option<PathBuf>,

    /// Folders to exclude from analysis.
    #[arg(long = "exclude-folder", alias = "exclude")]
    pub exclude_folders: Vec<String>,

    /// Output raw JSON.
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output for debugging (debug-level logs on stderr).
    #[arg(short, long)]
    pub verbose: bool,
}

/// Command line interface configuration using `clap`.
#[derive(Parser, Debug)]
#[command(
    name = "keyview",
    author,
    version,
    about = "keyview - Finds dictionary Select projections that should use .Keys/.Values",
    long_about = None,
    after_help = CONFIG_HELP
)]
pub struct Cli {
    #[command(subcommand)]
    /// The subcommand to execute.
    pub command: Commands,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report projections that have a built-in dictionary view.
    /// Exits with code 1 when anything is found.
    Check {
        /// Common options.
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Rewrite projections to the built-in dictionary view.
    Fix {
        /// Common options.
        #[command(flatten)]
        common: CommonArgs,

        /// Show what would change without writing files.
        #[arg(long)]
        dry_run: bool,
    },
}

impl Commands {
    /// Options shared by every subcommand.
    #[must_use]
    pub fn common(&self) -> &CommonArgs {
        match self {
            Self::Check { common } | Self::Fix { common, .. } => common,
        }
    }
}
