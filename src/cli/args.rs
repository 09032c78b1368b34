//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Build branching vessel trees from extracted vessel segments
#[derive(Parser, Debug)]
#[command(name = "rvessel")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a session and report every step
    Run {
        /// Session script (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        session: PathBuf,
    },

    /// Replay a session and show the resulting vessel tree
    Tree {
        /// Session script (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        session: PathBuf,
    },

    /// Replay a session and list the leaf vessels
    Leaves {
        /// Session script (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        session: PathBuf,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show {
        /// Directory whose .rvessel.toml is layered on top (default: cwd)
        #[arg(value_hint = ValueHint::DirPath)]
        dir: Option<PathBuf>,
    },

    /// Show config paths
    Path,
}
