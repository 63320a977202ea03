//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

use crate::application::services::KeySource;
use crate::config::MAX_RANDOM_SIZE;
use crate::domain::Key;

/// Binary search tree builder with tidy-tree layout, node paths and common-ancestor routes
#[derive(Parser, Debug)]
#[command(name = "bstviz")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log verbosity: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Where the tree's keys come from; the configured demo tree if none given.
#[derive(Args, Debug, Clone, Default)]
pub struct KeyArgs {
    /// Keys in insertion order, comma separated
    #[arg(
        short,
        long,
        value_delimiter = ',',
        allow_hyphen_values = true,
        conflicts_with_all = ["file", "random"]
    )]
    pub keys: Vec<Key>,

    /// File with keys separated by commas or whitespace
    #[arg(short, long, value_hint = ValueHint::FilePath, conflicts_with = "random")]
    pub file: Option<PathBuf>,

    /// Random tree of N distinct keys (N defaults to the configured size)
    #[arg(
        short,
        long,
        value_name = "N",
        num_args = 0..=1,
        value_parser = clap::value_parser!(u64).range(..=MAX_RANDOM_SIZE as u64)
    )]
    pub random: Option<Option<u64>>,

    /// Seed for a reproducible random tree
    #[arg(long, requires = "random")]
    pub seed: Option<u64>,
}

impl KeyArgs {
    pub fn source(&self) -> KeySource {
        if !self.keys.is_empty() {
            KeySource::Keys(self.keys.clone())
        } else if let Some(file) = &self.file {
            KeySource::File(file.clone())
        } else if let Some(size) = self.random {
            KeySource::Random {
                size: size.map(|n| usize::try_from(n).unwrap_or(usize::MAX)),
                seed: self.seed,
            }
        } else {
            KeySource::Configured
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print keys in order (in-order traversal)
    Traverse {
        #[command(flatten)]
        source: KeyArgs,
    },

    /// Show the tree structure
    Tree {
        #[command(flatten)]
        source: KeyArgs,
    },

    /// Print grid coordinates of every node
    Layout {
        #[command(flatten)]
        source: KeyArgs,
    },

    /// Draw the tree on a character grid
    Draw {
        #[command(flatten)]
        source: KeyArgs,
        /// Highlight the route between two keys
        #[arg(long, num_args = 2, value_names = ["A", "B"], allow_hyphen_values = true)]
        highlight: Option<Vec<Key>>,
        /// Disable colors
        #[arg(long)]
        no_color: bool,
    },

    /// Print the root-to-node path of a key
    Path {
        /// Target key
        #[arg(allow_negative_numbers = true)]
        key: Key,
        #[command(flatten)]
        source: KeyArgs,
    },

    /// Print the first common ancestor of two keys
    Ancestor {
        #[arg(allow_negative_numbers = true)]
        a: Key,
        #[arg(allow_negative_numbers = true)]
        b: Key,
        #[command(flatten)]
        source: KeyArgs,
    },

    /// Print the route between two keys via their common ancestor
    Route {
        #[arg(allow_negative_numbers = true)]
        a: Key,
        #[arg(allow_negative_numbers = true)]
        b: Key,
        #[command(flatten)]
        source: KeyArgs,
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
    Show,

    /// Create global config template
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Show config paths
    Path,
}
