//! CLI subcommands and the context they share
//!
//! Global options resolve into a [`CommandContext`] (config file, output root,
//! quiet flag) that every subcommand receives.

use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::{ConfigFile, PipelineConfig, WorkspaceLayout};

pub mod execute;
pub mod extract;
pub mod map;
pub mod package;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "bookloc.toml";

/// Options shared by every subcommand
#[derive(Args)]
pub struct GlobalArgs {
    /// Output root holding all stage trees
    #[arg(long, global = true)]
    pub out: Option<PathBuf>,

    /// TOML file overriding column names, suffixes and layout
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Suppress progress bar
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Show debug logs (skipped grids, per-file details)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Resolved settings handed to each command
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: PipelineConfig,
    pub layout: WorkspaceLayout,
    pub quiet: bool,
}

impl GlobalArgs {
    /// Load the config file (explicit or default) and apply overrides
    pub fn context(&self) -> anyhow::Result<CommandContext> {
        let file = match &self.config {
            Some(path) => ConfigFile::load(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                ConfigFile::load(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => ConfigFile::default(),
        };

        let mut layout = file.layout.unwrap_or_default();
        if let Some(out) = &self.out {
            layout.out_dir.clone_from(out);
        }

        Ok(CommandContext {
            config: file.pipeline,
            layout,
            quiet: self.quiet,
        })
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Stage 1: extract dialogue and speaker names. Skips grids already translated.
    Extract {
        /// Root directory of the unpacked game JSON files
        source: PathBuf,

        /// Re-extract everything, ignoring existing translations
        #[arg(long)]
        force: bool,

        /// JSON list of names to keep out of the name registry
        #[arg(long)]
        exclude: Option<PathBuf>,
    },

    /// Stage 2: replace speaker ids with display names. Skips files already translated.
    Map {
        /// Re-map everything, ignoring existing translations
        #[arg(long)]
        force: bool,
    },

    /// Stage 4: package translated dialogue into plugin data
    Package {
        /// Root directory of the original game JSON files (used as template)
        source: PathBuf,
    },
}
