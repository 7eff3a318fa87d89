//! CLI definitions using clap.

use clap::{ArgGroup, Parser, ValueEnum};
use std::path::PathBuf;

pub mod commands;

/// Operating mode. Exactly one runs per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Dump,
    Upload,
    Clean,
}

/// Shells supported by `--completions`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
    Elvish,
}

/// phdb - Dump, edit and re-upload Pi-hole lists as plain text files
#[derive(Parser, Debug)]
#[command(name = "phdb", author, version, about, long_about = None)]
#[command(group(ArgGroup::new("mode").args(["dump", "upload", "clean"])))]
pub struct Cli {
    /// Export the Pi-hole lists to text files (default)
    #[arg(short, long)]
    pub dump: bool,

    /// Import the edited text files back into the Pi-hole database
    #[arg(short, long)]
    pub upload: bool,

    /// Remove the output directory
    #[arg(short, long)]
    pub clean: bool,

    /// Pi-hole runs inside a Docker container (requires --directory)
    #[arg(long, visible_alias = "dc", requires = "directory")]
    pub docker: bool,

    /// Pi-hole directory holding gravity.db (default: /etc/pihole)
    #[arg(long, visible_alias = "dir", env = "PHDB_DIR")]
    pub directory: Option<PathBuf>,

    /// Container name used with --docker
    #[arg(long, env = "PHDB_CONTAINER", default_value = crate::config::DEFAULT_CONTAINER)]
    pub container: String,

    /// Do not reload Pi-hole after uploading
    #[arg(long)]
    pub no_reload: bool,

    /// Show what upload would change without writing to the database
    #[arg(long)]
    pub dry_run: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Print shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL", exclusive = true)]
    pub completions: Option<Shell>,
}

impl Cli {
    /// The selected mode, defaulting to dump.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        if self.upload {
            Mode::Upload
        } else if self.clean {
            Mode::Clean
        } else {
            Mode::Dump
        }
    }
}
