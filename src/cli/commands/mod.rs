//! Command implementations.
//!
//! Each mode gets a [`RunContext`] built once from the parsed flags, so no
//! command reads global state.

pub mod clean;
pub mod completions;
pub mod dump;
pub mod upload;

use colored::Colorize;

use crate::cli::{Cli, Mode};
use crate::config::{Paths, resolve_pihole_dir};
use crate::error::Result;
use crate::reload::ReloadCommand;
use crate::sync::ListFiles;

/// Everything a single run needs to know, resolved up front.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub paths: Paths,
    pub json: bool,
    pub quiet: bool,
    pub dry_run: bool,
    /// `None` when the reload is skipped (`--no-reload` or `--dry-run`).
    pub reload: Option<ReloadCommand>,
}

impl RunContext {
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        let reload = if cli.no_reload || cli.dry_run {
            None
        } else if cli.docker {
            Some(ReloadCommand::docker(&cli.container))
        } else {
            Some(ReloadCommand::host())
        };

        Self {
            paths: Paths::new(resolve_pihole_dir(cli.directory.as_deref())),
            json: cli.json,
            quiet: cli.quiet,
            dry_run: cli.dry_run,
            reload,
        }
    }

    /// The list file repository for this run's output directory.
    #[must_use]
    pub fn files(&self) -> ListFiles {
        ListFiles::new(&self.paths.output_dir)
    }

    /// Whether human-readable progress should be printed.
    #[must_use]
    pub const fn human(&self) -> bool {
        !self.json && !self.quiet
    }
}

/// Run the selected mode.
///
/// # Errors
///
/// Propagates the mode's error.
pub fn execute(cli: &Cli) -> Result<()> {
    if let Some(shell) = cli.completions {
        return completions::execute(shell);
    }

    let ctx = RunContext::from_cli(cli);
    match cli.mode() {
        Mode::Dump => dump::execute(&ctx),
        Mode::Upload => upload::execute(&ctx),
        Mode::Clean => clean::execute(&ctx),
    }
}

pub(crate) fn print_info(msg: &str) {
    println!("{} {msg}", "[i]".cyan());
}

pub(crate) fn print_warn(msg: &str) {
    println!("{} {msg}", "[!]".yellow().bold());
}
