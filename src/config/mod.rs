//! Configuration management.
//!
//! This module resolves where the Pi-hole directory lives and derives the
//! database and output paths from it.
//!
//! # Layout
//!
//! ```text
//! /etc/pihole/            Pi-hole directory (overridable)
//! ├── gravity.db          list database
//! └── phdb/               exported list files
//!     ├── adlists.list
//!     ├── whitelist.list
//!     └── ...
//! ```

mod access;

pub use access::{access_check, ensure_directory_exists};

use std::path::{Path, PathBuf};

/// Pi-hole directory used when no override is given.
pub const DEFAULT_PIHOLE_DIR: &str = "/etc/pihole";

/// Database file name inside the Pi-hole directory.
pub const DATABASE_FILE: &str = "gravity.db";

/// Output directory name inside the Pi-hole directory.
pub const OUTPUT_DIR: &str = "phdb";

/// Container name used with `--docker` when none is given.
pub const DEFAULT_CONTAINER: &str = "pihole";

/// Resolved filesystem locations for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// The Pi-hole directory.
    pub root: PathBuf,
    /// `<root>/gravity.db`
    pub database: PathBuf,
    /// `<root>/phdb`
    pub output_dir: PathBuf,
}

impl Paths {
    /// Derive all paths from a Pi-hole directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            database: root.join(DATABASE_FILE),
            output_dir: root.join(OUTPUT_DIR),
            root,
        }
    }
}

/// Resolve the Pi-hole directory.
///
/// Priority:
/// 1. `explicit` (the `--directory` flag or `PHDB_DIR`, both handled by clap)
/// 2. `/etc/pihole`
///
/// A leading `~` is expanded to the current user's home directory.
#[must_use]
pub fn resolve_pihole_dir(explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(path) => expand_home(path),
        None => PathBuf::from(DEFAULT_PIHOLE_DIR),
    }
}

/// Expand a leading `~` component to the home directory.
///
/// Paths without a leading `~`, and every path when no home directory can be
/// determined, are returned unchanged.
#[must_use]
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };

    match directories::BaseDirs::new() {
        Some(dirs) => dirs.home_dir().join(rest),
        None => path.to_path_buf(),
    }
}
