//! List file repository.
//!
//! Owns the output directory and the six `.list` files inside it:
//! - Atomic writes: write to temp file, sync to disk, then rename
//! - Reads tolerate bad encoding and skip blanks and `#` comments

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Result;
use crate::model::Category;

/// Write content to a file atomically.
///
/// Writes to `<name>.tmp` next to the target, syncs it, then renames it over
/// the target. If any step fails the original file (if any) is untouched.
///
/// # Errors
///
/// Returns an error if any file operation fails.
pub fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    {
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(content.as_bytes())?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }

    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Turn raw file content into candidate entries.
///
/// Each line is trimmed; empty lines and lines starting with `#` are dropped.
#[must_use]
pub fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

/// The output directory holding one file per category.
#[derive(Debug, Clone)]
pub struct ListFiles {
    dir: PathBuf,
}

impl ListFiles {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of a category's file.
    #[must_use]
    pub fn path_for(&self, category: Category) -> PathBuf {
        self.dir.join(category.file_name())
    }

    #[must_use]
    pub fn list_exists(&self, category: Category) -> bool {
        self.path_for(category).is_file()
    }

    /// Create the output directory if it is missing.
    ///
    /// Returns `true` if it was created.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn ensure_output_directory(&self) -> Result<bool> {
        if self.dir.is_dir() {
            return Ok(false);
        }
        info!(dir = %self.dir.display(), "creating output directory");
        fs::create_dir_all(&self.dir)?;
        Ok(true)
    }

    /// Overwrite a category's file, one entry per line.
    ///
    /// `BTreeSet` iteration order is lexicographic, so the file comes out
    /// sorted and diffable.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_list(&self, category: Category, entries: &BTreeSet<String>) -> Result<PathBuf> {
        let path = self.path_for(category);

        let mut content = String::with_capacity(entries.iter().map(|e| e.len() + 1).sum());
        for entry in entries {
            content.push_str(entry);
            content.push('\n');
        }

        atomic_write(&path, &content)?;
        debug!(%category, lines = entries.len(), path = %path.display(), "wrote list");
        Ok(path)
    }

    /// Read a category's file.
    ///
    /// Returns `None` when the file does not exist. Invalid UTF-8 is replaced
    /// rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns an error for I/O failures other than a missing file.
    pub fn read_list(&self, category: Category) -> Result<Option<Vec<String>>> {
        let path = self.path_for(category);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(%category, path = %path.display(), "no local file");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Some(parse_lines(&String::from_utf8_lossy(&bytes))))
    }

    /// Recursively delete the output directory.
    ///
    /// Returns `false` if there was nothing to remove.
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails.
    pub fn remove_output_directory(&self) -> Result<bool> {
        if !self.dir.exists() {
            return Ok(false);
        }
        info!(dir = %self.dir.display(), "removing output directory");
        fs::remove_dir_all(&self.dir)?;
        Ok(true)
    }
}
