//! Dump: database lists to text files.
//!
//! Every run is a full snapshot. Each file is overwritten with the current
//! database contents, sorted, so consecutive dumps of an unchanged database
//! are byte-identical.

use tracing::info;

use crate::error::Result;
use crate::model::Category;
use crate::storage::GravityStore;
use crate::sync::file::ListFiles;
use crate::sync::types::{DumpStats, FileStats};

/// Writes all six lists from the database into the output directory.
pub struct Exporter<'a> {
    store: &'a GravityStore,
    files: &'a ListFiles,
}

impl<'a> Exporter<'a> {
    #[must_use]
    pub fn new(store: &'a GravityStore, files: &'a ListFiles) -> Self {
        Self { store, files }
    }

    /// Fetch every category and write its file.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails or a file cannot be written.
    pub fn export(&self) -> Result<DumpStats> {
        let snapshot = self.store.fetch_snapshot(&Category::ALL)?;

        self.files.ensure_output_directory()?;

        let mut stats = DumpStats {
            output_dir: self.files.dir().display().to_string(),
            files: Vec::with_capacity(Category::ALL.len()),
        };

        for (category, entries) in snapshot.iter() {
            let path = self.files.write_list(category, entries)?;
            info!(%category, lines = entries.len(), path = %path.display(), "exported");
            stats.files.push(FileStats {
                category,
                path: path.display().to_string(),
                lines: entries.len(),
            });
        }

        Ok(stats)
    }
}
