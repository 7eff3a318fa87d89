//! Environment checks run before any mode touches the database or files.

use std::fs::{self, OpenOptions};
use std::path::Path;

use tracing::{debug, info};

use crate::config::Paths;
use crate::error::{Error, Result};

/// Name of the throwaway file used to probe write access.
const WRITE_PROBE: &str = ".phdb-write-probe";

/// Verify the Pi-hole directory exists, is writable, and holds a non-empty
/// database.
///
/// # Errors
///
/// Returns `DirectoryNotFound`, `DirectoryNotWritable` or `DatabaseMissing`.
pub fn access_check(paths: &Paths) -> Result<()> {
    ensure_directory_exists(paths)?;

    if !is_writable(&paths.root) {
        return Err(Error::DirectoryNotWritable {
            path: paths.root.clone(),
        });
    }
    debug!(dir = %paths.root.display(), "write access available");

    let db_size = fs::metadata(&paths.database)
        .ok()
        .filter(fs::Metadata::is_file)
        .map_or(0, |m| m.len());
    if db_size == 0 {
        return Err(Error::DatabaseMissing {
            path: paths.database.clone(),
        });
    }

    info!(db = %paths.database.display(), "Pi-hole database located");
    Ok(())
}

/// Verify only that the Pi-hole directory exists (used by clean).
///
/// # Errors
///
/// Returns `DirectoryNotFound` if it does not.
pub fn ensure_directory_exists(paths: &Paths) -> Result<()> {
    if !paths.root.is_dir() {
        return Err(Error::DirectoryNotFound {
            path: paths.root.clone(),
        });
    }
    info!(dir = %paths.root.display(), "Pi-hole directory located");
    Ok(())
}

/// Probe write access by creating and removing a file.
fn is_writable(dir: &Path) -> bool {
    let probe = dir.join(WRITE_PROBE);
    match OpenOptions::new().write(true).create_new(true).open(&probe) {
        Ok(_) => {
            let _ = fs::remove_file(&probe);
            true
        }
        // Stale probe from an interrupted run
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => fs::remove_file(&probe).is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_directory() {
        let paths = Paths::new("/nonexistent/pihole/dir");
        assert!(matches!(
            access_check(&paths),
            Err(Error::DirectoryNotFound { .. })
        ));
        assert!(matches!(
            ensure_directory_exists(&paths),
            Err(Error::DirectoryNotFound { .. })
        ));
    }

    #[test]
    fn test_missing_database() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::new(temp_dir.path());

        assert!(matches!(
            access_check(&paths),
            Err(Error::DatabaseMissing { .. })
        ));
    }

    #[test]
    fn test_empty_database_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::new(temp_dir.path());
        fs::write(&paths.database, b"").unwrap();

        assert!(matches!(
            access_check(&paths),
            Err(Error::DatabaseMissing { .. })
        ));
    }

    #[test]
    fn test_access_ok_and_probe_cleaned_up() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::new(temp_dir.path());
        fs::write(&paths.database, b"not empty").unwrap();

        access_check(&paths).unwrap();
        assert!(!temp_dir.path().join(WRITE_PROBE).exists());
    }
}
