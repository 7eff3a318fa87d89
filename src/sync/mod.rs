//! List file sync operations.
//!
//! - **Export** (dump): database lists → sorted `.list` files
//! - **Import** (upload): `.list` files → validated, reconciled database writes
//! - **Reconcile**: the per-category diff between database and file
//!
//! # File Format
//!
//! One entry per line, UTF-8, newline-terminated. On read, surrounding
//! whitespace is trimmed and blank lines and `#` comments are ignored:
//!
//! ```text
//! # blacklist.list
//! ads.example.com
//! tracker.example.net
//! ```
//!
//! # Example
//!
//! ```ignore
//! use phdb::storage::GravityStore;
//! use phdb::sync::{Exporter, Importer, ListFiles};
//!
//! let files = ListFiles::new("/etc/pihole/phdb");
//!
//! let store = GravityStore::open_read_only(db_path)?;
//! Exporter::new(&store, &files).export()?;
//!
//! let mut store = GravityStore::open(db_path)?;
//! let stats = Importer::new(&mut store, &files).import_all()?;
//! ```

mod export;
mod file;
mod import;
mod reconcile;
mod types;

pub use export::Exporter;
pub use file::{ListFiles, atomic_write, parse_lines};
pub use import::Importer;
pub use reconcile::{Applied, Change, Reconciliation, reconcile};
pub use types::{CategoryStats, DumpStats, FileStats, Outcome, UploadStats};
