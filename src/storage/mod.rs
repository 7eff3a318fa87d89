//! SQLite storage layer for phdb.
//!
//! # Submodules
//!
//! - [`schema`] - Required tables and a fixture schema
//! - [`sqlite`] - Connection handling, typed reads and transactional writes

pub mod schema;
pub mod sqlite;

pub use sqlite::{GravityStore, ListWriter};
