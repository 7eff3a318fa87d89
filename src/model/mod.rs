//! Data models for phdb.
//!
//! - [`Category`]: the six lists and how each maps onto the database
//! - [`Snapshot`]: the database contents fetched for a single run

pub mod category;
pub mod snapshot;

pub use category::{Category, DomainType, Source};
pub use snapshot::Snapshot;
