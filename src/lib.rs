//! phdb - Pi-hole list sync
//!
//! Dumps the Pi-hole gravity database lists to plain text files, validates
//! and uploads edited files back, and cleans up afterwards.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap, plus the dump/upload/clean commands
//! - [`config`] - Path resolution and environment checks
//! - [`model`] - List categories and the per-run snapshot
//! - [`storage`] - SQLite access to `gravity.db`
//! - [`sync`] - List files, export, import and reconciliation
//! - [`validate`] - URL, domain and regex validation
//! - [`reload`] - Post-upload `pihole restartdns reload`
//! - [`error`] - Error types and exit codes

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod reload;
pub mod storage;
pub mod sync;
pub mod validate;

pub use error::{Error, Result};
