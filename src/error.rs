//! Error types for phdb.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (3=environment, 4=database, 5=reload, ...).
//!   Exit code 2 stays reserved for clap's usage errors.
//! - Recovery hints for the common setup mistakes
//! - Structured JSON output for `--json`

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for phdb operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Environment (exit 3)
    DirectoryNotFound,
    DirectoryNotWritable,
    DatabaseMissing,

    // Database (exit 4)
    DatabaseUnavailable,
    DatabaseError,

    // Reload (exit 5)
    ReloadFailed,

    // Usage (exit 6)
    InvalidArgument,

    // I/O (exit 7)
    IoError,
    JsonError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::DirectoryNotFound => "DIRECTORY_NOT_FOUND",
            Self::DirectoryNotWritable => "DIRECTORY_NOT_WRITABLE",
            Self::DatabaseMissing => "DATABASE_MISSING",
            Self::DatabaseUnavailable => "DATABASE_UNAVAILABLE",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::ReloadFailed => "RELOAD_FAILED",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
        }
    }

    /// Category-based exit code (3-7).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::DirectoryNotFound | Self::DirectoryNotWritable | Self::DatabaseMissing => 3,
            Self::DatabaseUnavailable | Self::DatabaseError => 4,
            Self::ReloadFailed => 5,
            Self::InvalidArgument => 6,
            Self::IoError | Self::JsonError => 7,
        }
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur while syncing lists.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Pi-hole directory does not exist: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("No write access to Pi-hole directory: {}", path.display())]
    DirectoryNotWritable { path: PathBuf },

    #[error("Pi-hole database is missing or empty: {}", path.display())]
    DatabaseMissing { path: PathBuf },

    #[error("Failed to connect to Pi-hole database {}: {source}", path.display())]
    DatabaseUnavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("{} is not a Pi-hole gravity database (missing table `{table}`)", path.display())]
    NotGravityDatabase { path: PathBuf, table: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Reload failed ({command}): {reason}")]
    ReloadFailed { command: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::DirectoryNotFound { .. } => ErrorCode::DirectoryNotFound,
            Self::DirectoryNotWritable { .. } => ErrorCode::DirectoryNotWritable,
            Self::DatabaseMissing { .. } => ErrorCode::DatabaseMissing,
            Self::DatabaseUnavailable { .. } | Self::NotGravityDatabase { .. } => {
                ErrorCode::DatabaseUnavailable
            }
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::ReloadFailed { .. } => ErrorCode::ReloadFailed,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Recovery hint for the user, if one applies.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::DirectoryNotFound { .. } => Some(
                "Pass the Pi-hole directory with --directory (or set PHDB_DIR)".to_string(),
            ),
            Self::DirectoryNotWritable { .. } => {
                Some("Run phdb as root or as the user that owns the Pi-hole files".to_string())
            }
            Self::DatabaseMissing { .. } => Some(
                "Run `pihole -g` once so gravity.db is created, or check --directory".to_string(),
            ),
            Self::ReloadFailed { .. } => Some(
                "Database changes were committed; reload Pi-hole manually with \
                 `pihole restartdns reload`"
                    .to_string(),
            ),
            Self::NotGravityDatabase { .. } => {
                Some("Point --directory at the directory holding Pi-hole's gravity.db".to_string())
            }
            Self::DatabaseUnavailable { .. }
            | Self::Database(_)
            | Self::InvalidArgument(_)
            | Self::Io(_)
            | Self::Json(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
