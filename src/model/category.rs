//! List categories and where each one lives in the gravity database.
//!
//! Every category maps to exactly one text file in the output directory and
//! one query shape in the database. The mapping is expressed as data
//! ([`Source`]) so the storage layer can match on it instead of building SQL
//! strings per category.

use serde::{Deserialize, Serialize};

use crate::validate::Validation;

/// Discriminator values of the `domainlist.type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainType {
    /// Exact allow entry (type 0).
    Allow,
    /// Exact deny entry (type 1).
    Deny,
    /// Allow pattern (type 2).
    AllowPattern,
    /// Deny pattern (type 3).
    DenyPattern,
}

impl DomainType {
    /// Value stored in the `type` column.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Allow => 0,
            Self::Deny => 1,
            Self::AllowPattern => 2,
            Self::DenyPattern => 3,
        }
    }
}

/// Table a category reads from and writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// `adlist.address`, one row per blocklist URL.
    Adlist,
    /// `domainlist.domain` rows filtered by `type`.
    Domainlist(DomainType),
    /// Distinct `gravity.domain` values. Derived data, never written.
    Gravity,
}

/// One of the six lists exchanged with the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Adlists,
    Whitelist,
    Blacklist,
    WhitelistRegex,
    BlacklistRegex,
    Gravity,
}

impl Category {
    /// All categories, in export order.
    pub const ALL: [Self; 6] = [
        Self::Adlists,
        Self::Whitelist,
        Self::Blacklist,
        Self::WhitelistRegex,
        Self::BlacklistRegex,
        Self::Gravity,
    ];

    /// Categories that upload writes back. Gravity is export-only.
    pub const UPLOADABLE: [Self; 5] = [
        Self::Adlists,
        Self::Whitelist,
        Self::Blacklist,
        Self::WhitelistRegex,
        Self::BlacklistRegex,
    ];

    /// Name used in reports and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Adlists => "adlists",
            Self::Whitelist => "whitelist",
            Self::Blacklist => "blacklist",
            Self::WhitelistRegex => "whitelist-regex",
            Self::BlacklistRegex => "blacklist-regex",
            Self::Gravity => "gravity",
        }
    }

    /// File name inside the output directory. Matches the pre-v5 Pi-hole
    /// list file names.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Adlists => "adlists.list",
            Self::Whitelist => "whitelist.list",
            Self::Blacklist => "blacklist.list",
            Self::WhitelistRegex => "whitelist_regex.list",
            Self::BlacklistRegex => "regex.list",
            Self::Gravity => "gravity.list",
        }
    }

    #[must_use]
    pub const fn source(self) -> Source {
        match self {
            Self::Adlists => Source::Adlist,
            Self::Whitelist => Source::Domainlist(DomainType::Allow),
            Self::Blacklist => Source::Domainlist(DomainType::Deny),
            Self::WhitelistRegex => Source::Domainlist(DomainType::AllowPattern),
            Self::BlacklistRegex => Source::Domainlist(DomainType::DenyPattern),
            Self::Gravity => Source::Gravity,
        }
    }

    /// How lines of this category's file are validated on upload.
    ///
    /// `None` for gravity, which is never uploaded.
    #[must_use]
    pub const fn validation(self) -> Option<Validation> {
        match self {
            Self::Adlists => Some(Validation::Url),
            Self::Whitelist | Self::Blacklist => Some(Validation::Domain),
            Self::WhitelistRegex | Self::BlacklistRegex => Some(Validation::Regex),
            Self::Gravity => None,
        }
    }

    #[must_use]
    pub const fn is_uploadable(self) -> bool {
        !matches!(self, Self::Gravity)
    }

    /// Whether an emptied file clears every entry of this category.
    ///
    /// Only `domainlist` categories support it. An emptied adlists file
    /// leaves the `adlist` table untouched.
    #[must_use]
    pub const fn supports_delete_all(self) -> bool {
        matches!(self.source(), Source::Domainlist(_))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
