//! Line validation for uploaded list files.
//!
//! Each uploadable category accepts one kind of entry: blocklist URLs,
//! plain domain names, or regular expressions. Validation is a pure yes/no
//! answer; rejected lines are simply left out of the upload.

use fancy_regex::Regex;
use serde::{Deserialize, Serialize};

/// Longest textual domain name, excluding the root dot.
const MAX_DOMAIN_LEN: usize = 253;

/// Longest single label.
const MAX_LABEL_LEN: usize = 63;

/// The kind of entry a list file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Validation {
    Url,
    Domain,
    Regex,
}

impl Validation {
    /// Check a single (already trimmed) line.
    #[must_use]
    pub fn accepts(self, line: &str) -> bool {
        match self {
            Self::Url => is_valid_url(line),
            Self::Domain => is_valid_domain(line),
            Self::Regex => is_valid_regex(line),
        }
    }
}

/// True if `s` is an absolute URL with a non-empty host.
///
/// `file:///...` style sources have no host and are rejected.
#[must_use]
pub fn is_valid_url(s: &str) -> bool {
    url::Url::parse(s).is_ok_and(|url| url.host_str().is_some_and(|host| !host.is_empty()))
}

/// True if `s` is a syntactically valid DNS name.
///
/// Rules: at most 253 characters, at least two dot-separated labels, each
/// label 1 to 63 characters of ASCII letters, digits, `-` or `_` that does
/// not start or end with `-` or `_`. The top-level label is at least two
/// characters long and ends in a letter, which rules out bare IP addresses.
#[must_use]
pub fn is_valid_domain(s: &str) -> bool {
    if s.is_empty() || s.len() > MAX_DOMAIN_LEN {
        return false;
    }

    let labels: Vec<&str> = s.split('.').collect();
    if labels.len() < 2 || !labels.iter().all(|label| is_valid_label(label)) {
        return false;
    }

    labels.last().is_some_and(|tld| {
        tld.len() >= 2 && tld.chars().last().is_some_and(|c| c.is_ascii_alphabetic())
    })
}

fn is_valid_label(label: &str) -> bool {
    if label.is_empty() || label.len() > MAX_LABEL_LEN {
        return false;
    }

    let bytes = label.as_bytes();
    let edge_ok = |b: u8| b.is_ascii_alphanumeric();
    let inner_ok = |b: u8| b.is_ascii_alphanumeric() || b == b'-' || b == b'_';

    edge_ok(bytes[0]) && edge_ok(bytes[bytes.len() - 1]) && bytes.iter().all(|b| inner_ok(*b))
}

/// True if `s` compiles as a regular expression.
///
/// Back-references and lookaround are accepted, so entries such as
/// `(ad)\1\.` survive a dump and upload.
#[must_use]
pub fn is_valid_regex(s: &str) -> bool {
    Regex::new(s).is_ok()
}
