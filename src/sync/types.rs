//! Report types for dump and upload.
//!
//! These are what the commands print, either as text or as JSON.

use serde::Serialize;

use crate::model::Category;

/// One file written by dump.
#[derive(Debug, Clone, Serialize)]
pub struct FileStats {
    pub category: Category,
    pub path: String,
    pub lines: usize,
}

/// Summary of a dump run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DumpStats {
    pub output_dir: String,
    pub files: Vec<FileStats>,
}

impl DumpStats {
    /// Total lines written across all files.
    #[must_use]
    pub fn total(&self) -> usize {
        self.files.iter().map(|f| f.lines).sum()
    }
}

/// What upload did (or would do) with one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Outcome {
    /// No local file: category skipped.
    Missing,
    /// File matches the database.
    Unchanged,
    /// Entries inserted and/or deleted.
    Updated { inserted: usize, deleted: usize },
    /// File was emptied and every entry removed.
    Cleared { deleted: usize },
}

impl Outcome {
    #[must_use]
    pub const fn changes(&self) -> usize {
        match self {
            Self::Missing | Self::Unchanged => 0,
            Self::Updated { inserted, deleted } => *inserted + *deleted,
            Self::Cleared { deleted } => *deleted,
        }
    }
}

/// Per-category upload result.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryStats {
    pub category: Category,
    /// Distinct valid lines read from the file.
    pub valid: usize,
    /// Lines dropped by validation.
    pub rejected: usize,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Summary of an upload run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UploadStats {
    pub dry_run: bool,
    pub categories: Vec<CategoryStats>,
}

impl UploadStats {
    /// Total rows inserted plus deleted.
    #[must_use]
    pub fn total_changes(&self) -> usize {
        self.categories.iter().map(|c| c.outcome.changes()).sum()
    }

    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.total_changes() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_totals() {
        let stats = UploadStats {
            dry_run: false,
            categories: vec![
                CategoryStats {
                    category: Category::Blacklist,
                    valid: 3,
                    rejected: 1,
                    outcome: Outcome::Updated {
                        inserted: 2,
                        deleted: 1,
                    },
                },
                CategoryStats {
                    category: Category::Whitelist,
                    valid: 0,
                    rejected: 0,
                    outcome: Outcome::Cleared { deleted: 4 },
                },
                CategoryStats {
                    category: Category::Adlists,
                    valid: 0,
                    rejected: 0,
                    outcome: Outcome::Missing,
                },
            ],
        };

        assert_eq!(stats.total_changes(), 7);
        assert!(!stats.is_unchanged());
    }

    #[test]
    fn test_outcome_json_shape() {
        let stats = CategoryStats {
            category: Category::WhitelistRegex,
            valid: 1,
            rejected: 0,
            outcome: Outcome::Updated {
                inserted: 1,
                deleted: 0,
            },
        };
        let json = serde_json::to_value(&stats).unwrap();

        assert_eq!(json["category"], "whitelist-regex");
        assert_eq!(json["action"], "updated");
        assert_eq!(json["inserted"], 1);
    }

    #[test]
    fn test_dump_total() {
        let stats = DumpStats {
            output_dir: "/etc/pihole/phdb".to_string(),
            files: vec![
                FileStats {
                    category: Category::Gravity,
                    path: "/etc/pihole/phdb/gravity.list".to_string(),
                    lines: 10,
                },
                FileStats {
                    category: Category::Blacklist,
                    path: "/etc/pihole/phdb/blacklist.list".to_string(),
                    lines: 2,
                },
            ],
        };
        assert_eq!(stats.total(), 12);
    }
}
