//! Upload reconciliation.
//!
//! Given what the database holds for a category and the lines read from its
//! file, work out the smallest set of writes that makes the database match
//! the file. The file wins: entries it adds are inserted, entries it no
//! longer lists are deleted.
//!
//! Invalid lines are dropped before diffing, so a file made only of invalid
//! lines counts as empty. For categories that support it, an empty file
//! clears the whole category.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::error::Result;
use crate::model::Category;
use crate::storage::ListWriter;

/// Writes needed to bring one category in line with its file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Database already matches the file.
    Unchanged,
    /// Insert and delete exactly these values.
    Update {
        insert: BTreeSet<String>,
        delete: BTreeSet<String>,
    },
    /// The file was emptied: remove every entry of the category.
    DeleteAll,
}

/// Row counts produced by applying a [`Change`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Applied {
    pub inserted: usize,
    pub deleted: usize,
}

impl Change {
    /// Apply the change through an open transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails.
    pub fn apply(&self, category: Category, writer: &ListWriter<'_>) -> Result<Applied> {
        match self {
            Self::Unchanged => Ok(Applied::default()),
            Self::Update { insert, delete } => {
                let (inserted, deleted) = writer.apply(category, insert, delete)?;
                Ok(Applied { inserted, deleted })
            }
            Self::DeleteAll => {
                let deleted = writer.delete_all(category)?;
                Ok(Applied {
                    inserted: 0,
                    deleted,
                })
            }
        }
    }

    /// Expected row counts, without touching the database.
    ///
    /// `current` is the category's database set the change was computed from.
    #[must_use]
    pub fn planned(&self, current: &BTreeSet<String>) -> Applied {
        match self {
            Self::Unchanged => Applied::default(),
            Self::Update { insert, delete } => Applied {
                inserted: insert.len(),
                deleted: delete.len(),
            },
            Self::DeleteAll => Applied {
                inserted: 0,
                deleted: current.len(),
            },
        }
    }
}

/// Result of reconciling one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub category: Category,
    /// Distinct lines that passed validation.
    pub valid: usize,
    /// Lines rejected by validation.
    pub rejected: usize,
    pub change: Change,
}

/// Compare a category's database set with the lines from its file.
///
/// Uses a precise set difference: only values missing from the database are
/// inserted, only values missing from the file are deleted. Gravity has no
/// validator and always reconciles to [`Change::Unchanged`].
#[must_use]
pub fn reconcile(category: Category, current: &BTreeSet<String>, lines: &[String]) -> Reconciliation {
    let Some(validation) = category.validation() else {
        return Reconciliation {
            category,
            valid: 0,
            rejected: 0,
            change: Change::Unchanged,
        };
    };

    let mut wanted = BTreeSet::new();
    let mut rejected = 0;
    for line in lines {
        if validation.accepts(line) {
            wanted.insert(line.clone());
        } else {
            rejected += 1;
        }
    }
    if rejected > 0 {
        debug!(%category, rejected, "dropped invalid lines");
    }

    let change = if wanted.is_empty() {
        if current.is_empty() {
            Change::Unchanged
        } else if category.supports_delete_all() {
            warn!(%category, entries = current.len(), "file has no valid entries, clearing category");
            Change::DeleteAll
        } else {
            warn!(%category, "file has no valid entries, leaving database untouched");
            Change::Unchanged
        }
    } else if wanted == *current {
        Change::Unchanged
    } else {
        Change::Update {
            insert: wanted.difference(current).cloned().collect(),
            delete: current.difference(&wanted).cloned().collect(),
        }
    };

    Reconciliation {
        category,
        valid: wanted.len(),
        rejected,
        change,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::GravityStore;

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    fn lines(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn test_blacklist_diff() {
        let result = reconcile(
            Category::Blacklist,
            &set(&["a.com", "b.com"]),
            &lines(&["a.com", "c.com"]),
        );

        assert_eq!(
            result.change,
            Change::Update {
                insert: set(&["c.com"]),
                delete: set(&["b.com"]),
            }
        );
        assert_eq!(result.valid, 2);
        assert_eq!(result.rejected, 0);
    }

    #[test]
    fn test_identical_sets_are_unchanged() {
        let result = reconcile(
            Category::Whitelist,
            &set(&["a.com", "b.com"]),
            &lines(&["b.com", "a.com", "a.com"]),
        );
        assert_eq!(result.change, Change::Unchanged);
        assert_eq!(result.valid, 2);
    }

    #[test]
    fn test_invalid_lines_are_dropped() {
        let result = reconcile(
            Category::Blacklist,
            &set(&["a.com"]),
            &lines(&["a.com", "not a domain", "-bad.com", "new.org"]),
        );

        assert_eq!(result.rejected, 2);
        assert_eq!(
            result.change,
            Change::Update {
                insert: set(&["new.org"]),
                delete: BTreeSet::new(),
            }
        );
    }

    #[test]
    fn test_only_invalid_lines_clears_category() {
        let result = reconcile(
            Category::Blacklist,
            &set(&["a.com"]),
            &lines(&["not a domain", "also..bad"]),
        );

        assert_eq!(result.change, Change::DeleteAll);
        assert_eq!(result.valid, 0);
        assert_eq!(result.rejected, 2);
    }

    #[test]
    fn test_empty_file_clears_category() {
        let result = reconcile(Category::BlacklistRegex, &set(&["^ads"]), &[]);
        assert_eq!(result.change, Change::DeleteAll);
    }

    #[test]
    fn test_empty_file_and_empty_database_is_unchanged() {
        let result = reconcile(Category::Whitelist, &BTreeSet::new(), &[]);
        assert_eq!(result.change, Change::Unchanged);
    }

    #[test]
    fn test_emptied_adlists_file_is_ignored() {
        let result = reconcile(
            Category::Adlists,
            &set(&["https://example.com/hosts"]),
            &lines(&["not-a-url"]),
        );
        assert_eq!(result.change, Change::Unchanged);
    }

    #[test]
    fn test_gravity_is_never_reconciled() {
        let result = reconcile(Category::Gravity, &set(&["ads.com"]), &[]);
        assert_eq!(result.change, Change::Unchanged);
    }

    #[test]
    fn test_regex_category_uses_regex_validation() {
        let result = reconcile(
            Category::WhitelistRegex,
            &BTreeSet::new(),
            &lines(&[r"^good\.", "(broken"]),
        );
        assert_eq!(
            result.change,
            Change::Update {
                insert: set(&[r"^good\."]),
                delete: BTreeSet::new(),
            }
        );
        assert_eq!(result.rejected, 1);
    }

    #[test]
    fn test_backreference_regex_round_trips() {
        let result = reconcile(
            Category::BlacklistRegex,
            &set(&[r"(ad)\1\."]),
            &lines(&[r"(ad)\1\."]),
        );
        assert_eq!(result.change, Change::Unchanged);
        assert_eq!(result.rejected, 0);
    }

    #[test]
    fn test_planned_counts() {
        let current = set(&["a.com", "b.com"]);
        assert_eq!(
            Change::DeleteAll.planned(&current),
            Applied {
                inserted: 0,
                deleted: 2
            }
        );
        assert_eq!(Change::Unchanged.planned(&current), Applied::default());
    }

    #[test]
    fn test_apply_reaches_file_state() {
        let mut store = GravityStore::open_memory().unwrap();
        store
            .transaction(|w| w.insert(Category::Blacklist, &set(&["a.com", "b.com"])))
            .unwrap();

        let current = store.fetch(Category::Blacklist).unwrap();
        let result = reconcile(Category::Blacklist, &current, &lines(&["a.com", "c.com"]));
        let applied = store
            .transaction(|w| result.change.apply(Category::Blacklist, w))
            .unwrap();

        assert_eq!(
            applied,
            Applied {
                inserted: 1,
                deleted: 1
            }
        );
        assert_eq!(
            store.fetch(Category::Blacklist).unwrap(),
            set(&["a.com", "c.com"])
        );
    }

    #[test]
    fn test_apply_delete_all_leaves_category_empty() {
        let mut store = GravityStore::open_memory().unwrap();
        store
            .transaction(|w| w.insert(Category::Whitelist, &set(&["a.com"])))
            .unwrap();

        let current = store.fetch(Category::Whitelist).unwrap();
        let result = reconcile(Category::Whitelist, &current, &lines(&["!!invalid!!"]));
        store
            .transaction(|w| result.change.apply(Category::Whitelist, w))
            .unwrap();

        assert!(store.fetch(Category::Whitelist).unwrap().is_empty());
    }
}
