//! Per-run view of the database lists.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::Category;

/// The database contents of each fetched category for one run.
///
/// Built fresh from the store at the start of every dump or upload and
/// dropped when the run ends. Sets are ordered so writing them out is
/// already sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    lists: BTreeMap<Category, BTreeSet<String>>,
}

impl Snapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: Category, entries: BTreeSet<String>) {
        self.lists.insert(category, entries);
    }

    /// Entries for `category`, or `None` if it was never fetched.
    #[must_use]
    pub fn get(&self, category: Category) -> Option<&BTreeSet<String>> {
        self.lists.get(&category)
    }

    /// Number of entries for `category` (0 when not fetched).
    #[must_use]
    pub fn count(&self, category: Category) -> usize {
        self.lists.get(&category).map_or(0, BTreeSet::len)
    }

    /// Iterate over fetched categories in export order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &BTreeSet<String>)> {
        self.lists.iter().map(|(c, set)| (*c, set))
    }

    #[must_use]
    pub fn contains(&self, category: Category) -> bool {
        self.lists.contains_key(&category)
    }
}
