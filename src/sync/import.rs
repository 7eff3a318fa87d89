//! Upload: edited text files back into the database.
//!
//! All uploadable categories are reconciled first, then every change is
//! applied inside one transaction. Either the whole upload lands or none of
//! it does.

use std::collections::BTreeSet;

use tracing::info;

use crate::error::Result;
use crate::model::Category;
use crate::storage::GravityStore;
use crate::sync::file::ListFiles;
use crate::sync::reconcile::{Applied, Change, Reconciliation, reconcile};
use crate::sync::types::{CategoryStats, Outcome, UploadStats};

/// Reconciles list files against the database and applies the result.
pub struct Importer<'a> {
    store: &'a mut GravityStore,
    files: &'a ListFiles,
    dry_run: bool,
}

impl<'a> Importer<'a> {
    #[must_use]
    pub fn new(store: &'a mut GravityStore, files: &'a ListFiles) -> Self {
        Self {
            store,
            files,
            dry_run: false,
        }
    }

    /// Compute and report changes without writing anything.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Upload every uploadable category that has a local file.
    ///
    /// Gravity is never uploaded. Categories whose file is missing are
    /// reported as [`Outcome::Missing`] and left alone.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or the database write fails.
    /// On a write failure the transaction is rolled back.
    pub fn import_all(&mut self) -> Result<UploadStats> {
        let snapshot = self.store.fetch_snapshot(&Category::UPLOADABLE)?;
        let empty = BTreeSet::new();

        // None for categories without a local file
        let mut plans: Vec<(Category, Option<Reconciliation>)> = Vec::new();
        for category in Category::UPLOADABLE {
            let current = snapshot.get(category).unwrap_or(&empty);
            let plan = self
                .files
                .read_list(category)?
                .map(|lines| reconcile(category, current, &lines));
            plans.push((category, plan));
        }

        let applied: Vec<Applied> = if self.dry_run {
            plans
                .iter()
                .map(|(category, plan)| {
                    plan.as_ref().map_or_else(Applied::default, |p| {
                        p.change.planned(snapshot.get(*category).unwrap_or(&empty))
                    })
                })
                .collect()
        } else {
            self.store.transaction(|writer| {
                plans
                    .iter()
                    .map(|(category, plan)| match plan {
                        Some(p) => p.change.apply(*category, writer),
                        None => Ok(Applied::default()),
                    })
                    .collect()
            })?
        };

        let categories = plans
            .into_iter()
            .zip(applied)
            .map(|((category, plan), applied)| summarize(category, plan.as_ref(), applied))
            .collect();

        let stats = UploadStats {
            dry_run: self.dry_run,
            categories,
        };
        info!(
            changes = stats.total_changes(),
            dry_run = self.dry_run,
            "upload finished"
        );
        Ok(stats)
    }
}

fn summarize(category: Category, plan: Option<&Reconciliation>, applied: Applied) -> CategoryStats {
    let Some(plan) = plan else {
        info!(%category, "local file does not exist");
        return CategoryStats {
            category,
            valid: 0,
            rejected: 0,
            outcome: Outcome::Missing,
        };
    };

    let outcome = match plan.change {
        Change::Unchanged => Outcome::Unchanged,
        Change::Update { .. } => Outcome::Updated {
            inserted: applied.inserted,
            deleted: applied.deleted,
        },
        Change::DeleteAll => Outcome::Cleared {
            deleted: applied.deleted,
        },
    };
    info!(%category, ?outcome, "processed");

    CategoryStats {
        category,
        valid: plan.valid,
        rejected: plan.rejected,
        outcome,
    }
}
