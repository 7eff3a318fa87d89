//! Upload command: reconcile the edited files into the database, then reload.

use tracing::warn;

use crate::cli::commands::{RunContext, print_info, print_warn};
use crate::config::access_check;
use crate::error::Result;
use crate::storage::GravityStore;
use crate::sync::{Importer, Outcome, UploadStats};

/// Execute upload.
///
/// The database is committed and closed before the reload runs, so a failed
/// reload leaves the uploaded lists in place.
///
/// # Errors
///
/// Returns an error if the environment check fails, the database cannot be
/// opened or written, or the reload fails.
pub fn execute(ctx: &RunContext) -> Result<()> {
    access_check(&ctx.paths)?;

    let files = ctx.files();
    if !files.dir().is_dir() {
        warn!(dir = %files.dir().display(), "output directory does not exist, nothing to upload");
    }

    let mut store = GravityStore::open(&ctx.paths.database)?;
    let stats = Importer::new(&mut store, &files)
        .dry_run(ctx.dry_run)
        .import_all()?;
    store.close()?;

    report(ctx, &stats)?;

    if let Some(reload) = &ctx.reload {
        if ctx.human() {
            print_info("Reloading Pi-hole");
        }
        reload.run()?;
    }

    Ok(())
}

fn report(ctx: &RunContext, stats: &UploadStats) -> Result<()> {
    if ctx.json {
        let output = serde_json::json!({
            "success": true,
            "mode": "upload",
            "stats": stats,
        });
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }
    if ctx.quiet {
        return Ok(());
    }

    let prefix = if stats.dry_run { "(dry run) " } else { "" };
    for entry in &stats.categories {
        let name = entry.category.file_name();
        match entry.outcome {
            Outcome::Missing => print_info(&format!("{prefix}{name}: local file does not exist")),
            Outcome::Unchanged => print_info(&format!("{prefix}{name}: no changes")),
            Outcome::Updated { inserted, deleted } => print_info(&format!(
                "{prefix}{name}: {inserted} added, {deleted} removed"
            )),
            Outcome::Cleared { deleted } => print_warn(&format!(
                "{prefix}{name}: file has no valid entries, removed all {deleted}"
            )),
        }
        if entry.rejected > 0 {
            print_warn(&format!(
                "{prefix}{name}: skipped {} invalid line(s)",
                entry.rejected
            ));
        }
    }
    print_info(&format!("{prefix}{} change(s) in total", stats.total_changes()));
    Ok(())
}
