//! Dump command: export all six lists to text files.

use crate::cli::commands::{RunContext, print_info};
use crate::config::access_check;
use crate::error::Result;
use crate::storage::GravityStore;
use crate::sync::{DumpStats, Exporter};

/// Execute dump.
///
/// # Errors
///
/// Returns an error if the environment check fails, the database cannot be
/// opened or read, or a file cannot be written.
pub fn execute(ctx: &RunContext) -> Result<()> {
    access_check(&ctx.paths)?;

    let store = GravityStore::open_read_only(&ctx.paths.database)?;
    let files = ctx.files();
    let stats = Exporter::new(&store, &files).export()?;
    store.close()?;

    report(ctx, &stats)
}

fn report(ctx: &RunContext, stats: &DumpStats) -> Result<()> {
    if ctx.json {
        let output = serde_json::json!({
            "success": true,
            "mode": "dump",
            "stats": stats,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else if !ctx.quiet {
        for file in &stats.files {
            print_info(&format!(
                "{:<22} {:>8} lines",
                file.category.file_name(),
                file.lines
            ));
        }
        print_info(&format!(
            "Exported {} entries to {}",
            stats.total(),
            stats.output_dir
        ));
    }
    Ok(())
}
