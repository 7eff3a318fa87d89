//! Clean command: remove the output directory.

use crate::cli::commands::{RunContext, print_info};
use crate::config::ensure_directory_exists;
use crate::error::Result;

/// Execute clean.
///
/// A missing output directory is reported, not treated as an error.
///
/// # Errors
///
/// Returns an error if the Pi-hole directory does not exist or removal fails.
pub fn execute(ctx: &RunContext) -> Result<()> {
    ensure_directory_exists(&ctx.paths)?;

    let files = ctx.files();
    let removed = files.remove_output_directory()?;

    if ctx.json {
        let output = serde_json::json!({
            "success": true,
            "mode": "clean",
            "output_dir": files.dir().display().to_string(),
            "removed": removed,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else if !ctx.quiet {
        if removed {
            print_info(&format!("Removed {}", files.dir().display()));
        } else {
            print_info(&format!(
                "Output directory does not exist: {}",
                files.dir().display()
            ));
        }
    }

    Ok(())
}
