//! CLI command for the packaging stage

use std::path::Path;
use std::time::Instant;

use super::CommandContext;
use crate::cli::progress::{DISK, PACKAGE, print_done, print_step, print_warning, stage_bar, update_bar};
use crate::pipeline::{PackageOptions, package};
use crate::utils::normalize_path;

/// Package translated dialogue using the books under `source` as templates
pub fn execute(ctx: &CommandContext, source: &Path) -> anyhow::Result<()> {
    let start = Instant::now();
    print_step(1, 2, PACKAGE, "Packaging translations...");

    let pb = stage_bar("Packaging", ctx.quiet);
    let result = package(
        &PackageOptions::new(source),
        &ctx.config,
        &ctx.layout,
        &|p| update_bar(&pb, p),
    );
    pb.finish_and_clear();
    let result = result?;

    print_step(2, 2, DISK, "Summary");
    println!("  Documents packaged: {}", result.packaged);
    println!("  Rows translated: {}", result.rows_translated);
    println!("  Documents without translations: {}", result.untranslated);
    println!("  Grids without translations: {}", result.grids_untranslated);
    if result.grids_skipped > 0 {
        println!("  Grids skipped (no rows or dialogue columns): {}", result.grids_skipped);
    }
    println!("  Failed: {}", result.failed);
    for warning in &result.warnings {
        print_warning(&warning.to_string());
    }
    for failure in &result.failures {
        print_warning(&format!("{}: {}", normalize_path(&failure.path), failure.message));
    }
    println!("Output: {}", ctx.layout.plugin_data_dir().display());

    print_done(start.elapsed());
    Ok(())
}
