//! CLI command for the mapping stage

use std::time::Instant;

use super::CommandContext;
use crate::cli::progress::{DISK, LINK, print_done, print_step, print_warning, stage_bar, update_bar};
use crate::pipeline::{MapOptions, TranslatedTree, map};
use crate::utils::normalize_path;

/// Map speaker ids to display names in extracted dialogue
pub fn execute(ctx: &CommandContext, force: bool) -> anyhow::Result<()> {
    let start = Instant::now();
    print_step(1, 2, LINK, "Mapping speaker names...");

    let gate = TranslatedTree::new(ctx.layout.translated_dir());
    let pb = stage_bar("Mapping", ctx.quiet);
    let result = map(&MapOptions { force }, &ctx.config, &ctx.layout, &gate, &|p| update_bar(&pb, p));
    pb.finish_and_clear();
    let result = result?;

    print_step(2, 2, DISK, "Summary");
    println!("  Dialogue files mapped: {}", result.mapped);
    println!("  Failed: {}", result.failed);
    if !force {
        println!("  Skipped (already translated): {}", result.skipped);
    }
    for failure in &result.failures {
        print_warning(&format!("{}: {}", normalize_path(&failure.path), failure.message));
    }
    println!("Output: {}", ctx.layout.ready_dir().display());

    print_done(start.elapsed());
    Ok(())
}
