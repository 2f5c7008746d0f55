//! CLI command for the extraction stage

use std::path::Path;
use std::time::Instant;

use super::CommandContext;
use crate::cli::progress::{DISK, LOOKING_GLASS, print_done, print_step, print_warning, stage_bar, update_bar};
use crate::pipeline::{ExtractOptions, TranslatedTree, extract};
use crate::utils::normalize_path;

/// Extract dialogue from every book under `source`
pub fn execute(
    ctx: &CommandContext,
    source: &Path,
    force: bool,
    exclude: Option<&Path>,
) -> anyhow::Result<()> {
    let start = Instant::now();
    print_step(1, 2, LOOKING_GLASS, &format!("Scanning {}...", source.display()));

    let options = ExtractOptions {
        source: source.to_path_buf(),
        force,
        exclude: exclude.map(Path::to_path_buf),
    };
    let gate = TranslatedTree::new(ctx.layout.translated_dir());
    let pb = stage_bar("Extracting", ctx.quiet);
    let result = extract(&options, &ctx.config, &ctx.layout, &gate, &|p| update_bar(&pb, p));
    pb.finish_and_clear();
    let result = result?;

    print_step(2, 2, DISK, "Summary");
    println!("  Characters: {}", result.characters);
    println!("  Books scanned: {}", result.books_scanned);
    println!("  Books failed: {}", result.books_failed);
    println!("  Dialogue files extracted: {}", result.extracted);
    if !force {
        println!("  Skipped (already translated): {}", result.skipped);
    }
    if result.grids_skipped > 0 {
        println!("  Grids skipped (no rows or dialogue columns): {}", result.grids_skipped);
    }
    println!(
        "  Names: {} new, {} total in {}",
        result.names_added,
        result.names_total,
        ctx.layout.names_file().display()
    );
    for failure in &result.failures {
        print_warning(&format!("{}: {}", normalize_path(&failure.path), failure.message));
    }
    println!("Output: {}", ctx.layout.for_translation_dir().display());

    print_done(start.elapsed());
    Ok(())
}
