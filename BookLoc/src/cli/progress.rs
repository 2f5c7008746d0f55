//! CLI progress display utilities
//!
//! Step indicators, completion messages and a progress bar driven by
//! pipeline stage callbacks.

use std::time::Duration;

use console::{Emoji, style};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};

use crate::pipeline::StageProgress;

// =============================================================================
// Emoji Constants (with ASCII fallbacks for terminals without emoji support)
// =============================================================================

/// Magnifying glass - for reading/scanning operations
pub static LOOKING_GLASS: Emoji<'_, '_> = Emoji("🔍 ", "");
/// Package - for packaging operations
pub static PACKAGE: Emoji<'_, '_> = Emoji("📦 ", "");
/// Floppy disk - for writing/saving operations
pub static DISK: Emoji<'_, '_> = Emoji("💾 ", "");
/// Link - for mapping operations
pub static LINK: Emoji<'_, '_> = Emoji("🔗 ", "");
/// Sparkles - for completion
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");
/// Warning sign - for recoverable problems
pub static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "! ");

/// Print a step indicator: `[1/3] 📦 Message...`
pub fn print_step(current: usize, total: usize, emoji: Emoji, msg: &str) {
    println!(
        "{} {}{}",
        style(format!("[{current}/{total}]")).bold().dim(),
        emoji,
        msg
    );
}

/// Print completion message: `✨ Done in 2s`
pub fn print_done(elapsed: Duration) {
    println!("{} Done in {}", SPARKLE, HumanDuration(elapsed));
}

/// Print a warning line: `⚠️  message`
pub fn print_warning(msg: &str) {
    println!("{}{}", WARNING, style(msg).yellow());
}

/// Progress bar style for determinate progress
///
/// Format: `Extracting [████████░░░░░░░░] 50/100`
///
/// # Panics
/// Panics if the template string is invalid (this is a compile-time constant).
#[must_use]
pub fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
        .expect("valid template")
}

/// Create a bar for a stage, hidden when `quiet`
#[must_use]
pub fn stage_bar(msg: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(0);
    pb.set_style(bar_style());
    pb.set_message(msg.to_string());
    pb
}

/// Feed a stage progress update into a bar
pub fn update_bar(pb: &ProgressBar, progress: &StageProgress) {
    pb.set_length(progress.total as u64);
    pb.set_position(progress.current as u64);
    if let Some(file) = &progress.current_file {
        pb.set_message(format!("{} {file}", progress.phase.as_str()));
    } else {
        pb.set_message(progress.phase.as_str());
    }
}
