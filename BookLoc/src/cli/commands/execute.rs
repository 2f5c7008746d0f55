//! Command execution implementations

use super::{CommandContext, Commands};
use super::{extract, map, package};

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying stage fails.
    pub fn execute(&self, ctx: &CommandContext) -> anyhow::Result<()> {
        match self {
            Commands::Extract {
                source,
                force,
                exclude,
            } => extract::execute(ctx, source, *force, exclude.as_deref()),
            Commands::Map { force } => map::execute(ctx, *force),
            Commands::Package { source } => package::execute(ctx, source),
        }
    }
}
