//! Add command implementation

use std::io::Write;

use console::style;

use crate::cli::AddArgs;
use crate::commands::CommandContext;
use crate::error::Result;
use crate::operations::{AddOperation, AddOptions};

pub fn run(ctx: &mut CommandContext, args: AddArgs, out: &mut dyn Write) -> Result<()> {
    let outcome = AddOperation::new(
        ctx.registry.as_mut(),
        ctx.source.as_ref(),
        ctx.project.as_ref(),
    )
    .execute(&args.name, AddOptions { force: args.force })?;

    let name = &outcome.record.name;
    if outcome.already_installed {
        writeln!(out, "{} is already installed", style(name).cyan())?;
    } else {
        writeln!(out, "{} added!", style(name).green().bold())?;
    }
    if outcome.manifest_updated {
        writeln!(out, "Updated project stub list")?;
    }
    Ok(())
}
