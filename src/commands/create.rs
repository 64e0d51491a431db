//! Create command implementation

use std::io::Write;

use console::style;

use crate::cli::CreateArgs;
use crate::commands::CommandContext;
use crate::error::Result;
use crate::operations::{CreateOperation, CreateOptions, CreateOutcome};

pub fn run(ctx: &mut CommandContext, args: CreateArgs, out: &mut dyn Write) -> Result<()> {
    let options = CreateOptions {
        modules: args.module_changes(),
        script: args
            .script
            .unwrap_or_else(|| ctx.settings.createstubs.clone()),
        port: args.port,
    };

    let outcome = CreateOperation::new(
        ctx.transport.as_ref(),
        ctx.registry.as_mut(),
        ctx.source.as_ref(),
        ctx.project.as_ref(),
    )
    .execute(&options)?;

    match outcome {
        CreateOutcome::Created(added) => {
            writeln!(out, "{} added!", style(&added.record.name).green().bold())?;
            if added.manifest_updated {
                writeln!(out, "Updated project stub list")?;
            }
        }
        CreateOutcome::NotConnected(err) => {
            eprintln!("{} {}", style("Warning:").yellow().bold(), err);
        }
    }
    Ok(())
}
