//! mpstubs - MicroPython stub manager
//!
//! Extracts type stubs from connected boards, installs stub packages from a
//! catalog into a global registry, and keeps each project's stub list in sync.

use std::io::Write;

use clap::Parser;

mod changeset;
mod cli;
mod commands;
mod common;
mod device;
mod editor;
mod error;
mod hash;
mod logging;
mod operations;
mod progress;
mod project;
mod registry;
mod settings;
mod source;
#[cfg(test)]
mod test_fixtures;
mod transaction;

use cli::{Cli, Commands};
use commands::CommandContext;
use error::Result;
use settings::Settings;

fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    if let Commands::Completions(args) = cli.command {
        return commands::completions::run(args, out);
    }

    let mut ctx = CommandContext::from_settings(Settings::from_env()?, cli.project)?;
    match cli.command {
        Commands::Create(args) => commands::create::run(&mut ctx, args, out),
        Commands::Add(args) => commands::add::run(&mut ctx, args, out),
        Commands::Remove(args) => commands::remove::run(&mut ctx, args, out),
        Commands::List(args) => commands::list::run(&ctx, args, out),
        Commands::Completions(args) => commands::completions::run(args, out),
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = run(cli, &mut out) {
        let _ = out.flush();
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
