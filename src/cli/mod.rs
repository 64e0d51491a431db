//! CLI definitions using clap derive API
//!
//! One submodule per command's argument type:
//! - create: device extraction
//! - add: install from the catalog or a local directory
//! - remove: uninstall
//! - list: installed stubs table
//! - completions: shell completions

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod add;
pub mod completions;
pub mod create;
pub mod list;
pub mod remove;

pub use add::AddArgs;
pub use completions::CompletionsArgs;
pub use create::CreateArgs;
pub use list::ListArgs;
pub use remove::RemoveArgs;

/// mpstubs - MicroPython stub manager
#[derive(Parser, Debug)]
#[command(
    name = "mpstubs",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Manage type stubs for MicroPython firmware",
    long_about = "mpstubs extracts stubs from connected boards, installs stub packages from a \
                  catalog and keeps the project's stub list in sync with what is installed.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  mpstubs create /dev/ttyUSB0          \x1b[90m# Extract stubs from a board\x1b[0m\n   \
                  mpstubs add micropython-esp32-stubs  \x1b[90m# Install from the catalog\x1b[0m\n   \
                  mpstubs remove micropython-esp32-stubs\n   \
                  mpstubs list                         \x1b[90m# Stubs used by this project\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Project directory (defaults to the current directory)
    #[arg(long, short = 'p', global = true, env = "MPSTUBS_PROJECT")]
    pub project: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract stubs from a connected device
    Create(CreateArgs),

    /// Install a stub and add it to the project
    Add(AddArgs),

    /// Uninstall a stub and drop it from the project
    Remove(RemoveArgs),

    /// List installed stubs
    List(ListArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
