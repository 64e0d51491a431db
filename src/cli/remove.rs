use clap::Parser;

/// Arguments for the remove command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Remove a stub:\n    mpstubs remove micropython-esp32-stubs")]
pub struct RemoveArgs {
    /// Name of the installed stub
    pub name: String,
}
