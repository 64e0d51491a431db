use clap::Parser;

/// Arguments for the add command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Add a stub from the catalog:\n    mpstubs add micropython-esp32-stubs\n\n\
                  Add a local stub directory:\n    mpstubs add ./stubs/rp2\n\n\
                  Re-install from source:\n    mpstubs add micropython-esp32-stubs --force")]
pub struct AddArgs {
    /// Catalog name or path to a stub directory
    pub name: String,

    /// Re-stage from source even if the stub is already installed
    #[arg(long, short = 'f')]
    pub force: bool,
}
