use clap::Parser;
use std::path::PathBuf;

/// Arguments for the create command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Extract stubs from a board:\n    mpstubs create /dev/ttyUSB0\n\n\
                  Extract only some modules:\n    mpstubs create /dev/ttyUSB0 --module machine --module network\n\n\
                  Use a custom extraction script:\n    mpstubs create COM3 --script ./createstubs.py")]
pub struct CreateArgs {
    /// Serial port of the device (e.g. /dev/ttyUSB0, COM3)
    pub port: String,

    /// Module to add to the extraction script's module list (repeatable)
    #[arg(long = "module", short = 'm', value_name = "MODULE")]
    pub modules: Vec<String>,

    /// Extraction script to run on the device
    #[arg(long, env = "MPSTUBS_CREATESTUBS")]
    pub script: Option<PathBuf>,
}

impl CreateArgs {
    /// Requested modules; `None` when the script should run unchanged
    pub fn module_changes(&self) -> Option<Vec<String>> {
        (!self.modules.is_empty()).then(|| self.modules.clone())
    }
}
