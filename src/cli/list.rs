use clap::Parser;

/// Arguments for the list command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List stubs used by the current project:\n    mpstubs list\n\n\
                  List every installed stub:\n    mpstubs list --all")]
pub struct ListArgs {
    /// Ignore the project and list all installed stubs
    #[arg(long, short = 'a')]
    pub all: bool,
}
