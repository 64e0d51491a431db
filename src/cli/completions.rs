use clap::Parser;
use clap_complete::Shell;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    mpstubs completions bash > ~/.bash_completion.d/mpstubs\n\n\
                  Generate zsh completions:\n    mpstubs completions zsh > ~/.zfunc/_mpstubs\n\n\
                  Generate fish completions:\n    mpstubs completions fish > ~/.config/fish/completions/mpstubs.fish")]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum, ignore_case = true)]
    pub shell: Shell,
}
