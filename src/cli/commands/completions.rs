use crate::cli::{Cli, Shell};
use clap::CommandFactory;
use clap_complete::{generate, Shell as ClapShell};
use std::io;

pub fn execute(shell: Shell) {
    let mut cmd = Cli::command();
    let bin_name = "switch-cloud";

    let clap_shell = match shell {
        Shell::Bash => ClapShell::Bash,
        Shell::Zsh => ClapShell::Zsh,
        Shell::Fish => ClapShell::Fish,
        Shell::PowerShell => ClapShell::PowerShell,
        Shell::Elvish => ClapShell::Elvish,
    };

    generate(clap_shell, &mut cmd, bin_name, &mut io::stdout());

    match shell {
        Shell::Bash => {
            eprintln!("# Add to ~/.bashrc:");
            eprintln!("#   eval \"$(switch-cloud completions bash)\"");
        }
        Shell::Zsh => {
            eprintln!("# Add to ~/.zshrc:");
            eprintln!("#   eval \"$(switch-cloud completions zsh)\"");
        }
        Shell::Fish => {
            eprintln!("# Save to fish completion directory:");
            eprintln!(
                "#   switch-cloud completions fish > ~/.config/fish/completions/switch-cloud.fish"
            );
        }
        Shell::PowerShell => {
            eprintln!("# Add to PowerShell profile:");
            eprintln!("#   switch-cloud completions powershell | Out-String | Invoke-Expression");
        }
        Shell::Elvish => {
            eprintln!("# Add to Elvish config:");
            eprintln!("#   eval (switch-cloud completions elvish | slurp)");
        }
    }
}
