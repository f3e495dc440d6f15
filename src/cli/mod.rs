// CLI interface
pub mod commands;

use crate::error::Result;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "switch-cloud")]
#[command(about = "Switch the default AWS profile, refreshing SSO credentials on the way", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pick a profile and make it the default (the default command)
    Switch,

    /// List the configured profiles
    List {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show the current default profile and its expiry
    Current,

    /// Create a new profile interactively
    Create,

    /// Delete profiles interactively
    Delete,

    /// Re-resolve credentials for the profile the default mirrors
    Refresh,

    /// Generate shell completion scripts
    ///
    /// INSTALLATION:
    ///
    /// Bash:
    ///   eval "$(switch-cloud completions bash)"    # Add to ~/.bashrc
    ///
    /// Zsh:
    ///   eval "$(switch-cloud completions zsh)"     # Add to ~/.zshrc
    ///
    /// Fish:
    ///   switch-cloud completions fish > ~/.config/fish/completions/switch-cloud.fish
    Completions {
        /// Shell type to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Clone, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

pub async fn execute(args: Cli) -> Result<()> {
    match args.command {
        // No subcommand behaves like `switch`
        Some(Commands::Switch) | None => commands::switch::execute().await,
        Some(Commands::List { format }) => commands::list::execute(&format),
        Some(Commands::Current) => commands::current::execute(),
        Some(Commands::Create) => commands::create::execute(),
        Some(Commands::Delete) => commands::delete::execute(),
        Some(Commands::Refresh) => commands::refresh::execute().await,
        Some(Commands::Completions { shell }) => {
            commands::completions::execute(shell);
            Ok(())
        }
    }
}
