// switch-cloud - switch the default AWS profile, refreshing SSO
// credentials on the way

mod aws_cli;
mod cache;
mod cli;
mod error;
mod expiry;
mod models;
mod profiles;
mod regions;
mod resolver;
mod section;

use clap::Parser;

#[tokio::main]
async fn main() {
    let args = cli::Cli::parse();

    let log_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    // Logs go to stderr so they never interleave with the prompts
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli::execute(args).await {
        eprintln!("ERROR - {}", e);
        std::process::exit(1);
    }
}
