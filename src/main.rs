//! denv - a local encrypted secrets vault for development environments.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use denv::cli::output;
use denv::cli::{execute, Cli};
use denv::error::DenvError;

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("DENV_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("denv=debug")
        } else {
            EnvFilter::new("denv=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).without_time())
        .init();

    if let Err(e) = execute(cli.command, cli.vault) {
        let suggestion = match &e {
            DenvError::NotInitialized => Some("run: denv init"),
            DenvError::AlreadyInitialized(_) => Some("use --force to regenerate key material"),
            DenvError::CorruptVault { .. } => {
                Some("the vault file is damaged; restore it from a backup")
            }
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
