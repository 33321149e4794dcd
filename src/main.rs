//! Caisson - keep Vault secrets in version control, encrypted.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use caisson::cli::output;
use caisson::cli::{execute, Cli};
use caisson::error::{Error, StateError, VaultError};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("CAISSON_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("caisson=debug")
        } else {
            EnvFilter::new("caisson=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).without_time())
        .init();

    if let Err(e) = execute(cli) {
        let suggestion = match &e {
            Error::State(StateError::NotInitialized) => Some("run: caisson init"),
            Error::State(StateError::NoTransitKey) => Some("run: caisson transit use <key>"),
            Error::Vault(VaultError::MissingAddr) => Some("export VAULT_ADDR=https://vault:8200"),
            Error::Vault(VaultError::MissingToken) => Some("export VAULT_TOKEN=<token>"),
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
