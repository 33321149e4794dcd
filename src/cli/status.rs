//! Status command - state overview.
//!
//! Reads only the state file and the environment; makes no Vault calls, so
//! it works offline.

use std::path::Path;

use crate::cli::output;
use crate::core::state::State;
use crate::error::Result;

/// Show an overview of the state file.
pub fn execute(state_path: &Path) -> Result<()> {
    let state = State::load(state_path)?;

    output::section("Caisson Status");

    output::kv("state file", state.path().display());
    output::kv(
        "transit key",
        state.vault.transit_key.as_deref().unwrap_or("(not set)"),
    );
    output::kv("secret path", state.secret_path());

    let secrets = state.secrets.len();
    let keys = state.key_count();
    output::kv(
        "secrets",
        format!(
            "{} secret{}, {} key{}",
            secrets,
            if secrets == 1 { "" } else { "s" },
            keys,
            if keys == 1 { "" } else { "s" }
        ),
    );

    match std::env::var("VAULT_ADDR") {
        Ok(addr) => output::kv("vault addr", addr),
        Err(_) => output::kv("vault addr", "(not set)"),
    }

    Ok(())
}
