//! Transit key management commands.

use std::path::Path;

use tracing::info;

use crate::cli::output;
use crate::core::state::State;
use crate::core::vault::{Transit, VaultClient};
use crate::error::Result;

/// Record an existing transit key in the state file.
pub fn use_key(state_path: &Path, key: &str) -> Result<()> {
    let mut state = State::load(state_path)?;
    state.set_transit_key(key)?;

    info!(key, "transit key recorded");
    output::success(&format!("using transit key '{}'", key));
    Ok(())
}

/// Create a transit key in Vault, then record it.
pub fn create(state_path: &Path, key: &str) -> Result<()> {
    let mut state = State::load(state_path)?;

    let client = VaultClient::from_env()?;
    Transit::create_key(&client, key)?;
    state.set_transit_key(key)?;

    output::success(&format!("created transit key '{}'", key));
    Ok(())
}

/// Show metadata for the configured transit key.
pub fn info(state_path: &Path) -> Result<()> {
    let state = State::load(state_path)?;
    let key = state.transit_key()?;

    let client = VaultClient::from_env()?;
    let info = Transit::key_info(&client, key)?;

    output::section("Transit Key");
    output::kv("name", key);
    output::kv("type", &info.key_type);
    output::kv("latest version", info.latest_version);
    output::kv("exportable", info.exportable);
    output::kv("deletion allowed", info.deletion_allowed);
    Ok(())
}

/// List transit keys available in Vault.
pub fn list() -> Result<()> {
    let client = VaultClient::from_env()?;
    let keys = Transit::list_keys(&client)?;

    if keys.is_empty() {
        output::dimmed("no transit keys");
    } else {
        for key in keys {
            println!("{}", key);
        }
    }
    Ok(())
}
