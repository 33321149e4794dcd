//! Secret management commands (set, get, rm, list).
//!
//! `set` and `get` cross the encryption boundary and therefore need Vault;
//! `rm` and `list` only touch the state file.

use std::path::Path;

use colored::Colorize;
use tracing::info;

use crate::cli::output;
use crate::core::reconcile::Cipher;
use crate::core::state::State;
use crate::core::vault::{Transit, VaultClient};
use crate::error::Result;

/// Encrypt a value and store it in the state file.
pub fn set(state_path: &Path, name: &str, key: &str, value: &str) -> Result<()> {
    let mut state = State::load(state_path)?;
    State::validate_name(name)?;
    let transit_key = state.transit_key()?.to_string();

    let client = VaultClient::from_env()?;
    let transit = Transit::new(&client, &transit_key);
    let ciphertext = transit.encrypt(value)?;

    state.write_secret_key(name, key, &ciphertext)?;
    info!(secret = name, key, "secret written");
    println!("{} {}:{}", "set:".green().bold(), name, key);
    Ok(())
}

/// Decrypt and print a stored value.
pub fn get(state_path: &Path, name: &str, key: &str) -> Result<()> {
    let state = State::load(state_path)?;
    let ciphertext = state.read_secret_key(name, key)?;
    let transit_key = state.transit_key()?.to_string();

    let client = VaultClient::from_env()?;
    let transit = Transit::new(&client, &transit_key);
    let plaintext = transit.decrypt(ciphertext)?;

    println!("{}", plaintext);
    Ok(())
}

/// Remove a whole secret, or one key of it.
pub fn rm(state_path: &Path, name: &str, key: Option<&str>) -> Result<()> {
    let mut state = State::load(state_path)?;

    match key {
        Some(key) => {
            state.delete_secret_key(name, key)?;
            println!("{} {}:{}", "removed:".green().bold(), name, key);
        }
        None => {
            state.delete_secret(name)?;
            println!("{} {}", "removed:".green().bold(), name);
        }
    }
    Ok(())
}

/// List secret names and their keys from the state file.
pub fn list(state_path: &Path, prefix: &str, json: bool) -> Result<()> {
    let state = State::load(state_path)?;
    let names = state.secret_names(prefix);

    if json {
        let secrets: serde_json::Map<String, serde_json::Value> = names
            .iter()
            .map(|name| {
                let keys: Vec<&str> = state.secrets[*name].keys().map(|k| k.as_str()).collect();
                (name.to_string(), serde_json::json!(keys))
            })
            .collect();
        let out = serde_json::json!({
            "secrets": secrets,
            "count": names.len(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if names.is_empty() {
        output::dimmed("no secrets stored");
    } else {
        println!("{} secret(s):", names.len().to_string().green().bold());
        for name in names {
            let keys: Vec<&str> = state.secrets[name].keys().map(|k| k.as_str()).collect();
            println!("  {} [{}]", name, keys.join(", "));
        }
    }

    Ok(())
}
