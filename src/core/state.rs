//! State file management.
//!
//! Handles reading, writing, and validating the `.caisson.toml` state file:
//! the version-control-safe description of secrets (values stored as transit
//! ciphertext) plus the Vault settings the reconciliation run needs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::types::{EncryptedValue, KeyName, SecretName};
use crate::error::{Result, StateError};

/// Default state file name in the working directory.
pub const STATE_FILE: &str = ".caisson.toml";

/// Default remote path prefix for a fresh state file.
const DEFAULT_SECRET_PATH: &str = "secret/";

/// Project state stored in `.caisson.toml`.
#[derive(Debug, Serialize, Deserialize)]
pub struct State {
    /// Metadata about the state file itself.
    pub caisson: Meta,
    /// Vault settings for reconciliation.
    #[serde(default)]
    pub vault: VaultSettings,
    /// Map of secret name to its encrypted key/value document.
    #[serde(default)]
    pub secrets: BTreeMap<SecretName, BTreeMap<KeyName, EncryptedValue>>,

    /// Where this state was loaded from; not serialized.
    #[serde(skip)]
    path: PathBuf,
}

/// Metadata section of the state file.
#[derive(Debug, Serialize, Deserialize)]
pub struct Meta {
    /// State file format version.
    pub version: String,
}

/// Vault settings section.
#[derive(Debug, Serialize, Deserialize)]
pub struct VaultSettings {
    /// Name of the transit key protecting local values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transit_key: Option<String>,
    /// KV path prefix the secrets are reconciled under. Always ends in '/'.
    pub secret_path: String,
}

impl Default for VaultSettings {
    fn default() -> Self {
        Self {
            transit_key: None,
            secret_path: DEFAULT_SECRET_PATH.to_string(),
        }
    }
}

impl State {
    /// Create a new empty state bound to the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            caisson: Meta {
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            vault: VaultSettings::default(),
            secrets: BTreeMap::new(),
            path: path.into(),
        }
    }

    /// Initialize a fresh state file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `StateError::AlreadyInitialized` if the file exists.
    pub fn init(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            return Err(StateError::AlreadyInitialized.into());
        }
        let state = Self::new(path);
        state.save()?;
        Ok(state)
    }

    /// Load state from `path`.
    ///
    /// # Errors
    ///
    /// Returns `StateError::NotInitialized` if the file doesn't exist,
    /// or `StateError::Parse` if the TOML is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading state");

        if !path.exists() {
            return Err(StateError::NotInitialized.into());
        }
        let contents = std::fs::read_to_string(path).map_err(StateError::ReadFile)?;
        let mut state: Self = toml::from_str(&contents).map_err(StateError::Parse)?;
        state.path = path.to_path_buf();

        debug!(
            secrets = state.secrets.len(),
            secret_path = %state.vault.secret_path,
            "state loaded"
        );

        Ok(state)
    }

    /// Save state back to the file it was loaded from.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or the file write fails.
    pub fn save(&self) -> Result<()> {
        debug!(path = %self.path.display(), "saving state");

        let contents = toml::to_string_pretty(self).map_err(StateError::Serialize)?;
        std::fs::write(&self.path, contents)?;

        Ok(())
    }

    /// Path this state is persisted at.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The configured transit key name.
    ///
    /// # Errors
    ///
    /// Returns `StateError::NoTransitKey` if none has been set.
    pub fn transit_key(&self) -> Result<&str> {
        self.vault
            .transit_key
            .as_deref()
            .ok_or_else(|| StateError::NoTransitKey.into())
    }

    /// Record the transit key name and save.
    pub fn set_transit_key(&mut self, key: &str) -> Result<()> {
        self.vault.transit_key = Some(key.to_string());
        self.save()
    }

    /// The remote path prefix, always '/'-terminated.
    pub fn secret_path(&self) -> &str {
        &self.vault.secret_path
    }

    /// Set the remote path prefix, normalizing the trailing slash, and save.
    ///
    /// # Errors
    ///
    /// Returns `StateError::InvalidPath` for an empty prefix.
    pub fn set_secret_path(&mut self, prefix: &str) -> Result<()> {
        let mut normalized = prefix.trim().trim_start_matches('/').to_string();
        if normalized.is_empty() {
            return Err(StateError::InvalidPath(prefix.to_string(), "empty prefix").into());
        }
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        self.vault.secret_path = normalized;
        self.save()
    }

    /// Validate a secret name: non-empty and usable as a single path segment.
    pub fn validate_name(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(StateError::InvalidName(name.to_string(), "empty name").into());
        }
        if name.contains('/') {
            return Err(StateError::InvalidName(name.to_string(), "contains '/'").into());
        }
        Ok(())
    }

    /// Store one encrypted key under a secret, creating the secret if needed,
    /// and save.
    pub fn write_secret_key(&mut self, name: &str, key: &str, ciphertext: &str) -> Result<()> {
        Self::validate_name(name)?;
        self.secrets
            .entry(name.to_string())
            .or_default()
            .insert(key.to_string(), ciphertext.to_string());
        self.save()
    }

    /// Read one encrypted key from a secret.
    ///
    /// # Errors
    ///
    /// Returns `StateError::SecretNotFound` / `StateError::KeyNotFound`.
    pub fn read_secret_key(&self, name: &str, key: &str) -> Result<&str> {
        let doc = self
            .secrets
            .get(name)
            .ok_or_else(|| StateError::SecretNotFound(name.to_string()))?;
        let ciphertext = doc
            .get(key)
            .ok_or_else(|| StateError::KeyNotFound(name.to_string(), key.to_string()))?;
        Ok(ciphertext)
    }

    /// Remove a whole secret and save.
    ///
    /// # Errors
    ///
    /// Returns `StateError::SecretNotFound` if it doesn't exist.
    pub fn delete_secret(&mut self, name: &str) -> Result<()> {
        if self.secrets.remove(name).is_none() {
            return Err(StateError::SecretNotFound(name.to_string()).into());
        }
        self.save()
    }

    /// Remove one key from a secret and save. The secret itself is dropped
    /// when its last key is removed.
    ///
    /// # Errors
    ///
    /// Returns `StateError::SecretNotFound` / `StateError::KeyNotFound`.
    pub fn delete_secret_key(&mut self, name: &str, key: &str) -> Result<()> {
        let doc = self
            .secrets
            .get_mut(name)
            .ok_or_else(|| StateError::SecretNotFound(name.to_string()))?;
        if doc.remove(key).is_none() {
            return Err(StateError::KeyNotFound(name.to_string(), key.to_string()).into());
        }
        if doc.is_empty() {
            self.secrets.remove(name);
        }
        self.save()
    }

    /// Secret names, optionally filtered by prefix.
    pub fn secret_names(&self, prefix: &str) -> Vec<&str> {
        self.secrets
            .keys()
            .filter(|n| n.starts_with(prefix))
            .map(|n| n.as_str())
            .collect()
    }

    /// Total number of keys across all secrets.
    pub fn key_count(&self) -> usize {
        self.secrets.values().map(|doc| doc.len()).sum()
    }
}
