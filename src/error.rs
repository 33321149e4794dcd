//! Error types.
//!
//! Errors are grouped by subsystem (state file, Vault API, cipher) and
//! wrapped in a single top-level [`Error`] so commands can propagate with
//! `?` all the way up to `main`, which decides the exit status.

use thiserror::Error;

/// Top-level error type for all caisson operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors reading, writing, or validating the state file.
#[derive(Error, Debug)]
pub enum StateError {
    #[error("not initialized: no state file found")]
    NotInitialized,

    #[error("already initialized: state file exists")]
    AlreadyInitialized,

    #[error("failed to read state file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse state file: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("failed to serialize state file: {0}")]
    Serialize(#[source] toml::ser::Error),

    #[error("secret not found: {0}")]
    SecretNotFound(String),

    #[error("key not found: {0}:{1}")]
    KeyNotFound(String, String),

    #[error("invalid secret name '{0}': {1}")]
    InvalidName(String, &'static str),

    #[error("invalid secret path '{0}': {1}")]
    InvalidPath(String, &'static str),

    #[error("no transit key configured")]
    NoTransitKey,
}

/// Errors talking to the Vault API.
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("VAULT_ADDR is not set")]
    MissingAddr,

    #[error("VAULT_TOKEN is not set")]
    MissingToken,

    #[error("invalid vault address '{0}'")]
    InvalidAddr(String),

    #[error("vault request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("vault returned {status} for {path}: {errors}")]
    Api {
        status: u16,
        path: String,
        errors: String,
    },

    #[error("secret not found in vault: {0}")]
    NotFound(String),

    #[error("unexpected vault response for {path}: {reason}")]
    Decode { path: String, reason: String },
}

/// Errors from the encryption boundary.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("decryption failed for secret '{secret}' key '{key}': {reason}")]
    Decrypt {
        secret: String,
        key: String,
        reason: String,
    },

    #[error("transit returned malformed plaintext: {0}")]
    Malformed(String),
}

/// Convenience result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
