//! Transit engine cipher.
//!
//! Implements the [`Cipher`] seam on top of Vault's transit engine. The
//! transit key never leaves Vault; every encrypt/decrypt is one API round
//! trip. Plaintext crosses the wire base64-encoded, and decoded buffers are
//! zeroized once copied out.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use zeroize::Zeroizing;

use crate::core::reconcile::Cipher;
use crate::core::vault::VaultClient;
use crate::error::{CipherError, Result};

#[derive(Debug, Deserialize)]
struct EncryptData {
    ciphertext: String,
}

#[derive(Debug, Deserialize)]
struct DecryptData {
    plaintext: String,
}

/// Key metadata from `GET /v1/transit/keys/{name}`.
#[derive(Debug, Deserialize)]
pub struct TransitKeyInfo {
    #[serde(rename = "type")]
    pub key_type: String,
    pub latest_version: u64,
    #[serde(default)]
    pub deletion_allowed: bool,
    #[serde(default)]
    pub exportable: bool,
}

/// Vault transit cipher bound to one named key.
#[derive(Debug)]
pub struct Transit<'a> {
    client: &'a VaultClient,
    key: String,
}

impl<'a> Transit<'a> {
    /// Bind a transit cipher to a key name.
    pub fn new(client: &'a VaultClient, key: &str) -> Self {
        Self {
            client,
            key: key.to_string(),
        }
    }

    /// The bound key name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Create the transit key in Vault. Idempotent on the Vault side.
    pub fn create_key(client: &VaultClient, name: &str) -> Result<()> {
        debug!(key = name, "creating transit key");
        client.post(&format!("transit/keys/{name}"), &json!({}))
    }

    /// Fetch metadata for a transit key.
    pub fn key_info(client: &VaultClient, name: &str) -> Result<TransitKeyInfo> {
        client.get_data(&format!("transit/keys/{name}"))
    }

    /// List transit key names.
    pub fn list_keys(client: &VaultClient) -> Result<Vec<String>> {
        client.list_path("transit/keys")
    }
}

impl Cipher for Transit<'_> {
    fn encrypt(&self, plaintext: &str) -> Result<String> {
        let body = json!({ "plaintext": BASE64.encode(plaintext) });
        let data: EncryptData = self
            .client
            .post_data(&format!("transit/encrypt/{}", self.key), &body)?;
        Ok(data.ciphertext)
    }

    fn decrypt(&self, ciphertext: &str) -> Result<String> {
        let body = json!({ "ciphertext": ciphertext });
        let data: DecryptData = self
            .client
            .post_data(&format!("transit/decrypt/{}", self.key), &body)?;

        let decoded = Zeroizing::new(
            BASE64
                .decode(&data.plaintext)
                .map_err(|e| CipherError::Malformed(e.to_string()))?,
        );
        let plaintext = std::str::from_utf8(&decoded)
            .map_err(|e| CipherError::Malformed(e.to_string()))?
            .to_string();
        Ok(plaintext)
    }
}
