//! Domain type aliases.
//!
//! Aliases document intent in signatures without the ceremony of newtypes.

use std::collections::BTreeMap;

/// Name of a secret (one document in the remote store).
pub type SecretName = String;

/// Key within a secret document.
pub type KeyName = String;

/// Transit ciphertext as stored in the state file (`vault:v1:...`).
pub type EncryptedValue = String;

/// A flat key/value document, the unit the remote store reads and writes.
pub type SecretDocument = BTreeMap<KeyName, String>;
