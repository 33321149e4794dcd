//! View construction and the apply executor.
//!
//! A reconciliation run is a strict sequence of blocking calls: decrypt
//! every local value, list and read the remote subtree, compute the
//! [`DiffPlan`], then (for `apply`) drive the remote store to realize it.
//! The two backend seams are expressed as traits so the engine can be
//! exercised against in-memory fakes.

use std::collections::BTreeSet;

use tracing::debug;

use crate::core::collection::SecretCollection;
use crate::core::diff::DiffPlan;
use crate::core::state::State;
use crate::core::types::{SecretDocument, SecretName};
use crate::error::{CipherError, Result};

/// Encryption boundary: protects values at rest in the state file.
///
/// Backed by the Vault transit engine in production; in-memory in tests.
pub trait Cipher {
    /// Encrypt a plaintext value.
    fn encrypt(&self, plaintext: &str) -> Result<String>;

    /// Decrypt a ciphertext back to byte-exact plaintext.
    fn decrypt(&self, ciphertext: &str) -> Result<String>;
}

/// Remote key-value secret backend.
///
/// Documents are written and deleted whole; there is no partial-key delete
/// primitive, which is why pruning rewrites the full local document.
pub trait SecretStore {
    /// Child names under a path prefix. An empty or missing subtree is an
    /// empty list, not an error.
    fn list(&self, prefix: &str) -> Result<Vec<String>>;

    /// Read the document at a path.
    fn read(&self, path: &str) -> Result<SecretDocument>;

    /// Write a document at a path, full-replace semantics.
    fn write(&self, path: &str, doc: &SecretDocument) -> Result<()>;

    /// Delete the path and everything under it.
    fn delete(&self, path: &str) -> Result<()>;
}

/// Outcome of an apply run, for the CLI summary line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    /// Number of documents written.
    pub writes: usize,
    /// Number of documents deleted.
    pub deletes: usize,
}

/// Build the plaintext local view by decrypting every stored value.
///
/// # Errors
///
/// The first decryption failure aborts the whole run; a partial view is
/// useless when the transit key is wrong or unreachable.
pub fn build_local_view(state: &State, cipher: &impl Cipher) -> Result<SecretCollection> {
    let mut view = SecretCollection::new();
    for (name, doc) in &state.secrets {
        for (key, ciphertext) in doc {
            let plaintext = cipher.decrypt(ciphertext).map_err(|e| CipherError::Decrypt {
                secret: name.clone(),
                key: key.clone(),
                reason: e.to_string(),
            })?;
            view.insert_key(name.clone(), key.clone(), plaintext);
        }
        // Preserve secrets that exist but hold no keys yet.
        if doc.is_empty() {
            view.insert(name.clone(), SecretDocument::new());
        }
    }
    debug!(secrets = view.len(), keys = view.key_count(), "local view built");
    Ok(view)
}

/// Build the remote view by listing the prefix and reading each child.
///
/// An empty listing is a valid "no secrets yet" state. Any read error is
/// fatal.
pub fn build_remote_view(store: &impl SecretStore, prefix: &str) -> Result<SecretCollection> {
    let mut view = SecretCollection::new();
    for name in store.list(prefix)? {
        let doc = store.read(&format!("{prefix}{name}"))?;
        view.insert(name, doc);
    }
    debug!(secrets = view.len(), keys = view.key_count(), "remote view built");
    Ok(view)
}

/// Build both views for one reconciliation run.
///
/// Decryption happens first; if the transit key is wrong or unreachable no
/// remote call is ever made.
pub fn build_views(
    state: &State,
    cipher: &impl Cipher,
    store: &impl SecretStore,
) -> Result<(SecretCollection, SecretCollection)> {
    let local = build_local_view(state, cipher)?;
    let remote = build_remote_view(store, state.secret_path())?;
    Ok((local, remote))
}

/// Execute a plan against the remote store.
///
/// Every key-level change is realized as a full-document write of the
/// current local document, so remote-only keys vanish by replacement.
/// Each name is written at most once even when it appears in both `create`
/// and `upsert`. Calls run sequentially with no batching; on error, prior
/// writes stay applied and the caller is expected to re-run to converge.
pub fn apply_plan(
    plan: &DiffPlan,
    local: &SecretCollection,
    store: &impl SecretStore,
    prefix: &str,
) -> Result<ApplySummary> {
    let mut summary = ApplySummary::default();

    let mut written: BTreeSet<&SecretName> = BTreeSet::new();
    for name in plan.create.iter().chain(plan.upsert.keys()) {
        if !written.insert(name) {
            continue;
        }
        write_local_document(store, prefix, name, local)?;
        summary.writes += 1;
    }

    for name in &plan.delete {
        let path = format!("{prefix}{name}");
        debug!(%path, "deleting secret");
        store.delete(&path)?;
        summary.deletes += 1;
    }

    // Stray remote-only keys are removed by rewriting the owning document
    // with the authoritative local key set.
    for name in plan.prune.keys() {
        if !written.insert(name) {
            continue;
        }
        write_local_document(store, prefix, name, local)?;
        summary.writes += 1;
    }

    debug!(writes = summary.writes, deletes = summary.deletes, "apply complete");
    Ok(summary)
}

fn write_local_document(
    store: &impl SecretStore,
    prefix: &str,
    name: &str,
    local: &SecretCollection,
) -> Result<()> {
    // Names in the plan's write sets come from the local view by
    // construction, so the lookup cannot miss; an empty document is the
    // degenerate fallback rather than a panic.
    static EMPTY: SecretDocument = SecretDocument::new();
    let doc = local.get(name).unwrap_or(&EMPTY);
    let path = format!("{prefix}{name}");
    debug!(%path, keys = doc.len(), "writing secret");
    store.write(&path, doc)
}
