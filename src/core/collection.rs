//! Secret collection type.
//!
//! A [`SecretCollection`] is a transient, fully materialized view of a set
//! of secrets: either the local state file after decryption, or the remote
//! KV subtree after listing and reading. Both views live only for the
//! duration of one plan/apply run.

use std::collections::BTreeMap;

use crate::core::types::{SecretDocument, SecretName};

/// A mapping from secret name to its key/value document.
///
/// Ordered so that iteration (and therefore reporting) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretCollection {
    secrets: BTreeMap<SecretName, SecretDocument>,
}

impl SecretCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a full document under a name, replacing any existing one.
    pub fn insert(&mut self, name: impl Into<SecretName>, doc: SecretDocument) {
        self.secrets.insert(name.into(), doc);
    }

    /// Insert a single key/value pair, creating the document if needed.
    pub fn insert_key(
        &mut self,
        name: impl Into<SecretName>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.secrets
            .entry(name.into())
            .or_default()
            .insert(key.into(), value.into());
    }

    /// Document for a secret name, if present.
    pub fn get(&self, name: &str) -> Option<&SecretDocument> {
        self.secrets.get(name)
    }

    /// Whether a secret with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.secrets.contains_key(name)
    }

    /// Iterate over (name, document) pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&SecretName, &SecretDocument)> {
        self.secrets.iter()
    }

    /// Secret names in order.
    pub fn names(&self) -> impl Iterator<Item = &SecretName> {
        self.secrets.keys()
    }

    /// Number of secrets.
    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    /// Whether the collection holds no secrets.
    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }

    /// Total number of keys across all documents.
    pub fn key_count(&self) -> usize {
        self.secrets.values().map(|doc| doc.len()).sum()
    }

    /// Structural equality with another collection: same secret names, same
    /// keys within each document, same values.
    ///
    /// This is the "nothing to do" fast path for plan/apply. It is written
    /// against the domain model on purpose rather than leaning on a generic
    /// deep-equality primitive.
    pub fn in_sync_with(&self, other: &SecretCollection) -> bool {
        if self.secrets.len() != other.secrets.len() {
            return false;
        }
        for (name, doc) in &self.secrets {
            let Some(other_doc) = other.secrets.get(name) else {
                return false;
            };
            if doc.len() != other_doc.len() {
                return false;
            }
            for (key, value) in doc {
                if other_doc.get(key) != Some(value) {
                    return false;
                }
            }
        }
        true
    }
}

impl FromIterator<(SecretName, SecretDocument)> for SecretCollection {
    fn from_iter<I: IntoIterator<Item = (SecretName, SecretDocument)>>(iter: I) -> Self {
        Self {
            secrets: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(pairs: &[(&str, &str)]) -> SecretDocument {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_collections_are_in_sync() {
        let a = SecretCollection::new();
        let b = SecretCollection::new();
        assert!(a.in_sync_with(&b));
    }

    #[test]
    fn test_identical_collections_are_in_sync() {
        let mut a = SecretCollection::new();
        a.insert("db", doc(&[("user", "admin"), ("pass", "hunter2")]));
        let b = a.clone();
        assert!(a.in_sync_with(&b));
        assert!(b.in_sync_with(&a));
    }

    #[test]
    fn test_differing_value_breaks_sync() {
        let mut a = SecretCollection::new();
        a.insert("db", doc(&[("user", "admin")]));
        let mut b = SecretCollection::new();
        b.insert("db", doc(&[("user", "root")]));
        assert!(!a.in_sync_with(&b));
    }

    #[test]
    fn test_extra_key_breaks_sync() {
        let mut a = SecretCollection::new();
        a.insert("db", doc(&[("user", "admin")]));
        let mut b = SecretCollection::new();
        b.insert("db", doc(&[("user", "admin"), ("pass", "x")]));
        assert!(!a.in_sync_with(&b));
        assert!(!b.in_sync_with(&a));
    }

    #[test]
    fn test_extra_secret_breaks_sync() {
        let mut a = SecretCollection::new();
        a.insert("db", doc(&[("user", "admin")]));
        let mut b = a.clone();
        b.insert("api", doc(&[("token", "t")]));
        assert!(!a.in_sync_with(&b));
    }

    #[test]
    fn test_key_count_sums_documents() {
        let mut c = SecretCollection::new();
        c.insert("db", doc(&[("user", "a"), ("pass", "b")]));
        c.insert("api", doc(&[("token", "t")]));
        assert_eq!(c.len(), 2);
        assert_eq!(c.key_count(), 3);
    }

    #[test]
    fn test_insert_key_creates_document() {
        let mut c = SecretCollection::new();
        c.insert_key("db", "user", "admin");
        c.insert_key("db", "pass", "hunter2");
        assert_eq!(c.get("db").unwrap().len(), 2);
        assert_eq!(c.get("db").unwrap()["user"], "admin");
    }
}
