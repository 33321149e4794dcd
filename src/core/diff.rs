//! Diff plan computation.
//!
//! Compares the decrypted local view against the remote view and produces
//! the set of writes and deletes that reconcile them. Computation is a pure
//! function of the two views; no I/O happens here.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::collection::SecretCollection;
use crate::core::types::{KeyName, SecretName};

/// The reconciliation plan: what `apply` must do to make the remote store
/// match the local description.
///
/// A secret name appears in exactly one of three situations: wholly new
/// (`create`, with all its keys in `upsert`), wholly removed (`delete`), or
/// present in both views (key-level entries in `upsert` and/or `prune`).
/// `create` and `delete` are therefore always disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffPlan {
    /// Secrets present only locally; the whole document must be written.
    pub create: BTreeSet<SecretName>,
    /// Keys that must exist remotely with the local value, per secret.
    pub upsert: BTreeMap<SecretName, BTreeSet<KeyName>>,
    /// Secrets present only remotely; the whole document must be deleted.
    pub delete: BTreeSet<SecretName>,
    /// Remote-only keys of secrets present in both views. Removed by
    /// rewriting the owning document with the local key set.
    pub prune: BTreeMap<SecretName, BTreeSet<KeyName>>,
}

impl DiffPlan {
    /// Compute the plan for reconciling `remote` to match `local`.
    ///
    /// The diff is value-aware: a key present in both documents whose local
    /// value differs from the remote one is flagged for upsert, so apply
    /// always converges to full value equality, not just key-set equality.
    pub fn compute(local: &SecretCollection, remote: &SecretCollection) -> Self {
        let mut plan = Self::default();

        for (name, local_doc) in local.iter() {
            match remote.get(name) {
                None => {
                    plan.create.insert(name.clone());
                    if !local_doc.is_empty() {
                        plan.upsert
                            .insert(name.clone(), local_doc.keys().cloned().collect());
                    }
                }
                Some(remote_doc) => {
                    let changed: BTreeSet<KeyName> = local_doc
                        .iter()
                        .filter(|(key, value)| remote_doc.get(*key) != Some(*value))
                        .map(|(key, _)| key.clone())
                        .collect();
                    if !changed.is_empty() {
                        plan.upsert.insert(name.clone(), changed);
                    }
                }
            }
        }

        for (name, remote_doc) in remote.iter() {
            match local.get(name) {
                None => {
                    plan.delete.insert(name.clone());
                }
                Some(local_doc) => {
                    let stray: BTreeSet<KeyName> = remote_doc
                        .keys()
                        .filter(|key| !local_doc.contains_key(*key))
                        .cloned()
                        .collect();
                    if !stray.is_empty() {
                        plan.prune.insert(name.clone(), stray);
                    }
                }
            }
        }

        plan
    }

    /// Whether the plan contains no work at all.
    pub fn is_empty(&self) -> bool {
        self.create.is_empty()
            && self.upsert.is_empty()
            && self.delete.is_empty()
            && self.prune.is_empty()
    }

    /// Total number of keys flagged for addition or update.
    pub fn upsert_key_count(&self) -> usize {
        self.upsert.values().map(|keys| keys.len()).sum()
    }

    /// Total number of keys flagged for removal, including every key of a
    /// wholly deleted secret.
    pub fn removed_key_count(&self, remote: &SecretCollection) -> usize {
        let pruned: usize = self.prune.values().map(|keys| keys.len()).sum();
        let deleted: usize = self
            .delete
            .iter()
            .filter_map(|name| remote.get(name))
            .map(|doc| doc.len())
            .sum();
        pruned + deleted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::SecretDocument;

    fn collection(secrets: &[(&str, &[(&str, &str)])]) -> SecretCollection {
        secrets
            .iter()
            .map(|(name, pairs)| {
                let doc: SecretDocument = pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect();
                (name.to_string(), doc)
            })
            .collect()
    }

    fn names(set: &BTreeSet<String>) -> Vec<&str> {
        set.iter().map(|s| s.as_str()).collect()
    }

    #[test]
    fn test_equal_views_produce_empty_plan() {
        let local = collection(&[("db", &[("user", "a"), ("pass", "b")])]);
        let remote = local.clone();
        let plan = DiffPlan::compute(&local, &remote);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_new_secret_is_created_with_all_keys() {
        let local = collection(&[("api", &[("key", "xyz")])]);
        let remote = collection(&[]);

        let plan = DiffPlan::compute(&local, &remote);

        assert_eq!(names(&plan.create), vec!["api"]);
        assert_eq!(plan.upsert_key_count(), 1);
        assert!(plan.upsert["api"].contains("key"));
        assert!(plan.delete.is_empty());
        assert!(plan.prune.is_empty());
    }

    #[test]
    fn test_remote_only_secret_is_deleted() {
        let local = collection(&[]);
        let remote = collection(&[("old", &[("k", "v")])]);

        let plan = DiffPlan::compute(&local, &remote);

        assert_eq!(names(&plan.delete), vec!["old"]);
        assert!(plan.create.is_empty());
        assert!(plan.upsert.is_empty());
        assert!(plan.prune.is_empty());
        assert_eq!(plan.removed_key_count(&remote), 1);
    }

    #[test]
    fn test_missing_key_in_existing_secret_is_upserted() {
        let local = collection(&[("db", &[("user", "a"), ("pass", "b")])]);
        let remote = collection(&[("db", &[("user", "a")])]);

        let plan = DiffPlan::compute(&local, &remote);

        assert!(plan.create.is_empty());
        assert_eq!(plan.upsert["db"], BTreeSet::from(["pass".to_string()]));
    }

    #[test]
    fn test_remote_only_key_is_pruned_not_deleted() {
        let local = collection(&[("db", &[("user", "a")])]);
        let remote = collection(&[("db", &[("user", "a"), ("pass", "b")])]);

        let plan = DiffPlan::compute(&local, &remote);

        assert!(plan.delete.is_empty());
        assert_eq!(plan.prune["db"], BTreeSet::from(["pass".to_string()]));
        assert_eq!(plan.removed_key_count(&remote), 1);
    }

    #[test]
    fn test_changed_value_is_upserted() {
        // Value-aware diff: same key set, one value differs.
        let local = collection(&[("db", &[("user", "admin")])]);
        let remote = collection(&[("db", &[("user", "root")])]);

        let plan = DiffPlan::compute(&local, &remote);

        assert!(!plan.is_empty());
        assert_eq!(plan.upsert["db"], BTreeSet::from(["user".to_string()]));
        assert!(plan.prune.is_empty());
    }

    #[test]
    fn test_unchanged_secret_absent_from_upsert_map() {
        let local = collection(&[
            ("db", &[("user", "a")]),
            ("api", &[("token", "t")]),
        ]);
        let remote = collection(&[
            ("db", &[("user", "a")]),
            ("api", &[("token", "old")]),
        ]);

        let plan = DiffPlan::compute(&local, &remote);

        assert!(!plan.upsert.contains_key("db"));
        assert!(plan.upsert.contains_key("api"));
    }

    #[test]
    fn test_create_and_delete_are_disjoint() {
        let local = collection(&[("a", &[("k", "v")]), ("both", &[("k", "v")])]);
        let remote = collection(&[("b", &[("k", "v")]), ("both", &[("k", "v")])]);

        let plan = DiffPlan::compute(&local, &remote);

        assert!(plan.create.is_disjoint(&plan.delete));
        for name in &plan.create {
            assert!(!plan.prune.contains_key(name));
        }
        for name in &plan.delete {
            assert!(!plan.upsert.contains_key(name));
        }
    }

    #[test]
    fn test_compute_is_deterministic() {
        let local = collection(&[
            ("db", &[("user", "a"), ("pass", "b")]),
            ("api", &[("token", "t")]),
        ]);
        let remote = collection(&[("db", &[("user", "x"), ("extra", "y")])]);

        let first = DiffPlan::compute(&local, &remote);
        let second = DiffPlan::compute(&local, &remote);
        assert_eq!(first, second);
    }

    #[test]
    fn test_mixed_plan_counts() {
        let local = collection(&[
            ("new", &[("k1", "v"), ("k2", "v")]),
            ("both", &[("keep", "v"), ("add", "v")]),
        ]);
        let remote = collection(&[
            ("both", &[("keep", "v"), ("stray", "v")]),
            ("gone", &[("k", "v")]),
        ]);

        let plan = DiffPlan::compute(&local, &remote);

        assert_eq!(names(&plan.create), vec!["new"]);
        assert_eq!(names(&plan.delete), vec!["gone"]);
        assert_eq!(plan.upsert_key_count(), 3); // k1, k2, add
        assert_eq!(plan.removed_key_count(&remote), 2); // stray + gone:k
    }
}
