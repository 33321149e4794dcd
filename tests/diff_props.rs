//! Property tests for the diff engine.
//!
//! Small name/key alphabets force heavy overlap between the generated
//! views, which is where the interesting diff cases live.

use std::collections::BTreeMap;

use caisson::core::collection::SecretCollection;
use caisson::core::diff::DiffPlan;
use proptest::prelude::*;

fn arb_collection() -> impl Strategy<Value = SecretCollection> {
    let doc = prop::collection::btree_map("[a-d]{1,2}", "[xyz]{1,2}", 0..4);
    prop::collection::btree_map("[st][0-3]", doc, 0..5).prop_map(
        |m: BTreeMap<String, BTreeMap<String, String>>| m.into_iter().collect(),
    )
}

proptest! {
    #[test]
    fn prop_compute_is_deterministic(local in arb_collection(), remote in arb_collection()) {
        let a = DiffPlan::compute(&local, &remote);
        let b = DiffPlan::compute(&local, &remote);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_create_and_delete_are_disjoint(local in arb_collection(), remote in arb_collection()) {
        let plan = DiffPlan::compute(&local, &remote);

        prop_assert!(plan.create.is_disjoint(&plan.delete));
        for name in &plan.create {
            prop_assert!(!plan.prune.contains_key(name), "created secret {} in prune", name);
        }
        for name in &plan.delete {
            prop_assert!(!plan.upsert.contains_key(name), "deleted secret {} in upsert", name);
        }
    }

    #[test]
    fn prop_plan_empty_iff_in_sync(local in arb_collection(), remote in arb_collection()) {
        let plan = DiffPlan::compute(&local, &remote);
        prop_assert_eq!(plan.is_empty(), local.in_sync_with(&remote));
    }

    #[test]
    fn prop_plan_names_come_from_the_views(local in arb_collection(), remote in arb_collection()) {
        let plan = DiffPlan::compute(&local, &remote);

        for name in plan.create.iter().chain(plan.upsert.keys()) {
            prop_assert!(local.contains(name));
        }
        for name in plan.delete.iter().chain(plan.prune.keys()) {
            prop_assert!(remote.contains(name));
        }
    }

    #[test]
    fn prop_applying_the_plan_reaches_sync(local in arb_collection(), remote in arb_collection()) {
        // Simulate the executor's semantics on plain maps: every write
        // replaces the whole document with the local one, every delete
        // removes the document.
        let plan = DiffPlan::compute(&local, &remote);

        let mut simulated: BTreeMap<String, BTreeMap<String, String>> = remote
            .iter()
            .map(|(name, doc)| (name.clone(), doc.clone()))
            .collect();

        for name in plan.create.iter().chain(plan.upsert.keys()).chain(plan.prune.keys()) {
            let doc = local.get(name).cloned().unwrap_or_default();
            simulated.insert(name.clone(), doc);
        }
        for name in &plan.delete {
            simulated.remove(name);
        }

        let result: SecretCollection = simulated.into_iter().collect();
        prop_assert!(local.in_sync_with(&result));
    }
}
