//! Plan command - report local/remote divergence without mutating anything.

use std::path::Path;

use tracing::info;

use crate::cli::output;
use crate::core::collection::SecretCollection;
use crate::core::diff::DiffPlan;
use crate::core::reconcile;
use crate::core::state::State;
use crate::core::vault::{Transit, VaultClient};
use crate::error::Result;

/// Build both views and render the plan.
pub fn execute(state_path: &Path) -> Result<()> {
    let state = State::load(state_path)?;
    let key = state.transit_key()?.to_string();
    let client = VaultClient::from_env()?;
    let transit = Transit::new(&client, &key);

    let (local, remote) = reconcile::build_views(&state, &transit, &client)?;

    if local.in_sync_with(&remote) {
        output::success("nothing to do, local state and remote vault are in sync");
        return Ok(());
    }

    let plan = DiffPlan::compute(&local, &remote);
    info!(
        create = plan.create.len(),
        delete = plan.delete.len(),
        "plan computed"
    );
    render(&plan, &remote);
    Ok(())
}

/// Render a plan: add/update lines in green, removals in red, one line per
/// (secret, key) pair, sorted by name.
fn render(plan: &DiffPlan, remote: &SecretCollection) {
    if !plan.create.is_empty() || plan.upsert_key_count() > 0 {
        output::added(&format!(
            "add/update: {} secret(s), {} key(s)",
            plan.create.len(),
            plan.upsert_key_count()
        ));
        for (name, keys) in &plan.upsert {
            for key in keys {
                output::added(&format!("  {}:{}", name, key));
            }
        }
    }

    let removed_keys = plan.removed_key_count(remote);
    if !plan.delete.is_empty() || removed_keys > 0 {
        output::removed(&format!(
            "remove: {} secret(s), {} key(s)",
            plan.delete.len(),
            removed_keys
        ));
        for name in &plan.delete {
            if let Some(doc) = remote.get(name) {
                for key in doc.keys() {
                    output::removed(&format!("  {}:{}", name, key));
                }
            }
        }
        for (name, keys) in &plan.prune {
            for key in keys {
                output::removed(&format!("  {}:{}", name, key));
            }
        }
    }
}
