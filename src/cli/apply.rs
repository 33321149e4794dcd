//! Apply command - reconcile the remote store to match the state file.

use std::path::Path;

use tracing::info;

use crate::cli::output;
use crate::core::diff::DiffPlan;
use crate::core::reconcile;
use crate::core::state::State;
use crate::core::vault::{Transit, VaultClient};
use crate::error::Result;

/// Build both views, compute the plan, and execute it.
///
/// There is no rollback: if a write fails partway through, prior writes
/// stay applied and re-running converges.
pub fn execute(state_path: &Path) -> Result<()> {
    let state = State::load(state_path)?;
    let key = state.transit_key()?.to_string();
    let client = VaultClient::from_env()?;
    let transit = Transit::new(&client, &key);

    let (local, remote) = reconcile::build_views(&state, &transit, &client)?;

    if local.in_sync_with(&remote) {
        output::success("nothing to apply, local state and remote vault are in sync");
        return Ok(());
    }

    let plan = DiffPlan::compute(&local, &remote);
    let summary = reconcile::apply_plan(&plan, &local, &client, state.secret_path())?;

    info!(
        writes = summary.writes,
        deletes = summary.deletes,
        "apply finished"
    );
    output::success(&format!(
        "applied: {} write(s), {} delete(s)",
        summary.writes, summary.deletes
    ));
    Ok(())
}
