//! Init command - create the state file.

use std::path::Path;

use tracing::info;

use crate::cli::output;
use crate::core::state::State;
use crate::error::Result;

/// Initialize a fresh state file.
pub fn execute(state_path: &Path) -> Result<()> {
    let state = State::init(state_path)?;

    info!(path = %state.path().display(), "initialized");
    output::success(&format!("created {}", state.path().display()));
    output::hint("run: caisson transit use <key>");
    Ok(())
}
