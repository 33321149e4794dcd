//! Path command - print or set the remote secret path prefix.

use std::path::Path;

use crate::cli::output;
use crate::core::state::State;
use crate::error::Result;

/// Print the current prefix, or set a new one.
pub fn execute(state_path: &Path, prefix: Option<&str>) -> Result<()> {
    let mut state = State::load(state_path)?;

    match prefix {
        Some(prefix) => {
            state.set_secret_path(prefix)?;
            output::success(&format!("secret path set to '{}'", state.secret_path()));
        }
        None => println!("{}", state.secret_path()),
    }
    Ok(())
}
