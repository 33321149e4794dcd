//! Command-line interface.

pub mod apply;
pub mod completions;
pub mod init;
pub mod output;
pub mod path;
pub mod plan;
pub mod secret;
pub mod status;
pub mod transit;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::state::STATE_FILE;

/// Caisson - keep Vault secrets in version control, encrypted.
#[derive(Parser)]
#[command(
    name = "caisson",
    about = "Keep Vault secrets in version control, encrypted",
    version,
    after_help = "Plan. Apply. Stay in sync."
)]
pub struct Cli {
    /// Path to the state file
    #[arg(long, global = true, env = "CAISSON_STATE", default_value = STATE_FILE)]
    pub state: PathBuf,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Create the state file in the current directory
    Init,

    /// Show a state overview
    Status,

    /// Manage secrets in the state file
    Secret {
        #[command(subcommand)]
        action: SecretAction,
    },

    /// Manage the transit key protecting local values
    Transit {
        #[command(subcommand)]
        action: TransitAction,
    },

    /// Print or set the remote secret path prefix
    Path {
        /// New prefix (prints the current one when omitted)
        prefix: Option<String>,
    },

    /// Show what apply would change, without touching Vault secrets
    Plan,

    /// Reconcile the remote store to match the state file
    Apply,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Secret subcommands.
#[derive(Subcommand)]
pub enum SecretAction {
    /// Encrypt a value and store it under a secret
    Set {
        /// Secret name (one remote document)
        name: String,
        /// Key within the secret
        key: String,
        /// Plaintext value
        value: String,
    },

    /// Decrypt and print a stored value
    Get {
        /// Secret name
        name: String,
        /// Key within the secret
        key: String,
    },

    /// Remove a whole secret, or one key of it
    Rm {
        /// Secret name
        name: String,
        /// Key within the secret (removes the whole secret when omitted)
        key: Option<String>,
    },

    /// List secret names (and keys) from the state file
    List {
        /// Only names starting with this prefix
        prefix: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Transit subcommands.
#[derive(Subcommand)]
pub enum TransitAction {
    /// Record an existing transit key in the state file
    Use {
        /// Transit key name
        key: String,
    },

    /// Create a transit key in Vault and record it
    Create {
        /// Transit key name
        key: String,
    },

    /// Show metadata for the configured transit key
    Info,

    /// List transit keys available in Vault
    List,
}

/// Execute a command.
pub fn execute(cli: Cli) -> crate::error::Result<()> {
    use Command::*;

    let state_path = cli.state;
    match cli.command {
        Init => init::execute(&state_path),
        Status => status::execute(&state_path),
        Secret { action } => match action {
            SecretAction::Set { name, key, value } => {
                secret::set(&state_path, &name, &key, &value)
            }
            SecretAction::Get { name, key } => secret::get(&state_path, &name, &key),
            SecretAction::Rm { name, key } => secret::rm(&state_path, &name, key.as_deref()),
            SecretAction::List { prefix, json } => {
                secret::list(&state_path, prefix.as_deref().unwrap_or(""), json)
            }
        },
        Transit { action } => match action {
            TransitAction::Use { key } => transit::use_key(&state_path, &key),
            TransitAction::Create { key } => transit::create(&state_path, &key),
            TransitAction::Info => transit::info(&state_path),
            TransitAction::List => transit::list(),
        },
        Path { prefix } => path::execute(&state_path, prefix.as_deref()),
        Plan => plan::execute(&state_path),
        Apply => apply::execute(&state_path),
        Completions { shell } => completions::execute(shell),
    }
}
