//! Caisson - keep Vault secrets in version control, encrypted.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── init          # Create the state file
//! │   ├── secret        # Secret CRUD against the state file
//! │   ├── transit       # Transit key management
//! │   ├── path          # Secret path prefix get/set
//! │   ├── plan          # Report local/remote divergence
//! │   ├── apply         # Reconcile the remote store
//! │   ├── status        # State overview
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── state         # .caisson.toml management
//!     ├── types         # Domain type aliases
//!     ├── collection    # SecretCollection and structural equality
//!     ├── diff          # DiffPlan computation
//!     ├── reconcile     # View construction and the apply executor
//!     └── vault/        # Vault HTTP client
//!         ├── mod       # Client, SecretStore impl, typed responses
//!         └── transit   # Transit engine Cipher impl
//! ```
//!
//! # How it works
//!
//! Secret values live encrypted in `.caisson.toml`, protected by a Vault
//! transit key, so the file is safe to commit. A reconciliation run decrypts
//! the state into a local view, reads the remote KV subtree into a remote
//! view, computes a [`core::diff::DiffPlan`], and either reports it (`plan`)
//! or executes it (`apply`). The remote store only supports whole-document
//! writes, so key-level removals are realized by rewriting the full local
//! document.

pub mod cli;
pub mod core;
pub mod error;
