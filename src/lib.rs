//! denv - a local encrypted secrets vault with grant/revoke into `.env`.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── init          # Create a vault (keys + empty record list)
//! │   ├── add/get/...   # Credential CRUD
//! │   ├── grant/revoke  # Project credentials into/out of .env
//! │   └── export        # Bulk export in env format
//! └── core/             # Core library components
//!     ├── cipher/       # Encryption capability (trait + age backend)
//!     ├── identity      # Vault key material (identity/recipient files)
//!     ├── store         # Encrypted record file CRUD
//!     ├── source/       # Source trait, local backend, priority registry
//!     ├── envfile       # Env document parsing and quoting
//!     ├── reconcile     # Grant/revoke reconciliation
//!     ├── config        # ~/.denv/config.toml settings
//!     └── service       # Orchestrating facade used by all commands
//! ```
//!
//! Credentials are encrypted at rest with an age x25519 keypair per
//! vault. Granting writes their plaintext into a project `.env` file;
//! revoking removes them again without touching the vault.

pub mod cli;
pub mod core;
pub mod error;

pub use crate::core::service::CredentialService;
pub use crate::error::{DenvError, Result};
