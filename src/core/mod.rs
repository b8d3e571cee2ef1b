//! Core library components.
//!
//! Everything the CLI layer builds on: encrypted record storage, the
//! source registry, env-document reconciliation, and the orchestrating
//! credential service.

pub mod cipher;
pub mod config;
pub mod constants;
pub mod envfile;
pub mod gitignore;
pub mod identity;
pub mod reconcile;
pub mod record;
pub mod service;
pub mod source;
pub mod store;
