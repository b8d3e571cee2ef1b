//! Credential service orchestrator.
//!
//! The single entry point command handlers talk to. Resolves which vault
//! directory is active, lazily registers the local source on first use,
//! and composes the store, registry and reconciler behind one facade.
//! Held explicitly by callers — there is no process-wide instance.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::config::{self, Settings};
use crate::core::constants::{IDENTITY_FILE, RECIPIENT_FILE, VAULT_DIR};
use crate::core::gitignore;
use crate::core::identity;
use crate::core::reconcile::{self, GrantOutcome, RevokeOutcome};
use crate::core::record::{Credential, CredentialSummary, MetadataPatch};
use crate::core::source::{LocalVaultSource, SourceRegistry};
use crate::core::store::{BulkExport, VaultStore};
use crate::error::{DenvError, Result};

/// Result of vault initialization.
#[derive(Debug)]
pub struct InitOutcome {
    pub vault_dir: PathBuf,
    /// The vault's public key, freely shareable.
    pub recipient: String,
    pub gitignore_added: Vec<&'static str>,
}

/// Result of an `add`.
#[derive(Debug)]
pub struct AddOutcome {
    pub name: String,
    /// False when an existing record was overwritten.
    pub created: bool,
    pub vault_dir: PathBuf,
}

/// Where the active vault came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultLocation {
    Local,
    Global,
    Custom,
}

/// Orchestrates all credential operations for one invocation.
pub struct CredentialService {
    project_dir: PathBuf,
    vault_dir: PathBuf,
    location: VaultLocation,
    settings: Settings,
    registry: SourceRegistry,
    sources_registered: bool,
}

impl CredentialService {
    /// Build a service for `project_dir`, resolving the active vault.
    ///
    /// Resolution order: explicit `vault_override` > local vault with an
    /// identity present > configured custom path > global vault.
    pub fn new(project_dir: &Path, vault_override: Option<PathBuf>) -> Result<Self> {
        let settings = Settings::load()?;
        let (vault_dir, location) = resolve_vault_dir(project_dir, vault_override, &settings)?;

        debug!(
            vault = %vault_dir.display(),
            location = ?location,
            "vault resolved"
        );

        Ok(Self {
            project_dir: project_dir.to_path_buf(),
            vault_dir,
            location,
            settings,
            registry: SourceRegistry::new(),
            sources_registered: false,
        })
    }

    /// The resolved vault directory.
    pub fn vault_dir(&self) -> &Path {
        &self.vault_dir
    }

    pub fn location(&self) -> VaultLocation {
        self.location
    }

    /// The registry, for registering additional sources before use.
    pub fn registry_mut(&mut self) -> &mut SourceRegistry {
        &mut self.registry
    }

    /// True if the active vault exists on disk.
    pub fn has_vault(&self) -> bool {
        identity::has_identity(&self.vault_dir)
    }

    /// Construct backend objects if not yet done. Distinct from vault
    /// existence on disk: this only wires up in-memory sources, so it
    /// never fails for lack of a prior `init`.
    fn ensure_sources(&mut self) {
        if !self.sources_registered {
            self.registry
                .register(Box::new(LocalVaultSource::new(&self.vault_dir)));
            self.sources_registered = true;
        }
    }

    /// Reads and writes require a vault on disk; never create one as a
    /// side effect.
    fn require_vault(&mut self) -> Result<()> {
        self.ensure_sources();
        if !self.has_vault() {
            return Err(DenvError::NotInitialized);
        }
        Ok(())
    }

    /// Create the vault: key material plus an empty record list, and
    /// patch `.gitignore`.
    ///
    /// With `force`, existing key material is discarded first — every
    /// record encrypted to the old key becomes unrecoverable.
    pub fn initialize_vault(&mut self, force: bool) -> Result<InitOutcome> {
        let store = VaultStore::new(&self.vault_dir);

        if store.is_initialized() {
            if !force {
                return Err(DenvError::AlreadyInitialized(self.vault_dir.clone()));
            }
            fs::remove_file(self.vault_dir.join(IDENTITY_FILE))?;
            let recipient_path = self.vault_dir.join(RECIPIENT_FILE);
            if recipient_path.exists() {
                fs::remove_file(recipient_path)?;
            }
        }

        let material = store.initialize()?;
        let gitignore_added = gitignore::ensure_gitignore(&self.project_dir)?;
        self.ensure_sources();

        Ok(InitOutcome {
            vault_dir: self.vault_dir.clone(),
            recipient: material.recipient().to_string(),
            gitignore_added,
        })
    }

    /// Encrypt and store a credential.
    pub fn add(&mut self, name: &str, value: &str, patch: MetadataPatch) -> Result<AddOutcome> {
        self.require_vault()?;

        let created = self.registry.set(name, value, patch, None)?;

        Ok(AddOutcome {
            name: name.to_string(),
            created,
            vault_dir: self.vault_dir.clone(),
        })
    }

    /// Decrypt a credential. Absent names are `Ok(None)`, not an error.
    pub fn get(&mut self, name: &str) -> Result<Option<Credential>> {
        self.require_vault()?;
        self.registry.get(name)
    }

    /// Metadata for every credential across sources.
    pub fn list(&mut self) -> Result<Vec<CredentialSummary>> {
        self.require_vault()?;
        self.registry.list()
    }

    /// Case-insensitive name search across sources.
    pub fn search(&mut self, pattern: &str) -> Result<Vec<CredentialSummary>> {
        let needle = pattern.to_lowercase();
        let mut entries = self.list()?;
        entries.retain(|s| s.name.to_lowercase().contains(&needle));
        Ok(entries)
    }

    /// Idempotent deletion across all sources. Returns whether anything
    /// was removed.
    pub fn delete(&mut self, name: &str) -> Result<bool> {
        self.require_vault()?;
        self.registry.delete(name, None)
    }

    /// Deletion that requires the credential to exist.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        if !self.delete(name)? {
            return Err(DenvError::MissingCredential(name.to_string()));
        }
        Ok(())
    }

    /// Replace the value of an existing credential. The record keeps its
    /// `created_at`, description and tags.
    pub fn rotate(&mut self, name: &str, new_value: &str) -> Result<()> {
        self.require_vault()?;

        if !self.registry.list()?.iter().any(|s| s.name == name) {
            return Err(DenvError::MissingCredential(name.to_string()));
        }
        self.registry
            .set(name, new_value, MetadataPatch::default(), None)?;
        Ok(())
    }

    /// Decrypt everything for bulk export. Per-name decryption failures
    /// are collected rather than aborting the batch. The result is
    /// maximally sensitive; never log it.
    pub fn get_all(&mut self) -> Result<BulkExport> {
        self.require_vault()?;

        let mut export = BulkExport {
            values: Vec::new(),
            failures: Vec::new(),
        };

        for summary in self.registry.list()? {
            match self.registry.get(&summary.name) {
                Ok(Some(credential)) => export.values.push((summary.name, credential.value)),
                Ok(None) => {}
                Err(e @ DenvError::DecryptionFailed(_)) => {
                    export.failures.push((summary.name, e.to_string()));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(export)
    }

    /// Project the named credentials (all of them when `names` is empty)
    /// into the env document.
    pub fn grant(
        &mut self,
        names: &[String],
        backup: Option<bool>,
        env_file: Option<&str>,
    ) -> Result<GrantOutcome> {
        self.require_vault()?;

        let names = if names.is_empty() {
            self.registry.list()?.into_iter().map(|s| s.name).collect()
        } else {
            names.to_vec()
        };

        let path = self.env_path(env_file);
        let backup = backup.unwrap_or_else(|| self.settings.backup_on_grant());
        reconcile::grant(&self.registry, &names, &path, backup)
    }

    /// Remove the named credentials (all vault-held names when `names`
    /// is empty) from the env document. The vault is never touched.
    pub fn revoke(&mut self, names: &[String], env_file: Option<&str>) -> Result<RevokeOutcome> {
        self.require_vault()?;

        let names = if names.is_empty() {
            self.registry.list()?.into_iter().map(|s| s.name).collect()
        } else {
            names.to_vec()
        };

        reconcile::revoke(&names, &self.env_path(env_file))
    }

    fn env_path(&self, env_file: Option<&str>) -> PathBuf {
        self.project_dir
            .join(env_file.unwrap_or_else(|| self.settings.env_file()))
    }
}

/// Apply the vault resolution order.
fn resolve_vault_dir(
    project_dir: &Path,
    vault_override: Option<PathBuf>,
    settings: &Settings,
) -> Result<(PathBuf, VaultLocation)> {
    if let Some(custom) = vault_override {
        return Ok((custom, VaultLocation::Custom));
    }

    let local = project_dir.join(VAULT_DIR);
    if identity::has_identity(&local) {
        return Ok((local, VaultLocation::Local));
    }

    if let Some(custom) = &settings.vault_path {
        return Ok((custom.clone(), VaultLocation::Custom));
    }

    Ok((config::global_vault_dir()?, VaultLocation::Global))
}
