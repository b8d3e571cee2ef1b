//! The built-in local vault backend.

use std::path::Path;

use crate::core::constants::{LOCAL_SOURCE_ID, LOCAL_SOURCE_PRIORITY};
use crate::core::record::{Credential, CredentialSummary, MetadataPatch};
use crate::core::store::VaultStore;
use crate::error::Result;

use super::CredentialSource;

/// Credential source backed by one vault directory on disk.
pub struct LocalVaultSource {
    store: VaultStore,
    id: String,
    priority: u32,
}

impl LocalVaultSource {
    /// The default local source over `dir`.
    pub fn new(dir: &Path) -> Self {
        Self {
            store: VaultStore::new(dir),
            id: LOCAL_SOURCE_ID.to_string(),
            priority: LOCAL_SOURCE_PRIORITY,
        }
    }

    /// A local source with a custom id and priority, for setups with
    /// more than one vault registered at once.
    pub fn with_id(dir: &Path, id: impl Into<String>, priority: u32) -> Self {
        Self {
            store: VaultStore::new(dir),
            id: id.into(),
            priority,
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &VaultStore {
        &self.store
    }
}

impl CredentialSource for LocalVaultSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    fn is_available(&self) -> bool {
        self.store.is_initialized()
    }

    fn writable(&self) -> bool {
        true
    }

    fn get(&self, name: &str) -> Result<Option<Credential>> {
        self.store.get(name)
    }

    fn list(&self) -> Result<Vec<CredentialSummary>> {
        let entries = self.store.list()?;
        Ok(entries
            .into_iter()
            .map(|(name, metadata)| CredentialSummary {
                name,
                source: self.id.clone(),
                created_at: metadata.created_at,
                updated_at: metadata.updated_at,
                description: metadata.description,
                tags: metadata.tags,
            })
            .collect())
    }

    fn set(&self, name: &str, value: &str, patch: MetadataPatch) -> Result<bool> {
        self.store.set(name, value, patch)
    }

    fn delete(&self, name: &str) -> Result<bool> {
        self.store.delete(name)
    }
}
