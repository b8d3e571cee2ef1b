//! Priority-ordered source registry.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::core::record::{Credential, CredentialSummary, MetadataPatch};
use crate::error::{DenvError, Result};

use super::CredentialSource;

/// Ordered collection of registered credential sources.
///
/// Registration is in-memory only; nothing here persists. Availability
/// is probed on every operation because it can change between calls
/// (a vault initialized moments ago becomes available immediately).
#[derive(Default)]
pub struct SourceRegistry {
    sources: Vec<Box<dyn CredentialSource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, source: Box<dyn CredentialSource>) {
        debug!(id = source.id(), priority = source.priority(), "source registered");
        self.sources.push(source);
    }

    /// Remove a source by id. Returns whether it was registered.
    pub fn unregister(&mut self, id: &str) -> bool {
        let before = self.sources.len();
        self.sources.retain(|s| s.id() != id);
        self.sources.len() != before
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.sources.iter().any(|s| s.id() == id)
    }

    /// Available sources, sorted ascending by priority. Recomputed on
    /// every call.
    fn available(&self) -> Vec<&dyn CredentialSource> {
        let mut available: Vec<&dyn CredentialSource> = self
            .sources
            .iter()
            .map(|s| s.as_ref())
            .filter(|s| s.is_available())
            .collect();
        available.sort_by_key(|s| s.priority());
        available
    }

    /// Ids of currently available sources, in priority order.
    pub fn available_ids(&self) -> Vec<String> {
        self.available().iter().map(|s| s.id().to_string()).collect()
    }

    /// First-match-wins read across available sources. A name present in
    /// two sources resolves entirely to whichever sorts first.
    pub fn get(&self, name: &str) -> Result<Option<Credential>> {
        for source in self.available() {
            if let Some(credential) = source.get(name)? {
                trace!(name, source = source.id(), "resolved");
                return Ok(Some(credential));
            }
        }
        Ok(None)
    }

    /// Union of metadata across available sources, de-duplicated by name
    /// with first-seen-wins; output order follows priority order.
    pub fn list(&self) -> Result<Vec<CredentialSummary>> {
        let mut seen = HashSet::new();
        let mut merged = Vec::new();

        for source in self.available() {
            for summary in source.list()? {
                if seen.insert(summary.name.clone()) {
                    merged.push(summary);
                }
            }
        }

        Ok(merged)
    }

    /// Route a write.
    ///
    /// With a `source_id` the named source must exist and be writable;
    /// without one the write goes to the first available writable source.
    /// Returns whether the target source created a new record. The flag
    /// reflects the write target alone, so a read-only source shadowing
    /// the same name does not turn a creation into an update.
    pub fn set(
        &self,
        name: &str,
        value: &str,
        patch: MetadataPatch,
        source_id: Option<&str>,
    ) -> Result<bool> {
        match source_id {
            Some(id) => {
                let source = self
                    .sources
                    .iter()
                    .find(|s| s.id() == id)
                    .ok_or_else(|| DenvError::UnknownSource(id.to_string()))?;
                if !source.writable() {
                    return Err(DenvError::ReadOnlySource(id.to_string()));
                }
                source.set(name, value, patch)
            }
            None => {
                let available = self.available();
                let source = available
                    .iter()
                    .find(|s| s.writable())
                    .ok_or(DenvError::NoWritableSource)?;
                source.set(name, value, patch)
            }
        }
    }

    /// Route a deletion.
    ///
    /// Without a `source_id`, deletion is attempted on every available
    /// writable source — best-effort everywhere, so a removal never
    /// leaves stale copies behind in lower-priority sources. Returns
    /// whether at least one source removed the name.
    pub fn delete(&self, name: &str, source_id: Option<&str>) -> Result<bool> {
        match source_id {
            Some(id) => {
                let source = self
                    .sources
                    .iter()
                    .find(|s| s.id() == id)
                    .ok_or_else(|| DenvError::UnknownSource(id.to_string()))?;
                if !source.writable() {
                    return Err(DenvError::ReadOnlySource(id.to_string()));
                }
                source.delete(name)
            }
            None => {
                let mut removed = false;
                for source in self.available() {
                    if source.writable() && source.delete(name)? {
                        removed = true;
                    }
                }
                Ok(removed)
            }
        }
    }
}
