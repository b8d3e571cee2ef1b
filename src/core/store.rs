//! Encrypted record storage for one vault directory.
//!
//! `VaultStore` owns the read-modify-write cycle over `credentials.json`:
//! every mutation loads the full record list, changes it in memory, and
//! rewrites the file through a temp-file + rename so a crash mid-write
//! never leaves a truncated vault. Key material is loaded lazily — `list`
//! and `search` work without the private key.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, warn};

use crate::core::cipher;
use crate::core::constants::RECORDS_FILE;
use crate::core::identity::{self, KeyMaterial};
use crate::core::record::{
    is_conventional_name, Credential, CredentialRecord, MetadataPatch, RecordMetadata, VaultFile,
};
use crate::error::{DenvError, Result};

/// Result of a bulk decryption pass.
///
/// Decryption failures do not abort the batch; failed names are reported
/// alongside the reason so callers can surface them. Treat `values` as
/// maximally sensitive — never log it.
#[derive(Debug)]
pub struct BulkExport {
    pub values: Vec<(String, String)>,
    pub failures: Vec<(String, String)>,
}

/// Handle to one vault directory.
///
/// Stateless between calls: each operation reads the record file fresh,
/// so the handle is cheap to hold and never sees stale state.
pub struct VaultStore {
    dir: PathBuf,
}

impl VaultStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The vault directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// True once key material exists in the vault directory.
    pub fn is_initialized(&self) -> bool {
        identity::has_identity(&self.dir)
    }

    /// Generate key material and write an empty record list.
    ///
    /// Fails with `AlreadyInitialized` if an identity file already exists;
    /// the orchestrator decides whether to overwrite.
    pub fn initialize(&self) -> Result<KeyMaterial> {
        let material = KeyMaterial::generate(&self.dir)?;
        self.save_records(&VaultFile::empty())?;
        debug!(dir = %self.dir.display(), "vault initialized");
        Ok(material)
    }

    /// Decrypt a single record by exact name.
    ///
    /// Returns `Ok(None)` if the name is absent. Decryption failure is a
    /// distinct error, never swallowed.
    pub fn get(&self, name: &str) -> Result<Option<Credential>> {
        let file = self.load_records()?;
        let Some(record) = file.records.iter().find(|r| r.name == name) else {
            return Ok(None);
        };

        let key = identity::load_identity(&self.dir)?;
        let value = cipher::decrypt(&record.encrypted_value, &key)?;

        Ok(Some(Credential {
            name: record.name.clone(),
            value,
            metadata: record.metadata.clone(),
        }))
    }

    /// Metadata for every record, sorted by name. No decryption, safe to
    /// call without the private key.
    pub fn list(&self) -> Result<Vec<(String, RecordMetadata)>> {
        let file = self.load_records()?;
        let mut entries: Vec<(String, RecordMetadata)> = file
            .records
            .into_iter()
            .map(|r| (r.name, r.metadata))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }

    /// Case-insensitive substring match over names only.
    pub fn search(&self, pattern: &str) -> Result<Vec<(String, RecordMetadata)>> {
        let needle = pattern.to_lowercase();
        let mut entries = self.list()?;
        entries.retain(|(name, _)| name.to_lowercase().contains(&needle));
        Ok(entries)
    }

    /// Encrypt and store a value under `name`.
    ///
    /// Overwriting an existing name preserves `created_at` and any
    /// metadata fields the patch leaves unset. Returns `true` when the
    /// record is new.
    pub fn set(&self, name: &str, value: &str, patch: MetadataPatch) -> Result<bool> {
        if !is_conventional_name(name) {
            warn!(name, "credential name is not UPPER_SNAKE_CASE");
        }

        let recipient = identity::load_recipient(&self.dir)?;
        let encrypted_value = cipher::encrypt(value, &recipient)?;

        let mut file = self.load_records()?;
        let now = Utc::now();

        let created = match file.records.iter_mut().find(|r| r.name == name) {
            Some(existing) => {
                existing.encrypted_value = encrypted_value;
                existing.metadata.updated_at = now;
                if let Some(description) = patch.description {
                    existing.metadata.description = Some(description);
                }
                if let Some(tags) = patch.tags {
                    existing.metadata.tags = tags;
                }
                false
            }
            None => {
                file.records.push(CredentialRecord {
                    name: name.to_string(),
                    encrypted_value,
                    metadata: RecordMetadata {
                        created_at: now,
                        updated_at: now,
                        description: patch.description,
                        tags: patch.tags.unwrap_or_default(),
                    },
                });
                true
            }
        };

        self.save_records(&file)?;
        debug!(name, created, "record written");
        Ok(created)
    }

    /// Remove a record. Returns whether anything was removed; deleting an
    /// absent name is not an error.
    pub fn delete(&self, name: &str) -> Result<bool> {
        let mut file = self.load_records()?;
        let before = file.records.len();
        file.records.retain(|r| r.name != name);

        if file.records.len() == before {
            return Ok(false);
        }

        self.save_records(&file)?;
        debug!(name, "record removed");
        Ok(true)
    }

    /// Decrypt every record. Per-name failures are collected, not fatal.
    pub fn get_all(&self) -> Result<BulkExport> {
        let file = self.load_records()?;
        let key = identity::load_identity(&self.dir)?;

        let mut export = BulkExport {
            values: Vec::with_capacity(file.records.len()),
            failures: Vec::new(),
        };

        for record in &file.records {
            match cipher::decrypt(&record.encrypted_value, &key) {
                Ok(value) => export.values.push((record.name.clone(), value)),
                Err(e) => export.failures.push((record.name.clone(), e.to_string())),
            }
        }

        Ok(export)
    }

    fn records_path(&self) -> PathBuf {
        self.dir.join(RECORDS_FILE)
    }

    /// Load the record file.
    ///
    /// A missing file is an empty vault. A file that exists but fails to
    /// parse is `CorruptVault` — never silently an empty list.
    fn load_records(&self) -> Result<VaultFile> {
        let path = self.records_path();
        if !path.exists() {
            return Ok(VaultFile::empty());
        }

        let contents = fs::read_to_string(&path)?;
        serde_json::from_str(&contents).map_err(|e| DenvError::CorruptVault {
            path,
            reason: e.to_string(),
        })
    }

    /// Rewrite the record file atomically (temp file + rename in the same
    /// directory), so interruption leaves the prior state intact.
    fn save_records(&self, file: &VaultFile) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let path = self.records_path();
        let tmp = self.dir.join(format!("{}.tmp", RECORDS_FILE));

        let contents = serde_json::to_string_pretty(file)?;
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &path)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn new_store() -> (TempDir, VaultStore) {
        let tmp = TempDir::new().unwrap();
        let store = VaultStore::new(tmp.path().join("vault"));
        store.initialize().unwrap();
        (tmp, store)
    }

    #[test]
    fn test_set_get_roundtrip() {
        let (_tmp, store) = new_store();

        store
            .set("OPENAI_API_KEY", "sk-test", MetadataPatch::default())
            .unwrap();

        let cred = store.get("OPENAI_API_KEY").unwrap().unwrap();
        assert_eq!(cred.value, "sk-test");
        assert_eq!(cred.name, "OPENAI_API_KEY");
    }

    #[test]
    fn test_get_missing_is_none() {
        let (_tmp, store) = new_store();
        assert!(store.get("NOPE").unwrap().is_none());
    }

    #[test]
    fn test_overwrite_preserves_created_at() {
        let (_tmp, store) = new_store();

        assert!(store.set("KEY", "v1", MetadataPatch::default()).unwrap());
        let first = store.get("KEY").unwrap().unwrap();

        assert!(!store.set("KEY", "v2", MetadataPatch::default()).unwrap());
        let second = store.get("KEY").unwrap().unwrap();

        assert_eq!(second.value, "v2");
        assert_eq!(second.metadata.created_at, first.metadata.created_at);
        assert!(second.metadata.updated_at >= first.metadata.updated_at);

        // Still exactly one record under that name.
        let entries = store.list().unwrap();
        assert_eq!(entries.iter().filter(|(n, _)| n == "KEY").count(), 1);
    }

    #[test]
    fn test_overwrite_keeps_unpatched_metadata() {
        let (_tmp, store) = new_store();

        store
            .set(
                "KEY",
                "v1",
                MetadataPatch {
                    description: Some("db password".to_string()),
                    tags: Some(vec!["prod".to_string()]),
                },
            )
            .unwrap();
        store.set("KEY", "v2", MetadataPatch::default()).unwrap();

        let cred = store.get("KEY").unwrap().unwrap();
        assert_eq!(cred.metadata.description.as_deref(), Some("db password"));
        assert_eq!(cred.metadata.tags, vec!["prod"]);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (_tmp, store) = new_store();

        store.set("KEY", "v", MetadataPatch::default()).unwrap();
        assert!(store.delete("KEY").unwrap());
        assert!(!store.delete("KEY").unwrap());
        assert!(!store.delete("NEVER_EXISTED").unwrap());
    }

    #[test]
    fn test_list_requires_no_identity() {
        let (_tmp, store) = new_store();
        store.set("KEY", "v", MetadataPatch::default()).unwrap();

        // Simulate a locked vault: identity file gone, listing still works.
        fs::remove_file(store.dir().join(crate::core::constants::IDENTITY_FILE)).unwrap();

        let entries = store.list().unwrap();
        assert_eq!(entries.len(), 1);
        assert!(store.get("KEY").is_err());
    }

    #[test]
    fn test_search_case_insensitive() {
        let (_tmp, store) = new_store();
        store.set("DATABASE_URL", "v", MetadataPatch::default()).unwrap();
        store.set("API_KEY", "v", MetadataPatch::default()).unwrap();

        let hits = store.search("data").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, "DATABASE_URL");
    }

    #[test]
    fn test_corrupt_vault_detected() {
        let (_tmp, store) = new_store();
        store.set("KEY", "v", MetadataPatch::default()).unwrap();

        fs::write(store.dir().join(RECORDS_FILE), "{ not json").unwrap();

        assert!(matches!(store.list(), Err(DenvError::CorruptVault { .. })));
        assert!(matches!(
            store.get("KEY"),
            Err(DenvError::CorruptVault { .. })
        ));
    }

    #[test]
    fn test_missing_records_file_is_empty_vault() {
        let tmp = TempDir::new().unwrap();
        let store = VaultStore::new(tmp.path().join("vault"));
        // No initialize: list on a nonexistent file reports empty.
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_get_all_reports_failures() {
        let (_tmp, store) = new_store();
        store.set("GOOD", "value", MetadataPatch::default()).unwrap();
        store.set("BAD", "value", MetadataPatch::default()).unwrap();

        // Corrupt one ciphertext in place.
        let path = store.records_path();
        let mut file: VaultFile =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        for r in &mut file.records {
            if r.name == "BAD" {
                r.encrypted_value = "garbage".to_string();
            }
        }
        fs::write(&path, serde_json::to_string(&file).unwrap()).unwrap();

        let export = store.get_all().unwrap();
        assert_eq!(export.values.len(), 1);
        assert_eq!(export.values[0].0, "GOOD");
        assert_eq!(export.failures.len(), 1);
        assert_eq!(export.failures[0].0, "BAD");
    }
}
