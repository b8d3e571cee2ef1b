//! Credential record types.
//!
//! These are the serde shapes persisted inside the vault record file and
//! the plaintext/metadata views handed back to callers. Field names are
//! camelCase on disk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::constants::VAULT_VERSION;

/// On-disk shape of the vault record file (`credentials.json`).
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultFile {
    pub version: u32,
    pub records: Vec<CredentialRecord>,
}

impl VaultFile {
    /// An empty record list at the current version.
    pub fn empty() -> Self {
        Self {
            version: VAULT_VERSION,
            records: Vec::new(),
        }
    }
}

/// One named, encrypted credential as persisted in the vault file.
///
/// `name` is unique within a vault; writing an existing name replaces
/// `encrypted_value` and refreshes `updated_at` while `created_at` stays.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    pub name: String,
    /// Opaque ciphertext as produced by the encryption backend.
    pub encrypted_value: String,
    pub metadata: RecordMetadata,
}

/// User-visible metadata attached to a record. Never secret material.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMetadata {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl RecordMetadata {
    /// Fresh metadata for a record created now.
    pub fn new_now() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            description: None,
            tags: Vec::new(),
        }
    }
}

/// Optional metadata fields supplied alongside a `set`.
///
/// `None` fields leave the existing value untouched on overwrite.
#[derive(Debug, Clone, Default)]
pub struct MetadataPatch {
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// A decrypted credential as returned by `get`.
#[derive(Debug, Clone)]
pub struct Credential {
    pub name: String,
    pub value: String,
    pub metadata: RecordMetadata,
}

/// Metadata-only listing entry. Safe to produce without the private key.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSummary {
    pub name: String,
    /// Id of the source that holds this record.
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Whether a name follows the conventional `UPPER_SNAKE_CASE` env-var shape.
///
/// Non-conforming names are accepted everywhere (with a warning at the
/// store layer), never rejected.
pub fn is_conventional_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conventional_names() {
        assert!(is_conventional_name("DATABASE_URL"));
        assert!(is_conventional_name("API_KEY_2"));
        assert!(!is_conventional_name("database_url"));
        assert!(!is_conventional_name("2FA_TOKEN"));
        assert!(!is_conventional_name("my-key"));
        assert!(!is_conventional_name(""));
    }

    #[test]
    fn test_vault_file_roundtrip() {
        let mut file = VaultFile::empty();
        file.records.push(CredentialRecord {
            name: "API_KEY".to_string(),
            encrypted_value: "-----BEGIN AGE ENCRYPTED FILE-----\n...".to_string(),
            metadata: RecordMetadata {
                description: Some("test".to_string()),
                tags: vec!["ci".to_string()],
                ..RecordMetadata::new_now()
            },
        });

        let json = serde_json::to_string_pretty(&file).unwrap();
        assert!(json.contains("\"encryptedValue\""));
        assert!(json.contains("\"createdAt\""));

        let parsed: VaultFile = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].name, "API_KEY");
        assert_eq!(parsed.records[0].metadata.tags, vec!["ci"]);
    }
}
