//! Idempotent `.gitignore` patching.

use std::fs;
use std::path::Path;

use crate::core::constants::GITIGNORE_ENTRIES;
use crate::error::Result;

/// Ensure the project `.gitignore` covers the env document and the vault
/// directory.
///
/// Checks existing lines before appending — never duplicates entries,
/// creates the file if absent. Returns the entries actually added.
pub fn ensure_gitignore(project_dir: &Path) -> Result<Vec<&'static str>> {
    let path = project_dir.join(".gitignore");

    let existing = if path.exists() {
        fs::read_to_string(&path)?
    } else {
        String::new()
    };

    let mut updated = existing.clone();
    let mut added = Vec::new();

    for entry in GITIGNORE_ENTRIES {
        if !existing.lines().any(|l| l.trim() == *entry) {
            if !updated.is_empty() && !updated.ends_with('\n') {
                updated.push('\n');
            }
            updated.push_str(entry);
            updated.push('\n');
            added.push(*entry);
        }
    }

    if updated != existing {
        fs::write(&path, updated)?;
    }

    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_file_with_all_entries() {
        let tmp = TempDir::new().unwrap();
        let added = ensure_gitignore(tmp.path()).unwrap();
        assert_eq!(added.len(), GITIGNORE_ENTRIES.len());

        let content = fs::read_to_string(tmp.path().join(".gitignore")).unwrap();
        for entry in GITIGNORE_ENTRIES {
            assert!(content.lines().any(|l| l == *entry));
        }
    }

    #[test]
    fn test_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        ensure_gitignore(tmp.path()).unwrap();
        let added = ensure_gitignore(tmp.path()).unwrap();
        assert!(added.is_empty());

        let content = fs::read_to_string(tmp.path().join(".gitignore")).unwrap();
        assert_eq!(content.matches(".env\n").count(), 1);
    }

    #[test]
    fn test_preserves_existing_lines_without_trailing_newline() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".gitignore"), "node_modules/").unwrap();

        ensure_gitignore(tmp.path()).unwrap();

        let content = fs::read_to_string(tmp.path().join(".gitignore")).unwrap();
        assert!(content.starts_with("node_modules/\n"));
        assert!(content.contains(".denv/\n"));
    }
}
