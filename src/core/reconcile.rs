//! Grant/revoke reconciliation against an external env document.
//!
//! Grant projects vault-held plaintext into the document; revoke removes
//! names from it. Neither touches the vault, so revoke is always safe and
//! reversible by re-granting. The document is rewritten in full on every
//! pass — env files are small, and "no duplicate or stale keys" matters
//! more than I/O minimization.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tracing::debug;

use crate::core::envfile::EnvDocument;
use crate::core::source::SourceRegistry;
use crate::error::Result;

/// Distinguishes backup paths for grants within the same timestamp.
static BACKUP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Result of a grant pass.
#[derive(Debug)]
pub struct GrantOutcome {
    /// Names actually written into the document.
    pub granted: Vec<String>,
    /// Requested names with no credential in any source.
    pub skipped: Vec<String>,
    pub path: PathBuf,
    pub backup: Option<PathBuf>,
}

/// Result of a revoke pass.
#[derive(Debug)]
pub struct RevokeOutcome {
    /// Names actually removed from the document.
    pub revoked: Vec<String>,
    /// Requested names that were not present.
    pub skipped: Vec<String>,
    pub path: PathBuf,
}

/// Merge the requested credentials into the env document at `path`.
///
/// Names that resolve through the registry overwrite or extend the
/// document; names that don't are skipped and reported. Unrelated keys
/// are preserved. When `backup` is set and the document exists, it is
/// copied verbatim to a timestamped path before being rewritten.
pub fn grant(
    registry: &SourceRegistry,
    names: &[String],
    path: &Path,
    backup: bool,
) -> Result<GrantOutcome> {
    let mut doc = EnvDocument::load(path)?;

    let backup_path = if backup && path.exists() {
        let dest = backup_path_for(path);
        fs::copy(path, &dest)?;
        debug!(backup = %dest.display(), "env document backed up");
        Some(dest)
    } else {
        None
    };

    let mut granted = Vec::new();
    let mut skipped = Vec::new();

    for name in names {
        match registry.get(name)? {
            Some(credential) => {
                doc.set(name, &credential.value);
                granted.push(name.clone());
            }
            None => skipped.push(name.clone()),
        }
    }

    doc.save(path)?;
    debug!(
        granted = granted.len(),
        skipped = skipped.len(),
        path = %path.display(),
        "grant complete"
    );

    Ok(GrantOutcome {
        granted,
        skipped,
        path: path.to_path_buf(),
        backup: backup_path,
    })
}

/// Remove the requested names from the env document at `path`.
///
/// A missing or empty document means zero revocations, not an error.
pub fn revoke(names: &[String], path: &Path) -> Result<RevokeOutcome> {
    let mut doc = EnvDocument::load(path)?;

    let mut revoked = Vec::new();
    let mut skipped = Vec::new();

    for name in names {
        if doc.remove(name) {
            revoked.push(name.clone());
        } else {
            skipped.push(name.clone());
        }
    }

    if !revoked.is_empty() {
        doc.save(path)?;
    }
    debug!(
        revoked = revoked.len(),
        skipped = skipped.len(),
        path = %path.display(),
        "revoke complete"
    );

    Ok(RevokeOutcome {
        revoked,
        skipped,
        path: path.to_path_buf(),
    })
}

/// `<path>.bak-<UTC timestamp>-<seq>`; the sequence number keeps backup
/// names distinct for grants within the same second of one process.
fn backup_path_for(path: &Path) -> PathBuf {
    let stamp = Utc::now().format("%Y%m%dT%H%M%S");
    let seq = BACKUP_SEQ.fetch_add(1, Ordering::Relaxed);
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| ".env".to_string());
    path.with_file_name(format!("{}.bak-{}-{}", file_name, stamp, seq))
}
