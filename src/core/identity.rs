//! Vault key material.
//!
//! Each vault directory holds one x25519 keypair as two files: the
//! identity (private key, owner-only permissions, never logged) and the
//! recipient (public key, world-readable). They are generated together
//! and never individually regenerated; losing the identity file makes
//! the vault's records unrecoverable.

use std::fs;
use std::path::{Path, PathBuf};

use age::x25519;
use tracing::{debug, warn};

use crate::core::cipher;
use crate::core::constants::{IDENTITY_FILE, RECIPIENT_FILE};
use crate::error::{DenvError, Result};

/// The keypair files of one vault directory.
pub struct KeyMaterial {
    identity: x25519::Identity,
    recipient: x25519::Recipient,
    dir: PathBuf,
}

impl KeyMaterial {
    /// Generate a fresh keypair and persist both halves into `dir`.
    ///
    /// Fails with `AlreadyInitialized` if an identity file already exists;
    /// overwrite decisions belong to the caller.
    pub fn generate(dir: &Path) -> Result<Self> {
        let identity_path = dir.join(IDENTITY_FILE);
        if identity_path.exists() {
            return Err(DenvError::AlreadyInitialized(dir.to_path_buf()));
        }

        debug!(dir = %dir.display(), "generating vault keypair");
        fs::create_dir_all(dir)?;

        let identity = x25519::Identity::generate();
        let recipient = identity.to_public();

        // Write identity using Display (outputs AGE-SECRET-KEY-...).
        use age::secrecy::ExposeSecret;
        let secret_str = identity.to_string();
        fs::write(&identity_path, format!("{}\n", secret_str.expose_secret()))?;
        set_mode(&identity_path, 0o600)?;

        let recipient_path = dir.join(RECIPIENT_FILE);
        fs::write(&recipient_path, format!("{}\n", recipient))?;
        set_mode(&recipient_path, 0o644)?;

        debug!(dir = %dir.display(), "keypair written");

        Ok(Self {
            identity,
            recipient,
            dir: dir.to_path_buf(),
        })
    }

    /// Load both halves of the keypair from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let identity = load_identity(dir)?;
        let recipient = load_recipient(dir)?;
        Ok(Self {
            identity,
            recipient,
            dir: dir.to_path_buf(),
        })
    }

    /// The private identity, for decryption.
    pub fn identity(&self) -> &x25519::Identity {
        &self.identity
    }

    /// The public recipient, for encryption.
    pub fn recipient(&self) -> &x25519::Recipient {
        &self.recipient
    }

    /// The vault directory the keys were read from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Deliberately omits the identity.
        f.debug_struct("KeyMaterial")
            .field("dir", &self.dir)
            .field("recipient", &self.recipient.to_string())
            .finish()
    }
}

/// True if `dir` contains an identity file.
pub fn has_identity(dir: &Path) -> bool {
    dir.join(IDENTITY_FILE).exists()
}

/// Load the private identity from a vault directory.
pub fn load_identity(dir: &Path) -> Result<x25519::Identity> {
    let path = dir.join(IDENTITY_FILE);
    if !path.exists() {
        return Err(DenvError::NoIdentity(path));
    }

    #[cfg(unix)]
    if let Some(mode) = insecure_mode(&path)? {
        warn!(
            "insecure permissions {:o} on {} (expected 600); run: chmod 600 {}",
            mode,
            path.display(),
            path.display()
        );
    }

    let contents = fs::read_to_string(&path)?;
    cipher::parse_identity(&contents)
}

/// Load the public recipient from a vault directory.
pub fn load_recipient(dir: &Path) -> Result<x25519::Recipient> {
    let path = dir.join(RECIPIENT_FILE);
    if !path.exists() {
        return Err(DenvError::InvalidKey(format!(
            "recipient file missing: {}",
            path.display()
        )));
    }
    let contents = fs::read_to_string(&path)?;
    cipher::parse_recipient(contents.trim())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

/// Returns the actual mode if the identity file is wider than 0600.
#[cfg(unix)]
fn insecure_mode(path: &Path) -> Result<Option<u32>> {
    use std::os::unix::fs::PermissionsExt;
    let mode = fs::metadata(path)?.permissions().mode() & 0o777;
    Ok(if mode != 0o600 { Some(mode) } else { None })
}
