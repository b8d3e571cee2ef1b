//! Encryption capability.
//!
//! Abstracts the asymmetric primitive behind a trait so the vault store
//! never touches a concrete crypto library directly. The built-in backend
//! is age (x25519 keys, ASCII armor); a new backend only needs to
//! implement `Cipher` and parse its own recipient/identity material.

use ::age::x25519;

use crate::error::Result;

mod age;

pub use age::{parse_identity, parse_recipient, Age};

/// Cryptographic backend trait.
///
/// Recipients encrypt, identities decrypt. The ciphertext format is owned
/// by the backend; callers treat it as an opaque string that round-trips.
pub trait Cipher {
    /// Type representing a recipient public key.
    type Recipient;

    /// Type representing a private identity.
    type Identity;

    /// Encrypt plaintext for one or more recipients.
    fn encrypt(&self, plaintext: &str, recipients: &[Self::Recipient]) -> Result<String>;

    /// Decrypt a ciphertext with a private identity.
    ///
    /// Fails with `DecryptionFailed` on key mismatch or corrupted input,
    /// never returns wrong plaintext.
    fn decrypt(&self, encrypted: &str, identity: &Self::Identity) -> Result<String>;

    /// Backend name for display/config.
    fn name(&self) -> &'static str;
}

/// Encrypt plaintext for a single age recipient using the default backend.
pub fn encrypt(plaintext: &str, recipient: &x25519::Recipient) -> Result<String> {
    Age.encrypt(plaintext, std::slice::from_ref(recipient))
}

/// Decrypt an age-armored ciphertext with a private identity.
pub fn decrypt(encrypted: &str, identity: &x25519::Identity) -> Result<String> {
    Age.decrypt(encrypted, identity)
}
