//! Age encryption backend.
//!
//! x25519 keys with ASCII armor, so ciphertext is printable and safe to
//! store inside a JSON record file.

use std::io::{Read, Write};

use ::age::x25519;
use tracing::trace;

use super::Cipher;
use crate::error::{DenvError, Result};

/// Age-based cryptographic backend using x25519 keys.
pub struct Age;

impl Cipher for Age {
    type Recipient = x25519::Recipient;
    type Identity = x25519::Identity;

    fn name(&self) -> &'static str {
        "age"
    }

    fn encrypt(&self, plaintext: &str, recipients: &[x25519::Recipient]) -> Result<String> {
        trace!(
            recipients = recipients.len(),
            plaintext_len = plaintext.len(),
            "encrypting"
        );

        let encryptor =
            age::Encryptor::with_recipients(recipients.iter().map(|r| r as &dyn age::Recipient))
                .map_err(|e| DenvError::EncryptionFailed(format!("{}", e)))?;

        let mut encrypted = Vec::new();
        let mut writer = encryptor
            .wrap_output(age::armor::ArmoredWriter::wrap_output(
                &mut encrypted,
                age::armor::Format::AsciiArmor,
            )?)
            .map_err(|e| DenvError::EncryptionFailed(format!("{}", e)))?;

        writer.write_all(plaintext.as_bytes())?;
        let armored = writer
            .finish()
            .map_err(|e| DenvError::EncryptionFailed(format!("{}", e)))?;
        armored
            .finish()
            .map_err(|e| DenvError::EncryptionFailed(format!("armor: {}", e)))?;

        trace!(ciphertext_len = encrypted.len(), "encrypted");

        String::from_utf8(encrypted)
            .map_err(|e| DenvError::EncryptionFailed(format!("UTF-8 error: {}", e)))
    }

    fn decrypt(&self, encrypted: &str, identity: &x25519::Identity) -> Result<String> {
        trace!(ciphertext_len = encrypted.len(), "decrypting");

        let reader = age::armor::ArmoredReader::new(encrypted.as_bytes());
        let decryptor = age::Decryptor::new(reader)
            .map_err(|e| DenvError::DecryptionFailed(format!("{}", e)))?;

        let mut decrypted = Vec::new();
        let mut reader = decryptor
            .decrypt(std::iter::once(identity as &dyn age::Identity))
            .map_err(|e| DenvError::DecryptionFailed(format!("{}", e)))?;

        // Body corruption surfaces while reading the payload, not when the
        // header is parsed above. Keep it in the decryption error class.
        reader
            .read_to_end(&mut decrypted)
            .map_err(|e| DenvError::DecryptionFailed(format!("{}", e)))?;

        trace!(plaintext_len = decrypted.len(), "decrypted");

        String::from_utf8(decrypted)
            .map_err(|e| DenvError::DecryptionFailed(format!("UTF-8 error: {}", e)))
    }
}

/// Parse a public key string into an age recipient.
pub fn parse_recipient(key: &str) -> Result<x25519::Recipient> {
    key.parse::<x25519::Recipient>()
        .map_err(|_| DenvError::InvalidKey(format!("not a valid age public key: {}", key)))
}

/// Parse a private key string into an age identity.
pub fn parse_identity(key: &str) -> Result<x25519::Identity> {
    key.trim()
        .parse::<x25519::Identity>()
        .map_err(|e: &str| DenvError::InvalidKey(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let cipher = Age;
        let identity = x25519::Identity::generate();
        let recipient = identity.to_public();

        let plaintext = "sk-test-12345";
        let encrypted = cipher.encrypt(plaintext, &[recipient]).unwrap();

        assert_ne!(encrypted, plaintext);
        assert!(encrypted.contains("-----BEGIN AGE ENCRYPTED FILE-----"));

        let decrypted = cipher.decrypt(&encrypted, &identity).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_decrypt_with_wrong_identity_fails() {
        let cipher = Age;
        let identity = x25519::Identity::generate();
        let other = x25519::Identity::generate();

        let encrypted = cipher.encrypt("secret", &[identity.to_public()]).unwrap();
        let result = cipher.decrypt(&encrypted, &other);

        assert!(matches!(result, Err(DenvError::DecryptionFailed(_))));
    }

    #[test]
    fn test_decrypt_corrupted_input_fails() {
        let cipher = Age;
        let identity = x25519::Identity::generate();

        let result = cipher.decrypt("not an age ciphertext", &identity);
        assert!(result.is_err());
    }

    #[test]
    fn test_decrypt_tampered_body_is_decryption_failure() {
        let cipher = Age;
        let identity = x25519::Identity::generate();

        let plaintext = "A".repeat(4096);
        let encrypted = cipher.encrypt(&plaintext, &[identity.to_public()]).unwrap();

        // Flip a chunk in the middle of the armored body, past the header.
        let mid = encrypted.len() / 2;
        let mut tampered = encrypted.clone();
        tampered.replace_range(mid..mid + 8, "AAAAAAAA");

        let result = cipher.decrypt(&tampered, &identity);
        assert!(matches!(result, Err(DenvError::DecryptionFailed(_))));
    }

    #[test]
    fn test_encrypt_decrypt_large_payload() {
        let cipher = Age;
        let identity = x25519::Identity::generate();
        let recipient = identity.to_public();

        let plaintext = "A".repeat(10_000);
        let encrypted = cipher.encrypt(&plaintext, &[recipient]).unwrap();

        let decrypted = cipher.decrypt(&encrypted, &identity).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_parse_recipient_rejects_garbage() {
        assert!(parse_recipient("not-a-key").is_err());
    }
}
