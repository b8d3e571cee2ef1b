use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DenvError {
    #[error("not initialized: no vault found (run `denv init` first)")]
    NotInitialized,

    #[error("already initialized: vault exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("corrupt vault at {path}: {reason}")]
    CorruptVault { path: PathBuf, reason: String },

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("no identity key found at {0}")]
    NoIdentity(PathBuf),

    #[error("credential not found: {0}")]
    MissingCredential(String),

    #[error("unknown source: {0}")]
    UnknownSource(String),

    #[error("source is read-only: {0}")]
    ReadOnlySource(String),

    #[error("no writable source available")]
    NoWritableSource,

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("toml parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("toml serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, DenvError>;
