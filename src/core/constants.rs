//! Shared constants for file names and locations.

/// Directory name of a local (per-project) vault.
pub const VAULT_DIR: &str = ".denv";

/// Encrypted record file inside a vault directory.
pub const RECORDS_FILE: &str = "credentials.json";

/// Private key file inside a vault directory.
pub const IDENTITY_FILE: &str = "identity.key";

/// Public key file inside a vault directory.
pub const RECIPIENT_FILE: &str = "recipient.pub";

/// Settings file under the home config directory (`~/.denv/config.toml`).
pub const CONFIG_FILE: &str = "config.toml";

/// Subdirectory of `~/.denv` holding the shared global vault.
pub const GLOBAL_VAULT_SUBDIR: &str = "vault";

/// Default env document written by grant/revoke.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Entries added to `.gitignore` on init.
pub const GITIGNORE_ENTRIES: &[&str] = &[".env", ".env.*", ".denv/"];

/// Current on-disk vault file version.
pub const VAULT_VERSION: u32 = 1;

/// Source id of the built-in local vault backend.
pub const LOCAL_SOURCE_ID: &str = "local";

/// Registry priority of the built-in local backend (lower wins).
pub const LOCAL_SOURCE_PRIORITY: u32 = 10;
