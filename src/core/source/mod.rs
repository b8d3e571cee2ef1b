//! Pluggable credential backends.
//!
//! A source is one place credentials can live; the built-in `local`
//! source wraps a `VaultStore`. The registry fans reads out across
//! registered sources by priority and routes writes to the first source
//! that accepts them, so non-local backends can be added later without
//! touching callers.

mod local;
mod registry;

pub use local::LocalVaultSource;
pub use registry::SourceRegistry;

use crate::core::record::{Credential, CredentialSummary, MetadataPatch};
use crate::error::Result;

/// One credential backend.
///
/// Whether a source accepts writes is a capability flag (`writable`),
/// checked before dispatch — there are no optional methods. A read-only
/// source still implements `set`/`delete` but is never asked to run them.
pub trait CredentialSource {
    /// Stable identifier used for routing (`set --source <id>`).
    fn id(&self) -> &str;

    /// Resolution priority; lower numbers win.
    fn priority(&self) -> u32;

    /// Availability probe, re-run on every registry operation. For the
    /// local source this is "does the identity file exist".
    fn is_available(&self) -> bool;

    /// Capability flag: does this source accept `set`/`delete`?
    fn writable(&self) -> bool;

    fn get(&self, name: &str) -> Result<Option<Credential>>;

    fn list(&self) -> Result<Vec<CredentialSummary>>;

    /// Returns whether a new record was created (as opposed to updated).
    fn set(&self, name: &str, value: &str, patch: MetadataPatch) -> Result<bool>;

    /// Returns whether anything was removed.
    fn delete(&self, name: &str) -> Result<bool>;
}
