//! Revoke command.

use crate::cli::output;
use crate::core::service::CredentialService;
use crate::error::Result;

pub fn execute(service: &mut CredentialService, names: &[String], file: Option<&str>) -> Result<()> {
    let outcome = service.revoke(names, file)?;

    for name in &outcome.revoked {
        output::success(&format!("revoked {}", output::key(name)));
    }
    for name in &outcome.skipped {
        output::dimmed(&format!("skipped {} (not granted)", name));
    }
    if outcome.revoked.is_empty() {
        output::dimmed("nothing revoked");
    }
    output::kv("file", outcome.path.display());

    Ok(())
}
