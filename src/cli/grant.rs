//! Grant command.

use crate::cli::output;
use crate::core::service::CredentialService;
use crate::error::Result;

pub fn execute(
    service: &mut CredentialService,
    names: &[String],
    no_backup: bool,
    file: Option<&str>,
) -> Result<()> {
    let backup = if no_backup { Some(false) } else { None };
    let outcome = service.grant(names, backup, file)?;

    for name in &outcome.granted {
        output::success(&format!("granted {}", output::key(name)));
    }
    for name in &outcome.skipped {
        output::warn(&format!("skipped {} (not in vault)", name));
    }
    if outcome.granted.is_empty() {
        output::dimmed("nothing granted");
    }

    output::kv("file", outcome.path.display());
    if let Some(backup) = &outcome.backup {
        output::kv("backup", backup.display());
    }

    Ok(())
}
