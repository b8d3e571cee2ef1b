//! Init command.

use crate::cli::output;
use crate::core::service::CredentialService;
use crate::error::Result;

pub fn execute(service: &mut CredentialService, force: bool) -> Result<()> {
    let outcome = service.initialize_vault(force)?;

    output::success("vault initialized");
    output::kv("vault", outcome.vault_dir.display());
    output::kv("recipient", &outcome.recipient);
    for entry in &outcome.gitignore_added {
        output::dimmed(&format!("added '{}' to .gitignore", entry));
    }
    println!();
    output::hint(&format!(
        "add a credential with {}",
        output::cmd("denv add NAME")
    ));

    Ok(())
}
