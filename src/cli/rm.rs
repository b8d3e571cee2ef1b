//! Rm command.

use crate::cli::output;
use crate::core::service::CredentialService;
use crate::error::{DenvError, Result};

pub fn execute(service: &mut CredentialService, name: &str, yes: bool) -> Result<()> {
    if !yes {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(format!("remove credential '{}'?", name))
            .default(false)
            .interact()
            .map_err(|e| DenvError::Config(format!("prompt failed: {}", e)))?;
        if !confirmed {
            output::dimmed("aborted");
            return Ok(());
        }
    }

    service.remove(name)?;
    output::success(&format!("removed {}", output::key(name)));

    Ok(())
}
