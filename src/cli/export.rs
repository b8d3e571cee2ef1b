//! Export command.
//!
//! Prints every credential in env format on stdout; decryption failures
//! go to stderr without aborting the rest.

use crate::cli::output;
use crate::core::envfile::EnvDocument;
use crate::core::service::CredentialService;
use crate::error::Result;

pub fn execute(service: &mut CredentialService) -> Result<()> {
    let export = service.get_all()?;

    let mut doc = EnvDocument::new();
    for (name, value) in &export.values {
        doc.set(name, value);
    }
    print!("{}", doc.render());

    for (name, reason) in &export.failures {
        output::error(&format!("{}: {}", name, reason));
    }

    Ok(())
}
