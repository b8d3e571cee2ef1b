//! Get command.

use crate::cli::output;
use crate::core::service::CredentialService;
use crate::error::{DenvError, Result};

pub fn execute(service: &mut CredentialService, name: &str, quiet: bool) -> Result<()> {
    let Some(credential) = service.get(name)? else {
        return Err(DenvError::MissingCredential(name.to_string()));
    };

    if quiet {
        println!("{}", credential.value);
        return Ok(());
    }

    output::kv("name", &credential.name);
    output::kv("value", &credential.value);
    if let Some(description) = &credential.metadata.description {
        output::kv("description", description);
    }
    if !credential.metadata.tags.is_empty() {
        output::kv("tags", credential.metadata.tags.join(", "));
    }
    output::kv("updated", credential.metadata.updated_at.to_rfc3339());

    Ok(())
}
