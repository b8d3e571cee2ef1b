//! Add command.

use crate::cli::{output, ValueInput};
use crate::core::record::MetadataPatch;
use crate::core::service::CredentialService;
use crate::error::Result;

pub fn execute(
    service: &mut CredentialService,
    name: &str,
    value: Option<String>,
    description: Option<String>,
    tags: Option<Vec<String>>,
) -> Result<()> {
    let value = ValueInput::from_arg(value).resolve(&format!("value for {}", name))?;

    let patch = MetadataPatch { description, tags };
    let outcome = service.add(name, &value, patch)?;

    if outcome.created {
        output::success(&format!("added {}", output::key(name)));
    } else {
        output::success(&format!("updated {}", output::key(name)));
    }
    output::kv("vault", outcome.vault_dir.display());

    Ok(())
}
