//! Search command.

use crate::cli::output;
use crate::core::service::CredentialService;
use crate::error::Result;

pub fn execute(service: &mut CredentialService, pattern: &str) -> Result<()> {
    let hits = service.search(pattern)?;

    if hits.is_empty() {
        output::dimmed(&format!("no credentials matching '{}'", pattern));
        return Ok(());
    }

    for hit in &hits {
        output::list_item(&output::key(&hit.name));
    }

    Ok(())
}
