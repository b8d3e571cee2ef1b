//! List command.

use crate::cli::output;
use crate::core::service::CredentialService;
use crate::error::Result;

pub fn execute(service: &mut CredentialService, json: bool) -> Result<()> {
    let summaries = service.list()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if summaries.is_empty() {
        output::dimmed("no credentials stored");
        return Ok(());
    }

    for summary in &summaries {
        let mut line = output::key(&summary.name);
        if let Some(description) = &summary.description {
            line.push_str(&format!("  {}", description));
        }
        if !summary.tags.is_empty() {
            line.push_str(&format!("  [{}]", summary.tags.join(", ")));
        }
        output::list_item(&line);
    }
    println!();
    output::dimmed(&format!("{} credential(s)", summaries.len()));

    Ok(())
}
