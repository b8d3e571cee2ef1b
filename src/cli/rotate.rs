//! Rotate command.

use crate::cli::{output, ValueInput};
use crate::core::service::CredentialService;
use crate::error::Result;

pub fn execute(service: &mut CredentialService, name: &str, value: Option<String>) -> Result<()> {
    let value = ValueInput::from_arg(value).resolve(&format!("new value for {}", name))?;

    service.rotate(name, &value)?;
    output::success(&format!("rotated {}", output::key(name)));

    Ok(())
}
