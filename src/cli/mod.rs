//! Command-line interface.
//!
//! Thin glue over `CredentialService`: argument parsing, prompting and
//! rendering live here, all credential semantics live in `core`.

pub mod add;
pub mod completions;
pub mod export;
pub mod get;
pub mod grant;
pub mod init;
pub mod list;
pub mod output;
pub mod revoke;
pub mod rm;
pub mod rotate;
pub mod search;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::core::service::CredentialService;
use crate::error::Result;

/// denv - a local encrypted secrets vault for development environments.
#[derive(Parser)]
#[command(
    name = "denv",
    about = "Local encrypted secrets vault with grant/revoke into .env files",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Use a specific vault directory instead of the resolved one
    #[arg(long, global = true, env = "DENV_VAULT")]
    pub vault: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize a vault (generates key material)
    Init {
        /// Overwrite existing key material, abandoning old records
        #[arg(long)]
        force: bool,
    },

    /// Add or update a credential
    Add {
        /// Credential name (e.g., DATABASE_URL)
        name: String,
        /// Value; `-` reads from stdin, omit to be prompted
        #[arg(short = 'V', long)]
        value: Option<String>,
        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
        /// Optional comma-separated tags
        #[arg(short, long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
    },

    /// Decrypt and print a credential
    Get {
        /// Credential name
        name: String,
        /// Print only the value (for shell substitution)
        #[arg(short, long)]
        quiet: bool,
    },

    /// List credential names and metadata
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search credential names (case-insensitive)
    Search {
        /// Substring to match
        pattern: String,
    },

    /// Remove a credential from the vault
    Rm {
        /// Credential name
        name: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Replace the value of an existing credential
    Rotate {
        /// Credential name
        name: String,
        /// New value; `-` reads from stdin, omit to be prompted
        #[arg(short = 'V', long)]
        value: Option<String>,
    },

    /// Write credentials into the env document
    Grant {
        /// Names to grant; empty grants every credential
        names: Vec<String>,
        /// Skip the timestamped backup of the existing document
        #[arg(long)]
        no_backup: bool,
        /// Env document to write (default from config, usually .env)
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Remove credentials from the env document (vault is untouched)
    Revoke {
        /// Names to revoke; empty revokes every vault-held name
        names: Vec<String>,
        /// Env document to rewrite
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Decrypt all credentials and print them in env format
    Export,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Dispatch a parsed command.
pub fn execute(command: Command, vault: Option<PathBuf>) -> Result<()> {
    if let Command::Completions { shell } = &command {
        return completions::execute(*shell);
    }

    let project_dir = std::env::current_dir()?;
    let mut service = CredentialService::new(&project_dir, vault)?;

    match command {
        Command::Init { force } => init::execute(&mut service, force),
        Command::Add {
            name,
            value,
            description,
            tags,
        } => add::execute(&mut service, &name, value, description, tags),
        Command::Get { name, quiet } => get::execute(&mut service, &name, quiet),
        Command::List { json } => list::execute(&mut service, json),
        Command::Search { pattern } => search::execute(&mut service, &pattern),
        Command::Rm { name, yes } => rm::execute(&mut service, &name, yes),
        Command::Rotate { name, value } => rotate::execute(&mut service, &name, value),
        Command::Grant {
            names,
            no_backup,
            file,
        } => grant::execute(&mut service, &names, no_backup, file.as_deref()),
        Command::Revoke { names, file } => revoke::execute(&mut service, &names, file.as_deref()),
        Command::Export => export::execute(&mut service),
        Command::Completions { .. } => unreachable!("handled above"),
    }
}

/// How a credential value reaches the CLI.
///
/// `-` as a value is resolved here, before anything touches the storage
/// layer.
pub enum ValueInput {
    Literal(String),
    StandardInput,
    Prompt,
}

impl ValueInput {
    /// Classify the optional `--value` argument.
    pub fn from_arg(value: Option<String>) -> Self {
        match value {
            Some(v) if v == "-" => Self::StandardInput,
            Some(v) => Self::Literal(v),
            None => Self::Prompt,
        }
    }

    /// Obtain the actual value. Prompting happens before any vault write,
    /// so an interrupted prompt leaves no partial state behind.
    pub fn resolve(self, prompt_label: &str) -> Result<zeroize::Zeroizing<String>> {
        use std::io::Read;

        let value = match self {
            Self::Literal(v) => v,
            Self::StandardInput => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf.trim_end_matches(&['\r', '\n'][..]).to_string()
            }
            Self::Prompt => dialoguer::Password::new()
                .with_prompt(prompt_label)
                .interact()
                .map_err(|e| crate::error::DenvError::Config(format!("prompt failed: {}", e)))?,
        };

        Ok(zeroize::Zeroizing::new(value))
    }
}
