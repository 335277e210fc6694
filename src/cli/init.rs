//! `tribal init` command
//!
//! Writes TRIBAL.md, prepends a notice to CLAUDE.md and creates
//! `.tribal/config.json` in the current directory.
//!
//! # Usage
//! ```bash
//! tribal init
//! tribal init -r https://registry.example.com
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use crate::config::REGISTRY_URL_ENV;
use crate::core::repo::Repository;
use crate::remote::validate_registry_url;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Registry URL to store in the config
    #[arg(short, long, env = REGISTRY_URL_ENV)]
    pub registry: Option<String>,
}

pub fn run(args: InitArgs) -> Result<()> {
    if let Some(url) = &args.registry {
        validate_registry_url(url)?;
    }

    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let (_repo, outcome) =
        Repository::init(&cwd, args.registry).context("Error initializing repository")?;

    if outcome.reinitialized {
        println!("{} Reinitialized existing tribal repository", "✓".green());
    } else {
        println!("{} Successfully initialized tribal repository", "✓".green());
    }
    println!("   Config: {}", outcome.config_path.display());
    println!("\nNext steps:");
    println!("  tribal checkout -g \"<graph title>\"");
    println!("  tribal search --context \"<description>\"");

    Ok(())
}
