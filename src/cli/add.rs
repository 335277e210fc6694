//! `tribal add` command
//!
//! Stages the current graph for commit. Only `-A` is supported.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use super::utils::open_repo;
use crate::error::TribalError;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Stage all graph changes
    #[arg(short = 'A', long)]
    pub all: bool,
}

pub fn run(args: AddArgs) -> Result<()> {
    if !args.all {
        return Err(TribalError::Usage(
            "currently only supports -A flag to stage all changes".to_string(),
        )
        .into());
    }

    let repo = open_repo()?;
    let outcome = repo.add(args.all).context("Error staging graph")?;

    println!("{} Staged graph: {}", "✓".green(), outcome.graph.cyan().bold());
    println!("   Staged file: {}", outcome.staged_file);

    Ok(())
}
