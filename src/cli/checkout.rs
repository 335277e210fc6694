//! `tribal checkout` command
//!
//! Creates a graph or switches to an existing one.
//!
//! # Usage
//! ```bash
//! tribal checkout -g "Auth Flow"     # .tribal/graphs/auth_flow.json
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use super::utils::open_repo;
use crate::error::TribalError;

#[derive(Args, Debug)]
pub struct CheckoutArgs {
    /// Graph title to checkout
    #[arg(short, long)]
    pub graph: Option<String>,
}

pub fn run(args: CheckoutArgs) -> Result<()> {
    let title = args.graph.filter(|t| !t.trim().is_empty()).ok_or_else(|| {
        TribalError::Usage(
            "graph title is required. Use -g flag to specify graph title.".to_string(),
        )
    })?;

    let repo = open_repo()?;
    let outcome = repo.checkout(&title).context("Error checking out graph")?;

    if outcome.created {
        println!("{} Created new graph: {}", "✓".green(), outcome.title.cyan().bold());
    } else {
        println!("{} Checked out existing graph: {}", "✓".green(), outcome.title.cyan().bold());
    }
    println!("   Graph file: {}", outcome.file);

    Ok(())
}
