//! `tribal search` command
//!
//! Ranks local graphs by keyword overlap with a context description.
//!
//! # Usage
//! ```bash
//! tribal search --context "auth flow"
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use super::utils::open_repo;
use crate::core::search::{search_dir, SearchMatch};
use crate::error::TribalError;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Context description to match against graph titles and descriptions
    #[arg(long)]
    pub context: Option<String>,
}

pub fn run(args: SearchArgs) -> Result<()> {
    let context = args.context.filter(|c| !c.trim().is_empty()).ok_or_else(|| {
        TribalError::Usage("context description is required. Use --context flag.".to_string())
    })?;

    let repo = open_repo()?;
    let Some(matches) = search_dir(&repo.graphs_dir(), &context).context("Error searching graphs")?
    else {
        println!("No graphs found.");
        return Ok(());
    };

    println!("Searching for graphs matching: {}\n", context.cyan());
    print_pretty(&matches);

    Ok(())
}

fn print_pretty(matches: &[SearchMatch]) {
    if matches.is_empty() {
        println!("No matching graphs found.");
        return;
    }

    println!("Found {} matching graph(s):\n", matches.len());

    for (i, m) in matches.iter().enumerate() {
        println!("{}. {} (score: {})", i + 1, m.title.bold(), m.score);
        println!("   File: {}", m.file_name.dimmed());
        if let Some(description) = &m.description {
            println!("   Description: {}", description);
        }
        println!();
    }
}
