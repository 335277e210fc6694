//! `tribal commit` command
//!
//! Snapshots the staged graph with a message.
//!
//! # Usage
//! ```bash
//! tribal commit -m "Add login nodes"
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use super::utils::open_repo;
use crate::core::repo::CommitOutcome;
use crate::error::TribalError;

#[derive(Args, Debug)]
pub struct CommitArgs {
    /// Commit message
    #[arg(short, long)]
    pub message: Option<String>,
}

pub fn run(args: CommitArgs) -> Result<()> {
    let message = args.message.filter(|m| !m.trim().is_empty()).ok_or_else(|| {
        TribalError::Usage("commit message is required. Use -m flag.".to_string())
    })?;

    let repo = open_repo()?;
    let outcome = repo.commit(&message).context("Error committing graph")?;
    print_summary(&outcome);

    Ok(())
}

fn print_summary(outcome: &CommitOutcome) {
    let commit = &outcome.commit;

    println!("{} Committed graph: {}", "✓".green(), commit.graph_title().cyan().bold());
    println!("   Commit ID: {}", commit.id);
    println!("   Message:   {}", commit.message);
    println!("   Timestamp: {}", commit.timestamp);

    println!("\nGraph Summary:");
    let (node_delta, edge_delta) = match outcome.previous {
        Some(prev) => (
            delta(outcome.counts.nodes, prev.nodes),
            delta(outcome.counts.edges, prev.edges),
        ),
        None => (String::new(), String::new()),
    };
    println!("  Nodes: {}{}", outcome.counts.nodes, node_delta);
    println!("  Edges: {}{}", outcome.counts.edges, edge_delta);

    println!("\nCommit saved to: {}", outcome.file);
    println!(
        "\nReview this commit before pushing. Use '{}' when ready.",
        "tribal push".bold()
    );
}

/// " (+2)" / " (-1)" / "" relative to the previous commit
fn delta(now: usize, before: usize) -> String {
    match now.cmp(&before) {
        std::cmp::Ordering::Greater => format!(" ({})", format!("+{}", now - before).green()),
        std::cmp::Ordering::Less => format!(" ({})", format!("-{}", before - now).red()),
        std::cmp::Ordering::Equal => String::new(),
    }
}
