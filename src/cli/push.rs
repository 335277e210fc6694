//! `tribal push` command
//!
//! Archives the latest commit under `.tribal/pushed/`. This is a local
//! simulation; nothing is sent to the registry.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use super::utils::open_repo;
use crate::core::repo::GraphCounts;

#[derive(Args, Debug)]
pub struct PushArgs {}

pub fn run(_args: PushArgs) -> Result<()> {
    let repo = open_repo()?;
    let outcome = repo.push().context("Error pushing graph")?;
    let commit = &outcome.commit;

    println!("{} Pushed commit: {}", "✓".green(), commit.id.cyan().bold());
    println!("   Message:   {}", commit.message);
    println!("   Timestamp: {}", commit.timestamp);
    println!("   Pushed to: {}", outcome.pushed_file);
    let counts = GraphCounts::of(&commit.graph);
    println!("   Graph:     {}", commit.graph_title());
    println!("   Nodes:     {}", counts.nodes);
    println!("   Edges:     {}", counts.edges);

    println!("\nGraph successfully pushed!");
    println!(
        "{}",
        "Note: this is a local simulation. Use 'tribal graphs publish' to upload to the registry."
            .dimmed()
    );

    Ok(())
}
