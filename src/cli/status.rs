//! `tribal status` command
//!
//! Shows where the repository is in the checkout → add → commit → push
//! cycle and who is logged in.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::utils::open_repo;
use crate::core::repo::RepoState;

#[derive(Args, Debug)]
pub struct StatusArgs {}

pub fn run(_args: StatusArgs) -> Result<()> {
    let repo = open_repo()?;
    let status = repo.status()?;
    let config = &status.config;

    println!("{}", "Repository".bold());
    println!("{}", "═".repeat(40));
    println!("State:    {}", status.state.to_string().cyan());
    println!("Current:  {}", describe(&config.current_graph, &config.current_graph_file));
    println!("Staged:   {}", describe(&config.staged_graph, &config.staged_graph_file));
    println!("Latest:   {}", describe(&config.latest_commit, &config.latest_commit_file));
    println!("Pushed:   {}", describe(&config.last_pushed_commit, &config.last_pushed_file));
    println!("Graphs:   {}", config.graphs.len());

    if status.unpushed {
        println!("\n{} latest commit has not been pushed (tribal push)", "!".yellow());
    } else if status.state == RepoState::Staged {
        println!("\n{} changes staged for commit (tribal commit -m \"...\")", "!".yellow());
    }

    println!();
    println!("{}", "Registry".bold());
    println!("{}", "═".repeat(40));
    println!("URL:      {}", config.registry_url());
    match &config.username {
        Some(user) if config.is_authenticated() => println!("User:     {}", user.green()),
        _ => println!("User:     {}", "(not logged in)".dimmed()),
    }

    Ok(())
}

fn describe(name: &Option<String>, file: &Option<String>) -> String {
    match (name, file) {
        (Some(name), Some(file)) => format!("{} {}", name, format!("({})", file).dimmed()),
        (Some(name), None) => name.clone(),
        _ => "(none)".dimmed().to_string(),
    }
}
