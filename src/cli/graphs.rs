//! `tribal graphs` command
//!
//! Manage graphs on the registry.
//!
//! # Usage
//! ```bash
//! tribal graphs list                     # Your graphs
//! tribal graphs list --public            # Public graphs (no login needed)
//! tribal graphs show <id>
//! tribal graphs search "auth"
//! tribal graphs publish --public         # Upload the checked-out graph
//! tribal graphs publish --id <id> -m "Add session nodes"
//! tribal graphs delete <id>
//! ```

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use dialoguer::Confirm;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::utils::{open_repo, registry_client, require_auth};
use crate::config::REGISTRY_URL_ENV;
use crate::core::graph::GraphDocument;
use crate::remote::{
    CreateGraphRequest, GraphPage, RegistryClient, RemoteGraph, SearchRequest, UpdateGraphRequest,
};

#[derive(Args, Debug)]
pub struct GraphsArgs {
    /// Registry URL (overrides config)
    #[arg(short, long, global = true, env = REGISTRY_URL_ENV)]
    pub registry: Option<String>,

    #[command(subcommand)]
    pub command: GraphsCommands,
}

#[derive(Subcommand, Debug)]
pub enum GraphsCommands {
    /// List your graphs, or public graphs with --public
    List {
        /// List public graphs from every user
        #[arg(long)]
        public: bool,

        #[arg(short, long, default_value = "20")]
        limit: u32,

        #[arg(short, long, default_value = "0")]
        offset: u32,
    },

    /// Show a graph
    Show {
        /// Graph ID
        id: String,
    },

    /// Search graphs on the registry
    Search {
        /// Search query
        query: String,

        /// Only public graphs
        #[arg(long)]
        public: bool,

        #[arg(short, long, default_value = "20")]
        limit: u32,

        #[arg(short, long, default_value = "0")]
        offset: u32,
    },

    /// Upload the checked-out graph (creates a new graph unless --id is given)
    Publish {
        /// Update this existing graph instead of creating one
        #[arg(long)]
        id: Option<String>,

        /// Make the graph public
        #[arg(long)]
        public: bool,

        /// Description (defaults to metadata.description)
        #[arg(short, long)]
        description: Option<String>,

        /// Change message for updates
        #[arg(short, long, default_value = "Update from tribal CLI")]
        message: String,
    },

    /// Delete a graph
    Delete {
        /// Graph ID
        id: String,

        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Tabled)]
struct GraphRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Owner")]
    owner: String,
    #[tabled(rename = "Nodes")]
    nodes: usize,
    #[tabled(rename = "Edges")]
    edges: usize,
    #[tabled(rename = "Visibility")]
    visibility: &'static str,
    #[tabled(rename = "Version")]
    version: i64,
}

impl From<&RemoteGraph> for GraphRow {
    fn from(graph: &RemoteGraph) -> Self {
        Self {
            id: graph.id.to_string(),
            title: graph.title.clone(),
            owner: graph
                .owner
                .as_ref()
                .map(|o| o.username.clone())
                .unwrap_or_else(|| graph.owner_id.to_string()),
            nodes: graph.nodes.len(),
            edges: graph.edges.len(),
            visibility: if graph.is_public { "public" } else { "private" },
            version: graph.version,
        }
    }
}

/// Execute graphs command
pub async fn execute(args: GraphsArgs) -> Result<()> {
    let repo = open_repo()?;
    let config = repo.load_config()?;
    let needs_auth = !matches!(args.command, GraphsCommands::List { public: true, .. });
    if needs_auth {
        require_auth(&config)?;
    }

    let client = registry_client(&config, args.registry.as_deref())?;

    match args.command {
        GraphsCommands::List {
            public,
            limit,
            offset,
        } => list(&client, public, limit, offset).await,
        GraphsCommands::Show { id } => show(&client, &id).await,
        GraphsCommands::Search {
            query,
            public,
            limit,
            offset,
        } => {
            let req = SearchRequest {
                query,
                user_id: None,
                is_public: public.then_some(true),
                limit: Some(limit),
                offset: Some(offset),
            };
            search(&client, &req).await
        }
        GraphsCommands::Publish {
            id,
            public,
            description,
            message,
        } => {
            let graph = repo.current_graph().context("nothing to publish")?;
            publish(&client, graph, id, public, description, message).await
        }
        GraphsCommands::Delete { id, force } => delete(&client, &id, force).await,
    }
}

async fn list(client: &RegistryClient, public: bool, limit: u32, offset: u32) -> Result<()> {
    let page = if public {
        client.list_public_graphs(limit, offset).await?
    } else {
        client.list_graphs(limit, offset).await?
    };

    if page.graphs.is_empty() {
        println!("No graphs found.");
        if !public {
            println!("\nPublish one with: tribal graphs publish");
        }
        return Ok(());
    }

    print_page(&page);
    Ok(())
}

async fn show(client: &RegistryClient, id: &str) -> Result<()> {
    let graph = client.get_graph(id).await?;

    println!("{}", "Graph".bold());
    println!("{}", "═".repeat(40));
    println!("Title:       {}", graph.title.cyan());
    println!(
        "Description: {}",
        graph.description.as_deref().unwrap_or("(none)")
    );
    println!("Nodes:       {}", graph.nodes.len());
    println!("Edges:       {}", graph.edges.len());
    println!(
        "Visibility:  {}",
        if graph.is_public { "public" } else { "private" }
    );
    println!("Version:     {}", graph.version);
    if let Some(owner) = &graph.owner {
        println!("Owner:       {}", owner.username);
    }
    println!("Created:     {}", graph.created_at.to_rfc3339());
    println!("Updated:     {}", graph.updated_at.to_rfc3339());
    println!("ID:          {}", graph.id.to_string().dimmed());

    Ok(())
}

async fn search(client: &RegistryClient, req: &SearchRequest) -> Result<()> {
    let page = client.search_graphs(req).await?;

    if page.graphs.is_empty() {
        println!("No graphs matching '{}'.", req.query);
        return Ok(());
    }

    print_page(&page);
    Ok(())
}

async fn publish(
    client: &RegistryClient,
    graph: GraphDocument,
    id: Option<String>,
    public: bool,
    description: Option<String>,
    message: String,
) -> Result<()> {
    let remote = match id {
        Some(id) => {
            let mut req = UpdateGraphRequest::from_document(&graph, message);
            if description.is_some() {
                req.description = description;
            }
            if public {
                req.is_public = Some(true);
            }
            client.update_graph(&id, &req).await?
        }
        None => {
            let req = CreateGraphRequest::from_document(&graph, description, public);
            client.create_graph(&req).await?
        }
    };

    tracing::info!(graph = %remote.id, version = remote.version, "published graph");

    println!(
        "{} Published graph: {}",
        "✓".green(),
        remote.title.cyan().bold()
    );
    println!("  ID:       {}", remote.id);
    println!("  Version:  {}", remote.version);
    println!("  Registry: {}", client.base_url());

    Ok(())
}

async fn delete(client: &RegistryClient, id: &str, force: bool) -> Result<()> {
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete graph '{}'? This cannot be undone.", id))
            .default(false)
            .interact()
            .context("failed to read confirmation")?;

        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    client.delete_graph(id).await?;

    println!("{} Deleted graph: {}", "✓".green(), id);
    Ok(())
}

fn print_page(page: &GraphPage) {
    let rows: Vec<GraphRow> = page.graphs.iter().map(GraphRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);

    let more = if page.has_more { " (more available)" } else { "" };
    println!("\n{} of {} graph(s){}", page.graphs.len(), page.total, more);
}
