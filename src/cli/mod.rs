//! CLI module - Command definitions and handlers

use clap::{Parser, Subcommand};

pub mod add;
pub mod auth;
pub mod checkout;
pub mod commit;
pub mod graphs;
pub mod init;
pub mod push;
pub mod search;
pub mod status;
pub mod utils;

/// tribal - Graph-based development workflow
///
/// Initialize repositories, manage graphs, and collaborate on graph
/// structures through a tribal registry.
#[derive(Parser, Debug)]
#[command(name = "tribal")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a tribal repository
    Init(init::InitArgs),

    /// Create or retrieve a graph
    Checkout(checkout::CheckoutArgs),

    /// Stage graph changes
    Add(add::AddArgs),

    /// Commit staged graph changes
    Commit(commit::CommitArgs),

    /// Push committed graph changes
    Push(push::PushArgs),

    /// Search local graphs by title and description
    Search(search::SearchArgs),

    /// Show repository state
    Status(status::StatusArgs),

    /// Login to the tribal registry
    Login(auth::LoginArgs),

    /// Logout from the tribal registry
    Logout(auth::LogoutArgs),

    /// Register a new account
    Register(auth::RegisterArgs),

    /// Show the logged-in account
    Whoami(auth::WhoamiArgs),

    /// Manage graphs on the registry
    Graphs(graphs::GraphsArgs),
}
