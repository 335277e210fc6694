//! tribal CLI - Entry point
//!
//! Usage: tribal <command> [options]

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tribal::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "tribal=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Run command
    match cli.command {
        Commands::Init(args) => tribal::cli::init::run(args),
        Commands::Checkout(args) => tribal::cli::checkout::run(args),
        Commands::Add(args) => tribal::cli::add::run(args),
        Commands::Commit(args) => tribal::cli::commit::run(args),
        Commands::Push(args) => tribal::cli::push::run(args),
        Commands::Search(args) => tribal::cli::search::run(args),
        Commands::Status(args) => tribal::cli::status::run(args),
        Commands::Login(args) => tribal::cli::auth::login(args).await,
        Commands::Logout(args) => tribal::cli::auth::logout(args),
        Commands::Register(args) => tribal::cli::auth::register(args).await,
        Commands::Whoami(args) => tribal::cli::auth::whoami(args).await,
        Commands::Graphs(args) => tribal::cli::graphs::execute(args).await,
    }
}
