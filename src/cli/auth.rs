//! `tribal login`, `logout`, `register` and `whoami` commands
//!
//! # Usage
//! ```bash
//! tribal register -u alice -e alice@example.com
//! tribal login -u alice -r https://registry.example.com
//! tribal whoami
//! tribal logout
//! ```
//!
//! Omitted username/email/password are prompted for. The password prompt
//! does not echo.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use super::utils::{open_repo, password_or_prompt, registry_client, require_auth, value_or_prompt};
use crate::config::{RepoConfig, REGISTRY_URL_ENV};
use crate::core::repo::Repository;
use crate::error::TribalError;
use crate::remote::{AuthResponse, RegistryClient};

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Username
    #[arg(short, long)]
    pub username: Option<String>,

    /// Password (will prompt if not provided)
    #[arg(short, long)]
    pub password: Option<String>,

    /// Registry URL (uses config default if not provided)
    #[arg(short, long, env = REGISTRY_URL_ENV)]
    pub registry: Option<String>,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Username
    #[arg(short, long)]
    pub username: Option<String>,

    /// Email address
    #[arg(short, long)]
    pub email: Option<String>,

    /// Password (will prompt if not provided)
    #[arg(short, long)]
    pub password: Option<String>,

    /// Registry URL (uses config default if not provided)
    #[arg(short, long, env = REGISTRY_URL_ENV)]
    pub registry: Option<String>,
}

#[derive(Args, Debug)]
pub struct LogoutArgs {}

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Registry URL (uses config default if not provided)
    #[arg(short, long, env = REGISTRY_URL_ENV)]
    pub registry: Option<String>,
}

/// Validate the URL and check the registry answers before asking for credentials
async fn connect(config: &RepoConfig, registry: Option<&str>) -> Result<RegistryClient> {
    let client = registry_client(config, registry)?;

    client
        .health_check()
        .await
        .with_context(|| format!("cannot connect to registry at {}", client.base_url()))?;

    Ok(client)
}

/// Persist the registry and credentials from a successful login/register
fn store_auth(repo: &Repository, registry: Option<String>, auth: &AuthResponse) -> Result<()> {
    repo.update_config(|config| {
        if let Some(url) = registry {
            config.set_registry_url(url);
        }
        config.set_auth(
            auth.token.clone(),
            auth.user.username.clone(),
            auth.user.id.to_string(),
        );
        Ok(())
    })
    .context("failed to save authentication")
}

pub async fn login(args: LoginArgs) -> Result<()> {
    let repo = open_repo()?;
    let client = connect(&repo.load_config()?, args.registry.as_deref()).await?;

    let username = value_or_prompt(args.username, "Username")?;
    let password = password_or_prompt(args.password, false)?;

    let auth = client
        .login(&username, &password)
        .await
        .context("login failed")?;

    store_auth(&repo, args.registry, &auth)?;
    tracing::info!(user = %auth.user.username, registry = %client.base_url(), "logged in");

    println!(
        "{} Successfully logged in as {}",
        "✓".green(),
        auth.user.username.cyan().bold()
    );
    Ok(())
}

pub async fn register(args: RegisterArgs) -> Result<()> {
    // Registering does not need `tribal init`. Nothing is written until the
    // registry has accepted the account.
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let config = match Repository::open(cwd.clone()) {
        Ok(repo) => repo.load_config()?,
        Err(TribalError::NotARepository) => RepoConfig::default(),
        Err(e) => return Err(e.into()),
    };
    let client = connect(&config, args.registry.as_deref()).await?;

    let username = value_or_prompt(args.username, "Username")?;
    let email = value_or_prompt(args.email, "Email")?;
    let password = password_or_prompt(args.password, true)?;

    let auth = client
        .register(&username, &email, &password)
        .await
        .context("registration failed")?;

    let repo = Repository::open_or_create(cwd)?;
    store_auth(&repo, args.registry, &auth)?;
    tracing::info!(user = %auth.user.username, registry = %client.base_url(), "registered");

    println!(
        "{} Successfully registered and logged in as {}",
        "✓".green(),
        auth.user.username.cyan().bold()
    );
    Ok(())
}

pub fn logout(_args: LogoutArgs) -> Result<()> {
    let repo = open_repo()?;
    repo.update_config(|config| {
        config.clear_auth();
        Ok(())
    })
    .context("Error logging out")?;

    println!("{} Successfully logged out from tribal registry", "✓".green());
    Ok(())
}

pub async fn whoami(args: WhoamiArgs) -> Result<()> {
    let repo = open_repo()?;
    let config = repo.load_config()?;
    require_auth(&config)?;

    let client = registry_client(&config, args.registry.as_deref())?;
    let user = client.me().await.context("failed to fetch account")?;

    println!("{}", user.username.cyan().bold());
    println!("   Email:    {}", user.email);
    println!("   ID:       {}", user.id.to_string().dimmed());
    println!("   Registry: {}", client.base_url());
    Ok(())
}
