//! CLI utility functions
//!
//! Helpers shared across command handlers: repository discovery, registry
//! client construction and credential prompts.

use anyhow::{Context, Result};
use dialoguer::{Input, Password};

use crate::config::RepoConfig;
use crate::core::repo::Repository;
use crate::error::StateError;
use crate::remote::RegistryClient;

/// Open the repository in the current directory
pub fn open_repo() -> Result<Repository> {
    Ok(Repository::discover()?)
}

/// Registry client for `config`, pointed at `registry_override` if given
pub fn registry_client(config: &RepoConfig, registry_override: Option<&str>) -> Result<RegistryClient> {
    let url = registry_override.unwrap_or_else(|| config.registry_url());
    let client = RegistryClient::new(url)?.with_token(config.token.clone());
    client
        .validate_url()
        .with_context(|| format!("invalid registry URL: {}", url))?;
    Ok(client)
}

/// Fail unless a token and username are stored
pub fn require_auth(config: &RepoConfig) -> Result<()> {
    if !config.is_authenticated() {
        return Err(StateError::NotLoggedIn.into());
    }
    Ok(())
}

/// Use the flag value, or prompt for it
pub fn value_or_prompt(value: Option<String>, prompt: &str) -> Result<String> {
    match value.filter(|v| !v.trim().is_empty()) {
        Some(v) => Ok(v.trim().to_string()),
        None => Input::<String>::new()
            .with_prompt(prompt)
            .interact_text()
            .with_context(|| format!("failed to read {}", prompt.to_lowercase())),
    }
}

/// Use the flag value, or prompt without echo
pub fn password_or_prompt(value: Option<String>, confirm: bool) -> Result<String> {
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        return Ok(v);
    }

    let mut prompt = Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    prompt.interact().context("failed to read password")
}
