// Application layer: wires the runner adapters into an installer.

use crate::adapters::download::HttpDownloader;
use crate::adapters::github::GitHubReleases;
use crate::adapters::runner::{RunnerFiles, RunnerPath};
use crate::adapters::tool_cache::LocalToolCache;
use crate::adapters::wrapper::ShimWrapper;
use crate::config::ActionConfig;
use crate::core::installer::{Installation, Installer};
use crate::domain::model::Arch;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use reqwest::Client;

pub type RunnerInstaller =
    Installer<GitHubReleases, HttpDownloader, LocalToolCache, RunnerPath, ShimWrapper>;

const USER_AGENT: &str = concat!("setup-kced/", env!("CARGO_PKG_VERSION"));

pub fn build_installer(config: &ActionConfig, files: RunnerFiles) -> Result<RunnerInstaller> {
    let client = Client::builder().user_agent(USER_AGENT).build()?;
    let temp_dir = config.runner_temp_dir();
    let launcher = std::env::current_exe()?;

    Ok(Installer::new(
        GitHubReleases::new(client.clone(), config.api_url.clone(), config.token()),
        HttpDownloader::new(client, temp_dir.clone())
            .with_retries(config.download_attempts, config.retry_delay()),
        LocalToolCache::new(config.tool_cache_dir(), Arch::current()),
        RunnerPath::new(files),
        ShimWrapper::new(temp_dir.join("kced-wrapper"), launcher, config.os()),
    ))
}

/// Validates the configuration and performs one install.
pub async fn run_action(config: &ActionConfig, files: RunnerFiles) -> Result<Installation> {
    config.validate()?;
    tracing::debug!(
        "Requested version '{}' for {} (tool cache {}, token {})",
        config.kced_version,
        config.os(),
        config.tool_cache_dir().display(),
        if config.token().is_some() { "set" } else { "unset" }
    );

    let installer = build_installer(config, files)?;
    installer.run(&config.install_request()).await
}
