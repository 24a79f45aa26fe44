pub mod cli;

use crate::core::installer::InstallRequest;
use crate::domain::model::Os;
use crate::utils::error::Result;
use crate::utils::validation::{
    parse_bool_input, validate_path, validate_positive_number, validate_url, Validate,
};
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

pub const DOWNLOAD_REPO_PATH: &str = "Kong/go-apiops";

/// Action inputs and runner environment. Every flag falls back to the
/// variable the runner sets for a JavaScript or container action.
#[derive(Debug, Clone, Args)]
pub struct ActionConfig {
    /// Version of kced to install; empty installs the latest release
    #[arg(long = "kced-version", env = "INPUT_KCED-VERSION", default_value = "")]
    pub kced_version: String,

    /// Token used when listing releases
    #[arg(long, env = "INPUT_TOKEN", default_value = "", hide_env_values = true)]
    pub token: String,

    /// Install a wrapper exposing stdout, stderr and exitcode as step outputs
    #[arg(long, env = "INPUT_WRAPPER", default_value = "false")]
    pub wrapper: String,

    /// Platform identifier to download for (win32, darwin, linux); defaults to the host
    #[arg(long)]
    pub platform: Option<String>,

    #[arg(long, env = "RUNNER_TOOL_CACHE")]
    pub tool_cache: Option<PathBuf>,

    #[arg(long, env = "RUNNER_TEMP")]
    pub temp_dir: Option<PathBuf>,

    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    pub api_url: String,

    #[arg(long, env = "GITHUB_SERVER_URL", default_value = "https://github.com")]
    pub server_url: String,

    #[arg(long, default_value = "3")]
    pub download_attempts: u32,

    #[arg(long, default_value = "10")]
    pub retry_delay_secs: u64,

    #[arg(long, env = "RUNNER_DEBUG", help = "Enable verbose output")]
    pub verbose: bool,
}

impl ActionConfig {
    pub fn os(&self) -> Os {
        self.platform
            .as_deref()
            .map(Os::from_platform)
            .unwrap_or_else(Os::current)
    }

    pub fn wrapper_enabled(&self) -> bool {
        parse_bool_input("wrapper", &self.wrapper)
    }

    pub fn token(&self) -> Option<String> {
        Some(self.token.clone()).filter(|t| !t.trim().is_empty())
    }

    pub fn tool_cache_dir(&self) -> PathBuf {
        self.tool_cache
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("setup-kced").join("toolcache"))
    }

    pub fn runner_temp_dir(&self) -> PathBuf {
        self.temp_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("setup-kced").join("temp"))
    }

    pub fn download_base(&self) -> String {
        format!("{}/{}", self.server_url.trim_end_matches('/'), DOWNLOAD_REPO_PATH)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    pub fn install_request(&self) -> InstallRequest {
        InstallRequest {
            version: self.kced_version.clone(),
            os: self.os(),
            download_base: self.download_base(),
            wrapper: self.wrapper_enabled(),
        }
    }
}

impl Validate for ActionConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api_url", &self.api_url)?;
        validate_url("server_url", &self.server_url)?;
        validate_path("tool_cache", &self.tool_cache_dir().to_string_lossy())?;
        validate_path("temp_dir", &self.runner_temp_dir().to_string_lossy())?;
        validate_positive_number("download_attempts", self.download_attempts, 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::cli::Cli;
    use clap::Parser;

    fn parse(args: &[&str]) -> ActionConfig {
        let mut argv = vec!["setup-kced"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().config
    }

    #[test]
    fn test_flags_build_install_request() {
        let config = parse(&[
            "--kced-version",
            "1.7",
            "--wrapper",
            "true",
            "--platform",
            "win32",
            "--server-url",
            "https://github.example.com/",
        ]);

        let request = config.install_request();
        assert_eq!(request.version, "1.7");
        assert_eq!(request.os, Os::Windows);
        assert!(request.wrapper);
        assert_eq!(request.download_base, "https://github.example.com/Kong/go-apiops");
    }

    #[test]
    fn test_explicit_paths_are_used() {
        let config = parse(&["--tool-cache", "/opt/cache", "--temp-dir", "/opt/temp"]);
        assert_eq!(config.tool_cache_dir(), PathBuf::from("/opt/cache"));
        assert_eq!(config.runner_temp_dir(), PathBuf::from("/opt/temp"));
    }

    #[test]
    fn test_validation() {
        let mut config = parse(&["--platform", "linux"]);
        assert!(config.validate().is_ok());
        assert_eq!(config.os(), Os::Linux);

        config.api_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.api_url = "https://api.github.com".to_string();
        config.download_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_token_is_none() {
        let mut config = parse(&[]);
        config.token = "   ".to_string();
        assert_eq!(config.token(), None);
        config.token = "ghp_abc".to_string();
        assert_eq!(config.token().as_deref(), Some("ghp_abc"));
    }
}
