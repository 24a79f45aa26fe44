use crate::domain::model::Release;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Lists published releases, newest first.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    async fn list_releases(&self) -> Result<Vec<Release>>;
}

/// Fetches and unpacks release archives into scratch space.
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn download_tool(&self, url: &str) -> Result<PathBuf>;
    async fn extract_tar(&self, archive: &Path, folder: &str) -> Result<PathBuf>;
}

/// Directory cache keyed by tool name and version.
pub trait ToolCache: Send + Sync {
    fn find(&self, tool: &str, version: &str) -> Option<PathBuf>;
    fn cache_dir(&self, source: &Path, tool: &str, version: &str) -> Result<PathBuf>;
}

/// Exposes a directory on the execution path of later steps.
pub trait PathPublisher: Send + Sync {
    fn add_path(&self, dir: &Path) -> Result<()>;
}

/// Installs a shim in front of an installed binary. Returns the shim directory.
pub trait WrapperInstaller: Send + Sync {
    fn install(&self, original_name: &str, binary_dir: &Path) -> Result<PathBuf>;
}
