use crate::core::version::resolve_version;
use crate::domain::model::{InstallPlan, Os};
use crate::domain::ports::{Downloader, PathPublisher, ReleaseSource, ToolCache, WrapperInstaller};
use crate::utils::error::Result;
use std::path::PathBuf;

pub const TOOL_NAME: &str = "kced";

/// What a single run was asked to do.
#[derive(Debug, Clone)]
pub struct InstallRequest {
    pub version: String,
    pub os: Os,
    pub download_base: String,
    pub wrapper: bool,
}

/// Outcome of a run, mostly useful for logging and tests.
#[derive(Debug, Clone)]
pub struct Installation {
    pub plan: InstallPlan,
    pub tool_dir: PathBuf,
    pub from_cache: bool,
}

pub struct Installer<R, D, C, P, W>
where
    R: ReleaseSource,
    D: Downloader,
    C: ToolCache,
    P: PathPublisher,
    W: WrapperInstaller,
{
    releases: R,
    downloader: D,
    cache: C,
    publisher: P,
    wrapper: W,
}

impl<R, D, C, P, W> Installer<R, D, C, P, W>
where
    R: ReleaseSource,
    D: Downloader,
    C: ToolCache,
    P: PathPublisher,
    W: WrapperInstaller,
{
    pub fn new(releases: R, downloader: D, cache: C, publisher: P, wrapper: W) -> Self {
        Self {
            releases,
            downloader,
            cache,
            publisher,
            wrapper,
        }
    }

    pub async fn run(&self, request: &InstallRequest) -> Result<Installation> {
        let version = resolve_version(&request.version, &self.releases).await?;
        let plan = InstallPlan::new(&request.download_base, version, request.os);

        tracing::debug!("Install plan: {:?}", plan);
        println!("Installing {} version {}", TOOL_NAME, plan.full_version);

        let (tool_dir, from_cache) = match self.cache.find(TOOL_NAME, &plan.full_version) {
            Some(dir) => {
                tracing::debug!("Found cached {} at {}", TOOL_NAME, dir.display());
                (dir, true)
            }
            None => {
                tracing::debug!("Downloading {}", plan.download_url);
                let archive = self.downloader.download_tool(&plan.download_url).await?;

                let extracted = self
                    .downloader
                    .extract_tar(&archive, &plan.extract_folder())
                    .await?;
                tracing::debug!("Extracted archive to {}", extracted.display());

                let dir = self
                    .cache
                    .cache_dir(&extracted, TOOL_NAME, &plan.full_version)?;
                (dir, false)
            }
        };

        self.publisher.add_path(&tool_dir)?;

        if request.wrapper {
            let shim_dir = self.wrapper.install(TOOL_NAME, &tool_dir)?;
            self.publisher.add_path(&shim_dir)?;
        }

        Ok(Installation {
            plan,
            tool_dir,
            from_cache,
        })
    }
}
