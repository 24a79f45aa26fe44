pub mod installer;
pub mod version;

pub use crate::domain::model::{Arch, InstallPlan, Os, Release};
pub use crate::domain::ports::{Downloader, PathPublisher, ReleaseSource, ToolCache, WrapperInstaller};
pub use crate::utils::error::Result;
