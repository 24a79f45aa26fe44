use crate::domain::model::Arch;
use crate::domain::ports::ToolCache;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Runner tool cache laid out as `<root>/<tool>/<version>/<arch>` with a
/// sibling `<arch>.complete` marker written once the copy has finished.
#[derive(Debug, Clone)]
pub struct LocalToolCache {
    root: PathBuf,
    arch: Arch,
}

impl LocalToolCache {
    pub fn new(root: PathBuf, arch: Arch) -> Self {
        Self { root, arch }
    }

    fn tool_path(&self, tool: &str, version: &str) -> PathBuf {
        self.root.join(tool).join(version).join(self.arch.as_str())
    }

    fn marker_path(&self, tool: &str, version: &str) -> PathBuf {
        self.root
            .join(tool)
            .join(version)
            .join(format!("{}.complete", self.arch.as_str()))
    }
}

fn copy_dir_all(source: &Path, dest: &Path) -> std::io::Result<()> {
    for entry in WalkDir::new(source) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(std::io::Error::other)?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            // fs::copy carries the permission bits, so executables stay executable
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

impl ToolCache for LocalToolCache {
    fn find(&self, tool: &str, version: &str) -> Option<PathBuf> {
        // Ranges are never looked up here, only exact versions.
        if semver::Version::parse(version).is_err() {
            tracing::debug!("Not an explicit version, skipping cache lookup: {}", version);
            return None;
        }

        let path = self.tool_path(tool, version);
        if path.is_dir() && self.marker_path(tool, version).is_file() {
            tracing::debug!("Found tool in cache {} {} {}", tool, version, self.arch.as_str());
            Some(path)
        } else {
            tracing::debug!("Tool not in cache: {} {}", tool, version);
            None
        }
    }

    fn cache_dir(&self, source: &Path, tool: &str, version: &str) -> Result<PathBuf> {
        let dest = self.tool_path(tool, version);
        let marker = self.marker_path(tool, version);
        tracing::debug!("Caching {} into {}", source.display(), dest.display());

        if dest.exists() {
            fs::remove_dir_all(&dest)?;
        }
        if marker.exists() {
            fs::remove_file(&marker)?;
        }

        copy_dir_all(source, &dest)?;
        fs::write(&marker, b"")?;

        Ok(dest)
    }
}
