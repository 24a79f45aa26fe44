use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating system label used in go-apiops release asset names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    Linux,
    Darwin,
    Windows,
}

impl Os {
    /// Maps a platform identifier to an asset label.
    ///
    /// `win32` and `darwin` are the runner spellings; `windows` and `macos`
    /// are what `std::env::consts::OS` reports. Everything else is Linux.
    pub fn from_platform(platform: &str) -> Self {
        match platform {
            "win32" | "windows" => Os::Windows,
            "darwin" | "macos" => Os::Darwin,
            _ => Os::Linux,
        }
    }

    pub fn current() -> Self {
        Self::from_platform(std::env::consts::OS)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Os::Linux => "linux",
            Os::Darwin => "darwin",
            Os::Windows => "windows",
        }
    }

    pub fn executable_name(&self, name: &str) -> String {
        match self {
            Os::Windows => format!("{}.exe", name),
            _ => name.to_string(),
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Host architecture as named inside the runner tool cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arch(String);

impl Arch {
    pub fn current() -> Self {
        Self::from_rust_arch(std::env::consts::ARCH)
    }

    pub fn from_rust_arch(arch: &str) -> Self {
        let label = match arch {
            "x86_64" => "x64",
            "aarch64" => "arm64",
            "x86" => "ia32",
            other => other,
        };
        Arch(label.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One entry of the releases listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    pub tag_name: String,
}

/// Everything derived from the resolved version before touching the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    pub version: String,
    pub os: Os,
    pub full_version: String,
    pub download_url: String,
}

impl InstallPlan {
    pub fn new(download_base: &str, version: String, os: Os) -> Self {
        let full_version = format!("{}-{}", version, os);
        let download_url = format!(
            "{}/releases/download/v{version}/go-apiops_{version}_{os}_amd64.tar.gz",
            download_base.trim_end_matches('/'),
            version = version,
            os = os
        );
        Self {
            version,
            os,
            full_version,
            download_url,
        }
    }

    /// Folder name the archive is unpacked into before caching.
    pub fn extract_folder(&self) -> String {
        format!("go-apiops_{}", self.full_version)
    }
}
