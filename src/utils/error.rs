use thiserror::Error;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("No releases found in {repo}")]
    NoReleases { repo: String },

    #[error("Invalid version provided: '{version}'")]
    InvalidVersion { version: String },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("GitHub API returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Download of {url} failed with HTTP {status}")]
    DownloadError { url: String, status: u16 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl SetupError {
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SetupError::NoReleases { .. } => {
                "Set the kced-version input to a released version of go-apiops"
            }
            SetupError::InvalidVersion { .. } => {
                "Use a semantic version such as 0.1.11 (partial versions like 0.1 are accepted)"
            }
            SetupError::ApiError { status: 401, .. } | SetupError::ApiError { status: 403, .. } => {
                "Check the token input or provide one to avoid API rate limits"
            }
            SetupError::ApiError { .. } | SetupError::HttpError(_) => {
                "Check network connectivity to the GitHub API and retry the job"
            }
            SetupError::DownloadError { .. } => {
                "Check that a go-apiops release exists for this version and platform"
            }
            SetupError::IoError(_) => {
                "Check that RUNNER_TOOL_CACHE and RUNNER_TEMP are writable"
            }
            SetupError::SerializationError(_) => "The GitHub API response was not understood",
            SetupError::ConfigError { .. } | SetupError::InvalidConfigValueError { .. } => {
                "Review the action inputs and runner environment"
            }
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            SetupError::NoReleases { .. }
            | SetupError::InvalidVersion { .. }
            | SetupError::ConfigError { .. }
            | SetupError::InvalidConfigValueError { .. } => 1,
            SetupError::HttpError(_)
            | SetupError::ApiError { .. }
            | SetupError::DownloadError { .. } => 2,
            SetupError::IoError(_) | SetupError::SerializationError(_) => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, SetupError>;
