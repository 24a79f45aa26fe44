use crate::domain::model::Release;
use crate::domain::ports::ReleaseSource;
use crate::utils::error::{Result, SetupError};
use reqwest::Client;
use serde::Deserialize;

pub const RELEASES_OWNER: &str = "Kong";
pub const RELEASES_REPO_NAME: &str = "go-apiops";

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Release listing from the GitHub REST API.
pub struct GitHubReleases {
    client: Client,
    api_url: String,
    token: Option<String>,
}

impl GitHubReleases {
    pub fn new(client: Client, api_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    fn releases_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/releases",
            self.api_url.trim_end_matches('/'),
            RELEASES_OWNER,
            RELEASES_REPO_NAME
        )
    }
}

#[async_trait::async_trait]
impl ReleaseSource for GitHubReleases {
    async fn list_releases(&self) -> Result<Vec<Release>> {
        let url = self.releases_url();
        tracing::debug!("Making API request to: {}", url);

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {}", token));
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.message)
                .unwrap_or(body);
            return Err(SetupError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let releases: Vec<Release> = serde_json::from_str(&body)?;
        tracing::debug!("Found {} releases", releases.len());
        Ok(releases)
    }
}
