use crate::domain::ports::Downloader;
use crate::utils::error::{Result, SetupError};
use flate2::read::GzDecoder;
use reqwest::{Client, StatusCode};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tar::Archive;
use uuid::Uuid;

/// Downloads into, and extracts under, the runner temp directory.
pub struct HttpDownloader {
    client: Client,
    temp_dir: PathBuf,
    attempts: u32,
    retry_delay: Duration,
}

impl HttpDownloader {
    pub fn new(client: Client, temp_dir: PathBuf) -> Self {
        Self {
            client,
            temp_dir,
            attempts: 3,
            retry_delay: Duration::from_secs(10),
        }
    }

    pub fn with_retries(mut self, attempts: u32, retry_delay: Duration) -> Self {
        self.attempts = attempts.max(1);
        self.retry_delay = retry_delay;
        self
    }

    fn unique_path(&self) -> PathBuf {
        self.temp_dir.join(Uuid::new_v4().to_string())
    }

    async fn fetch_once(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("Download response status: {}", status);

        if !status.is_success() {
            return Err(SetupError::DownloadError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

fn is_retryable(err: &SetupError) -> bool {
    match err {
        SetupError::HttpError(_) => true,
        SetupError::DownloadError { status, .. } => {
            let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            status.is_server_error()
                || status == StatusCode::REQUEST_TIMEOUT
                || status == StatusCode::TOO_MANY_REQUESTS
        }
        _ => false,
    }
}

/// Unpacks a gzipped tarball into `dest`.
pub fn unpack_tar_gz(archive: &Path, dest: &Path) -> Result<()> {
    std::fs::create_dir_all(dest)?;
    let file = File::open(archive)?;
    let mut tar = Archive::new(GzDecoder::new(file));
    tar.set_preserve_permissions(true);
    tar.unpack(dest)?;
    Ok(())
}

#[async_trait::async_trait]
impl Downloader for HttpDownloader {
    async fn download_tool(&self, url: &str) -> Result<PathBuf> {
        let mut attempt = 1;
        let data = loop {
            match self.fetch_once(url).await {
                Ok(data) => break data,
                Err(e) if attempt < self.attempts && is_retryable(&e) => {
                    tracing::warn!(
                        "Download attempt {}/{} failed: {}. Retrying in {:?}",
                        attempt,
                        self.attempts,
                        e,
                        self.retry_delay
                    );
                    tokio::time::sleep(self.retry_delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        };

        tokio::fs::create_dir_all(&self.temp_dir).await?;
        let dest = self.unique_path();
        tracing::debug!("Writing {} bytes to {}", data.len(), dest.display());
        tokio::fs::write(&dest, &data).await?;
        Ok(dest)
    }

    async fn extract_tar(&self, archive: &Path, folder: &str) -> Result<PathBuf> {
        let dest = self.temp_dir.join(folder);
        let archive = archive.to_path_buf();
        let target = dest.clone();

        tokio::task::spawn_blocking(move || unpack_tar_gz(&archive, &target))
            .await
            .map_err(|e| SetupError::IoError(std::io::Error::other(e)))??;

        Ok(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use httpmock::prelude::*;
    use tempfile::TempDir;

    fn tarball(files: &[(&str, &[u8])]) -> Vec<u8> {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (name, content) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o755);
            header.set_cksum();
            builder.append_data(&mut header, name, *content).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap()
    }

    #[tokio::test]
    async fn test_download_and_extract() {
        let temp = TempDir::new().unwrap();
        let server = MockServer::start();
        let body = tarball(&[("kced", b"#!/bin/sh\necho kced\n"), ("LICENSE", b"Apache-2.0")]);

        let download_mock = server.mock(|when, then| {
            when.method(GET).path("/kced.tar.gz");
            then.status(200).body(body.clone());
        });

        let downloader = HttpDownloader::new(Client::new(), temp.path().to_path_buf());
        let archive = downloader
            .download_tool(&server.url("/kced.tar.gz"))
            .await
            .unwrap();

        download_mock.assert();
        assert!(archive.starts_with(temp.path()));
        assert_eq!(std::fs::read(&archive).unwrap(), body);

        let extracted = downloader
            .extract_tar(&archive, "go-apiops_0.1.11-linux")
            .await
            .unwrap();

        assert_eq!(extracted, temp.path().join("go-apiops_0.1.11-linux"));
        assert_eq!(
            std::fs::read_to_string(extracted.join("kced")).unwrap(),
            "#!/bin/sh\necho kced\n"
        );
        assert!(extracted.join("LICENSE").exists());
    }

    #[test]
    fn test_download_paths_are_unique_uuids() {
        let temp = TempDir::new().unwrap();
        let downloader = HttpDownloader::new(Client::new(), temp.path().to_path_buf());

        let first = downloader.unique_path();
        let second = downloader.unique_path();

        assert_ne!(first, second);
        assert_eq!(first.parent(), Some(temp.path()));
        let name = first.file_name().unwrap().to_str().unwrap();
        assert_eq!(Uuid::parse_str(name).unwrap().get_version_num(), 4);
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let temp = TempDir::new().unwrap();
        let server = MockServer::start();
        let download_mock = server.mock(|when, then| {
            when.method(GET).path("/missing.tar.gz");
            then.status(404);
        });

        let downloader = HttpDownloader::new(Client::new(), temp.path().to_path_buf())
            .with_retries(3, Duration::ZERO);
        let err = downloader
            .download_tool(&server.url("/missing.tar.gz"))
            .await
            .unwrap_err();

        download_mock.assert_hits(1);
        assert!(matches!(err, SetupError::DownloadError { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_server_errors_are_retried() {
        let temp = TempDir::new().unwrap();
        let server = MockServer::start();
        let download_mock = server.mock(|when, then| {
            when.method(GET).path("/flaky.tar.gz");
            then.status(503);
        });

        let downloader = HttpDownloader::new(Client::new(), temp.path().to_path_buf())
            .with_retries(3, Duration::ZERO);
        let err = downloader
            .download_tool(&server.url("/flaky.tar.gz"))
            .await
            .unwrap_err();

        download_mock.assert_hits(3);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_unpack_rejects_non_gzip() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("not-a-tarball");
        std::fs::write(&archive, b"plain text").unwrap();

        assert!(unpack_tar_gz(&archive, &temp.path().join("out")).is_err());
    }
}
