use crate::workflow::config::ThumbnailConfig;
use anyhow::{bail, Context};
use icaocore::notify::Thumbnails;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;

const UNAVAILABLE: &str = "unavailable.jpg";

/// On-disk cache of aircraft photos keyed by ICAO code.
pub struct ThumbnailCache {
    client: reqwest::Client,
    cache_dir: PathBuf,
    url_template: String,
}

impl ThumbnailCache {
    pub fn new(config: &ThumbnailConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("creating thumbnail HTTP client")?;
        Ok(Self {
            client,
            cache_dir: config.cache_dir.clone(),
            url_template: config.url_template.clone(),
        })
    }

    pub fn unavailable_path(&self) -> PathBuf {
        self.cache_dir.join(UNAVAILABLE)
    }

    /// Local image path for `icao`, downloading it on a cache miss. Any
    /// failure yields [`Self::unavailable_path`].
    pub async fn path_for(&self, icao: &str) -> PathBuf {
        if icao.is_empty() || !icao.chars().all(|c| c.is_ascii_alphanumeric()) {
            return self.unavailable_path();
        }

        let path = self.cache_dir.join(format!("{}.jpg", icao));
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return path;
        }

        match self.download(icao, &path).await {
            Ok(()) => {
                debug!("cached thumbnail for {}", icao);
                path
            }
            Err(err) => {
                warn!("thumbnail for {} unavailable: {:#}", icao, err);
                self.unavailable_path()
            }
        }
    }

    pub async fn paths_for<'a, I>(&self, icaos: I) -> Thumbnails
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut thumbnails = Thumbnails::new();
        for icao in icaos {
            thumbnails.insert(icao.clone(), self.path_for(icao).await);
        }
        thumbnails
    }

    async fn download(&self, icao: &str, path: &Path) -> anyhow::Result<()> {
        let url = self.url_template.replace("{icao}", icao);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("requesting {}", url))?;
        if !response.status().is_success() {
            bail!("HTTP {} from {}", response.status(), url);
        }
        let bytes = response.bytes().await.context("reading image body")?;

        tokio::fs::create_dir_all(&self.cache_dir)
            .await
            .with_context(|| format!("creating {}", self.cache_dir.display()))?;
        store(path, &bytes).await
    }
}

/// Writes `bytes` next to `path` and renames into place, so a partial write
/// never shows up as a cache hit.
async fn store(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let partial = path.with_extension("jpg.part");
    let written = async {
        tokio::fs::write(&partial, bytes)
            .await
            .with_context(|| format!("writing {}", partial.display()))?;
        tokio::fs::rename(&partial, path)
            .await
            .with_context(|| format!("moving {} into place", path.display()))
    }
    .await;

    if written.is_err() {
        let _ = tokio::fs::remove_file(&partial).await;
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cache(dir: &TempDir) -> ThumbnailCache {
        ThumbnailCache::new(&ThumbnailConfig {
            cache_dir: dir.path().to_path_buf(),
            url_template: "http://127.0.0.1:9/photos/{icao}".into(),
            timeout_secs: 1,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn cached_image_is_returned_without_download() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("AE1234.jpg"), b"jpeg").unwrap();
        let path = cache(&dir).path_for("AE1234").await;
        assert_eq!(path, dir.path().join("AE1234.jpg"));
    }

    #[tokio::test]
    async fn failures_degrade_to_unavailable() {
        let dir = TempDir::new().unwrap();
        let cache = cache(&dir);
        assert_eq!(cache.path_for("../etc").await, cache.unavailable_path());
        assert_eq!(cache.path_for("A0FFEE").await, cache.unavailable_path());
        assert!(!dir.path().join("A0FFEE.jpg").exists());
    }

    #[tokio::test]
    async fn store_moves_complete_image_into_place() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("AE1234.jpg");

        store(&path, b"jpeg").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"jpeg");
        assert!(!dir.path().join("AE1234.jpg.part").exists());
    }

    #[tokio::test]
    async fn failed_store_leaves_no_cache_entry() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("AE1234.jpg");
        // a non-empty directory at the target makes the rename fail
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), b"x").unwrap();

        assert!(store(&path, b"jpeg").await.is_err());
        assert!(!dir.path().join("AE1234.jpg.part").exists());
        assert!(!path.is_file());
    }
}
