//! On-disk response cache keyed by request fingerprint
//!
//! Purely a performance layer: a miss, a read error or a write error never
//! changes what a workflow returns.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::infrastructure::http_client::PageRequest;

#[derive(Debug, Clone)]
pub struct ResponseCache {
    directory: PathBuf,
}

impl ResponseCache {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn entry_path(&self, request: &PageRequest) -> PathBuf {
        self.directory.join(request.fingerprint())
    }

    /// Cached body, or `None` on a miss.
    pub async fn load(&self, request: &PageRequest) -> Option<String> {
        match fs::read_to_string(self.entry_path(request)).await {
            Ok(body) => {
                debug!("Cache hit: {} {}", request.method, request.url);
                Some(body)
            }
            Err(_) => None,
        }
    }

    /// Store a body. Written to a temp file and renamed so readers never see a partial entry.
    pub async fn store(&self, request: &PageRequest, body: &str) -> std::io::Result<()> {
        fs::create_dir_all(&self.directory).await?;
        let path = self.entry_path(request);
        let tmp = path.with_extension(format!("tmp-{}", uuid::Uuid::new_v4().simple()));
        fs::write(&tmp, body).await?;
        if let Err(e) = fs::rename(&tmp, &path).await {
            if let Err(cleanup) = fs::remove_file(&tmp).await {
                debug!("Failed to remove {}: {}", tmp.display(), cleanup);
            }
            return Err(e);
        }
        Ok(())
    }

    /// Remove every cached entry.
    pub async fn clear(&self) -> std::io::Result<()> {
        match fs::remove_dir_all(&self.directory).await {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}
