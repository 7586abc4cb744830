use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use quill_core::ports::{CoverStorage, StorageError};

const MAX_EXTENSION_LEN: usize = 16;

/// Writes covers into a directory on local disk under random names.
#[derive(Debug, Clone)]
pub struct LocalCoverStorage {
    dir: PathBuf,
}

impl LocalCoverStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

/// Extension kept from a client file name: the last dot-separated segment,
/// ASCII alphanumerics only, lowercased. A name without a dot counts as all
/// extension.
pub(crate) fn cover_extension(original_name: &str) -> String {
    let last = original_name.rsplit('.').next().unwrap_or_default();
    let ext: String = last
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(MAX_EXTENSION_LEN)
        .collect::<String>()
        .to_ascii_lowercase();

    if ext.is_empty() { "bin".to_string() } else { ext }
}

#[async_trait]
impl CoverStorage for LocalCoverStorage {
    async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<String, StorageError> {
        if original_name.trim().is_empty() {
            return Err(StorageError::InvalidName("empty file name".to_string()));
        }

        tokio::fs::create_dir_all(&self.dir).await?;

        let name = format!("{}.{}", Uuid::new_v4().simple(), cover_extension(original_name));
        let path = self.dir.join(&name);
        tokio::fs::write(&path, bytes).await?;

        tracing::debug!(path = %path.display(), size = bytes.len(), "Cover stored");

        let dir = self.dir.to_string_lossy().replace('\\', "/");
        Ok(format!("{}/{}", dir.trim_end_matches('/'), name))
    }
}
