//! Post content and cover image ports.

use async_trait::async_trait;

/// Strips unsafe markup from user-submitted HTML.
pub trait HtmlSanitizer: Send + Sync {
    fn sanitize(&self, html: &str) -> String;
}

/// Persists uploaded cover images.
#[async_trait]
pub trait CoverStorage: Send + Sync {
    /// Store the bytes under a fresh name and return the cover path to record on the post.
    async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<String, StorageError>;
}

/// Cover storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid file name: {0}")]
    InvalidName(String),
}
