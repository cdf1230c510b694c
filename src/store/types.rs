use crate::upload::PendingFile;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Opaque name of one stored document, compared by exact string equality.
pub type DocumentId = String;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to send request: {0}")]
    Request(#[from] reqwest::Error),
    #[error("request failed with status: {0}")]
    Status(StatusCode),
    #[error("failed to parse document list: {0}")]
    Decode(String),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid store url: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// The remote side of the document set.
///
/// `list` and `upload` both answer with the full authoritative list of
/// identifiers; the delete calls answer with nothing the client relies on.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list(&self) -> Result<Vec<DocumentId>>;

    /// Sends all `files` in a single request, each under its base name.
    async fn upload(&self, files: &[PendingFile]) -> Result<Vec<DocumentId>>;

    async fn delete(&self, id: &str) -> Result<()>;

    async fn delete_all(&self) -> Result<()>;
}
