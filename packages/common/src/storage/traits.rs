use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt};

use super::error::StorageError;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// The kind of media an upload carries. Each kind lives in its own folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Folder prefix for public ids of this kind.
    pub fn folder(self) -> &'static str {
        match self {
            Self::Image => "images",
            Self::Video => "videos",
        }
    }

    /// Whether a public id lives in this kind's folder.
    pub fn owns(self, public_id: &str) -> bool {
        public_id
            .strip_prefix(self.folder())
            .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Whether a file with this name is accepted for this kind, judged by its extension.
    pub fn accepts_filename(self, filename: &str) -> bool {
        let wanted = match self {
            Self::Image => mime_guess::mime::IMAGE,
            Self::Video => mime_guess::mime::VIDEO,
        };
        mime_guess::from_path(filename)
            .iter()
            .any(|m| m.type_() == wanted)
    }

    /// Message returned to clients when a file of the wrong type is uploaded.
    pub fn rejection_message(self) -> &'static str {
        match self {
            Self::Image => "Supports only image files!",
            Self::Video => "Supports only video files!",
        }
    }
}

/// A stored media object: the opaque id used for deletion and the URL clients fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StoredMedia {
    /// Opaque identifier inside the media store.
    #[schema(example = "images/01936f0e-1234-7abc-8000-000000000001.jpg")]
    pub public_id: String,
    /// Publicly reachable URL.
    #[schema(example = "http://127.0.0.1:8000/media/images/01936f0e-1234-7abc-8000-000000000001.jpg")]
    pub url: String,
}

/// Outcome of a destroy call, mirroring the `ok` / `not found` answers of hosted media services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyResult {
    Ok,
    NotFound,
}

impl DestroyResult {
    pub fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// Media storage addressed by opaque public ids.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store an uploaded file and return its public id and URL.
    async fn upload(
        &self,
        data: &[u8],
        filename: &str,
        kind: MediaKind,
    ) -> Result<StoredMedia, StorageError>;

    /// Delete a media object by public id.
    async fn destroy(&self, public_id: &str, kind: MediaKind)
    -> Result<DestroyResult, StorageError>;

    /// Open a media object as a streaming reader.
    async fn open(&self, public_id: &str) -> Result<BoxReader, StorageError>;

    /// Read a whole media object into memory.
    async fn read(&self, public_id: &str) -> Result<Vec<u8>, StorageError> {
        let mut reader = self.open(public_id).await?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(buf)
    }

    /// Public URL for a public id.
    fn url_for(&self, public_id: &str) -> String;
}
