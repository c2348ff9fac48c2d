use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::BufReader;

use super::error::StorageError;
use super::public_id;
use super::traits::{BoxReader, DestroyResult, MediaKind, MediaStore, StoredMedia};

/// Filesystem-backed media store.
///
/// Objects live at `{base_path}/{public_id}` and are published under
/// `{public_url}/{public_id}`, which the server maps back onto this store.
pub struct FilesystemMediaStore {
    base_path: PathBuf,
    public_url: String,
    max_size: u64,
}

impl FilesystemMediaStore {
    /// Create a new filesystem media store.
    pub async fn new(
        base_path: PathBuf,
        public_url: impl Into<String>,
        max_size: u64,
    ) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            public_url: public_url.into().trim_end_matches('/').to_string(),
            max_size,
        })
    }

    fn object_path(&self, public_id: &str) -> Result<PathBuf, StorageError> {
        let public_id = public_id::validate(public_id)?;
        Ok(self.base_path.join(public_id))
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl MediaStore for FilesystemMediaStore {
    async fn upload(
        &self,
        data: &[u8],
        filename: &str,
        kind: MediaKind,
    ) -> Result<StoredMedia, StorageError> {
        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        let public_id = public_id::generate(filename, kind);
        let object_path = self.object_path(&public_id)?;

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Some(parent) = object_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        if let Err(e) = fs::rename(&temp_path, &object_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        tracing::debug!(%public_id, size = data.len(), "Stored media object");

        Ok(StoredMedia {
            url: self.url_for(&public_id),
            public_id,
        })
    }

    async fn destroy(
        &self,
        public_id: &str,
        kind: MediaKind,
    ) -> Result<DestroyResult, StorageError> {
        let object_path = self.object_path(public_id)?;
        // Destroys are scoped to a kind; other folders look empty.
        if !kind.owns(public_id) {
            return Ok(DestroyResult::NotFound);
        }
        match fs::remove_file(&object_path).await {
            Ok(()) => Ok(DestroyResult::Ok),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(DestroyResult::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    async fn open(&self, public_id: &str) -> Result<BoxReader, StorageError> {
        let object_path = self.object_path(public_id)?;
        match fs::File::open(&object_path).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(public_id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn url_for(&self, public_id: &str) -> String {
        format!("{}/{}", self.public_url, public_id)
    }
}
