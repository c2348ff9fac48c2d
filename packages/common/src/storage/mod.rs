mod error;
mod traits;

pub mod filesystem;
pub mod public_id;
#[cfg(feature = "object-storage")]
pub mod object_store;

use std::sync::Arc;

pub use error::StorageError;
pub use traits::{BoxReader, DestroyResult, MediaKind, MediaStore, StoredMedia};

use crate::config::{StorageAppConfig, StorageBackend};

/// Build the media store selected by configuration.
pub async fn build_media_store(
    config: &StorageAppConfig,
) -> Result<Arc<dyn MediaStore>, StorageError> {
    match config.backend {
        StorageBackend::Filesystem => {
            let store = filesystem::FilesystemMediaStore::new(
                config.filesystem.root.clone(),
                &config.public_url,
                config.max_upload_size,
            )
            .await?;
            tracing::info!(root = %config.filesystem.root.display(), "Using filesystem media store");
            Ok(Arc::new(store))
        }
        #[cfg(feature = "object-storage")]
        StorageBackend::S3 => {
            let s3_config = config.s3.as_ref().ok_or_else(|| {
                StorageError::Backend("storage.backend is s3 but [storage.s3] is missing".into())
            })?;
            let store =
                object_store::S3MediaStore::new(s3_config, &config.public_url, config.max_upload_size)?;
            tracing::info!(bucket = %s3_config.bucket, "Using S3 media store");
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "object-storage"))]
        StorageBackend::S3 => Err(StorageError::Backend(
            "S3 backend requires the `object-storage` feature".into(),
        )),
    }
}
