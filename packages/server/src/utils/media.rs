use common::storage::{MediaKind, MediaStore, StoredMedia};

use crate::error::AppError;
use crate::utils::upload::UploadedFile;

/// Destroy a media object, failing unless the store confirms the deletion.
pub async fn destroy_or_fail(
    media: &dyn MediaStore,
    public_id: &str,
    kind: MediaKind,
    failure_message: &str,
) -> Result<(), AppError> {
    match media.destroy(public_id, kind).await {
        Ok(result) if result.is_ok() => {
            tracing::debug!(%public_id, "Removed media object");
            Ok(())
        }
        Ok(result) => {
            tracing::warn!(%public_id, ?result, "Media store did not confirm removal");
            Err(AppError::Upstream(failure_message.to_string()))
        }
        Err(e) => {
            tracing::warn!(%public_id, error = %e, "Media removal failed");
            Err(AppError::Upstream(failure_message.to_string()))
        }
    }
}

/// Upload a received file to the media store.
pub async fn upload(
    media: &dyn MediaStore,
    file: &UploadedFile,
    kind: MediaKind,
) -> Result<StoredMedia, AppError> {
    let stored = media.upload(&file.data, &file.filename, kind).await?;
    tracing::debug!(public_id = %stored.public_id, "Uploaded media object");
    Ok(stored)
}
