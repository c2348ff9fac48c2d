use async_trait::async_trait;
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::region::Region;

use super::error::StorageError;
use super::public_id;
use super::traits::{BoxReader, DestroyResult, MediaKind, MediaStore, StoredMedia};
use crate::config::S3StorageConfig;

/// S3-compatible object store backend.
pub struct S3MediaStore {
    bucket: Box<Bucket>,
    public_url: String,
    max_size: u64,
}

fn backend_err(err: impl std::fmt::Display) -> StorageError {
    StorageError::Backend(err.to_string())
}

impl S3MediaStore {
    pub fn new(
        config: &S3StorageConfig,
        public_url: impl Into<String>,
        max_size: u64,
    ) -> Result<Self, StorageError> {
        let region = match &config.endpoint {
            Some(endpoint) => Region::Custom {
                region: config.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => config.region.parse().map_err(backend_err)?,
        };
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(backend_err)?;

        let mut bucket = Bucket::new(&config.bucket, region, credentials).map_err(backend_err)?;
        if config.path_style {
            bucket = bucket.with_path_style();
        }

        Ok(Self {
            bucket,
            public_url: public_url.into().trim_end_matches('/').to_string(),
            max_size,
        })
    }
}

#[async_trait]
impl MediaStore for S3MediaStore {
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
        let content_type = mime_guess::from_path(filename)
            .first_or_octet_stream()
            .to_string();

        let response = self
            .bucket
            .put_object_with_content_type(&public_id, data, &content_type)
            .await
            .map_err(backend_err)?;
        let status = response.status_code();
        if !(200..300).contains(&status) {
            return Err(StorageError::Backend(format!(
                "upload of {public_id} failed with status {status}"
            )));
        }

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
        let public_id = public_id::validate(public_id)?;
        if !kind.owns(public_id) {
            return Ok(DestroyResult::NotFound);
        }

        // S3 deletes are idempotent; probe first so a missing object reports `NotFound`.
        let (_, head_status) = self
            .bucket
            .head_object(public_id)
            .await
            .map_err(backend_err)?;
        if head_status == 404 {
            return Ok(DestroyResult::NotFound);
        }

        let response = self
            .bucket
            .delete_object(public_id)
            .await
            .map_err(backend_err)?;
        match response.status_code() {
            200..=299 => Ok(DestroyResult::Ok),
            404 => Ok(DestroyResult::NotFound),
            status => Err(StorageError::Backend(format!(
                "delete of {public_id} failed with status {status}"
            ))),
        }
    }

    async fn open(&self, public_id: &str) -> Result<BoxReader, StorageError> {
        let public_id = public_id::validate(public_id)?;
        let response = self
            .bucket
            .get_object(public_id)
            .await
            .map_err(backend_err)?;
        match response.status_code() {
            200..=299 => Ok(Box::new(std::io::Cursor::new(response.bytes().to_vec()))),
            404 => Err(StorageError::NotFound(public_id.to_string())),
            status => Err(StorageError::Backend(format!(
                "fetch of {public_id} failed with status {status}"
            ))),
        }
    }

    fn url_for(&self, public_id: &str) -> String {
        format!("{}/{}", self.public_url, public_id)
    }
}
