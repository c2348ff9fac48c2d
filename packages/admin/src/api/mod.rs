//! Typed wrappers over the catalog endpoints.

pub mod actor;
pub mod movie;
pub mod user;

use reqwest::multipart::Part;

use crate::error::ApiError;

/// A file picked for upload, held in memory.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Read a file from disk, keeping only its file name.
    pub async fn from_path(path: &std::path::Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self { filename, bytes })
    }

    fn mime(&self) -> String {
        mime_guess::from_path(&self.filename)
            .first_or_octet_stream()
            .to_string()
    }

    pub(crate) fn into_part(self) -> Result<Part, ApiError> {
        let mime = self.mime();
        Ok(Part::bytes(self.bytes)
            .file_name(self.filename)
            .mime_str(&mime)?)
    }
}
