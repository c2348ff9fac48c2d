use std::collections::HashMap;

use axum::extract::Multipart;
use axum::extract::multipart::Field;
use common::storage::MediaKind;

use crate::error::AppError;

/// A file received through a multipart form, fully buffered.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Text fields and the (optional) file of a multipart form.
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl MultipartForm {
    /// Trimmed value of a text field, `None` when absent or blank.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Trimmed value of a required text field.
    pub fn require(&self, name: &str, message: &str) -> Result<&str, AppError> {
        self.text(name)
            .ok_or_else(|| AppError::Validation(message.to_string()))
    }
}

/// Drain a multipart request. The part named `file_field` is read as a file of the
/// given kind; every other named part is read as text.
pub async fn read_multipart(
    mut multipart: Multipart,
    file_field: &str,
    kind: MediaKind,
    max_size: u64,
) -> Result<MultipartForm, AppError> {
    let mut form = MultipartForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        let Some(name) = field.name().map(|s| s.to_string()) else {
            continue;
        };

        if name == file_field {
            // Browsers send an empty part when no file was chosen.
            if let Some(file) = read_file_field(field, kind, max_size).await? {
                form.file = Some(file);
            }
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read {name}: {e}")))?;
            form.fields.insert(name, text);
        }
    }

    Ok(form)
}

async fn read_file_field(
    mut field: Field<'_>,
    kind: MediaKind,
    max_size: u64,
) -> Result<Option<UploadedFile>, AppError> {
    let filename = match field.file_name().map(str::trim) {
        Some(name) if !name.is_empty() => validate_filename(name)?.to_string(),
        _ => return Ok(None),
    };

    if !kind.accepts_filename(&filename) {
        return Err(AppError::Validation(kind.rejection_message().into()));
    }

    let mut data = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
    {
        if (data.len() + chunk.len()) as u64 > max_size {
            return Err(AppError::Validation(format!(
                "File exceeds maximum size of {max_size} bytes"
            )));
        }
        data.extend_from_slice(&chunk);
    }

    if data.is_empty() {
        return Ok(None);
    }

    Ok(Some(UploadedFile { filename, data }))
}

/// Reject upload filenames that could smuggle paths or header-breaking characters.
pub fn validate_filename(filename: &str) -> Result<&str, AppError> {
    let invalid = |msg: &str| Err(AppError::Validation(format!("Invalid filename: {msg}")));

    if filename.chars().any(|c| c.is_ascii_control()) {
        return invalid("control characters are not allowed");
    }
    if filename.contains('/') || filename.contains('\\') {
        return invalid("path separators are not allowed");
    }
    if filename.starts_with('.') {
        return invalid("hidden files are not allowed");
    }
    Ok(filename)
}
