use uuid::Uuid;

use super::error::StorageError;
use super::traits::MediaKind;

const MAX_PUBLIC_ID_LEN: usize = 256;
const MAX_EXTENSION_LEN: usize = 8;

/// Generate a fresh public id: `{folder}/{uuid v7}[.ext]`.
///
/// The extension is taken from the original filename when it is short and alphanumeric,
/// so served files keep a guessable content type.
pub fn generate(filename: &str, kind: MediaKind) -> String {
    let id = Uuid::now_v7();
    match extension(filename) {
        Some(ext) => format!("{}/{id}.{ext}", kind.folder()),
        None => format!("{}/{id}", kind.folder()),
    }
}

fn extension(filename: &str) -> Option<String> {
    let (stem, ext) = filename.trim().rsplit_once('.')?;
    if stem.is_empty()
        || ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Validate a public id before it touches a filesystem path or object key.
pub fn validate(public_id: &str) -> Result<&str, StorageError> {
    let invalid = |msg: &str| Err(StorageError::InvalidPublicId(msg.to_string()));

    if public_id.is_empty() {
        return invalid("public id cannot be empty");
    }
    if public_id.len() > MAX_PUBLIC_ID_LEN {
        return invalid("public id is too long");
    }
    if public_id.starts_with('/') || public_id.contains('\\') {
        return invalid("public id must be a relative forward-slash path");
    }
    if public_id.chars().any(|c| c.is_ascii_control()) {
        return invalid("public id must not contain control characters");
    }
    for segment in public_id.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            return invalid("public id contains an empty or traversal segment");
        }
        if segment.starts_with('.') {
            return invalid("public id segments must not start with '.'");
        }
    }
    Ok(public_id)
}
