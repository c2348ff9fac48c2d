use std::path::PathBuf;

use serde::Deserialize;

/// Which media store backend to use.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Filesystem,
    S3,
}

/// Media storage configuration shared by every process that touches uploads.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageAppConfig {
    /// Backend selector. Default: filesystem.
    #[serde(default)]
    pub backend: StorageBackend,
    /// Maximum accepted upload size in bytes. Default: 100 MB.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,
    /// Base URL under which stored objects are reachable. Default: "http://127.0.0.1:8000/media".
    #[serde(default = "default_public_url")]
    pub public_url: String,
    #[serde(default)]
    pub filesystem: FilesystemStorageConfig,
    /// Required when `backend = "s3"`.
    pub s3: Option<S3StorageConfig>,
}

/// Filesystem backend settings.
#[derive(Debug, Deserialize, Clone)]
pub struct FilesystemStorageConfig {
    /// Root directory for stored objects. Default: "./data/media".
    #[serde(default = "default_filesystem_root")]
    pub root: PathBuf,
}

/// S3-compatible backend settings.
#[derive(Debug, Deserialize, Clone)]
pub struct S3StorageConfig {
    pub bucket: String,
    /// AWS region name, or an arbitrary label when `endpoint` is set.
    #[serde(default = "default_s3_region")]
    pub region: String,
    /// Custom endpoint for MinIO and other S3-compatible services.
    pub endpoint: Option<String>,
    pub access_key: String,
    pub secret_key: String,
    /// Use path-style addressing. Default: false.
    #[serde(default)]
    pub path_style: bool,
}

fn default_max_upload_size() -> u64 {
    100 * 1024 * 1024
}
fn default_public_url() -> String {
    "http://127.0.0.1:8000/media".into()
}
fn default_filesystem_root() -> PathBuf {
    PathBuf::from("./data/media")
}
fn default_s3_region() -> String {
    "us-east-1".into()
}

impl Default for FilesystemStorageConfig {
    fn default() -> Self {
        Self {
            root: default_filesystem_root(),
        }
    }
}

impl Default for StorageAppConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            max_upload_size: default_max_upload_size(),
            public_url: default_public_url(),
            filesystem: FilesystemStorageConfig::default(),
            s3: None,
        }
    }
}
