use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::storage::filesystem::FilesystemObjectStore;
use crate::storage::{ObjectStore, StorageError};

/// Object storage backend selection.
///
/// Tagged by `backend`, e.g. `GALLERY__STORAGE__BACKEND=s3`.
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
    Filesystem {
        /// Root directory objects are written under. Default: "./data/objects".
        #[serde(default = "default_directory")]
        directory: PathBuf,
        /// URL prefix objects are publicly served from. Default: "/media".
        #[serde(default = "default_public_base_url")]
        public_base_url: String,
    },
    #[cfg(feature = "object-storage")]
    S3 {
        bucket: String,
        /// Default: "us-east-1".
        #[serde(default = "default_region")]
        region: String,
        /// Custom endpoint for S3-compatible services (MinIO, R2, ...).
        endpoint: Option<String>,
        access_key: Option<String>,
        secret_key: Option<String>,
        public_base_url: String,
        #[serde(default)]
        path_style: bool,
    },
}

fn default_directory() -> PathBuf {
    PathBuf::from("./data/objects")
}
fn default_public_base_url() -> String {
    "/media".into()
}
#[cfg(feature = "object-storage")]
fn default_region() -> String {
    "us-east-1".into()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Filesystem {
            directory: default_directory(),
            public_base_url: default_public_base_url(),
        }
    }
}

impl StorageConfig {
    /// Build the configured backend. Called once at start-up.
    pub async fn connect(&self, max_size: u64) -> Result<Arc<dyn ObjectStore>, StorageError> {
        match self {
            Self::Filesystem {
                directory,
                public_base_url,
            } => {
                info!("Using filesystem storage at {:?}", directory);
                let store =
                    FilesystemObjectStore::new(directory.clone(), public_base_url, max_size)
                        .await?;
                Ok(Arc::new(store))
            }
            #[cfg(feature = "object-storage")]
            Self::S3 {
                bucket,
                region,
                endpoint,
                access_key,
                secret_key,
                public_base_url,
                path_style,
            } => {
                info!("Using S3 storage, bucket {}", bucket);
                let store = crate::storage::s3::S3ObjectStore::new(
                    bucket,
                    region,
                    endpoint.as_deref(),
                    access_key.as_deref(),
                    secret_key.as_deref(),
                    public_base_url,
                    *path_style,
                    max_size,
                )?;
                Ok(Arc::new(store))
            }
        }
    }

    /// Directory and URL prefix to serve objects from, when the backend is local.
    pub fn local_mount(&self) -> Option<(&PathBuf, &str)> {
        match self {
            Self::Filesystem {
                directory,
                public_base_url,
            } => Some((directory, public_base_url.as_str())),
            #[cfg(feature = "object-storage")]
            Self::S3 { .. } => None,
        }
    }
}
