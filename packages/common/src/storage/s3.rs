use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, Region};
use tracing::debug;

use super::error::StorageError;
use super::key::ObjectKey;
use super::traits::{ObjectStore, StoredObject, join_url};

/// S3-compatible object store.
pub struct S3ObjectStore {
    bucket: Box<Bucket>,
    public_base_url: String,
    max_size: u64,
}

impl S3ObjectStore {
    /// Connection settings are validated once here; the bucket handle is then
    /// shared for the lifetime of the process.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &str,
        region: &str,
        endpoint: Option<&str>,
        access_key: Option<&str>,
        secret_key: Option<&str>,
        public_base_url: impl Into<String>,
        path_style: bool,
        max_size: u64,
    ) -> Result<Self, StorageError> {
        let creds = Credentials::new(access_key, secret_key, None, None, None)
            .map_err(|e| StorageError::Remote(format!("invalid credentials: {e}")))?;

        let region = match endpoint {
            Some(endpoint) => Region::Custom {
                region: region.to_string(),
                endpoint: endpoint.to_string(),
            },
            None => region
                .parse::<Region>()
                .map_err(|e| StorageError::Remote(format!("invalid region: {e}")))?,
        };

        let mut bucket = Bucket::new(name, region, creds)
            .map_err(|e| StorageError::Remote(format!("invalid bucket: {e}")))?;
        if path_style {
            bucket = bucket.with_path_style();
        }

        Ok(Self {
            bucket,
            public_base_url: public_base_url.into(),
            max_size,
        })
    }
}

fn remote(err: s3::error::S3Error) -> StorageError {
    StorageError::Remote(err.to_string())
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &ObjectKey, data: &[u8]) -> Result<StoredObject, StorageError> {
        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        debug!("Storing object in bucket @ {}", key);
        let response = self
            .bucket
            .put_object(key.as_str(), data)
            .await
            .map_err(remote)?;

        let code = response.status_code();
        if code != 200 {
            return Err(StorageError::Remote(format!(
                "bucket did not respond correctly, expected status 200 got {code}"
            )));
        }

        Ok(StoredObject {
            key: key.clone(),
            url: self.url_for(key),
        })
    }

    async fn delete(&self, key: &ObjectKey) -> Result<(), StorageError> {
        debug!("Purging object in bucket @ {}", key);
        let response = self
            .bucket
            .delete_object(key.as_str())
            .await
            .map_err(remote)?;

        match response.status_code() {
            200 | 204 => Ok(()),
            404 => Err(StorageError::NotFound(key.to_string())),
            code => Err(StorageError::Remote(format!(
                "bucket did not respond correctly, expected status 204 got {code}"
            ))),
        }
    }

    async fn exists(&self, key: &ObjectKey) -> Result<bool, StorageError> {
        let (_, code) = self
            .bucket
            .head_object(key.as_str())
            .await
            .map_err(remote)?;

        match code {
            200 => Ok(true),
            404 => Ok(false),
            code => Err(StorageError::Remote(format!(
                "bucket did not respond correctly, expected status 200 got {code}"
            ))),
        }
    }

    fn url_for(&self, key: &ObjectKey) -> String {
        join_url(&self.public_base_url, key)
    }
}
