use async_trait::async_trait;
use serde::Serialize;

use super::error::StorageError;
use super::key::ObjectKey;

/// Location of an object after a successful write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredObject {
    pub key: ObjectKey,
    /// Publicly resolvable URL of the object.
    pub url: String,
}

/// Key-addressed byte storage for image originals and derivatives.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store bytes under `key`, replacing any previous object, and return its location.
    async fn put(&self, key: &ObjectKey, data: &[u8]) -> Result<StoredObject, StorageError>;

    /// Delete the object stored under `key`.
    ///
    /// A missing object is an error like any other failure.
    async fn delete(&self, key: &ObjectKey) -> Result<(), StorageError>;

    /// Check whether an object exists.
    async fn exists(&self, key: &ObjectKey) -> Result<bool, StorageError>;

    /// Public URL an object stored under `key` is reachable at.
    fn url_for(&self, key: &ObjectKey) -> String;
}

/// Join a public base URL and an object key with exactly one slash.
pub(crate) fn join_url(base: &str, key: &ObjectKey) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key)
}
