use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::StorageError;

/// Maximum length of an object key in bytes.
const MAX_KEY_LEN: usize = 1024;

/// A validated, slash-separated object key such as `gallery/images/cat.jpg`.
///
/// Keys are relative: no leading slash, no empty, `.` or `..` segments, no
/// backslashes and no control characters. This keeps them safe to map onto a
/// filesystem path as well as onto an S3 object name.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Parse and validate a key.
    pub fn new(key: impl Into<String>) -> Result<Self, StorageError> {
        let key = key.into();

        if key.is_empty() {
            return Err(StorageError::InvalidKey("key must not be empty".into()));
        }
        if key.len() > MAX_KEY_LEN {
            return Err(StorageError::InvalidKey(format!(
                "key exceeds {MAX_KEY_LEN} bytes"
            )));
        }
        if key.chars().any(|c| c.is_control()) {
            return Err(StorageError::InvalidKey(
                "key must not contain control characters".into(),
            ));
        }
        if key.contains('\\') {
            return Err(StorageError::InvalidKey(
                "key must not contain backslashes".into(),
            ));
        }
        for segment in key.split('/') {
            match segment {
                "" => {
                    return Err(StorageError::InvalidKey(
                        "key must not contain empty segments".into(),
                    ));
                }
                "." | ".." => {
                    return Err(StorageError::InvalidKey(
                        "key must not contain '.' or '..' segments".into(),
                    ));
                }
                _ => {}
            }
        }

        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the `/`-separated segments of the key.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }
}

impl fmt::Debug for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectKey({})", self.0)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for ObjectKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ObjectKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}
