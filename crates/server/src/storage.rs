//! Key/value blob storage.
//!
//! Each collection is stored as one JSON document under a fixed key. Two
//! backends exist:
//!
//! - **Memory** - a map that lives as long as the process
//! - **Directory** - one `<key>.json` file per key, replaced atomically by
//!   writing a sibling temp file and renaming it over the old one
//!
//! Writes always replace the whole blob; the last writer wins.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::Mutex;

/// Blob key for the device's favorite coupon IDs.
pub const FAVORITES_KEY: &str = "coupon_favorites";
/// Blob key for approved business submissions.
pub const APPROVED_KEY: &str = "approved_coupons";
/// Blob key for the review queue.
pub const PENDING_KEY: &str = "pending_coupons";
/// Blob key for the redemption ledger.
pub const REDEMPTIONS_KEY: &str = "coupon_redemptions";
/// Blob key for per-coupon view counts.
pub const VIEWS_KEY: &str = "coupon_views";
/// Blob key for the logged-in session.
pub const AUTH_KEY: &str = "auth_data";

/// Errors from storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Blob could not be encoded or decoded.
    #[error("JSON error for key {key}: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Keys become file names, so only `[a-z0-9_]` is accepted.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Blob store handle. Cheap to clone.
#[derive(Clone)]
pub struct Storage {
    inner: Arc<Backend>,
}

enum Backend {
    Memory(Mutex<HashMap<String, String>>),
    Directory(PathBuf),
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.inner.as_ref() {
            Backend::Memory(_) => f.write_str("Storage::Memory"),
            Backend::Directory(dir) => write!(f, "Storage::Directory({})", dir.display()),
        }
    }
}

impl Storage {
    /// Process-local storage, lost on restart.
    #[must_use]
    pub fn memory() -> Self {
        Self {
            inner: Arc::new(Backend::Memory(Mutex::new(HashMap::new()))),
        }
    }

    /// File-backed storage rooted at `dir`, created if missing.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub async fn directory(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| StorageError::Io {
                path: dir.clone(),
                source,
            })?;
        Ok(Self {
            inner: Arc::new(Backend::Directory(dir)),
        })
    }

    /// Raw blob for `key`, if one has been written.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid key or a failed read.
    pub async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        match self.inner.as_ref() {
            Backend::Memory(map) => Ok(map.lock().await.get(key).cloned()),
            Backend::Directory(dir) => {
                let path = blob_path(dir, key);
                match tokio::fs::read_to_string(&path).await {
                    Ok(contents) => Ok(Some(contents)),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                    Err(source) => Err(StorageError::Io { path, source }),
                }
            }
        }
    }

    /// Replace the blob for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid key or a failed write.
    pub async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        validate_key(key)?;
        match self.inner.as_ref() {
            Backend::Memory(map) => {
                map.lock().await.insert(key.to_owned(), value);
                Ok(())
            }
            Backend::Directory(dir) => {
                let path = blob_path(dir, key);
                let tmp = dir.join(format!(".{key}.json.tmp"));
                tokio::fs::write(&tmp, value)
                    .await
                    .map_err(|source| StorageError::Io {
                        path: tmp.clone(),
                        source,
                    })?;
                tokio::fs::rename(&tmp, &path)
                    .await
                    .map_err(|source| StorageError::Io { path, source })
            }
        }
    }

    /// Decode the blob for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Json`] if the stored blob does not parse as `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.get(key).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Json {
                key: key.to_owned(),
                source,
            })
    }

    /// Encode `value` and store it under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the write fails.
    pub async fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Json {
            key: key.to_owned(),
            source,
        })?;
        self.set(key, raw).await
    }

    /// Like [`Storage::get_json`], but a blob that fails to decode is logged
    /// and treated as absent.
    ///
    /// # Errors
    ///
    /// Returns an error only if the read itself fails.
    pub async fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.get_json(key).await {
            Err(StorageError::Json { key, source }) => {
                tracing::warn!(key = %key, error = %source, "Discarding unreadable blob");
                Ok(None)
            }
            other => other,
        }
    }
}

fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_owned()))
    }
}

fn blob_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{key}.json"))
}
