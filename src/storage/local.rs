use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::errors::AppError;

/// Blob keys shared with earlier app versions. Each key maps to one
/// last-write-wins JSON document.
pub mod keys {
    pub const POINTS: &str = "points";
    pub const PORTFOLIO: &str = "portfolio";
    pub const PRICE_ALERTS: &str = "priceAlerts";
    pub const USER_LANGUAGE: &str = "userLanguage";
    pub const HAS_SEEN_ONBOARDING: &str = "hasSeenOnboarding";
    pub const TRACKED_COINS: &str = "trackedCoins";
    pub const READING_PROGRESS: &str = "readingProgress";
}

/// File-backed key-value store for the device-local persistence mode. One
/// JSON file per key; whole-blob read-modify-write, no partial updates.
#[derive(Debug, Clone)]
pub struct LocalBlobs {
    dir: PathBuf,
}

impl LocalBlobs {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_env() -> Self {
        let dir = std::env::var("DATA_DIR").unwrap_or_else(|_| ".coinreader".to_string());
        Self::new(dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Read and deserialize a blob. A missing file is `None`; a corrupt file
    /// is logged and treated as missing rather than failing the caller.
    pub async fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AppError> {
        let path = self.path(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AppError::Storage(e.to_string())),
        };

        match serde_json::from_slice::<T>(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("Dropping corrupt blob '{}': {}", key, e);
                Ok(None)
            }
        }
    }

    pub async fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        let bytes = serde_json::to_vec_pretty(value)?;
        tokio::fs::write(self.path(key), bytes)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        Ok(())
    }

    pub async fn remove(&self, key: &str) -> Result<(), AppError> {
        match tokio::fs::remove_file(self.path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(e.to_string())),
        }
    }

    pub async fn exists(&self, key: &str) -> bool {
        tokio::fs::try_exists(self.path(key)).await.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = LocalBlobs::new(dir.path());

        let value: Option<Vec<String>> = blobs.read(keys::PORTFOLIO).await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_write_then_read_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = LocalBlobs::new(dir.path());

        blobs
            .write(keys::TRACKED_COINS, &vec!["bitcoin".to_string(), "solana".to_string()])
            .await
            .unwrap();

        let value: Option<Vec<String>> = blobs.read(keys::TRACKED_COINS).await.unwrap();
        assert_eq!(value.unwrap(), vec!["bitcoin", "solana"]);
    }

    #[tokio::test]
    async fn test_corrupt_blob_reads_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = LocalBlobs::new(dir.path());

        tokio::fs::write(dir.path().join("points.json"), b"{not json")
            .await
            .unwrap();

        let value: Option<serde_json::Value> = blobs.read(keys::POINTS).await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_remove_clears_key() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = LocalBlobs::new(dir.path());

        blobs.write(keys::USER_LANGUAGE, &"es").await.unwrap();
        assert!(blobs.exists(keys::USER_LANGUAGE).await);

        blobs.remove(keys::USER_LANGUAGE).await.unwrap();
        assert!(!blobs.exists(keys::USER_LANGUAGE).await);

        // Removing an absent key is a no-op, not an error.
        blobs.remove(keys::USER_LANGUAGE).await.unwrap();
    }
}
