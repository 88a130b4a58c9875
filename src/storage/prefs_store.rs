use crate::errors::AppError;
use crate::storage::local::{keys, LocalBlobs};

/// Device preferences. These never migrate to the remote store; they belong
/// to the installation, not the account.
pub struct PreferenceStore {
    blobs: LocalBlobs,
}

impl PreferenceStore {
    pub fn new(blobs: LocalBlobs) -> Self {
        Self { blobs }
    }

    pub async fn language(&self) -> Result<Option<String>, AppError> {
        self.blobs.read(keys::USER_LANGUAGE).await
    }

    pub async fn set_language(&self, code: &str) -> Result<(), AppError> {
        self.blobs.write(keys::USER_LANGUAGE, &code).await
    }

    pub async fn has_seen_onboarding(&self) -> Result<bool, AppError> {
        Ok(self
            .blobs
            .read(keys::HAS_SEEN_ONBOARDING)
            .await?
            .unwrap_or(false))
    }

    pub async fn set_has_seen_onboarding(&self, seen: bool) -> Result<(), AppError> {
        self.blobs.write(keys::HAS_SEEN_ONBOARDING, &seen).await
    }

    pub async fn tracked_coins(&self) -> Result<Vec<String>, AppError> {
        Ok(self
            .blobs
            .read(keys::TRACKED_COINS)
            .await?
            .unwrap_or_default())
    }

    pub async fn set_tracked_coins(&self, coins: &[String]) -> Result<(), AppError> {
        self.blobs.write(keys::TRACKED_COINS, &coins).await
    }
}
