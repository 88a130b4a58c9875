use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::errors::AppError;
use crate::external::api_client::ApiClient;
use crate::models::alert::{AlertKey, PriceAlert};
use crate::storage::local::{keys, LocalBlobs};

// ==============================================================================
// Alert Store
// ==============================================================================

/// Persistence capability for price alerts. One implementation per mode,
/// selected once at composition time by the authentication predicate.
#[async_trait]
pub trait AlertStore: Send + Sync {
    async fn list(&self) -> Result<Vec<PriceAlert>, AppError>;
    async fn add(&self, alert: PriceAlert) -> Result<(), AppError>;
    async fn remove(&self, key: &AlertKey) -> Result<(), AppError>;
    /// Batched removal, used by the poller so a triggering cycle is a single
    /// write.
    async fn remove_many(&self, triggered: &[AlertKey]) -> Result<(), AppError>;
}

// ==============================================================================
// Local (device storage) implementation
// ==============================================================================

pub struct LocalAlertStore {
    blobs: LocalBlobs,
}

impl LocalAlertStore {
    pub fn new(blobs: LocalBlobs) -> Self {
        Self { blobs }
    }
}

#[async_trait]
impl AlertStore for LocalAlertStore {
    async fn list(&self) -> Result<Vec<PriceAlert>, AppError> {
        Ok(self
            .blobs
            .read(keys::PRICE_ALERTS)
            .await?
            .unwrap_or_default())
    }

    async fn add(&self, alert: PriceAlert) -> Result<(), AppError> {
        let mut alerts = self.list().await?;
        alerts.push(alert);
        self.blobs.write(keys::PRICE_ALERTS, &alerts).await
    }

    async fn remove(&self, key: &AlertKey) -> Result<(), AppError> {
        self.remove_many(std::slice::from_ref(key)).await
    }

    async fn remove_many(&self, triggered: &[AlertKey]) -> Result<(), AppError> {
        let alerts = self.list().await?;
        let remaining: Vec<PriceAlert> = alerts
            .into_iter()
            .filter(|a| !triggered.contains(&a.key()))
            .collect();
        self.blobs.write(keys::PRICE_ALERTS, &remaining).await
    }
}

// ==============================================================================
// Remote (per-user API) implementation
// ==============================================================================

pub struct RemoteAlertStore {
    api: ApiClient,
}

impl RemoteAlertStore {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[derive(Debug, Deserialize)]
struct AlertListResponse {
    #[serde(default)]
    alerts: Vec<PriceAlert>,
}

#[async_trait]
impl AlertStore for RemoteAlertStore {
    async fn list(&self) -> Result<Vec<PriceAlert>, AppError> {
        let response: AlertListResponse = self.api.get_json("/api/alerts/list").await?;
        Ok(response.alerts)
    }

    async fn add(&self, alert: PriceAlert) -> Result<(), AppError> {
        let _: serde_json::Value = self.api.post_json("/api/alerts/add", &alert).await?;
        Ok(())
    }

    async fn remove(&self, key: &AlertKey) -> Result<(), AppError> {
        let _: serde_json::Value = self.api.post_json("/api/alerts/remove", key).await?;
        Ok(())
    }

    async fn remove_many(&self, triggered: &[AlertKey]) -> Result<(), AppError> {
        let _: serde_json::Value = self
            .api
            .post_json("/api/alerts/remove-batch", &json!({ "keys": triggered }))
            .await?;
        Ok(())
    }
}
