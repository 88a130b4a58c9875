use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::errors::AppError;
use crate::external::api_client::ApiClient;
use crate::models::portfolio::{NewAsset, PortfolioAsset, ReorderDirection, UpdateAsset};
use crate::storage::local::{keys, LocalBlobs};

// ==============================================================================
// Portfolio Store
// ==============================================================================

#[async_trait]
pub trait PortfolioStore: Send + Sync {
    /// Assets sorted by `display_order`.
    async fn list(&self) -> Result<Vec<PortfolioAsset>, AppError>;
    async fn add(&self, asset: NewAsset) -> Result<PortfolioAsset, AppError>;
    async fn update(&self, id: Uuid, update: UpdateAsset) -> Result<(), AppError>;
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
    /// Swap the asset with its adjacent sibling and renumber display order.
    async fn reorder(&self, id: Uuid, direction: ReorderDirection) -> Result<(), AppError>;
}

// ==============================================================================
// Local (device storage) implementation
// ==============================================================================

pub struct LocalPortfolioStore {
    blobs: LocalBlobs,
}

impl LocalPortfolioStore {
    pub fn new(blobs: LocalBlobs) -> Self {
        Self { blobs }
    }

    async fn write(&self, assets: &[PortfolioAsset]) -> Result<(), AppError> {
        self.blobs.write(keys::PORTFOLIO, &assets).await
    }
}

#[async_trait]
impl PortfolioStore for LocalPortfolioStore {
    async fn list(&self) -> Result<Vec<PortfolioAsset>, AppError> {
        let mut assets: Vec<PortfolioAsset> = self
            .blobs
            .read(keys::PORTFOLIO)
            .await?
            .unwrap_or_default();
        assets.sort_by_key(|a| a.display_order);
        Ok(assets)
    }

    async fn add(&self, asset: NewAsset) -> Result<PortfolioAsset, AppError> {
        let mut assets = self.list().await?;
        let next_order = assets
            .iter()
            .map(|a| a.display_order)
            .max()
            .map_or(0, |max| max + 1);

        let asset = asset.into_asset(next_order);
        assets.push(asset.clone());
        self.write(&assets).await?;
        Ok(asset)
    }

    async fn update(&self, id: Uuid, update: UpdateAsset) -> Result<(), AppError> {
        let mut assets = self.list().await?;
        let asset = assets
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(AppError::NotFound)?;

        asset.amount = update.amount;
        asset.buy_price = update.buy_price;
        self.write(&assets).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let assets = self.list().await?;
        let remaining: Vec<PortfolioAsset> =
            assets.into_iter().filter(|a| a.id != id).collect();
        self.write(&remaining).await
    }

    async fn reorder(&self, id: Uuid, direction: ReorderDirection) -> Result<(), AppError> {
        let mut assets = self.list().await?;
        let current = match assets.iter().position(|a| a.id == id) {
            Some(idx) => idx,
            None => return Err(AppError::NotFound),
        };

        let swap = match direction {
            ReorderDirection::Up => current.checked_sub(1),
            ReorderDirection::Down => Some(current + 1),
        };
        let swap = match swap {
            Some(idx) if idx < assets.len() => idx,
            // Already at the edge; nothing to do.
            _ => return Ok(()),
        };

        assets.swap(current, swap);
        for (index, asset) in assets.iter_mut().enumerate() {
            asset.display_order = index as i64;
        }
        self.write(&assets).await
    }
}

// ==============================================================================
// Remote (per-user API) implementation
// ==============================================================================

pub struct RemotePortfolioStore {
    api: ApiClient,
}

impl RemotePortfolioStore {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[derive(Debug, Deserialize)]
struct PortfolioListResponse {
    #[serde(default)]
    portfolio: Vec<PortfolioAsset>,
}

#[async_trait]
impl PortfolioStore for RemotePortfolioStore {
    async fn list(&self) -> Result<Vec<PortfolioAsset>, AppError> {
        let response: PortfolioListResponse = self.api.get_json("/api/portfolio/list").await?;
        Ok(response.portfolio)
    }

    async fn add(&self, asset: NewAsset) -> Result<PortfolioAsset, AppError> {
        self.api.post_json("/api/portfolio/add", &asset).await
    }

    async fn update(&self, id: Uuid, update: UpdateAsset) -> Result<(), AppError> {
        let body = json!({
            "id": id,
            "amount": update.amount,
            "buy_price": update.buy_price,
        });
        let _: serde_json::Value = self.api.post_json("/api/portfolio/update", &body).await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let _: serde_json::Value = self
            .api
            .delete_json("/api/portfolio/delete", &json!({ "id": id }))
            .await?;
        Ok(())
    }

    async fn reorder(&self, id: Uuid, direction: ReorderDirection) -> Result<(), AppError> {
        let body = json!({ "id": id, "direction": direction });
        let _: serde_json::Value = self.api.post_json("/api/portfolio/reorder", &body).await?;
        Ok(())
    }
}
