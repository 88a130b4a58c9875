use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::market::{CoinPrice, MarketCoin};

/// Query for the markets-list mode of the price feed.
#[derive(Debug, Clone)]
pub struct MarketsQuery {
    pub vs_currency: String,
    pub order: String,
    pub per_page: u32,
    pub page: u32,
    pub price_change_percentage: String,
}

impl Default for MarketsQuery {
    fn default() -> Self {
        Self {
            vs_currency: "usd".to_string(),
            order: "market_cap_desc".to_string(),
            per_page: 250,
            page: 1,
            price_change_percentage: "24h".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PriceProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,
}

#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Fetch current USD prices for a set of coin ids in one batched call.
    /// Coins unknown to the provider are simply absent from the map.
    async fn fetch_simple_prices(
        &self,
        coin_ids: &[String],
    ) -> Result<HashMap<String, CoinPrice>, PriceProviderError>;

    /// Fetch one page of the markets list.
    async fn fetch_markets(
        &self,
        query: &MarketsQuery,
    ) -> Result<Vec<MarketCoin>, PriceProviderError>;
}
