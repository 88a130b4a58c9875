use std::collections::HashMap;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::external::price_provider::{
    MarketsQuery, PriceProvider, PriceProviderError,
};
use crate::models::market::{CoinPrice, MarketCoin};

/// MultiProvider routes price requests through the Worker first and falls
/// back to the direct CoinGecko API when the Worker fails.
///
/// Strategy:
/// 1. Try the primary provider (Worker, which caches globally).
/// 2. On any error, log and retry the same request against the fallback.
/// 3. Only if both fail does the caller see an error.
pub struct MultiProvider {
    primary: Box<dyn PriceProvider>,
    fallback: Box<dyn PriceProvider>,
}

impl MultiProvider {
    pub fn new(primary: Box<dyn PriceProvider>, fallback: Box<dyn PriceProvider>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl PriceProvider for MultiProvider {
    async fn fetch_simple_prices(
        &self,
        coin_ids: &[String],
    ) -> Result<HashMap<String, CoinPrice>, PriceProviderError> {
        match self.primary.fetch_simple_prices(coin_ids).await {
            Ok(prices) => return Ok(prices),
            Err(PriceProviderError::RateLimited) => {
                info!("⚠️ Primary price provider rate limited, trying fallback");
            }
            Err(e) => {
                warn!("Primary price provider failed: {}. Trying fallback.", e);
            }
        }

        match self.fallback.fetch_simple_prices(coin_ids).await {
            Ok(prices) => {
                info!("✓ Fetched {} prices from fallback provider", prices.len());
                Ok(prices)
            }
            Err(e) => {
                warn!("Fallback price provider failed: {}", e);
                Err(PriceProviderError::BadResponse(format!(
                    "all price providers failed for [{}]",
                    coin_ids.join(",")
                )))
            }
        }
    }

    async fn fetch_markets(
        &self,
        query: &MarketsQuery,
    ) -> Result<Vec<MarketCoin>, PriceProviderError> {
        match self.primary.fetch_markets(query).await {
            Ok(markets) => return Ok(markets),
            Err(e) => {
                warn!("Primary markets request failed: {}. Trying fallback.", e);
            }
        }

        self.fallback.fetch_markets(query).await
    }
}
