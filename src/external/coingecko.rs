use std::collections::HashMap;

use async_trait::async_trait;

use crate::external::price_provider::{
    MarketsQuery, PriceProvider, PriceProviderError,
};
use crate::models::market::{CoinPrice, MarketCoin};

const API_BASE: &str = "https://api.coingecko.com/api/v3";

/// Direct CoinGecko client, used as the fallback when the Worker is down.
/// The free demo tier is keyed by the `x-cg-demo-api-key` header.
pub struct CoinGeckoProvider {
    client: reqwest::Client,
    api_key: String,
}

impl CoinGeckoProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }

    pub fn from_env() -> Self {
        // The demo key is optional; without it CoinGecko applies stricter
        // anonymous rate limits.
        Self::new(std::env::var("COINGECKO_API_KEY").unwrap_or_default())
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, PriceProviderError> {
        let response = self
            .client
            .get(url)
            .header("x-cg-demo-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PriceProviderError::RateLimited);
        }
        if !status.is_success() {
            return Err(PriceProviderError::BadResponse(format!(
                "CoinGecko returned {}",
                status
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl PriceProvider for CoinGeckoProvider {
    async fn fetch_simple_prices(
        &self,
        coin_ids: &[String],
    ) -> Result<HashMap<String, CoinPrice>, PriceProviderError> {
        let url = format!(
            "{}/simple/price?ids={}&vs_currencies=usd&include_24hr_change=true",
            API_BASE,
            coin_ids.join(",")
        );

        let response = self.get(&url).await?;

        response
            .json::<HashMap<String, CoinPrice>>()
            .await
            .map_err(|e| PriceProviderError::Parse(e.to_string()))
    }

    async fn fetch_markets(
        &self,
        query: &MarketsQuery,
    ) -> Result<Vec<MarketCoin>, PriceProviderError> {
        let url = format!(
            "{}/coins/markets?vs_currency={}&order={}&per_page={}&page={}&sparkline=false&price_change_percentage={}",
            API_BASE,
            query.vs_currency,
            query.order,
            query.per_page,
            query.page,
            query.price_change_percentage
        );

        let response = self.get(&url).await?;

        response
            .json::<Vec<MarketCoin>>()
            .await
            .map_err(|e| PriceProviderError::Parse(e.to_string()))
    }
}
