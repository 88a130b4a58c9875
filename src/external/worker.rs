use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use url::Url;

use crate::errors::AppError;
use crate::external::price_provider::{
    MarketsQuery, PriceProvider, PriceProviderError,
};
use crate::external::translator::Translator;
use crate::models::market::{CoinPrice, MarketCoin};

const USER_AGENT: &str = concat!("coinreader/", env!("CARGO_PKG_VERSION"));

/// Configuration for the caching/proxy Worker that fronts the price and
/// translation APIs.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub base_url: String,
    pub shared_secret: String,
}

impl WorkerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let base_url = std::env::var("WORKER_BASE_URL")
            .map_err(|_| AppError::Validation("WORKER_BASE_URL not set".into()))?;
        Url::parse(&base_url)
            .map_err(|e| AppError::Validation(format!("WORKER_BASE_URL invalid: {}", e)))?;

        let shared_secret = std::env::var("WORKER_SHARED_SECRET")
            .map_err(|_| AppError::Validation("WORKER_SHARED_SECRET not set".into()))?;

        Ok(Self {
            base_url,
            shared_secret,
        })
    }
}

/// Client for the Worker endpoints (`/api/prices`, `/api/translate`,
/// `/health`). All calls are POST JSON with the shared-secret header.
pub struct WorkerClient {
    config: WorkerConfig,
    client: reqwest::Client,
}

impl WorkerClient {
    pub fn new(config: WorkerConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self::new(WorkerConfig::from_env()?))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, PriceProviderError> {
        let response = self
            .client
            .post(self.endpoint(path))
            .header("X-App-Shared-Secret", &self.config.shared_secret)
            .header("User-Agent", USER_AGENT)
            .json(body)
            .send()
            .await
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PriceProviderError::RateLimited);
        }
        if !status.is_success() {
            return Err(PriceProviderError::BadResponse(format!(
                "Worker {} returned {}",
                path, status
            )));
        }

        Ok(response)
    }

    pub async fn is_healthy(&self) -> bool {
        let health = self.endpoint("/health");
        match self
            .client
            .get(health)
            .header("X-App-Shared-Secret", &self.config.shared_secret)
            .header("User-Agent", USER_AGENT)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

#[async_trait]
impl PriceProvider for WorkerClient {
    async fn fetch_simple_prices(
        &self,
        coin_ids: &[String],
    ) -> Result<HashMap<String, CoinPrice>, PriceProviderError> {
        let body = json!({
            "ids": coin_ids.join(","),
            "vs_currency": "usd",
            "include_24hr_change": true,
        });

        let response = self.post_json("/api/prices", &body).await?;

        response
            .json::<HashMap<String, CoinPrice>>()
            .await
            .map_err(|e| PriceProviderError::Parse(e.to_string()))
    }

    async fn fetch_markets(
        &self,
        query: &MarketsQuery,
    ) -> Result<Vec<MarketCoin>, PriceProviderError> {
        let body = json!({
            "endpoint": "markets",
            "vs_currency": query.vs_currency,
            "order": query.order,
            "per_page": query.per_page,
            "page": query.page,
            "sparkline": false,
            "price_change_percentage": query.price_change_percentage,
        });

        let response = self.post_json("/api/prices", &body).await?;

        response
            .json::<Vec<MarketCoin>>()
            .await
            .map_err(|e| PriceProviderError::Parse(e.to_string()))
    }
}

#[async_trait]
impl Translator for WorkerClient {
    async fn translate(
        &self,
        text: &str,
        target: &str,
        source: &str,
    ) -> Result<String, AppError> {
        let body = json!({
            "text": text,
            "target": target,
            "source": source,
        });

        let response = self.post_json("/api/translate", &body).await.map_err(|e| {
            error!("Worker translate request failed: {}", e);
            AppError::from(e)
        })?;

        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|e| AppError::Parse(e.to_string()))?;

        Ok(parsed.translated_text)
    }
}
