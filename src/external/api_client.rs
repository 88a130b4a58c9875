use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::errors::AppError;

/// Client for the per-user JSON API used in signed-in mode (portfolio,
/// rewards, alerts, leaderboard). Thin wrapper that normalizes paths,
/// attaches the bearer token and maps non-2xx statuses onto the error
/// taxonomy.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Result<Self, AppError> {
        let base_url = base_url.into();
        Url::parse(&base_url)
            .map_err(|e| AppError::Validation(format!("API_BASE_URL invalid: {}", e)))?;

        Ok(Self {
            base_url,
            token,
            client: reqwest::Client::new(),
        })
    }

    fn url(&self, path: &str) -> String {
        let normalized = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        format!("{}{}", self.base_url.trim_end_matches('/'), normalized)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.client.request(method, self.url(path));
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn handle<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        let status = response.status();
        match status {
            s if s.is_success() => response
                .json::<T>()
                .await
                .map_err(|e| AppError::Parse(e.to_string())),
            reqwest::StatusCode::UNAUTHORIZED => Err(AppError::Unauthorized),
            reqwest::StatusCode::NOT_FOUND => Err(AppError::NotFound),
            s => {
                let body = response.text().await.unwrap_or_default();
                Err(AppError::Network(format!("API error {}: {}", s, body)))
            }
        }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let response = self.request(reqwest::Method::GET, path).send().await?;
        Self::handle(response).await
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let response = self
            .request(reqwest::Method::POST, path)
            .json(body)
            .send()
            .await?;
        Self::handle(response).await
    }

    pub async fn delete_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let response = self
            .request(reqwest::Method::DELETE, path)
            .json(body)
            .send()
            .await?;
        Self::handle(response).await
    }
}
