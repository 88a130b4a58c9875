use std::sync::Arc;

use tracing::info;

use crate::errors::AppError;
use crate::external::api_client::ApiClient;
use crate::external::coingecko::CoinGeckoProvider;
use crate::external::multi_provider::MultiProvider;
use crate::external::price_provider::PriceProvider;
use crate::external::worker::WorkerClient;
use crate::external::wordpress::WordPressClient;
use crate::services::news_service::NewsCache;
use crate::services::notification_service::{LogNotifier, Notifier};
use crate::state::{AppState, Session};
use crate::storage::alert_store::{LocalAlertStore, RemoteAlertStore};
use crate::storage::local::LocalBlobs;
use crate::storage::migration::{self, MigrationReport};
use crate::storage::points_store::{
    LocalPointsStore, LocalReadingProgressStore, RemotePointsStore, RemoteReadingProgressStore,
};
use crate::storage::portfolio_store::{LocalPortfolioStore, RemotePortfolioStore};
use crate::storage::prefs_store::PreferenceStore;

// ==============================================================================
// Composition Root
// ==============================================================================

/// Build the engine from environment configuration. Selects the local or
/// remote implementation per entity exactly once, from the session.
pub async fn bootstrap() -> Result<AppState, AppError> {
    let session = session_from_env();
    let blobs = LocalBlobs::from_env();
    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);

    // Price feed: Worker primary with direct CoinGecko fallback.
    let worker = Arc::new(WorkerClient::from_env()?);
    let prices: Arc<dyn PriceProvider> = Arc::new(MultiProvider::new(
        Box::new(WorkerClient::from_env()?),
        Box::new(CoinGeckoProvider::from_env()),
    ));
    info!("📊 Price provider: Worker with CoinGecko fallback");

    let content = Arc::new(WordPressClient::from_env());
    let prefs = Arc::new(PreferenceStore::new(blobs.clone()));
    let news_cache = Arc::new(NewsCache::new());

    let state = if session.is_signed_in() {
        let api = api_client_from_env()?;

        // One-shot, best-effort: local data moves server-side on the login
        // transition and never blocks it.
        complete_sign_in(&blobs, &api).await;

        AppState {
            session,
            prices,
            translator: worker,
            content,
            alerts: Arc::new(RemoteAlertStore::new(api.clone())),
            portfolio: Arc::new(RemotePortfolioStore::new(api.clone())),
            points: Arc::new(RemotePointsStore::new(api.clone())),
            reading: Arc::new(RemoteReadingProgressStore::new(api)),
            prefs,
            notifier,
            news_cache,
        }
    } else {
        AppState {
            session,
            prices,
            translator: worker,
            content,
            alerts: Arc::new(LocalAlertStore::new(blobs.clone())),
            portfolio: Arc::new(LocalPortfolioStore::new(blobs.clone())),
            points: Arc::new(LocalPointsStore::new(blobs.clone())),
            reading: Arc::new(LocalReadingProgressStore::new(blobs)),
            prefs,
            notifier,
            news_cache,
        }
    };

    Ok(state)
}

/// Run the local-to-remote migration for a fresh sign-in. Failures are
/// reported but never propagate; sign-in completes regardless.
pub async fn complete_sign_in(blobs: &LocalBlobs, api: &ApiClient) -> MigrationReport {
    migration::migrate_local_to_remote(blobs, api).await
}

fn session_from_env() -> Session {
    match std::env::var("USER_ID") {
        Ok(user_id) if !user_id.is_empty() => {
            info!("👤 Signed-in session for user {}", user_id);
            Session::signed_in(user_id)
        }
        _ => {
            info!("👤 Guest session: using device-local storage");
            Session::guest()
        }
    }
}

fn api_client_from_env() -> Result<ApiClient, AppError> {
    let base_url = std::env::var("API_BASE_URL")
        .map_err(|_| AppError::Validation("API_BASE_URL not set for signed-in session".into()))?;
    let token = std::env::var("API_TOKEN").ok();
    ApiClient::new(base_url, token)
}
