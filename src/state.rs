use std::sync::Arc;

use crate::external::price_provider::PriceProvider;
use crate::external::translator::Translator;
use crate::external::wordpress::WordPressClient;
use crate::services::news_service::NewsCache;
use crate::services::notification_service::Notifier;
use crate::storage::alert_store::AlertStore;
use crate::storage::points_store::{PointsStore, ReadingProgressStore};
use crate::storage::portfolio_store::PortfolioStore;
use crate::storage::prefs_store::PreferenceStore;

/// Authentication state for this session. Which store implementation backs
/// each entity is decided once from this, at composition time.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub user_id: Option<String>,
}

impl Session {
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    pub fn guest() -> Self {
        Self::default()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user_id.is_some()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub session: Session,
    pub prices: Arc<dyn PriceProvider>,
    pub translator: Arc<dyn Translator>,
    pub content: Arc<WordPressClient>,
    pub alerts: Arc<dyn AlertStore>,
    pub portfolio: Arc<dyn PortfolioStore>,
    pub points: Arc<dyn PointsStore>,
    pub reading: Arc<dyn ReadingProgressStore>,
    pub prefs: Arc<PreferenceStore>,
    pub notifier: Arc<dyn Notifier>,
    pub news_cache: Arc<NewsCache>,
}
