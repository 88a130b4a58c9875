use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::external::price_provider::PriceProvider;
use crate::models::alert::{AlertDirection, PriceAlert, TriggeredAlert};
use crate::services::notification_service::{Notification, Notifier};
use crate::storage::alert_store::AlertStore;
use crate::utils::format_price;

/// Soft rate limit: a poll cycle is skipped when the last successful check
/// finished less than this long ago. The scheduler ticks independently.
pub const MIN_CHECK_INTERVAL: Duration = Duration::from_secs(60);

// ==============================================================================
// Alert Predicates & Validation
// ==============================================================================

/// Threshold predicate. Boundaries are inclusive in both directions.
pub fn is_triggered(alert: &PriceAlert, current_price: f64) -> bool {
    match alert.direction {
        AlertDirection::Above => current_price >= alert.target_price,
        AlertDirection::Below => current_price <= alert.target_price,
    }
}

/// Reject alerts whose target is already on the wrong side of the current
/// price, so they would fire on the very next poll.
pub fn validate_new_alert(
    direction: AlertDirection,
    target_price: f64,
    current_price: f64,
) -> Result<(), AppError> {
    if !target_price.is_finite() || target_price <= 0.0 {
        return Err(AppError::Validation(
            "Target price must be a positive number".into(),
        ));
    }

    match direction {
        AlertDirection::Above if current_price >= target_price => {
            Err(AppError::Validation(format!(
                "Cannot set \"above\" alert: current price ({}) is already above or equal to target ({})",
                format_price(current_price),
                format_price(target_price)
            )))
        }
        AlertDirection::Below if current_price <= target_price => {
            Err(AppError::Validation(format!(
                "Cannot set \"below\" alert: current price ({}) is already below or equal to target ({})",
                format_price(current_price),
                format_price(target_price)
            )))
        }
        _ => Ok(()),
    }
}

// ==============================================================================
// Poll Cycle
// ==============================================================================

#[derive(Debug, Default, Clone, Copy)]
pub struct CheckOutcome {
    /// True when the minimum-interval guard suppressed the cycle.
    pub skipped: bool,
    pub checked: usize,
    pub triggered: usize,
}

/// Stateful checker behind the polling loop. One instance per process; the
/// guard timestamp is shared between the timer and the foreground-resume
/// hook.
pub struct AlertChecker {
    store: Arc<dyn AlertStore>,
    prices: Arc<dyn PriceProvider>,
    notifier: Arc<dyn Notifier>,
    min_interval: Duration,
    last_success: Mutex<Option<Instant>>,
}

impl AlertChecker {
    pub fn new(
        store: Arc<dyn AlertStore>,
        prices: Arc<dyn PriceProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::with_min_interval(store, prices, notifier, MIN_CHECK_INTERVAL)
    }

    pub fn with_min_interval(
        store: Arc<dyn AlertStore>,
        prices: Arc<dyn PriceProvider>,
        notifier: Arc<dyn Notifier>,
        min_interval: Duration,
    ) -> Self {
        Self {
            store,
            prices,
            notifier,
            min_interval,
            last_success: Mutex::new(None),
        }
    }

    /// Run one poll cycle: batch-fetch prices for every coin under alert,
    /// fire one notification per crossed threshold and drop those alerts in
    /// a single write. A fetch failure aborts the cycle with no state
    /// mutation; the next scheduled tick retries.
    pub async fn check(&self) -> Result<CheckOutcome, AppError> {
        let alerts = self.store.list().await?;
        if alerts.is_empty() {
            return Ok(CheckOutcome::default());
        }

        if let Some(last) = *self.last_success.lock() {
            if last.elapsed() < self.min_interval {
                return Ok(CheckOutcome {
                    skipped: true,
                    ..CheckOutcome::default()
                });
            }
        }

        // One batched request for the deduplicated coin set, never one call
        // per alert.
        let mut coin_ids: Vec<String> = Vec::new();
        for alert in &alerts {
            if !coin_ids.contains(&alert.coin_id) {
                coin_ids.push(alert.coin_id.clone());
            }
        }

        let prices = match self.prices.fetch_simple_prices(&coin_ids).await {
            Ok(prices) => prices,
            Err(e) => {
                warn!("Price fetch for {} alert coins failed: {}", coin_ids.len(), e);
                return Err(e.into());
            }
        };
        *self.last_success.lock() = Some(Instant::now());

        let mut triggered: Vec<TriggeredAlert> = Vec::new();
        for alert in alerts.iter() {
            // A coin missing from the response is not an error; the alert
            // stays and is retried next cycle.
            let Some(price) = prices.get(&alert.coin_id) else {
                continue;
            };

            if is_triggered(alert, price.usd) {
                triggered.push(TriggeredAlert {
                    alert: alert.clone(),
                    current_price: price.usd,
                });
            }
        }

        if !triggered.is_empty() {
            let keys: Vec<_> = triggered.iter().map(|t| t.alert.key()).collect();
            self.store.remove_many(&keys).await?;

            for hit in &triggered {
                info!(
                    "🔔 Alert triggered: {} {} {}",
                    hit.alert.symbol,
                    hit.alert.direction.as_str(),
                    format_price(hit.alert.target_price)
                );
                self.notifier.notify(build_notification(hit)).await;
            }
        }

        Ok(CheckOutcome {
            skipped: false,
            checked: alerts.len(),
            triggered: triggered.len(),
        })
    }
}

fn build_notification(hit: &TriggeredAlert) -> Notification {
    Notification {
        title: "Price Alert".to_string(),
        message: format!(
            "{} ({}) {} {}\n\nCurrent price: {}",
            hit.alert.coin_name,
            hit.alert.symbol,
            hit.alert.direction.triggered_phrase(),
            format_price(hit.alert.target_price),
            format_price(hit.current_price)
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::external::price_provider::{MarketsQuery, PriceProviderError};
    use crate::models::market::{CoinPrice, MarketCoin};
    use crate::services::notification_service::BufferedNotifier;
    use crate::storage::alert_store::LocalAlertStore;
    use crate::storage::local::LocalBlobs;

    fn alert(coin_id: &str, direction: AlertDirection, target: f64, created_at: i64) -> PriceAlert {
        PriceAlert {
            coin_id: coin_id.to_string(),
            coin_name: format!("{}{}", coin_id[..1].to_uppercase(), &coin_id[1..]),
            symbol: coin_id[..3].to_uppercase(),
            target_price: target,
            direction,
            created_at,
        }
    }

    struct MockPriceProvider {
        prices: HashMap<String, f64>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl MockPriceProvider {
        fn with_prices(pairs: &[(&str, f64)]) -> Self {
            Self {
                prices: pairs
                    .iter()
                    .map(|(id, usd)| (id.to_string(), *usd))
                    .collect(),
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                prices: HashMap::new(),
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PriceProvider for MockPriceProvider {
        async fn fetch_simple_prices(
            &self,
            coin_ids: &[String],
        ) -> Result<HashMap<String, CoinPrice>, PriceProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(PriceProviderError::Network("connection reset".into()));
            }
            Ok(coin_ids
                .iter()
                .filter_map(|id| {
                    self.prices.get(id).map(|usd| {
                        (
                            id.clone(),
                            CoinPrice {
                                usd: *usd,
                                usd_24h_change: None,
                            },
                        )
                    })
                })
                .collect())
        }

        async fn fetch_markets(
            &self,
            _query: &MarketsQuery,
        ) -> Result<Vec<MarketCoin>, PriceProviderError> {
            Ok(Vec::new())
        }
    }

    fn checker(
        store: Arc<LocalAlertStore>,
        provider: Arc<MockPriceProvider>,
        notifier: Arc<BufferedNotifier>,
    ) -> AlertChecker {
        AlertChecker::new(store, provider, notifier)
    }

    #[test]
    fn test_above_boundary_is_inclusive() {
        let a = alert("bitcoin", AlertDirection::Above, 100.0, 1);
        assert!(!is_triggered(&a, 99.0));
        assert!(is_triggered(&a, 100.0));
        assert!(is_triggered(&a, 101.0));
    }

    #[test]
    fn test_below_boundary_is_inclusive() {
        let a = alert("bitcoin", AlertDirection::Below, 50.0, 1);
        assert!(is_triggered(&a, 50.0));
        assert!(is_triggered(&a, 49.0));
        assert!(!is_triggered(&a, 51.0));
    }

    #[test]
    fn test_validation_rejects_wrong_side_targets() {
        assert!(validate_new_alert(AlertDirection::Above, 100.0, 120.0).is_err());
        assert!(validate_new_alert(AlertDirection::Above, 100.0, 100.0).is_err());
        assert!(validate_new_alert(AlertDirection::Above, 100.0, 90.0).is_ok());

        assert!(validate_new_alert(AlertDirection::Below, 50.0, 40.0).is_err());
        assert!(validate_new_alert(AlertDirection::Below, 50.0, 60.0).is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_targets() {
        assert!(validate_new_alert(AlertDirection::Above, 0.0, 10.0).is_err());
        assert!(validate_new_alert(AlertDirection::Above, -5.0, 10.0).is_err());
        assert!(validate_new_alert(AlertDirection::Above, f64::NAN, 10.0).is_err());
    }

    #[tokio::test]
    async fn test_triggered_alert_is_removed_and_notified() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(LocalAlertStore::new(LocalBlobs::new(dir.path())));
        store
            .add(alert("bitcoin", AlertDirection::Above, 50_000.0, 1_000))
            .await
            .unwrap();
        store
            .add(alert("ethereum", AlertDirection::Above, 10_000.0, 2_000))
            .await
            .unwrap();

        let provider = Arc::new(MockPriceProvider::with_prices(&[
            ("bitcoin", 50_500.0),
            ("ethereum", 3_000.0),
        ]));
        let notifier = Arc::new(BufferedNotifier::new());
        let checker = checker(store.clone(), provider, notifier.clone());

        let outcome = checker.check().await.unwrap();
        assert_eq!(outcome.checked, 2);
        assert_eq!(outcome.triggered, 1);

        // Triggered alert is gone; the untriggered one is untouched.
        let remaining = store.list().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].coin_id, "ethereum");

        let notifications = notifier.drain();
        assert_eq!(notifications.len(), 1);
        assert!(notifications[0].message.contains("Bitcoin"));
        assert!(notifications[0].message.contains("went above"));
        assert!(notifications[0].message.contains("50,000"));
        assert!(notifications[0].message.contains("50,500"));
    }

    #[tokio::test]
    async fn test_missing_price_keeps_alert_for_next_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(LocalAlertStore::new(LocalBlobs::new(dir.path())));
        store
            .add(alert("obscurecoin", AlertDirection::Above, 1.0, 1))
            .await
            .unwrap();

        let provider = Arc::new(MockPriceProvider::with_prices(&[("bitcoin", 60_000.0)]));
        let notifier = Arc::new(BufferedNotifier::new());
        let checker = checker(store.clone(), provider, notifier.clone());

        let outcome = checker.check().await.unwrap();
        assert_eq!(outcome.triggered, 0);
        assert_eq!(store.list().await.unwrap().len(), 1);
        assert!(notifier.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_min_interval_guard_suppresses_second_check() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(LocalAlertStore::new(LocalBlobs::new(dir.path())));
        store
            .add(alert("bitcoin", AlertDirection::Above, 100_000.0, 1))
            .await
            .unwrap();

        let provider = Arc::new(MockPriceProvider::with_prices(&[("bitcoin", 60_000.0)]));
        let notifier = Arc::new(BufferedNotifier::new());
        let checker = checker(store.clone(), provider.clone(), notifier);

        let first = checker.check().await.unwrap();
        assert!(!first.skipped);
        assert_eq!(provider.calls(), 1);

        // Less than 60 seconds later: no network call, no state change.
        let second = checker.check().await.unwrap();
        assert!(second.skipped);
        assert_eq!(provider.calls(), 1);

        tokio::time::advance(Duration::from_secs(61)).await;

        let third = checker.check().await.unwrap();
        assert!(!third.skipped);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_mutates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(LocalAlertStore::new(LocalBlobs::new(dir.path())));
        store
            .add(alert("bitcoin", AlertDirection::Above, 1.0, 1))
            .await
            .unwrap();

        let provider = Arc::new(MockPriceProvider::failing());
        let notifier = Arc::new(BufferedNotifier::new());
        let checker = checker(store.clone(), provider.clone(), notifier.clone());

        assert!(checker.check().await.is_err());
        assert_eq!(store.list().await.unwrap().len(), 1);
        assert!(notifier.is_empty());

        // A failed cycle does not arm the guard; the retry fetches again.
        assert!(checker.check().await.is_err());
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_alert_list_makes_no_network_call() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(LocalAlertStore::new(LocalBlobs::new(dir.path())));
        let provider = Arc::new(MockPriceProvider::with_prices(&[]));
        let notifier = Arc::new(BufferedNotifier::new());
        let checker = checker(store, provider.clone(), notifier);

        let outcome = checker.check().await.unwrap();
        assert_eq!(outcome.checked, 0);
        assert_eq!(provider.calls(), 0);
    }
}
