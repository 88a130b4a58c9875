//! End-to-end price-alert flow: persisted alert, one poll cycle against a
//! canned price feed, notification fired, alert removed from storage.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use coinreader::external::price_provider::{
    MarketsQuery, PriceProvider, PriceProviderError,
};
use coinreader::models::alert::{AlertDirection, PriceAlert};
use coinreader::models::market::{CoinPrice, MarketCoin};
use coinreader::services::alert_service::AlertChecker;
use coinreader::services::notification_service::BufferedNotifier;
use coinreader::storage::alert_store::{AlertStore, LocalAlertStore};
use coinreader::storage::local::LocalBlobs;

struct CannedPriceFeed {
    prices: HashMap<String, f64>,
}

impl CannedPriceFeed {
    fn new(pairs: &[(&str, f64)]) -> Self {
        Self {
            prices: pairs
                .iter()
                .map(|(id, usd)| (id.to_string(), *usd))
                .collect(),
        }
    }
}

#[async_trait]
impl PriceProvider for CannedPriceFeed {
    async fn fetch_simple_prices(
        &self,
        coin_ids: &[String],
    ) -> Result<HashMap<String, CoinPrice>, PriceProviderError> {
        Ok(coin_ids
            .iter()
            .filter_map(|id| {
                self.prices.get(id).map(|usd| {
                    (
                        id.clone(),
                        CoinPrice {
                            usd: *usd,
                            usd_24h_change: Some(1.2),
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

fn bitcoin_alert() -> PriceAlert {
    PriceAlert {
        coin_id: "bitcoin".to_string(),
        coin_name: "Bitcoin".to_string(),
        symbol: "BTC".to_string(),
        target_price: 50_000.0,
        direction: AlertDirection::Above,
        created_at: 1_000,
    }
}

#[tokio::test]
async fn triggered_alert_is_removed_and_notified_once() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(LocalAlertStore::new(LocalBlobs::new(dir.path())));
    store.add(bitcoin_alert()).await.unwrap();

    // A second alert for a different coin that must survive the cycle.
    store
        .add(PriceAlert {
            coin_id: "ethereum".to_string(),
            coin_name: "Ethereum".to_string(),
            symbol: "ETH".to_string(),
            target_price: 10_000.0,
            direction: AlertDirection::Above,
            created_at: 2_000,
        })
        .await
        .unwrap();

    let feed = Arc::new(CannedPriceFeed::new(&[
        ("bitcoin", 50_500.0),
        ("ethereum", 3_200.0),
    ]));
    let notifier = Arc::new(BufferedNotifier::new());
    let checker = AlertChecker::new(store.clone(), feed, notifier.clone());

    let outcome = checker.check().await.unwrap();
    assert_eq!(outcome.checked, 2);
    assert_eq!(outcome.triggered, 1);

    // The bitcoin alert's identity key is gone from the persisted list;
    // the ethereum alert is untouched.
    let remaining = store.list().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].coin_id, "ethereum");
    assert_eq!(remaining[0].created_at, 2_000);

    let notifications = notifier.drain();
    assert_eq!(notifications.len(), 1);
    let message = &notifications[0].message;
    assert!(message.contains("Bitcoin"));
    assert!(message.contains("BTC"));
    assert!(message.contains("went above"));
    assert!(message.contains("50,000"));
    assert!(message.contains("50,500"));
}

#[tokio::test]
async fn untriggered_alert_survives_repeated_cycles() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(LocalAlertStore::new(LocalBlobs::new(dir.path())));
    store.add(bitcoin_alert()).await.unwrap();

    let feed = Arc::new(CannedPriceFeed::new(&[("bitcoin", 49_000.0)]));
    let notifier = Arc::new(BufferedNotifier::new());
    let checker = AlertChecker::with_min_interval(
        store.clone(),
        feed,
        notifier.clone(),
        std::time::Duration::ZERO,
    );

    for _ in 0..3 {
        let outcome = checker.check().await.unwrap();
        assert_eq!(outcome.triggered, 0);
    }

    assert_eq!(store.list().await.unwrap().len(), 1);
    assert!(notifier.is_empty());
}

#[tokio::test]
async fn alert_blob_persists_across_store_instances() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = LocalAlertStore::new(LocalBlobs::new(dir.path()));
        store.add(bitcoin_alert()).await.unwrap();
    }

    // A fresh store over the same directory sees the same alert.
    let store = LocalAlertStore::new(LocalBlobs::new(dir.path()));
    let alerts = store.list().await.unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].coin_id, "bitcoin");
    assert_eq!(alerts[0].target_price, 50_000.0);
}
