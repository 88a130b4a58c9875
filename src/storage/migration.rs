use futures::future::join_all;
use serde_json::json;
use tracing::{info, warn};

use crate::external::api_client::ApiClient;
use crate::models::alert::PriceAlert;
use crate::models::points::PointsLedger;
use crate::models::portfolio::PortfolioAsset;
use crate::storage::local::{keys, LocalBlobs};

#[derive(Debug, Default)]
pub struct MigrationReport {
    pub migrated_entities: u32,
    pub failed_entities: u32,
}

/// One-shot local-to-remote migration, run when the user signs in.
///
/// Best-effort by contract: each entity migrates independently, failures are
/// logged and counted, and the caller completes sign-in regardless. A local
/// blob is only cleared after its contents were accepted remotely, so a
/// failed entity is retried on the next sign-in transition.
pub async fn migrate_local_to_remote(blobs: &LocalBlobs, api: &ApiClient) -> MigrationReport {
    let mut report = MigrationReport::default();

    migrate_portfolio(blobs, api, &mut report).await;
    migrate_points(blobs, api, &mut report).await;
    migrate_alerts(blobs, api, &mut report).await;

    info!(
        "🔁 Local-to-remote migration finished: {} migrated, {} failed",
        report.migrated_entities, report.failed_entities
    );
    report
}

async fn migrate_portfolio(blobs: &LocalBlobs, api: &ApiClient, report: &mut MigrationReport) {
    let assets: Vec<PortfolioAsset> = match blobs.read(keys::PORTFOLIO).await {
        Ok(Some(assets)) => assets,
        Ok(None) => return,
        Err(e) => {
            warn!("Skipping portfolio migration: {}", e);
            report.failed_entities += 1;
            return;
        }
    };

    // Pushed one at a time so the server assigns display order in the same
    // sequence the user arranged locally.
    let mut ordered = assets;
    ordered.sort_by_key(|a| a.display_order);

    for asset in &ordered {
        let result: Result<serde_json::Value, _> =
            api.post_json("/api/portfolio/add", asset).await;
        if let Err(e) = result {
            warn!("Portfolio migration failed at {}: {}", asset.coin_id, e);
            report.failed_entities += 1;
            return;
        }
    }

    if clear(blobs, keys::PORTFOLIO).await {
        report.migrated_entities += 1;
        info!("✓ Migrated {} portfolio assets", ordered.len());
    }
}

async fn migrate_points(blobs: &LocalBlobs, api: &ApiClient, report: &mut MigrationReport) {
    let ledger: PointsLedger = match blobs.read(keys::POINTS).await {
        Ok(Some(ledger)) => ledger,
        Ok(None) => return,
        Err(e) => {
            warn!("Skipping points migration: {}", e);
            report.failed_entities += 1;
            return;
        }
    };

    let body = json!({
        "points": ledger.points,
        "lastClaimAt": ledger.last_claim_at,
    });
    let result: Result<serde_json::Value, _> =
        api.post_json("/api/rewards/import", &body).await;

    match result {
        Ok(_) => {
            if clear(blobs, keys::POINTS).await {
                report.migrated_entities += 1;
                info!("✓ Migrated points ledger ({} points)", ledger.points);
            }
        }
        Err(e) => {
            warn!("Points migration failed: {}", e);
            report.failed_entities += 1;
        }
    }
}

async fn migrate_alerts(blobs: &LocalBlobs, api: &ApiClient, report: &mut MigrationReport) {
    let alerts: Vec<PriceAlert> = match blobs.read(keys::PRICE_ALERTS).await {
        Ok(Some(alerts)) => alerts,
        Ok(None) => return,
        Err(e) => {
            warn!("Skipping alert migration: {}", e);
            report.failed_entities += 1;
            return;
        }
    };

    let pushes = alerts
        .iter()
        .map(|alert| api.post_json::<_, serde_json::Value>("/api/alerts/add", alert));
    let failures = join_all(pushes)
        .await
        .into_iter()
        .filter(|r| r.is_err())
        .count();

    if failures > 0 {
        warn!("Alert migration failed for {} of {} alerts", failures, alerts.len());
        report.failed_entities += 1;
        return;
    }

    if clear(blobs, keys::PRICE_ALERTS).await {
        report.migrated_entities += 1;
        info!("✓ Migrated {} price alerts", alerts.len());
    }
}

async fn clear(blobs: &LocalBlobs, key: &str) -> bool {
    match blobs.remove(key).await {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to clear local blob '{}' after migration: {}", key, e);
            false
        }
    }
}
