use chrono::{DateTime, Duration, Utc};

use crate::errors::AppError;
use crate::models::points::PointsLedger;
use crate::storage::points_store::PointsStore;

/// Wall-clock gap required between daily claims. Computed as a delta, not a
/// scheduled timer, so it survives app restarts.
pub const CLAIM_COOLDOWN_HOURS: i64 = 24;

// ==============================================================================
// Claim Cooldown
// ==============================================================================

pub fn can_claim(ledger: &PointsLedger, now: DateTime<Utc>) -> bool {
    match ledger.last_claim_at {
        None => true,
        Some(last) => now - last >= Duration::hours(CLAIM_COOLDOWN_HOURS),
    }
}

/// Time remaining until the next claim, or `None` when claiming is open.
pub fn time_until_next_claim(ledger: &PointsLedger, now: DateTime<Utc>) -> Option<Duration> {
    let last = ledger.last_claim_at?;
    let next = last + Duration::hours(CLAIM_COOLDOWN_HOURS);
    if now >= next {
        None
    } else {
        Some(next - now)
    }
}

/// Claim the daily reward. Validates the cooldown before any write so a
/// premature claim never mutates the ledger.
pub async fn claim_daily(store: &dyn PointsStore) -> Result<PointsLedger, AppError> {
    let ledger = store.ledger().await?;
    if !can_claim(&ledger, Utc::now()) {
        return Err(AppError::Validation(
            "Daily claim is still on cooldown".into(),
        ));
    }

    store.claim().await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_claimed_at(hours_ago: i64) -> PointsLedger {
        PointsLedger {
            points: 100,
            last_claim_at: Some(Utc::now() - Duration::hours(hours_ago)),
        }
    }

    #[test]
    fn test_fresh_ledger_can_claim() {
        let ledger = PointsLedger::default();
        assert!(can_claim(&ledger, Utc::now()));
    }

    #[test]
    fn test_claim_blocked_inside_cooldown() {
        assert!(!can_claim(&ledger_claimed_at(1), Utc::now()));
        assert!(!can_claim(&ledger_claimed_at(23), Utc::now()));
    }

    #[test]
    fn test_claim_open_after_cooldown() {
        assert!(can_claim(&ledger_claimed_at(24), Utc::now()));
        assert!(can_claim(&ledger_claimed_at(48), Utc::now()));
    }

    #[test]
    fn test_time_until_next_claim() {
        let ledger = ledger_claimed_at(20);
        let remaining = time_until_next_claim(&ledger, Utc::now()).unwrap();
        // Roughly four hours left.
        assert!(remaining <= Duration::hours(4));
        assert!(remaining > Duration::hours(3));

        assert!(time_until_next_claim(&ledger_claimed_at(25), Utc::now()).is_none());
        assert!(time_until_next_claim(&PointsLedger::default(), Utc::now()).is_none());
    }

    #[tokio::test]
    async fn test_claim_daily_rejects_during_cooldown() {
        use crate::storage::local::LocalBlobs;
        use crate::storage::points_store::LocalPointsStore;

        let dir = tempfile::tempdir().unwrap();
        let store = LocalPointsStore::new(LocalBlobs::new(dir.path()));

        let first = claim_daily(&store).await.unwrap();
        assert_eq!(first.points, 10);

        let second = claim_daily(&store).await;
        assert!(matches!(second, Err(AppError::Validation(_))));

        // Ledger untouched by the rejected claim.
        assert_eq!(store.ledger().await.unwrap().points, 10);
    }
}
