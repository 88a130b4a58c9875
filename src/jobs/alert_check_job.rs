use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::errors::AppError;
use crate::services::alert_service::AlertChecker;
use crate::services::scheduler_service::JobResult;

/// Cadence of the polling timer. The checker's own minimum-interval guard
/// rate-limits on top of this, so an out-of-band foreground check never
/// doubles up with a timer tick.
pub const ALERT_CHECK_INTERVAL: Duration = Duration::from_secs(120);

// Context passed to the job function
#[derive(Clone)]
pub struct JobContext {
    pub checker: Arc<AlertChecker>,
}

/// Main entry point for the price-alert polling job.
///
/// One cycle compares every persisted alert against a batched price fetch,
/// notifies per crossed threshold and removes those alerts so they cannot
/// re-fire. Designed to run every two minutes while the app is foregrounded,
/// plus once immediately on foreground resume.
pub async fn run_alert_check(ctx: JobContext) -> Result<JobResult, AppError> {
    let outcome = ctx.checker.check().await?;

    if outcome.skipped {
        debug!("Alert check skipped by minimum-interval guard");
        return Ok(JobResult {
            items_processed: 0,
            items_failed: 0,
        });
    }

    if outcome.triggered > 0 {
        info!(
            "Alert check done: {} checked, {} triggered",
            outcome.checked, outcome.triggered
        );
    }

    Ok(JobResult {
        items_processed: outcome.checked as i32,
        items_failed: 0,
    })
}
