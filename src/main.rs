use std::sync::Arc;

use coinreader::app;
use coinreader::jobs::alert_check_job::{self, JobContext, ALERT_CHECK_INTERVAL};
use coinreader::logging::{init_logging, LoggingConfig};
use coinreader::services::alert_service::AlertChecker;
use coinreader::services::scheduler_service::Scheduler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env())
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    let state = app::bootstrap()
        .await
        .map_err(|e| anyhow::anyhow!("bootstrap failed: {}", e))?;

    let checker = Arc::new(AlertChecker::new(
        state.alerts.clone(),
        state.prices.clone(),
        state.notifier.clone(),
    ));

    let mut scheduler = Scheduler::new();
    let ctx = JobContext { checker };
    scheduler.spawn_task(
        "check_price_alerts",
        ALERT_CHECK_INTERVAL,
        true,
        move || alert_check_job::run_alert_check(ctx.clone()),
    );

    tracing::info!("🚀 coinreader engine running (Ctrl-C to stop)");
    tokio::signal::ctrl_c().await?;

    scheduler.shutdown();
    tracing::info!("👋 Shut down cleanly");
    Ok(())
}
