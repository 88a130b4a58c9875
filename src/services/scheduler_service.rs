use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::errors::AppError;

// ==============================================================================
// Task Scheduler
// ==============================================================================
//
// One place for every periodic task instead of ad hoc timer pairs scattered
// per screen: named tasks, a fixed interval each, paused while the app is
// backgrounded, all cancelled on shutdown. Tasks flagged `run_on_resume`
// fire immediately when the app returns to the foreground.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppLifecycle {
    Active,
    Background,
}

#[derive(Debug)]
pub struct JobResult {
    pub items_processed: i32,
    pub items_failed: i32,
}

pub struct Scheduler {
    lifecycle: watch::Sender<AppLifecycle>,
    handles: Vec<(&'static str, JoinHandle<()>)>,
}

impl Scheduler {
    pub fn new() -> Self {
        let (lifecycle, _) = watch::channel(AppLifecycle::Active);
        Self {
            lifecycle,
            handles: Vec::new(),
        }
    }

    /// Report a host lifecycle transition. Backgrounding suppresses ticks;
    /// returning to the foreground re-runs `run_on_resume` tasks
    /// immediately so nothing is missed while the app was suspended.
    pub fn set_lifecycle(&self, next: AppLifecycle) {
        if *self.lifecycle.borrow() != next {
            info!("📱 App lifecycle: {:?}", next);
            let _ = self.lifecycle.send(next);
        }
    }

    /// Register a named periodic task. The first run happens immediately.
    pub fn spawn_task<F, Fut>(
        &mut self,
        name: &'static str,
        every: Duration,
        run_on_resume: bool,
        job: F,
    ) where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<JobResult, AppError>> + Send + 'static,
    {
        let mut lifecycle = self.lifecycle.subscribe();

        let handle = tokio::spawn(async move {
            let mut active = *lifecycle.borrow() == AppLifecycle::Active;
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if active {
                            run_job(name, &job).await;
                        }
                    }
                    changed = lifecycle.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let now_active =
                            *lifecycle.borrow_and_update() == AppLifecycle::Active;
                        let resumed = now_active && !active;
                        active = now_active;
                        if resumed && run_on_resume {
                            run_job(name, &job).await;
                        }
                    }
                }
            }
        });

        info!("📅 Scheduled task: {} every {:?}", name, every);
        self.handles.push((name, handle));
    }

    /// Cancel every task. In-flight work is aborted at its next await point;
    /// responses arriving afterwards are discarded with the task.
    pub fn shutdown(self) {
        for (name, handle) in self.handles {
            handle.abort();
            info!("🛑 Stopped task: {}", name);
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_job<F, Fut>(name: &str, job: &F)
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<JobResult, AppError>>,
{
    let started = std::time::Instant::now();

    match job().await {
        Ok(result) => {
            info!(
                "✅ Task completed: {} (processed: {}, failed: {}, duration: {}ms)",
                name,
                result.items_processed,
                result.items_failed,
                started.elapsed().as_millis()
            );
        }
        Err(e) => {
            error!("❌ Task failed: {} - {}", name, e);
        }
    }
}
