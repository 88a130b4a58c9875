use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::info;

// ==============================================================================
// Notification Service
// ==============================================================================

/// A user-facing notification. The mobile shell renders these as system
/// alerts; the headless binary logs them.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

/// Seam for surfacing notifications to whatever host is embedding the
/// engine.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: Notification);
}

/// Default notifier for headless runs: writes the notification to the log.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: Notification) {
        info!("🔔 {}: {}", notification.title, notification.message);
    }
}

/// Collects notifications in memory. Used by tests and by hosts that drain
/// notifications into their own UI on their own schedule.
#[derive(Default)]
pub struct BufferedNotifier {
    buffer: Mutex<Vec<Notification>>,
}

impl BufferedNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.buffer.lock())
    }

    pub fn len(&self) -> usize {
        self.buffer.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }
}

#[async_trait]
impl Notifier for BufferedNotifier {
    async fn notify(&self, notification: Notification) {
        self.buffer.lock().push(notification);
    }
}
