pub mod alert_store;
pub mod local;
pub mod migration;
pub mod points_store;
pub mod portfolio_store;
pub mod prefs_store;

pub use alert_store::{AlertStore, LocalAlertStore, RemoteAlertStore};
pub use local::LocalBlobs;
pub use points_store::{
    LocalPointsStore, LocalReadingProgressStore, PointsStore, ReadingProgressStore,
    RemotePointsStore, RemoteReadingProgressStore,
};
pub use portfolio_store::{LocalPortfolioStore, PortfolioStore, RemotePortfolioStore};
pub use prefs_store::PreferenceStore;
