pub mod alert;
pub mod content;
pub mod leaderboard;
pub mod market;
pub mod news;
pub mod points;
pub mod portfolio;

pub use alert::{AlertDirection, AlertKey, PriceAlert, TriggeredAlert};
pub use content::{ContentBlock, InlineRun};
pub use leaderboard::{LeaderboardEntry, LeaderboardResponse, MyRank, Prize};
pub use market::{CoinPrice, MarketCoin};
pub use news::{Embedded, EmbeddedAuthor, EmbeddedMedia, Post, Rendered};
pub use points::{PointsLedger, ReadingProgress, TrackReadOutcome};
pub use portfolio::{
    NewAsset, PortfolioAsset, PortfolioStats, ReorderDirection, UpdateAsset,
};
