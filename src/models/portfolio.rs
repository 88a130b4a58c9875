use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==============================================================================
// Portfolio Models
// ==============================================================================

/// One portfolio entry. `amount` and `buy_price` are optional so an asset can
/// be held purely for price-watching (tracking-only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioAsset {
    pub id: Uuid,
    pub coin_id: String,
    pub coin_name: String,
    pub symbol: String,
    pub amount: Option<f64>,
    pub buy_price: Option<f64>,
    pub display_order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAsset {
    pub coin_id: String,
    pub coin_name: String,
    pub symbol: String,
    pub amount: Option<f64>,
    pub buy_price: Option<f64>,
}

impl NewAsset {
    pub fn into_asset(self, display_order: i64) -> PortfolioAsset {
        PortfolioAsset {
            id: Uuid::new_v4(),
            coin_id: self.coin_id,
            coin_name: self.coin_name,
            symbol: self.symbol,
            amount: self.amount,
            buy_price: self.buy_price,
            display_order,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAsset {
    pub amount: Option<f64>,
    pub buy_price: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReorderDirection {
    Up,
    Down,
}

/// Aggregate value and cost basis across assets that carry both an amount
/// and a buy price. Tracking-only assets do not contribute.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PortfolioStats {
    pub total_value: f64,
    pub total_invested: f64,
    pub profit_loss: f64,
    pub profit_loss_percent: f64,
}
