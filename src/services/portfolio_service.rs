use std::collections::HashMap;

use crate::errors::AppError;
use crate::models::market::CoinPrice;
use crate::models::portfolio::{NewAsset, PortfolioAsset, PortfolioStats};
use crate::storage::portfolio_store::PortfolioStore;

// ==============================================================================
// Portfolio Service
// ==============================================================================

/// Add a coin to the portfolio. A coin can appear at most once; a repeat add
/// is reported as `Duplicate` so the UI can show the specific message.
pub async fn add_asset(
    store: &dyn PortfolioStore,
    asset: NewAsset,
) -> Result<PortfolioAsset, AppError> {
    if asset.coin_id.trim().is_empty()
        || asset.coin_name.trim().is_empty()
        || asset.symbol.trim().is_empty()
    {
        return Err(AppError::Validation(
            "Missing required fields: coin id, name and symbol".into(),
        ));
    }

    if let Some(amount) = asset.amount {
        if !amount.is_finite() || amount < 0.0 {
            return Err(AppError::Validation("Amount must be a positive number".into()));
        }
    }
    if let Some(buy_price) = asset.buy_price {
        if !buy_price.is_finite() || buy_price < 0.0 {
            return Err(AppError::Validation(
                "Buy price must be a positive number".into(),
            ));
        }
    }

    let existing = store.list().await?;
    if existing.iter().any(|a| a.coin_id == asset.coin_id) {
        return Err(AppError::Duplicate);
    }

    store.add(asset).await
}

/// Total value, cost basis and profit/loss across assets that carry both an
/// amount and a buy price. Tracking-only entries are skipped entirely; a
/// coin missing from the price map contributes zero current value.
pub fn calculate_stats(
    portfolio: &[PortfolioAsset],
    prices: &HashMap<String, CoinPrice>,
) -> PortfolioStats {
    let mut total_value = 0.0;
    let mut total_invested = 0.0;

    for asset in portfolio {
        let (Some(amount), Some(buy_price)) = (asset.amount, asset.buy_price) else {
            continue;
        };

        let current_price = prices.get(&asset.coin_id).map(|p| p.usd).unwrap_or(0.0);
        total_value += current_price * amount;
        total_invested += buy_price * amount;
    }

    let profit_loss = total_value - total_invested;
    let profit_loss_percent = if total_invested > 0.0 {
        (profit_loss / total_invested) * 100.0
    } else {
        0.0
    };

    PortfolioStats {
        total_value,
        total_invested,
        profit_loss,
        profit_loss_percent,
    }
}
