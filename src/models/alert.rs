use serde::{Deserialize, Serialize};

// ==============================================================================
// Price Alert Models
// ==============================================================================

/// A user-defined price threshold for a coin. Removed once triggered.
///
/// Serialized field names match the persisted blob layout, so alerts written
/// by earlier app versions load unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceAlert {
    pub coin_id: String,
    pub coin_name: String,
    pub symbol: String,
    pub target_price: f64,
    pub direction: AlertDirection,
    /// Millisecond timestamp; together with `coin_id` forms the identity key.
    pub created_at: i64,
}

impl PriceAlert {
    pub fn key(&self) -> AlertKey {
        AlertKey {
            coin_id: self.coin_id.clone(),
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertDirection {
    Above,
    Below,
}

impl AlertDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertDirection::Above => "above",
            AlertDirection::Below => "below",
        }
    }

    /// Phrase used in triggered-alert notifications.
    pub fn triggered_phrase(&self) -> &'static str {
        match self {
            AlertDirection::Above => "went above",
            AlertDirection::Below => "went below",
        }
    }
}

/// Identity key for deduplication and removal. A coin may carry several
/// alerts, so `coin_id` alone is not sufficient.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertKey {
    pub coin_id: String,
    pub created_at: i64,
}

/// An alert that crossed its threshold during a poll cycle, paired with the
/// observed price that crossed it.
#[derive(Debug, Clone)]
pub struct TriggeredAlert {
    pub alert: PriceAlert,
    pub current_price: f64,
}
