use crate::errors::AppError;
use crate::external::api_client::ApiClient;
use crate::models::leaderboard::{LeaderboardResponse, MyRank};

// ==============================================================================
// Leaderboard Service (remote-only)
// ==============================================================================

pub struct LeaderboardService {
    api: ApiClient,
}

impl LeaderboardService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn leaderboard(&self) -> Result<LeaderboardResponse, AppError> {
        self.api.get_json("/api/leaderboard/get").await
    }

    /// The caller's own rank. Being signed out is a normal state here, not
    /// an error: a 401 maps to the empty rank.
    pub async fn my_rank(&self) -> Result<MyRank, AppError> {
        match self.api.get_json("/api/leaderboard/my-rank").await {
            Err(AppError::Unauthorized) => Ok(MyRank::default()),
            other => other,
        }
    }
}
