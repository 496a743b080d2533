//! Wire shapes of the reward service.

use serde::{Deserialize, Serialize};

use dd_core::identity::Identity;
use dd_core::reward::RewardStats;

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub phone: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct VerifyPinRequest<'a> {
    pub phone: &'a str,
    pub pin: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct CollectRewardRequest<'a> {
    pub phone: &'a str,
}

/// Fields every response may carry next to its payload.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResponseStatus {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VerifyPinResponse {
    pub user: Identity,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserStatsResponse {
    pub stats: RewardStats,
}
