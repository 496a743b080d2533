use async_trait::async_trait;

use crate::ports::GatewayError;
use crate::reward::{ClaimReceipt, RewardStats};

/// Remote owner of reward counters. It is the only source of truth for
/// whether a claim was recorded.
#[async_trait]
pub trait RewardServicePort: Send + Sync {
    async fn get_user_stats(&self, phone: &str) -> Result<RewardStats, GatewayError>;

    async fn collect_reward(&self, phone: &str) -> Result<ClaimReceipt, GatewayError>;
}
