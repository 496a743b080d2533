//! Reward eligibility engine.
//!
//! Loads reward stats and commits daily claims against the reward service.
//! The service decides whether a claim was recorded; local stats only change
//! after it confirms.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use dd_core::identity::Identity;
use dd_core::ports::RewardServicePort;
use dd_core::reward::{can_claim_today, RewardStats};
use dd_core::session::FlowError;

pub struct RewardEngine {
    service: Arc<dyn RewardServicePort>,
}

impl RewardEngine {
    pub fn new(service: Arc<dyn RewardServicePort>) -> Self {
        Self { service }
    }

    /// Fetch the current stats for `identity`.
    pub async fn load_stats(&self, identity: &Identity) -> Result<RewardStats, FlowError> {
        self.service
            .get_user_stats(&identity.phone)
            .await
            .map_err(|err| {
                warn!(user_id = %identity.id, error = %err, "reward stats fetch failed");
                FlowError::Fetch(err.user_message("Failed to load your reward stats"))
            })
    }

    /// Commit today's claim and return the merged stats.
    ///
    /// Eligibility is checked again against `now` before anything is sent:
    /// the claim sequence takes wall-clock time and may cross midnight.
    pub async fn commit_claim(
        &self,
        identity: &Identity,
        stats: &RewardStats,
        now: DateTime<Utc>,
    ) -> Result<RewardStats, FlowError> {
        if !can_claim_today(stats, now) {
            warn!(user_id = %identity.id, "claim refused locally, already claimed today");
            return Err(FlowError::AlreadyClaimed);
        }

        let receipt = self
            .service
            .collect_reward(&identity.phone)
            .await
            .map_err(|err| {
                warn!(user_id = %identity.id, error = %err, "reward commit failed");
                FlowError::Claim(err.user_message("Failed to collect your reward. Please try again."))
            })?;

        info!(
            user_id = %identity.id,
            total_rewards = receipt.total_rewards,
            "daily reward committed"
        );
        Ok(stats.apply_receipt(&receipt, now))
    }
}
