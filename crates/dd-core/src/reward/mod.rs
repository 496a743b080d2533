//! Daily reward model and eligibility rule.
//!
//! A reward may be claimed once per UTC calendar day. The day boundary is
//! UTC midnight for every user regardless of their local timezone.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

mod claim_date;

/// Reward counters for one user, as reported by the reward service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardStats {
    pub total_rewards: u64,
    #[serde(default, with = "claim_date")]
    pub last_reward_claim: Option<NaiveDate>,
    #[serde(default)]
    pub join_date: Option<String>,
    #[serde(default)]
    pub last_login: Option<String>,
}

/// Result of a committed claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimReceipt {
    pub total_rewards: u64,
    /// Unreadable dates fall back to the commit day in `apply_receipt`.
    #[serde(
        default,
        serialize_with = "claim_date::serialize",
        deserialize_with = "claim_date::deserialize_lenient"
    )]
    pub last_claimed: Option<NaiveDate>,
}

impl RewardStats {
    /// Merge a committed claim into these stats.
    ///
    /// When the service omits the claim date, the day the claim was
    /// committed on is recorded so the same day is never eligible twice.
    pub fn apply_receipt(&self, receipt: &ClaimReceipt, now: DateTime<Utc>) -> RewardStats {
        RewardStats {
            total_rewards: receipt.total_rewards,
            last_reward_claim: Some(receipt.last_claimed.unwrap_or_else(|| claim_day(now))),
            ..self.clone()
        }
    }
}

/// UTC calendar day `now` falls on.
pub fn claim_day(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive()
}

/// Whether today's reward is still available.
pub fn can_claim_today(stats: &RewardStats, now: DateTime<Utc>) -> bool {
    match stats.last_reward_claim {
        None => true,
        Some(last) => last != claim_day(now),
    }
}
