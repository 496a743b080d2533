use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::identity::UserId;
use crate::ports::GatewayError;

/// One row of the admin user listing. Secrets in the payload are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: UserId,
    pub phone: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_login: Option<String>,
    #[serde(default)]
    pub total_rewards: u64,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub last_reward_claim: Option<String>,
    #[serde(default)]
    pub has_pin_set: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDirectory {
    pub users: Vec<UserRecord>,
    pub total_users: u64,
    pub active_users: u64,
    pub total_rewards: u64,
}

/// Read-only listing of every registered user.
#[async_trait]
pub trait AdminDirectoryPort: Send + Sync {
    async fn list_users(&self) -> Result<UserDirectory, GatewayError>;
}
