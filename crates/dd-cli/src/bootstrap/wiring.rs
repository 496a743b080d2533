//! Dependency wiring.
//!
//! Builds the infrastructure adapters from resolved settings and hands them
//! to the use cases as `Arc<dyn Port>`.

use std::sync::Arc;

use dd_app::{ClaimSequencer, ListUsers, RewardEngine, SessionOrchestrator};
use dd_infra::{ApiClientConfig, ApiClientError, JsonSessionStore, RewardApiClient, SystemClock};

use super::config::RuntimeSettings;

pub type WiringResult<T> = Result<T, WiringError>;

#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("Reward service client initialization failed: {0}")]
    ServiceClient(#[from] ApiClientError),
}

/// Use cases ready to be driven by a front end.
pub struct AppServices {
    pub orchestrator: Arc<SessionOrchestrator>,
    pub list_users: ListUsers,
}

pub fn wire_dependencies(settings: RuntimeSettings) -> WiringResult<AppServices> {
    let client = Arc::new(RewardApiClient::new(ApiClientConfig {
        base_url: settings.base_url,
        api_key: settings.api_key,
        timeout: settings.timeout,
    })?);
    let session_store = Arc::new(JsonSessionStore::new(settings.session_file));
    let clock = Arc::new(SystemClock);

    let reward_engine = Arc::new(RewardEngine::new(client.clone()));
    let orchestrator = SessionOrchestrator::new(
        client.clone(),
        session_store,
        reward_engine,
        ClaimSequencer::new(settings.claim_timing),
        clock,
    );

    Ok(AppServices {
        orchestrator,
        list_users: ListUsers::new(client),
    })
}
