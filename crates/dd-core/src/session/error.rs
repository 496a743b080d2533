use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::credentials::CredentialError;

/// Failures reported by the session flow.
///
/// Every variant carries text that can be shown to the user as-is. Transport
/// details stay in the logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum FlowError {
    /// Local input check failed; nothing was sent.
    #[error("{0}")]
    Validation(String),
    /// The service rejected the credentials or the PIN.
    #[error("{0}")]
    Auth(String),
    /// Reading from the service failed.
    #[error("{0}")]
    Fetch(String),
    /// Committing a claim failed; today's reward is still available.
    #[error("{0}")]
    Claim(String),
    #[error("You have already collected today's reward. Come back tomorrow!")]
    AlreadyClaimed,
    /// Another transition is still in flight.
    #[error("Please wait, the previous request is still running")]
    Busy,
}

impl FlowError {
    pub fn kind(&self) -> &'static str {
        match self {
            FlowError::Validation(_) => "validation",
            FlowError::Auth(_) => "auth",
            FlowError::Fetch(_) => "fetch",
            FlowError::Claim(_) => "claim",
            FlowError::AlreadyClaimed => "already_claimed",
            FlowError::Busy => "busy",
        }
    }
}

impl From<CredentialError> for FlowError {
    fn from(err: CredentialError) -> Self {
        FlowError::Validation(err.to_string())
    }
}
