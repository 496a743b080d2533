use thiserror::Error;

use crate::identity::Identity;

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("session store failed: {0}")]
    Store(String),

    #[error("stored session is corrupt: {0}")]
    Corrupt(String),
}

/// Durable slot holding the identity of the logged-in user.
///
/// Calls are synchronous; there is a single writer.
pub trait SessionStorePort: Send + Sync {
    /// Load the stored identity, `None` when logged out.
    fn load(&self) -> Result<Option<Identity>, SessionStoreError>;

    /// Store the identity, replacing any previous one.
    fn save(&self, identity: &Identity) -> Result<(), SessionStoreError>;

    /// Remove the stored identity. Must be idempotent.
    fn clear(&self) -> Result<(), SessionStoreError>;
}

