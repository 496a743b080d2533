use std::sync::Arc;

use tracing::{info, warn};

use dd_core::ports::{AdminDirectoryPort, UserDirectory};
use dd_core::session::FlowError;

/// Read-only listing of registered users for operators.
pub struct ListUsers {
    directory: Arc<dyn AdminDirectoryPort>,
}

impl ListUsers {
    pub fn new(directory: Arc<dyn AdminDirectoryPort>) -> Self {
        Self { directory }
    }

    pub async fn execute(&self) -> Result<UserDirectory, FlowError> {
        match self.directory.list_users().await {
            Ok(directory) => {
                info!(total_users = directory.total_users, "user directory loaded");
                Ok(directory)
            }
            Err(err) => {
                warn!(error = %err, "user directory fetch failed");
                Err(FlowError::Fetch(err.user_message("Failed to load users")))
            }
        }
    }
}
