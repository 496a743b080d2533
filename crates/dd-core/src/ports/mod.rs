//! Port interfaces for the application layer
//!
//! Ports define the contract between the session logic (use cases) and
//! infrastructure implementations: the remote service, the session file and
//! the clock. Use cases only ever see these traits.

pub mod admin_directory;
pub mod app_dirs;
pub mod auth_gateway;
mod clock;
pub mod errors;
pub mod reward_service;
pub mod session_store;

pub use admin_directory::{AdminDirectoryPort, UserDirectory, UserRecord};
pub use app_dirs::AppDirsPort;
pub use auth_gateway::AuthGatewayPort;
pub use clock::*;
pub use errors::{AppDirsError, GatewayError};
pub use reward_service::RewardServicePort;
pub use session_store::{SessionStoreError, SessionStorePort};
