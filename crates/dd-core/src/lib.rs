//! # dd-core
//!
//! Core domain models and session logic for DailyDrop.
//!
//! This crate contains pure business logic without any infrastructure dependencies:
//! the session state machine, the daily reward rules and the ports that the
//! application layer drives.

pub mod app_dirs;
pub mod claim;
pub mod config;
pub mod credentials;
pub mod identity;
pub mod ports;
pub mod reward;
pub mod security;
pub mod session;

// Re-export commonly used types at the crate root
pub use claim::{ClaimPhase, ClaimProgress, ClaimTiming};
pub use config::AppConfig;
pub use credentials::{PhoneNumber, Pin, TransientCredentials};
pub use identity::{Identity, UserId};
pub use reward::{can_claim_today, ClaimReceipt, RewardStats};
pub use security::SecretString;
pub use session::{
    AppPhase, AppState, FlowError, Session, SessionAction, SessionEvent, SessionStateMachine,
    SessionView, StatsStatus,
};
