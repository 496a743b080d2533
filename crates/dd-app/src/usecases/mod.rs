pub mod admin;
pub mod claim;
pub mod rewards;
pub mod session;

pub use admin::ListUsers;
pub use claim::{ClaimSequence, ClaimSequencer};
pub use rewards::RewardEngine;
pub use session::SessionOrchestrator;
