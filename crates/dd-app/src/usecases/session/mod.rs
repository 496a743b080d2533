//! Session flow use cases: login, PIN verification, stats and the daily claim.

mod context;
mod orchestrator;

pub use context::SessionContext;
pub use orchestrator::SessionOrchestrator;
