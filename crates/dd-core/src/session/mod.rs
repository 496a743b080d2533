//! Session domain module.
//!
//! Login, PIN verification and the daily claim expressed as a pure state
//! machine, plus the read-only view handed to presenters.

mod error;
pub mod state_machine;
mod view;

pub use error::FlowError;
pub use state_machine::{
    AppState, Session, SessionAction, SessionEvent, SessionStateMachine, StatsStatus,
};
pub use view::{AppPhase, SessionView};
