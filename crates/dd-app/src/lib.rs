//! DailyDrop Application Orchestration Layer
//!
//! This crate contains the use cases (reward engine, claim sequence, admin
//! listing) and the orchestrator that runs the session state machine
//! against the ports.

pub mod app_paths;
pub mod usecases;

pub use usecases::{ClaimSequence, ClaimSequencer, ListUsers, RewardEngine, SessionOrchestrator};
