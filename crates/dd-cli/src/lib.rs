//! # dd-cli
//!
//! Startup for DailyDrop: configuration, logging and dependency wiring,
//! plus the terminal front end driving the session.

pub mod bootstrap;
pub mod console;

pub use bootstrap::{run_app, RunOptions};
