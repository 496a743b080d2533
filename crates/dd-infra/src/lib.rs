//! Infrastructure adapters for DailyDrop.
//!
//! Implements the ports from `dd-core` against the reward service over
//! HTTP, the local filesystem and the system clock.

pub mod app_dirs;
pub mod fs;
pub mod http;
pub mod time;

pub use app_dirs::DirsAppDirsAdapter;
pub use fs::JsonSessionStore;
pub use http::{ApiClientConfig, ApiClientError, RewardApiClient};
pub use time::SystemClock;
