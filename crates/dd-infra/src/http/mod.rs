mod client;
mod dto;

pub use client::{ApiClientConfig, ApiClientError, RewardApiClient, DEFAULT_TIMEOUT};
