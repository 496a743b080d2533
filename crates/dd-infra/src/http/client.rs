//! HTTP client for the reward service.
//!
//! Every endpoint answers with a JSON object carrying `success` and, on
//! failure, an `error` message. A non-2xx status or `success: false` is a
//! rejection; the service's `error` text is kept for display and
//! `HTTP error! status: N` stands in when it is missing.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::{DeserializeOwned, IgnoredAny};
use thiserror::Error;
use tracing::{debug, warn};

use dd_core::credentials::{PhoneNumber, Pin};
use dd_core::identity::Identity;
use dd_core::ports::{
    AdminDirectoryPort, AuthGatewayPort, GatewayError, RewardServicePort, UserDirectory,
};
use dd_core::reward::{ClaimReceipt, RewardStats};
use dd_core::security::SecretString;

use crate::http::dto::{
    CollectRewardRequest, LoginRequest, ResponseStatus, UserStatsResponse, VerifyPinRequest,
    VerifyPinResponse,
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("invalid service base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("service api key contains characters not allowed in a header")]
    InvalidApiKey,

    #[error("failed to build http client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Connection settings for [`RewardApiClient`].
#[derive(Debug)]
pub struct ApiClientConfig {
    pub base_url: String,
    pub api_key: SecretString,
    pub timeout: Duration,
}

/// Client for the auth, reward and admin endpoints.
#[derive(Debug, Clone)]
pub struct RewardApiClient {
    http: Client,
    base_url: String,
}

impl RewardApiClient {
    pub fn new(config: ApiClientConfig) -> Result<Self, ApiClientError> {
        let parsed = Url::parse(&config.base_url).map_err(|err| ApiClientError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: err.to_string(),
        })?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiClientError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: "expected an http(s) url".to_string(),
            });
        }

        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key.expose()))
            .map_err(|_| ApiClientError::InvalidApiKey)?;
        bearer.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);

        let http = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        request: RequestBuilder,
    ) -> Result<T, GatewayError> {
        let response = request.send().await.map_err(|err| {
            warn!(endpoint, error = %err, "service request failed");
            GatewayError::Transport(err.to_string())
        })?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;
        debug!(endpoint, status = status.as_u16(), "service responded");

        let value = serde_json::from_slice::<serde_json::Value>(&body).ok();
        let response_status = value
            .as_ref()
            .and_then(|value| serde_json::from_value::<ResponseStatus>(value.clone()).ok())
            .unwrap_or_default();
        let service_error = response_status
            .error
            .filter(|message| !message.trim().is_empty());

        if !status.is_success() {
            return Err(GatewayError::Rejected {
                status: Some(status.as_u16()),
                message: service_error
                    .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16())),
            });
        }

        let Some(value) = value else {
            return Err(GatewayError::InvalidResponse(
                "response body is not JSON".to_string(),
            ));
        };
        if !response_status.success {
            return Err(GatewayError::Rejected {
                status: Some(status.as_u16()),
                message: service_error.unwrap_or_default(),
            });
        }

        serde_json::from_value(value).map_err(|err| {
            warn!(endpoint, error = %err, "service response did not match the expected shape");
            GatewayError::InvalidResponse(err.to_string())
        })
    }
}

fn stats_path(phone: &str) -> String {
    format!("/user/stats/{}", urlencoding::encode(phone))
}

#[async_trait]
impl AuthGatewayPort for RewardApiClient {
    async fn login(&self, phone: &PhoneNumber, password: &SecretString) -> Result<(), GatewayError> {
        let body = LoginRequest {
            phone: phone.as_str(),
            password: password.expose(),
        };
        let request = self.http.post(self.url("/auth/login")).json(&body);
        self.call::<IgnoredAny>("auth/login", request).await?;
        Ok(())
    }

    async fn verify_pin(&self, phone: &PhoneNumber, pin: &Pin) -> Result<Identity, GatewayError> {
        let body = VerifyPinRequest {
            phone: phone.as_str(),
            pin: pin.expose(),
        };
        let request = self.http.post(self.url("/auth/verify-pin")).json(&body);
        let response: VerifyPinResponse = self.call("auth/verify-pin", request).await?;
        Ok(response.user)
    }
}

#[async_trait]
impl RewardServicePort for RewardApiClient {
    async fn get_user_stats(&self, phone: &str) -> Result<RewardStats, GatewayError> {
        let path = stats_path(phone);
        let request = self.http.get(self.url(&path));
        let response: UserStatsResponse = self.call("user/stats", request).await?;
        Ok(response.stats)
    }

    async fn collect_reward(&self, phone: &str) -> Result<ClaimReceipt, GatewayError> {
        let body = CollectRewardRequest { phone };
        let request = self.http.post(self.url("/rewards/collect")).json(&body);
        self.call("rewards/collect", request).await
    }
}

#[async_trait]
impl AdminDirectoryPort for RewardApiClient {
    async fn list_users(&self) -> Result<UserDirectory, GatewayError> {
        let request = self.http.get(self.url("/admin/users"));
        self.call("admin/users", request).await
    }
}
