use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppDirsError {
    #[error("system data-local directory is unavailable")]
    DataLocalDirUnavailable,

    #[error("system config directory is unavailable")]
    ConfigDirUnavailable,
}

/// Failure talking to the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The service answered and refused the request.
    #[error("{message}")]
    Rejected { status: Option<u16>, message: String },

    /// The request never produced an answer (DNS, TLS, timeout...).
    #[error("request failed: {0}")]
    Transport(String),

    /// The service answered with something that could not be decoded.
    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    /// Text for the user: the service's own message when it refused,
    /// `fallback` when the failure is technical.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            GatewayError::Rejected { message, .. } if !message.trim().is_empty() => {
                message.clone()
            }
            _ => fallback.to_string(),
        }
    }
}
