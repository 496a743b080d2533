use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::identity::Identity;
use crate::reward::{can_claim_today, RewardStats};
use crate::session::{AppState, FlowError, StatsStatus};

/// Which screen the application is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AppPhase {
    Loading,
    LoggedOut,
    AwaitingPin,
    Authenticated,
    ClaimInProgress,
}

impl AppState {
    pub fn phase(&self) -> AppPhase {
        match self {
            AppState::Loading => AppPhase::Loading,
            AppState::LoggedOut => AppPhase::LoggedOut,
            AppState::AwaitingPin { .. } => AppPhase::AwaitingPin,
            AppState::Authenticated { .. } => AppPhase::Authenticated,
            AppState::ClaimInProgress { .. } => AppPhase::ClaimInProgress,
        }
    }
}

/// Read-only snapshot of the session, safe to hand to any presenter.
///
/// Never carries the password or the PIN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub phase: AppPhase,
    /// Phone the PIN step is for.
    pub pending_phone: Option<String>,
    pub identity: Option<Identity>,
    pub stats: Option<RewardStats>,
    pub stats_error: Option<FlowError>,
    pub can_claim_today: bool,
    /// Most recent failure, cleared when the user starts a new action.
    pub last_error: Option<FlowError>,
}

impl SessionView {
    pub fn capture(state: &AppState, now: DateTime<Utc>, last_error: Option<FlowError>) -> Self {
        let mut view = SessionView {
            phase: state.phase(),
            pending_phone: None,
            identity: None,
            stats: None,
            stats_error: None,
            can_claim_today: false,
            last_error,
        };

        match state {
            AppState::Loading | AppState::LoggedOut => {}
            AppState::AwaitingPin { credentials } => {
                view.pending_phone = Some(credentials.phone.to_string());
            }
            AppState::Authenticated { session } | AppState::ClaimInProgress { session } => {
                view.identity = Some(session.identity.clone());
                match &session.stats {
                    StatsStatus::Pending => {}
                    StatsStatus::Loaded(stats) => {
                        view.stats = Some(stats.clone());
                        view.can_claim_today = matches!(state, AppState::Authenticated { .. })
                            && can_claim_today(stats, now);
                    }
                    StatsStatus::Unavailable(error) => {
                        view.stats_error = Some(error.clone());
                    }
                }
            }
        }

        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::TransientCredentials;
    use crate::security::SecretString;

    #[test]
    fn awaiting_pin_view_exposes_phone_only() {
        let state = AppState::AwaitingPin {
            credentials: TransientCredentials::parse("+1 415 555 0123", SecretString::from("pw"))
                .unwrap(),
        };
        let view = SessionView::capture(&state, Utc::now(), None);

        assert_eq!(view.phase, AppPhase::AwaitingPin);
        assert_eq!(view.pending_phone.as_deref(), Some("+14155550123"));
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("pw\""));
    }
}
