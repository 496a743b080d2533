//! Session state machine.
//!
//! Defines a pure state transition function for login, PIN verification and
//! the daily claim. Side effects are returned as [`SessionAction`]s; their
//! outcomes come back as result events.

use chrono::{DateTime, Utc};

use crate::credentials::{PhoneNumber, Pin, TransientCredentials};
use crate::identity::Identity;
use crate::reward::{can_claim_today, RewardStats};
use crate::security::SecretString;
use crate::session::FlowError;

/// Reward stats as known to an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsStatus {
    /// Fetch requested, no answer yet.
    Pending,
    Loaded(RewardStats),
    /// Last fetch failed and nothing was loaded before it.
    Unavailable(FlowError),
}

impl StatsStatus {
    pub fn loaded(&self) -> Option<&RewardStats> {
        match self {
            StatsStatus::Loaded(stats) => Some(stats),
            _ => None,
        }
    }
}

/// An authenticated user and what is known about their rewards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub identity: Identity,
    pub stats: StatsStatus,
}

impl Session {
    pub fn pending(identity: Identity) -> Self {
        Self {
            identity,
            stats: StatsStatus::Pending,
        }
    }
}

/// Application state. Credentials only exist while a PIN is awaited; an
/// identity only exists while authenticated.
#[derive(Debug, PartialEq, Eq)]
pub enum AppState {
    /// Stored session not checked yet.
    Loading,
    LoggedOut,
    AwaitingPin { credentials: TransientCredentials },
    Authenticated { session: Session },
    ClaimInProgress { session: Session },
}

/// Events that drive the session flow.
#[derive(Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// Startup: whatever the session store returned.
    Restore { identity: Option<Identity> },
    SubmitLogin { phone: String, password: SecretString },
    LoginAccepted { credentials: TransientCredentials },
    LoginRejected { error: FlowError },
    SubmitPin { pin: SecretString },
    PinAccepted { identity: Identity },
    PinRejected { error: FlowError },
    /// Leave the PIN step.
    Back,
    Logout,
    RefreshStats,
    StatsLoaded { stats: RewardStats },
    StatsFailed { error: FlowError },
    StartClaim { now: DateTime<Utc> },
    CancelClaim,
    /// The claim sequence reached its end and asks for the commit.
    ClaimSequenceFinished,
    ClaimCommitted { stats: RewardStats },
    ClaimFailed { error: FlowError },
}

/// Side-effects produced by state transitions.
#[derive(Debug, PartialEq, Eq)]
pub enum SessionAction {
    /// Ask the gateway to check phone and password.
    RequestLogin { credentials: TransientCredentials },
    VerifyPin { phone: PhoneNumber, pin: Pin },
    PersistIdentity { identity: Identity },
    ClearIdentity,
    LoadStats { identity: Identity },
    StartClaimSequence,
    /// Commit today's claim. The engine re-checks eligibility first.
    CommitClaim { identity: Identity, stats: RewardStats },
    StopClaimSequence,
    /// The triggering event was refused; report it to the caller.
    Reject { error: FlowError },
    /// Something failed in the background; show it without failing the caller.
    Notify { error: FlowError },
}

/// Pure session state machine.
pub struct SessionStateMachine;

impl SessionStateMachine {
    pub fn transition(state: AppState, event: SessionEvent) -> (AppState, Vec<SessionAction>) {
        match (state, event) {
            (AppState::Loading, SessionEvent::Restore { identity }) => match identity {
                Some(identity) => (
                    AppState::Authenticated {
                        session: Session::pending(identity.clone()),
                    },
                    vec![SessionAction::LoadStats { identity }],
                ),
                None => (AppState::LoggedOut, Vec::new()),
            },

            // Login step
            (AppState::LoggedOut, SessionEvent::SubmitLogin { phone, password }) => {
                match TransientCredentials::parse(&phone, password) {
                    Ok(credentials) => (
                        AppState::LoggedOut,
                        vec![SessionAction::RequestLogin { credentials }],
                    ),
                    Err(err) => (
                        AppState::LoggedOut,
                        vec![SessionAction::Reject { error: err.into() }],
                    ),
                }
            }
            (AppState::LoggedOut, SessionEvent::LoginAccepted { credentials }) => {
                (AppState::AwaitingPin { credentials }, Vec::new())
            }
            (AppState::LoggedOut, SessionEvent::LoginRejected { error }) => {
                (AppState::LoggedOut, vec![SessionAction::Reject { error }])
            }

            // PIN step
            (AppState::AwaitingPin { credentials }, SessionEvent::SubmitPin { pin }) => {
                match Pin::parse(pin.expose()) {
                    Ok(pin) => {
                        let phone = credentials.phone.clone();
                        (
                            AppState::AwaitingPin { credentials },
                            vec![SessionAction::VerifyPin { phone, pin }],
                        )
                    }
                    Err(err) => (
                        AppState::AwaitingPin { credentials },
                        vec![SessionAction::Reject { error: err.into() }],
                    ),
                }
            }
            (AppState::AwaitingPin { .. }, SessionEvent::PinAccepted { identity }) => (
                AppState::Authenticated {
                    session: Session::pending(identity.clone()),
                },
                vec![
                    SessionAction::PersistIdentity {
                        identity: identity.clone(),
                    },
                    SessionAction::LoadStats { identity },
                ],
            ),
            (AppState::AwaitingPin { credentials }, SessionEvent::PinRejected { error }) => (
                AppState::AwaitingPin { credentials },
                vec![SessionAction::Reject { error }],
            ),
            (AppState::AwaitingPin { .. }, SessionEvent::Back | SessionEvent::Logout) => {
                (AppState::LoggedOut, Vec::new())
            }

            // Authenticated
            (AppState::Authenticated { .. }, SessionEvent::Logout) => {
                (AppState::LoggedOut, vec![SessionAction::ClearIdentity])
            }
            (AppState::Authenticated { session }, SessionEvent::RefreshStats) => {
                let identity = session.identity.clone();
                (
                    AppState::Authenticated { session },
                    vec![SessionAction::LoadStats { identity }],
                )
            }
            (AppState::Authenticated { session }, SessionEvent::StatsLoaded { stats }) => (
                AppState::Authenticated {
                    session: Session {
                        stats: StatsStatus::Loaded(stats),
                        ..session
                    },
                },
                Vec::new(),
            ),
            (AppState::Authenticated { mut session }, SessionEvent::StatsFailed { error }) => {
                // Stats loaded earlier stay visible after a failed refresh.
                if session.stats.loaded().is_none() {
                    session.stats = StatsStatus::Unavailable(error.clone());
                }
                (
                    AppState::Authenticated { session },
                    vec![SessionAction::Notify { error }],
                )
            }
            (AppState::Authenticated { session }, SessionEvent::StartClaim { now }) => {
                let eligible = session
                    .stats
                    .loaded()
                    .map(|stats| can_claim_today(stats, now));
                match eligible {
                    None => (
                        AppState::Authenticated { session },
                        vec![SessionAction::Reject {
                            error: FlowError::Fetch(
                                "Your reward stats are not loaded yet".to_string(),
                            ),
                        }],
                    ),
                    Some(false) => (
                        AppState::Authenticated { session },
                        vec![SessionAction::Reject {
                            error: FlowError::AlreadyClaimed,
                        }],
                    ),
                    Some(true) => (
                        AppState::ClaimInProgress { session },
                        vec![SessionAction::StartClaimSequence],
                    ),
                }
            }

            // Claim in progress
            (AppState::ClaimInProgress { session }, SessionEvent::ClaimSequenceFinished) => {
                match session.stats.loaded().cloned() {
                    Some(stats) => {
                        let identity = session.identity.clone();
                        (
                            AppState::ClaimInProgress { session },
                            vec![SessionAction::CommitClaim { identity, stats }],
                        )
                    }
                    None => (
                        AppState::Authenticated { session },
                        vec![
                            SessionAction::StopClaimSequence,
                            SessionAction::Reject {
                                error: FlowError::Fetch(
                                    "Your reward stats are not loaded yet".to_string(),
                                ),
                            },
                        ],
                    ),
                }
            }
            (AppState::ClaimInProgress { session }, SessionEvent::ClaimCommitted { stats }) => (
                AppState::Authenticated {
                    session: Session {
                        stats: StatsStatus::Loaded(stats),
                        ..session
                    },
                },
                vec![SessionAction::StopClaimSequence],
            ),
            (AppState::ClaimInProgress { session }, SessionEvent::ClaimFailed { error }) => (
                AppState::Authenticated { session },
                vec![
                    SessionAction::StopClaimSequence,
                    SessionAction::Reject { error },
                ],
            ),
            (AppState::ClaimInProgress { session }, SessionEvent::CancelClaim) => (
                AppState::Authenticated { session },
                vec![SessionAction::StopClaimSequence],
            ),
            (AppState::ClaimInProgress { .. }, SessionEvent::Logout) => (
                AppState::LoggedOut,
                vec![
                    SessionAction::StopClaimSequence,
                    SessionAction::ClearIdentity,
                ],
            ),

            (state, _event) => (state, Vec::new()),
        }
    }
}
