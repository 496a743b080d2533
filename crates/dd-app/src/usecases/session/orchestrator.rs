//! Session orchestrator.
//!
//! This module coordinates the session state machine and side effects.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::watch;
use tracing::{debug, error, info, info_span, warn, Instrument};

use dd_core::claim::ClaimProgress;
use dd_core::ports::{AuthGatewayPort, ClockPort, SessionStorePort};
use dd_core::security::SecretString;
use dd_core::session::{
    AppState, FlowError, SessionAction, SessionEvent, SessionStateMachine, SessionView,
};

use crate::usecases::claim::{ClaimSequence, ClaimSequencer};
use crate::usecases::rewards::RewardEngine;
use crate::usecases::session::context::SessionContext;

const LOGIN_FAILED: &str = "Login failed. Please try again.";
const PIN_FAILED: &str = "Invalid PIN code. Please try again.";

/// Errors gathered while running one dispatch.
#[derive(Debug, Default)]
struct DispatchOutcome {
    /// First refusal; returned to the caller.
    rejection: Option<FlowError>,
    /// Latest background failure; only shown.
    notice: Option<FlowError>,
}

impl DispatchOutcome {
    fn last_error(&self) -> Option<FlowError> {
        self.rejection.clone().or_else(|| self.notice.clone())
    }
}

struct ActiveClaim {
    id: u64,
    sequence: ClaimSequence,
}

/// Orchestrator that drives session state and side effects.
pub struct SessionOrchestrator {
    this: Weak<SessionOrchestrator>,
    context: SessionContext,

    auth_gateway: Arc<dyn AuthGatewayPort>,
    session_store: Arc<dyn SessionStorePort>,
    reward_engine: Arc<RewardEngine>,
    claim_sequencer: ClaimSequencer,
    clock: Arc<dyn ClockPort>,

    active_claim: Mutex<Option<ActiveClaim>>,
    next_claim_id: AtomicU64,
}

impl SessionOrchestrator {
    pub fn new(
        auth_gateway: Arc<dyn AuthGatewayPort>,
        session_store: Arc<dyn SessionStorePort>,
        reward_engine: Arc<RewardEngine>,
        claim_sequencer: ClaimSequencer,
        clock: Arc<dyn ClockPort>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            this: this.clone(),
            context: SessionContext::new(clock.now()),
            auth_gateway,
            session_store,
            reward_engine,
            claim_sequencer,
            clock,
            active_claim: Mutex::new(None),
            next_claim_id: AtomicU64::new(0),
        })
    }

    /// Restore a stored session, or land logged out.
    pub async fn boot(&self) -> Result<SessionView, FlowError> {
        let identity = match self.session_store.load() {
            Ok(identity) => identity,
            Err(err) => {
                warn!(error = %err, "stored session unreadable, starting logged out");
                if let Err(err) = self.session_store.clear() {
                    error!(error = %err, "failed to discard unreadable session");
                }
                None
            }
        };
        self.dispatch(SessionEvent::Restore { identity }).await
    }

    pub async fn submit_login(
        &self,
        phone: &str,
        password: SecretString,
    ) -> Result<SessionView, FlowError> {
        self.dispatch(SessionEvent::SubmitLogin {
            phone: phone.to_string(),
            password,
        })
        .await
    }

    pub async fn submit_pin(&self, pin: SecretString) -> Result<SessionView, FlowError> {
        self.dispatch(SessionEvent::SubmitPin { pin }).await
    }

    /// Leave the PIN step; the held credentials are discarded.
    pub async fn back(&self) -> Result<SessionView, FlowError> {
        self.dispatch(SessionEvent::Back).await
    }

    pub async fn logout(&self) -> Result<SessionView, FlowError> {
        self.dispatch(SessionEvent::Logout).await
    }

    /// Reload reward stats. A failed fetch is returned as an error even
    /// though previously loaded stats stay in place.
    pub async fn refresh_stats(&self) -> Result<SessionView, FlowError> {
        let mut state = self.context.try_begin()?;
        let outcome = self
            .dispatch_locked(&mut state, SessionEvent::RefreshStats)
            .await;
        match outcome.rejection.or(outcome.notice) {
            Some(err) => Err(err),
            None => Ok(self.context.view()),
        }
    }

    pub async fn start_claim(&self) -> Result<SessionView, FlowError> {
        let now = self.clock.now();
        self.dispatch(SessionEvent::StartClaim { now }).await
    }

    pub async fn cancel_claim(&self) -> Result<SessionView, FlowError> {
        self.dispatch(SessionEvent::CancelClaim).await
    }

    pub fn view(&self) -> SessionView {
        self.context.view()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.context.subscribe()
    }

    /// Progress of the running claim sequence, if any.
    pub fn claim_progress(&self) -> Option<watch::Receiver<ClaimProgress>> {
        self.active_claim()
            .as_ref()
            .map(|active| active.sequence.progress())
    }

    async fn dispatch(&self, event: SessionEvent) -> Result<SessionView, FlowError> {
        let mut state = self.context.try_begin()?;
        let outcome = self.dispatch_locked(&mut state, event).await;
        match outcome.rejection {
            Some(err) => Err(err),
            None => Ok(self.context.view()),
        }
    }

    /// Called from the claim sequence once its settle delay elapsed.
    async fn finish_claim(&self, claim_id: u64) {
        let mut state = self.context.begin().await;
        let is_current = self
            .active_claim()
            .as_ref()
            .is_some_and(|active| active.id == claim_id);
        if !is_current {
            debug!(claim_id, "stale claim sequence ignored");
            return;
        }

        let outcome = self
            .dispatch_locked(&mut state, SessionEvent::ClaimSequenceFinished)
            .await;
        if let Some(err) = outcome.rejection {
            warn!(claim_id, error = %err, "daily claim failed");
        }
    }

    async fn dispatch_locked(&self, state: &mut AppState, event: SessionEvent) -> DispatchOutcome {
        let span = info_span!("usecase.session_orchestrator.dispatch", event = ?event);
        async {
            let mut outcome = DispatchOutcome::default();
            let mut pending_events = vec![event];

            while let Some(event) = pending_events.pop() {
                let current = std::mem::replace(state, AppState::Loading);
                let from = current.phase();
                let event_name = format!("{:?}", event);
                let (next, actions) = SessionStateMachine::transition(current, event);
                info!(from = ?from, to = ?next.phase(), event = %event_name, "session state transition");
                *state = next;
                self.context
                    .publish(state, self.clock.now(), outcome.last_error());

                let follow_up_events = self.execute_actions(actions, &mut outcome).await;
                pending_events.extend(follow_up_events);
            }

            self.context
                .publish(state, self.clock.now(), outcome.last_error());
            outcome
        }
        .instrument(span)
        .await
    }

    async fn execute_actions(
        &self,
        actions: Vec<SessionAction>,
        outcome: &mut DispatchOutcome,
    ) -> Vec<SessionEvent> {
        let mut follow_up_events = Vec::new();
        for action in actions {
            debug!(?action, "session executing action");
            match action {
                SessionAction::RequestLogin { credentials } => {
                    match self
                        .auth_gateway
                        .login(&credentials.phone, &credentials.password)
                        .await
                    {
                        Ok(()) => {
                            follow_up_events.push(SessionEvent::LoginAccepted { credentials })
                        }
                        Err(err) => {
                            warn!(error = %err, "login rejected");
                            follow_up_events.push(SessionEvent::LoginRejected {
                                error: FlowError::Auth(err.user_message(LOGIN_FAILED)),
                            });
                        }
                    }
                }
                SessionAction::VerifyPin { phone, pin } => {
                    match self.auth_gateway.verify_pin(&phone, &pin).await {
                        Ok(identity) => {
                            info!(user_id = %identity.id, "pin verified");
                            follow_up_events.push(SessionEvent::PinAccepted { identity });
                        }
                        Err(err) => {
                            warn!(error = %err, "pin rejected");
                            follow_up_events.push(SessionEvent::PinRejected {
                                error: FlowError::Auth(err.user_message(PIN_FAILED)),
                            });
                        }
                    }
                }
                SessionAction::PersistIdentity { identity } => {
                    if let Err(err) = self.session_store.save(&identity) {
                        error!(user_id = %identity.id, error = %err, "failed to persist session");
                    }
                }
                SessionAction::ClearIdentity => {
                    if let Err(err) = self.session_store.clear() {
                        error!(error = %err, "failed to clear stored session");
                    }
                }
                SessionAction::LoadStats { identity } => {
                    match self.reward_engine.load_stats(&identity).await {
                        Ok(stats) => follow_up_events.push(SessionEvent::StatsLoaded { stats }),
                        Err(error) => follow_up_events.push(SessionEvent::StatsFailed { error }),
                    }
                }
                SessionAction::StartClaimSequence => self.start_claim_sequence(),
                SessionAction::CommitClaim { identity, stats } => {
                    match self
                        .reward_engine
                        .commit_claim(&identity, &stats, self.clock.now())
                        .await
                    {
                        Ok(stats) => follow_up_events.push(SessionEvent::ClaimCommitted { stats }),
                        Err(error) => follow_up_events.push(SessionEvent::ClaimFailed { error }),
                    }
                }
                SessionAction::StopClaimSequence => self.stop_claim_sequence(),
                SessionAction::Reject { error } => {
                    if outcome.rejection.is_none() {
                        outcome.rejection = Some(error);
                    }
                }
                SessionAction::Notify { error } => {
                    outcome.notice = Some(error);
                }
            }
        }
        follow_up_events
    }

    fn start_claim_sequence(&self) {
        let id = self.next_claim_id.fetch_add(1, Ordering::Relaxed) + 1;
        let this = self.this.clone();
        let sequence = self.claim_sequencer.start(move || async move {
            if let Some(orchestrator) = this.upgrade() {
                orchestrator.finish_claim(id).await;
            }
        });

        let previous = self.active_claim().replace(ActiveClaim { id, sequence });
        if let Some(previous) = previous {
            previous.sequence.cancel();
        }
        info!(claim_id = id, "claim sequence started");
    }

    fn stop_claim_sequence(&self) {
        let active = self.active_claim().take();
        if let Some(active) = active {
            active.sequence.cancel();
            debug!(claim_id = active.id, "claim sequence stopped");
        }
    }

    fn active_claim(&self) -> MutexGuard<'_, Option<ActiveClaim>> {
        self.active_claim
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
