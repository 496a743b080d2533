use chrono::{DateTime, Utc};
use tokio::sync::{watch, Mutex, MutexGuard};

use dd_core::session::{AppState, FlowError, SessionView};

/// Shared session state plus the published view.
///
/// ## Locking
/// The state mutex is held for the whole of a dispatch, side effects
/// included. User operations use [`SessionContext::try_begin`] and fail with
/// `Busy` instead of queueing; internal completions wait on
/// [`SessionContext::begin`].
pub struct SessionContext {
    state: Mutex<AppState>,
    view: watch::Sender<SessionView>,
}

impl SessionContext {
    pub fn new(now: DateTime<Utc>) -> Self {
        let initial = AppState::Loading;
        let (view, _) = watch::channel(SessionView::capture(&initial, now, None));
        Self {
            state: Mutex::new(initial),
            view,
        }
    }

    /// Take the state for a user-initiated operation.
    pub fn try_begin(&self) -> Result<MutexGuard<'_, AppState>, FlowError> {
        self.state.try_lock().map_err(|_| FlowError::Busy)
    }

    /// Take the state, waiting for any dispatch in flight.
    pub async fn begin(&self) -> MutexGuard<'_, AppState> {
        self.state.lock().await
    }

    pub fn publish(&self, state: &AppState, now: DateTime<Utc>, last_error: Option<FlowError>) {
        self.view
            .send_replace(SessionView::capture(state, now, last_error));
    }

    pub fn view(&self) -> SessionView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.view.subscribe()
    }
}
