//! Request state shared by one `MonthlyResetClient`.
//!
//! Two views of the same calls:
//!   - `HookState`: the shared `loading` flag and last `error` message, for
//!     callers that render a single spinner/banner.
//!   - `StatusEvent`: one event per state change of each call, streamed to
//!     subscribers, for callers that track calls individually.
//!
//! Concurrent calls sharing one handle race on `HookState`. That is
//! visible to callers and not coordinated here.

use serde::Serialize;
use std::sync::{
    mpsc::{self, Receiver, Sender},
    Arc, Mutex, MutexGuard, PoisonError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    SetMonthlyBaseEquity,
    ResetMonthlyPerformance,
    GetMonthlyStats,
    GetCurrentMonthStats,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetMonthlyBaseEquity    => "set_monthly_base_equity",
            Self::ResetMonthlyPerformance => "reset_monthly_performance",
            Self::GetMonthlyStats         => "get_monthly_stats",
            Self::GetCurrentMonthStats    => "get_current_month_stats",
        }
    }

    /// Message recorded when the failure carries none of its own.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::SetMonthlyBaseEquity    => "Failed to set base equity",
            Self::ResetMonthlyPerformance => "Failed to reset monthly performance",
            Self::GetMonthlyStats         => "Failed to get monthly stats",
            Self::GetCurrentMonthStats    => "Failed to get current month stats",
        }
    }

    /// Whether this operation holds the shared `loading` flag while in flight.
    /// `GetCurrentMonthStats` never touches it.
    pub fn tracks_loading(&self) -> bool {
        !matches!(self, Self::GetCurrentMonthStats)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RequestStatus {
    InFlight,
    Succeeded,
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusEvent {
    pub operation: Operation,
    #[serde(flatten)]
    pub status:    RequestStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HookState {
    pub loading: bool,
    pub error:   Option<String>,
}

#[derive(Default)]
struct Shared {
    state:       HookState,
    subscribers: Vec<Sender<StatusEvent>>,
}

/// Cloneable handle to one client's request state.
#[derive(Clone, Default)]
pub struct StateHandle {
    inner: Arc<Mutex<Shared>>,
}

impl StateHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> HookState {
        self.lock().state.clone()
    }

    pub fn loading(&self) -> bool {
        self.lock().state.loading
    }

    pub fn error(&self) -> Option<String> {
        self.lock().state.error.clone()
    }

    pub fn clear_error(&self) {
        self.lock().state.error = None;
    }

    /// Receive every status event emitted after this call.
    pub fn subscribe(&self) -> Receiver<StatusEvent> {
        let (tx, rx) = mpsc::channel();
        self.lock().subscribers.push(tx);
        rx
    }

    /// Mark `operation` as started. For loading-tracked operations the
    /// returned guard holds `loading = true` until it is settled or dropped.
    pub(crate) fn begin(&self, operation: Operation) -> LoadingGuard<'_> {
        let tracked = operation.tracks_loading();
        {
            let mut shared = self.lock();
            if tracked {
                shared.state.loading = true;
            }
            Self::emit(&mut shared, operation, RequestStatus::InFlight);
        }
        LoadingGuard { handle: self, operation, tracked, settled: false }
    }

    fn emit(shared: &mut Shared, operation: Operation, status: RequestStatus) {
        let event = StatusEvent { operation, status };
        // Drop subscribers whose receiver is gone.
        shared.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One in-flight call. Settling it releases `loading`, records any error
/// and emits the terminal event under one lock. Dropped unsettled (a panic
/// inside the call), it only releases `loading`.
pub(crate) struct LoadingGuard<'a> {
    handle:    &'a StateHandle,
    operation: Operation,
    tracked:   bool,
    settled:   bool,
}

impl LoadingGuard<'_> {
    pub(crate) fn succeed(mut self) {
        self.settle(RequestStatus::Succeeded, None);
    }

    pub(crate) fn fail(mut self, message: String) {
        self.settle(RequestStatus::Failed { message: message.clone() }, Some(message));
    }

    fn settle(&mut self, status: RequestStatus, error: Option<String>) {
        self.settled = true;
        let mut shared = self.handle.lock();
        if self.tracked {
            shared.state.loading = false;
        }
        if let Some(message) = error {
            shared.state.error = Some(message);
        }
        StateHandle::emit(&mut shared, self.operation, status);
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.tracked && !self.settled {
            self.handle.lock().state.loading = false;
        }
    }
}
