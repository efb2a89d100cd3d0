//! Monthly reset and dashboard statistics client.
//!
//! Four independent calls into the data service:
//!   1. set_monthly_base_equity      (admin only)
//!   2. reset_monthly_performance    (admin only)
//!   3. get_monthly_stats
//!   4. get_current_month_stats      (does not touch `loading`)
//!
//! RULES:
//!   - The admin check happens before any service call. A rejected call
//!     emits no status events and leaves `loading`/`error` alone.
//!   - Every service failure is recorded in `error` and then returned to
//!     the caller unchanged. Nothing is swallowed or retried.
//!   - `error` is overwritten by the next failure, never cleared by a
//!     success. Callers that want a clean banner call `clear_error()`.

use crate::{
    domain::DashboardStats,
    error::{DeskError, DeskResult},
    service::DataService,
    session::Session,
    status::{HookState, Operation, StateHandle, StatusEvent},
    types::{Month, Year},
};
use std::sync::mpsc::Receiver;

pub struct MonthlyResetClient<S, A> {
    service: S,
    session: A,
    state:   StateHandle,
}

impl<S: DataService, A: Session> MonthlyResetClient<S, A> {
    pub fn new(service: S, session: A) -> Self {
        Self::with_state(service, session, StateHandle::new())
    }

    /// Build a client that reports into an existing state handle.
    pub fn with_state(service: S, session: A, state: StateHandle) -> Self {
        Self { service, session, state }
    }

    pub fn set_monthly_base_equity(
        &self,
        month: Month,
        year: Year,
        base_equity: f64,
    ) -> DeskResult<serde_json::Value> {
        let op = Operation::SetMonthlyBaseEquity;
        self.require_admin(op)?;
        log::info!("{}: month={month} year={year} base_equity={base_equity}", op.name());
        self.run(op, || self.service.set_monthly_base_equity(month, year, base_equity))
    }

    pub fn reset_monthly_performance(
        &self,
        new_month: Month,
        new_year: Year,
    ) -> DeskResult<serde_json::Value> {
        let op = Operation::ResetMonthlyPerformance;
        self.require_admin(op)?;
        log::info!("{}: new_month={new_month} new_year={new_year}", op.name());
        self.run(op, || self.service.reset_monthly_performance(new_month, new_year))
    }

    /// Stats for a month, defaulting to the service's current month.
    /// Returns `None` when the service has no row for that month.
    pub fn get_monthly_stats(
        &self,
        month: Option<Month>,
        year: Option<Year>,
    ) -> DeskResult<Option<DashboardStats>> {
        let op = Operation::GetMonthlyStats;
        log::debug!("{}: month={month:?} year={year:?}", op.name());
        self.run(op, || {
            let rows = self.service.get_monthly_dashboard_stats(month, year)?;
            Ok(rows.into_iter().next())
        })
    }

    pub fn get_current_month_stats(&self) -> DeskResult<DashboardStats> {
        let op = Operation::GetCurrentMonthStats;
        log::debug!("{}", op.name());
        self.run(op, || self.service.current_month_dashboard())
    }

    pub fn loading(&self) -> bool {
        self.state.loading()
    }

    pub fn error(&self) -> Option<String> {
        self.state.error()
    }

    pub fn state(&self) -> HookState {
        self.state.snapshot()
    }

    pub fn clear_error(&self) {
        self.state.clear_error();
    }

    pub fn subscribe(&self) -> Receiver<StatusEvent> {
        self.state.subscribe()
    }

    fn require_admin(&self, op: Operation) -> DeskResult<()> {
        if self.session.is_admin() {
            return Ok(());
        }
        log::warn!("{}: rejected, caller is not an administrator", op.name());
        Err(DeskError::Unauthorized)
    }

    fn run<T>(&self, op: Operation, call: impl FnOnce() -> DeskResult<T>) -> DeskResult<T> {
        let in_flight = self.state.begin(op);
        match call() {
            Ok(value) => {
                in_flight.succeed();
                Ok(value)
            }
            Err(e) => {
                let message = e
                    .message()
                    .unwrap_or_else(|| op.fallback_message().to_string());
                log::warn!("{}: {message}", op.name());
                in_flight.fail(message);
                Err(e)
            }
        }
    }
}
