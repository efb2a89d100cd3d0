//! The data service contract.
//!
//! RULE: the client never runs SQL or computes aggregates itself.
//! Every read and mutation goes through one of these calls, and the
//! service decides what they mean. Each call either returns its payload
//! or a `DeskError`. There is no partial success.

use crate::{
    domain::DashboardStats,
    error::DeskResult,
    types::{Month, Year},
};

pub trait DataService {
    /// Procedure `set_monthly_base_equity(p_month, p_year, p_base_equity)`.
    fn set_monthly_base_equity(
        &self,
        p_month: Month,
        p_year: Year,
        p_base_equity: f64,
    ) -> DeskResult<serde_json::Value>;

    /// Procedure `reset_monthly_performance(p_new_month, p_new_year)`.
    fn reset_monthly_performance(
        &self,
        p_new_month: Month,
        p_new_year: Year,
    ) -> DeskResult<serde_json::Value>;

    /// Procedure `get_monthly_dashboard_stats(p_month, p_year)`.
    /// `None` is sent as an explicit null so the service picks its default.
    fn get_monthly_dashboard_stats(
        &self,
        p_month: Option<Month>,
        p_year: Option<Year>,
    ) -> DeskResult<Vec<DashboardStats>>;

    /// Single-row read of the `current_month_dashboard` view.
    fn current_month_dashboard(&self) -> DeskResult<DashboardStats>;
}

impl<T: DataService + ?Sized> DataService for &T {
    fn set_monthly_base_equity(&self, p_month: Month, p_year: Year, p_base_equity: f64) -> DeskResult<serde_json::Value> {
        (**self).set_monthly_base_equity(p_month, p_year, p_base_equity)
    }

    fn reset_monthly_performance(&self, p_new_month: Month, p_new_year: Year) -> DeskResult<serde_json::Value> {
        (**self).reset_monthly_performance(p_new_month, p_new_year)
    }

    fn get_monthly_dashboard_stats(&self, p_month: Option<Month>, p_year: Option<Year>) -> DeskResult<Vec<DashboardStats>> {
        (**self).get_monthly_dashboard_stats(p_month, p_year)
    }

    fn current_month_dashboard(&self) -> DeskResult<DashboardStats> {
        (**self).current_month_dashboard()
    }
}
