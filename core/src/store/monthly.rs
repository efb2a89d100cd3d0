//! Local implementations of the monthly procedures and the dashboard view.
//!
//! The live client rows always hold the figures for the month named in
//! `team_settings`. Closing a month copies them into `monthly_performance`
//! and zeroes the monthly fields, so a past month is only ever read from
//! the archive.

use super::DeskStore;
use crate::{
    domain::DashboardStats,
    error::{DeskError, DeskResult},
    service::DataService,
    types::{Month, Period, Year},
};
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use serde_json::json;

const DASHBOARD_COLUMNS: &str = "month, year, total_clients, new_clients, active_agents,
     total_margin_in, total_overall_margin, total_invested, total_revenue,
     total_nots, nots_target, base_equity, progress_percentage";

fn stats_from_row(row: &Row<'_>) -> rusqlite::Result<DashboardStats> {
    Ok(DashboardStats {
        month:                row.get(0)?,
        year:                 row.get(1)?,
        total_clients:        row.get(2)?,
        new_clients:          row.get(3)?,
        active_agents:        row.get(4)?,
        total_margin_in:      row.get(5)?,
        total_overall_margin: row.get(6)?,
        total_invested:       row.get(7)?,
        total_revenue:        row.get(8)?,
        total_nots:           row.get(9)?,
        nots_target:          row.get(10)?,
        base_equity:          row.get(11)?,
        progress_percentage:  row.get(12)?,
    })
}

impl DeskStore {
    /// Base equity recorded for a month, if any.
    pub fn base_equity(&self, period: Period) -> DeskResult<Option<f64>> {
        let value = self
            .conn
            .query_row(
                "SELECT base_equity FROM monthly_base_equity WHERE month = ?1 AND year = ?2",
                params![period.month, period.year],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Aggregate a closed month. `None` when that month was never closed.
    ///
    /// Client sums come from `monthly_performance`. The active-agent count and
    /// NOT target are the values snapshotted at close, so a month reports the
    /// same figures before and after it is closed.
    fn archived_stats(&self, period: Period) -> DeskResult<Option<DashboardStats>> {
        let stats = self.conn.query_row(
            "SELECT k.month, k.year,
                    COUNT(p.id),
                    COALESCE(SUM(CASE WHEN p.is_new_client = 1 THEN 1 ELSE 0 END), 0),
                    k.active_agents,
                    COALESCE(SUM(p.margin_in), 0.0),
                    COALESCE(SUM(p.overall_margin), 0.0),
                    COALESCE(SUM(p.invested_amount), 0.0),
                    COALESCE(SUM(p.monthly_revenue), 0.0),
                    COALESCE(SUM(p.nots_generated), 0),
                    k.not_target_per_client * COUNT(p.id),
                    (SELECT base_equity FROM monthly_base_equity b
                      WHERE b.month = k.month AND b.year = k.year),
                    CASE WHEN k.not_target_per_client * COUNT(p.id) > 0
                         THEN COALESCE(SUM(p.nots_generated), 0) * 100.0
                              / (k.not_target_per_client * COUNT(p.id))
                         ELSE 0.0
                    END
             FROM monthly_period_close k
             LEFT JOIN monthly_performance p ON p.month = k.month AND p.year = k.year
             WHERE k.month = ?1 AND k.year = ?2
             GROUP BY k.month, k.year",
            params![period.month, period.year],
            stats_from_row,
        )
        .optional()?;
        Ok(stats)
    }
}

impl DataService for DeskStore {
    fn set_monthly_base_equity(
        &self,
        p_month: Month,
        p_year: Year,
        p_base_equity: f64,
    ) -> DeskResult<serde_json::Value> {
        let period = Period::new(p_month, p_year)?;
        if !p_base_equity.is_finite() || p_base_equity < 0.0 {
            return Err(DeskError::InvalidBaseEquity(p_base_equity));
        }
        self.conn.execute(
            "INSERT INTO monthly_base_equity (month, year, base_equity, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (month, year) DO UPDATE SET
                base_equity = excluded.base_equity,
                updated_at  = excluded.updated_at",
            params![period.month, period.year, p_base_equity, Utc::now()],
        )?;
        log::info!("store: base equity for {period} set to {p_base_equity:.2}");
        Ok(json!({
            "month": period.month,
            "year": period.year,
            "base_equity": p_base_equity,
        }))
    }

    fn reset_monthly_performance(
        &self,
        p_new_month: Month,
        p_new_year: Year,
    ) -> DeskResult<serde_json::Value> {
        let next = Period::new(p_new_month, p_new_year)?;
        let current = self.current_period()?;
        if next <= current {
            return Err(DeskError::PeriodNotAdvanced {
                month:     current.month,
                year:      current.year,
                new_month: next.month,
                new_year:  next.year,
            });
        }

        let clients = self.clients()?;
        let now = Utc::now();
        let tx = self.conn.unchecked_transaction()?;
        for c in &clients {
            tx.execute(
                "INSERT INTO monthly_performance (
                    id, client_id, agent_id, month, year, margin_in, overall_margin,
                    invested_amount, monthly_revenue, nots_generated, is_new_client, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                ON CONFLICT (client_id, month, year) DO UPDATE SET
                    agent_id        = excluded.agent_id,
                    margin_in       = excluded.margin_in,
                    overall_margin  = excluded.overall_margin,
                    invested_amount = excluded.invested_amount,
                    monthly_revenue = excluded.monthly_revenue,
                    nots_generated  = excluded.nots_generated,
                    is_new_client   = excluded.is_new_client",
                params![
                    uuid::Uuid::new_v4().to_string(),
                    &c.id,
                    &c.agent_id,
                    current.month,
                    current.year,
                    c.margin_in,
                    c.overall_margin,
                    c.invested_amount,
                    c.monthly_revenue,
                    c.nots_generated,
                    c.is_new_client.unwrap_or(false),
                    now,
                ],
            )?;
        }
        tx.execute(
            "INSERT INTO monthly_period_close (
                month, year, active_agents, not_target_per_client, closed_at
            )
            SELECT ?1, ?2,
                   (SELECT COUNT(*) FROM agents WHERE is_active = 1),
                   s.not_target_per_client,
                   ?3
            FROM team_settings s WHERE s.id = 1
            ON CONFLICT (month, year) DO UPDATE SET
                active_agents         = excluded.active_agents,
                not_target_per_client = excluded.not_target_per_client,
                closed_at             = excluded.closed_at",
            params![current.month, current.year, now],
        )?;
        tx.execute(
            "UPDATE clients
             SET margin_in = 0, monthly_revenue = 0, nots_generated = 0,
                 is_new_client = 0, updated_at = ?1",
            params![now],
        )?;
        tx.execute(
            "UPDATE team_settings SET current_month = ?1, current_year = ?2, updated_at = ?3
             WHERE id = 1",
            params![next.month, next.year, now],
        )?;
        tx.commit()?;

        log::info!(
            "store: closed {current}, archived {} clients, now in {next}",
            clients.len()
        );
        Ok(json!({
            "previous_month": current.month,
            "previous_year": current.year,
            "new_month": next.month,
            "new_year": next.year,
            "archived_clients": clients.len(),
        }))
    }

    fn get_monthly_dashboard_stats(
        &self,
        p_month: Option<Month>,
        p_year: Option<Year>,
    ) -> DeskResult<Vec<DashboardStats>> {
        let current = self.current_period()?;
        let period = Period::new(
            p_month.unwrap_or(current.month),
            p_year.unwrap_or(current.year),
        )?;
        if period == current {
            return Ok(vec![self.current_month_dashboard()?]);
        }
        Ok(self.archived_stats(period)?.into_iter().collect())
    }

    fn current_month_dashboard(&self) -> DeskResult<DashboardStats> {
        let sql = format!("SELECT {DASHBOARD_COLUMNS} FROM current_month_dashboard");
        self.conn
            .query_row(&sql, [], stats_from_row)
            .optional()?
            .ok_or(DeskError::NotFound {
                entity: "current_month_dashboard",
                id: "1".to_string(),
            })
    }
}
