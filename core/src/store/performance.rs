use super::DeskStore;
use crate::{
    domain::{DailyPerformance, MonthlyPerformance},
    error::DeskResult,
};
use chrono::NaiveDate;
use rusqlite::params;

impl DeskStore {
    // ── Daily snapshots ───────────────────────────────────────────

    /// Record a client's figures for one day. A second record for the same
    /// client and date replaces the first.
    pub fn record_daily_performance(&self, d: &DailyPerformance) -> DeskResult<()> {
        self.conn.execute(
            "INSERT INTO daily_performance (
                id, client_id, date, margin_in, revenue, nots_generated, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT (client_id, date) DO UPDATE SET
                margin_in      = excluded.margin_in,
                revenue        = excluded.revenue,
                nots_generated = excluded.nots_generated",
            params![
                &d.id,
                &d.client_id,
                d.date,
                d.margin_in,
                d.revenue,
                d.nots_generated,
                d.created_at,
            ],
        )?;
        Ok(())
    }

    /// Daily records for a client with `from <= date <= to`, oldest first.
    pub fn daily_performance(
        &self,
        client_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DeskResult<Vec<DailyPerformance>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, client_id, date, margin_in, revenue, nots_generated, created_at
             FROM daily_performance
             WHERE client_id = ?1 AND date >= ?2 AND date <= ?3
             ORDER BY date ASC",
        )?;
        let rows = stmt.query_map(params![client_id, from, to], |row| {
            Ok(DailyPerformance {
                id:             row.get(0)?,
                client_id:      row.get(1)?,
                date:           row.get(2)?,
                margin_in:      row.get(3)?,
                revenue:        row.get(4)?,
                nots_generated: row.get(5)?,
                created_at:     row.get(6)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // ── Monthly archive ───────────────────────────────────────────

    /// Archived month-close figures for a client, oldest first.
    pub fn monthly_performance(&self, client_id: &str) -> DeskResult<Vec<MonthlyPerformance>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, client_id, agent_id, month, year, margin_in, overall_margin,
                    invested_amount, monthly_revenue, nots_generated, is_new_client, created_at
             FROM monthly_performance
             WHERE client_id = ?1
             ORDER BY year ASC, month ASC",
        )?;
        let rows = stmt.query_map(params![client_id], |row| {
            Ok(MonthlyPerformance {
                id:              row.get(0)?,
                client_id:       row.get(1)?,
                agent_id:        row.get(2)?,
                month:           row.get(3)?,
                year:            row.get(4)?,
                margin_in:       row.get(5)?,
                overall_margin:  row.get(6)?,
                invested_amount: row.get(7)?,
                monthly_revenue: row.get(8)?,
                nots_generated:  row.get(9)?,
                is_new_client:   row.get(10)?,
                created_at:      row.get(11)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
