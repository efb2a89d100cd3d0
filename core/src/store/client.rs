use super::DeskStore;
use crate::{
    domain::Client,
    error::{DeskError, DeskResult},
};
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

const CLIENT_COLUMNS: &str = "id, name, margin_in, overall_margin, invested_amount,
     monthly_revenue, nots_generated, agent_id, created_at, updated_at, is_new_client";

fn client_from_row(row: &Row<'_>) -> rusqlite::Result<Client> {
    Ok(Client {
        id:              row.get(0)?,
        name:            row.get(1)?,
        margin_in:       row.get(2)?,
        overall_margin:  row.get(3)?,
        invested_amount: row.get(4)?,
        monthly_revenue: row.get(5)?,
        nots_generated:  row.get(6)?,
        agent_id:        row.get(7)?,
        created_at:      row.get(8)?,
        updated_at:      row.get(9)?,
        is_new_client:   row.get(10)?,
    })
}

impl DeskStore {
    // ── Client ────────────────────────────────────────────────────

    pub fn insert_client(&self, c: &Client) -> DeskResult<()> {
        self.conn.execute(
            "INSERT INTO clients (
                id, name, margin_in, overall_margin, invested_amount,
                monthly_revenue, nots_generated, agent_id, created_at, updated_at,
                is_new_client
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                &c.id,
                &c.name,
                c.margin_in,
                c.overall_margin,
                c.invested_amount,
                c.monthly_revenue,
                c.nots_generated,
                &c.agent_id,
                c.created_at,
                c.updated_at,
                c.is_new_client,
            ],
        )?;
        Ok(())
    }

    pub fn client(&self, id: &str) -> DeskResult<Option<Client>> {
        let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?1");
        let client = self
            .conn
            .query_row(&sql, params![id], client_from_row)
            .optional()?;
        Ok(client)
    }

    pub fn clients(&self) -> DeskResult<Vec<Client>> {
        let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients ORDER BY name ASC, id ASC");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], client_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn clients_for_agent(&self, agent_id: &str) -> DeskResult<Vec<Client>> {
        let sql = format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE agent_id = ?1 ORDER BY name ASC, id ASC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![agent_id], client_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Overwrite the live figures for the current month.
    pub fn update_client_metrics(
        &self,
        id: &str,
        margin_in: f64,
        overall_margin: f64,
        invested_amount: f64,
        monthly_revenue: f64,
        nots_generated: i64,
    ) -> DeskResult<()> {
        let updated = self.conn.execute(
            "UPDATE clients SET margin_in = ?1, overall_margin = ?2, invested_amount = ?3,
                    monthly_revenue = ?4, nots_generated = ?5, updated_at = ?6
             WHERE id = ?7",
            params![
                margin_in,
                overall_margin,
                invested_amount,
                monthly_revenue,
                nots_generated,
                Utc::now(),
                id
            ],
        )?;
        if updated == 0 {
            return Err(DeskError::NotFound { entity: "client", id: id.to_string() });
        }
        Ok(())
    }
}
