use super::DeskStore;
use crate::{
    domain::Agent,
    error::{DeskError, DeskResult},
};
use chrono::Utc;
use rusqlite::{params, OptionalExtension};

impl DeskStore {
    // ── Agent ─────────────────────────────────────────────────────

    pub fn insert_agent(&self, a: &Agent) -> DeskResult<()> {
        self.conn.execute(
            "INSERT INTO agents (
                id, name, email, phone, commission_rate, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                &a.id,
                &a.name,
                &a.email,
                &a.phone,
                a.commission_rate,
                a.is_active,
                a.created_at,
                a.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Plain agent record, without aggregates.
    pub fn agent(&self, id: &str) -> DeskResult<Option<Agent>> {
        let agent = self
            .conn
            .query_row(
                "SELECT id, name, email, phone, commission_rate, is_active, created_at, updated_at
                 FROM agents WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Agent {
                        id:                   row.get(0)?,
                        name:                 row.get(1)?,
                        email:                row.get(2)?,
                        phone:                row.get(3)?,
                        commission_rate:      row.get(4)?,
                        is_active:            row.get(5)?,
                        created_at:           row.get(6)?,
                        updated_at:           row.get(7)?,
                        client_count:         None,
                        total_client_margin:  None,
                        total_client_revenue: None,
                        total_nots:           None,
                    })
                },
            )
            .optional()?;
        Ok(agent)
    }

    /// Every agent with the totals of their assigned clients.
    pub fn agents_with_stats(&self) -> DeskResult<Vec<Agent>> {
        let mut stmt = self.conn.prepare(
            "SELECT a.id, a.name, a.email, a.phone, a.commission_rate, a.is_active,
                    a.created_at, a.updated_at,
                    COUNT(c.id),
                    COALESCE(SUM(c.overall_margin), 0.0),
                    COALESCE(SUM(c.monthly_revenue), 0.0),
                    COALESCE(SUM(c.nots_generated), 0)
             FROM agents a
             LEFT JOIN clients c ON c.agent_id = a.id
             GROUP BY a.id
             ORDER BY a.name ASC, a.id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Agent {
                id:                   row.get(0)?,
                name:                 row.get(1)?,
                email:                row.get(2)?,
                phone:                row.get(3)?,
                commission_rate:      row.get(4)?,
                is_active:            row.get(5)?,
                created_at:           row.get(6)?,
                updated_at:           row.get(7)?,
                client_count:         Some(row.get(8)?),
                total_client_margin:  Some(row.get(9)?),
                total_client_revenue: Some(row.get(10)?),
                total_nots:           Some(row.get(11)?),
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn set_agent_active(&self, id: &str, is_active: bool) -> DeskResult<()> {
        let updated = self.conn.execute(
            "UPDATE agents SET is_active = ?1, updated_at = ?2 WHERE id = ?3",
            params![is_active, Utc::now(), id],
        )?;
        if updated == 0 {
            return Err(DeskError::NotFound { entity: "agent", id: id.to_string() });
        }
        log::info!("store: agent {id} active={is_active}");
        Ok(())
    }
}
