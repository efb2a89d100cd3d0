//! SQLite persistence layer and local data service.
//!
//! RULE: Only the store talks to the database.
//! Everything else calls store methods or the `DataService` trait;
//! nothing outside this module executes SQL directly.

mod agent;
mod client;
mod evaluation;
mod monthly;
mod performance;
mod product;

use crate::{
    config::TeamDefaults,
    domain::{Agent, Client, Product, TeamSettings},
    error::{DeskError, DeskResult},
    types::Period,
};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

pub struct DeskStore {
    conn: Connection,
}

impl DeskStore {
    pub fn open(path: &str) -> DeskResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (:memory: ignores it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        log::debug!("store: opened {path}");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> DeskResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order. Safe to run repeatedly.
    pub fn migrate(&self) -> DeskResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_foundation.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/002_monthly.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/003_evaluations.sql"))?;
        Ok(())
    }

    // ── Team settings ──────────────────────────────────────────

    /// Insert the settings row from `defaults` unless one already exists.
    pub fn ensure_team_settings(&self, defaults: &TeamDefaults) -> DeskResult<()> {
        Period::new(defaults.start_month, defaults.start_year)?;
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO team_settings (
                id, commission_threshold, not_target_per_client,
                current_month, current_year, updated_at
            ) VALUES (1, ?1, ?2, ?3, ?4, ?5)",
            params![
                defaults.commission_threshold,
                defaults.not_target_per_client,
                defaults.start_month,
                defaults.start_year,
                Utc::now(),
            ],
        )?;
        if inserted > 0 {
            log::info!(
                "store: team settings initialised at {}/{}",
                defaults.start_month, defaults.start_year
            );
        }
        Ok(())
    }

    pub fn team_settings(&self) -> DeskResult<TeamSettings> {
        self.conn
            .query_row(
                "SELECT commission_threshold, not_target_per_client,
                        current_month, current_year, updated_at
                 FROM team_settings WHERE id = 1",
                [],
                |row| {
                    Ok(TeamSettings {
                        commission_threshold:  row.get(0)?,
                        not_target_per_client: row.get(1)?,
                        current_month:         row.get(2)?,
                        current_year:          row.get(3)?,
                        updated_at:            row.get(4)?,
                    })
                },
            )
            .optional()?
            .ok_or(DeskError::NotFound { entity: "team_settings", id: "1".to_string() })
    }

    /// Change the configurable thresholds. The current period is only moved
    /// by `reset_monthly_performance`.
    pub fn update_team_thresholds(
        &self,
        commission_threshold: f64,
        not_target_per_client: i64,
    ) -> DeskResult<TeamSettings> {
        let updated = self.conn.execute(
            "UPDATE team_settings
             SET commission_threshold = ?1, not_target_per_client = ?2, updated_at = ?3
             WHERE id = 1",
            params![commission_threshold, not_target_per_client, Utc::now()],
        )?;
        if updated == 0 {
            return Err(DeskError::NotFound { entity: "team_settings", id: "1".to_string() });
        }
        self.team_settings()
    }

    // ── Bulk load ──────────────────────────────────────────────

    /// Insert agents, then clients, then products in one transaction.
    /// Any failing row rolls back the whole batch.
    pub fn insert_book(
        &self,
        agents: &[Agent],
        clients: &[Client],
        products: &[Product],
    ) -> DeskResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        for a in agents {
            self.insert_agent(a)?;
        }
        for c in clients {
            self.insert_client(c)?;
        }
        for p in products {
            self.insert_product(p)?;
        }
        tx.commit()?;
        Ok(())
    }

    pub(crate) fn current_period(&self) -> DeskResult<Period> {
        let settings = self.team_settings()?;
        Period::new(settings.current_month, settings.current_year)
    }
}
