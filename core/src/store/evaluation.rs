use super::DeskStore;
use crate::{
    config::EvaluationThresholds,
    domain::{AgentEvaluation, EvaluationAlert, PerformanceLevel},
    error::{DeskError, DeskResult},
    evaluation::{to_alert, EvaluationInput},
};
use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};
use std::collections::BTreeMap;

const EVALUATION_COLUMNS: &str = "id, agent_id, week_start, week_end,
     trading_tasks_score, discipline_score, attitude_score, client_metrics_score,
     team_contribution_score, total_score,
     trading_tasks_remarks, discipline_remarks, attitude_remarks, client_metrics_remarks,
     team_contribution_remarks, evaluator_id, evaluator_name,
     created_at, updated_at, performance_level, alert_message";

fn evaluation_from_row(row: &Row<'_>) -> rusqlite::Result<AgentEvaluation> {
    let level: Option<String> = row.get(19)?;
    Ok(AgentEvaluation {
        id:                        row.get(0)?,
        agent_id:                  row.get(1)?,
        week_start:                row.get(2)?,
        week_end:                  row.get(3)?,
        trading_tasks_score:       row.get(4)?,
        discipline_score:          row.get(5)?,
        attitude_score:            row.get(6)?,
        client_metrics_score:      row.get(7)?,
        team_contribution_score:   row.get(8)?,
        total_score:               row.get(9)?,
        trading_tasks_remarks:     row.get(10)?,
        discipline_remarks:        row.get(11)?,
        attitude_remarks:          row.get(12)?,
        client_metrics_remarks:    row.get(13)?,
        team_contribution_remarks: row.get(14)?,
        evaluator_id:              row.get(15)?,
        evaluator_name:            row.get(16)?,
        created_at:                row.get(17)?,
        updated_at:                row.get(18)?,
        performance_level:         level.as_deref().and_then(PerformanceLevel::parse),
        alert_message:             row.get(20)?,
    })
}

impl DeskStore {
    // ── Evaluation ────────────────────────────────────────────────

    /// Score, derive and persist a weekly evaluation together with its item scores.
    pub fn insert_evaluation(
        &self,
        input: &EvaluationInput,
        thresholds: &EvaluationThresholds,
    ) -> DeskResult<AgentEvaluation> {
        if self.agent(&input.agent_id)?.is_none() {
            return Err(DeskError::NotFound { entity: "agent", id: input.agent_id.clone() });
        }
        let e = input.build(uuid::Uuid::new_v4().to_string(), thresholds)?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO agent_evaluations (
                id, agent_id, week_start, week_end,
                trading_tasks_score, discipline_score, attitude_score, client_metrics_score,
                team_contribution_score, total_score,
                trading_tasks_remarks, discipline_remarks, attitude_remarks, client_metrics_remarks,
                team_contribution_remarks, evaluator_id, evaluator_name,
                created_at, updated_at, performance_level, alert_message
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                      ?15, ?16, ?17, ?18, ?19, ?20, ?21)",
            params![
                &e.id,
                &e.agent_id,
                e.week_start,
                e.week_end,
                e.trading_tasks_score,
                e.discipline_score,
                e.attitude_score,
                e.client_metrics_score,
                e.team_contribution_score,
                e.total_score,
                &e.trading_tasks_remarks,
                &e.discipline_remarks,
                &e.attitude_remarks,
                &e.client_metrics_remarks,
                &e.team_contribution_remarks,
                &e.evaluator_id,
                &e.evaluator_name,
                e.created_at,
                e.updated_at,
                e.performance_level.map(|l| l.as_str()),
                &e.alert_message,
            ],
        )?;
        for (section_id, score) in &input.item_scores {
            tx.execute(
                "INSERT INTO evaluation_item_scores (evaluation_id, section_id, score)
                 VALUES (?1, ?2, ?3)",
                params![&e.id, section_id, score],
            )?;
        }
        tx.commit()?;

        log::info!(
            "store: evaluation {} for agent {} week {} total={}",
            e.id, e.agent_id, e.week_start, e.total_score
        );
        Ok(e)
    }

    pub fn evaluations_for_agent(&self, agent_id: &str) -> DeskResult<Vec<AgentEvaluation>> {
        let sql = format!(
            "SELECT {EVALUATION_COLUMNS} FROM agent_evaluations
             WHERE agent_id = ?1 ORDER BY week_start DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![agent_id], evaluation_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn evaluation_for_week(
        &self,
        agent_id: &str,
        week_start: NaiveDate,
    ) -> DeskResult<Option<AgentEvaluation>> {
        let sql = format!(
            "SELECT {EVALUATION_COLUMNS} FROM agent_evaluations
             WHERE agent_id = ?1 AND week_start = ?2"
        );
        let evaluation = self
            .conn
            .query_row(&sql, params![agent_id, week_start], evaluation_from_row)
            .optional()?;
        Ok(evaluation)
    }

    /// Item scores of one evaluation keyed by rubric section id.
    pub fn evaluation_item_scores(&self, evaluation_id: &str) -> DeskResult<BTreeMap<String, i64>> {
        let mut stmt = self.conn.prepare(
            "SELECT section_id, score FROM evaluation_item_scores WHERE evaluation_id = ?1",
        )?;
        let rows = stmt.query_map(params![evaluation_id], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<Result<BTreeMap<_, _>, _>>().map_err(Into::into)
    }

    /// One alert per active agent for the week starting `week_start`.
    /// Agents without an evaluation that week get `AlertLevel::None`.
    pub fn evaluation_alerts(
        &self,
        week_start: NaiveDate,
        thresholds: &EvaluationThresholds,
    ) -> DeskResult<Vec<EvaluationAlert>> {
        let agents = self.agents_with_stats()?;
        let mut alerts = Vec::new();
        for agent in agents.iter().filter(|a| a.is_active) {
            let evaluation = self.evaluation_for_week(&agent.id, week_start)?;
            alerts.push(to_alert(
                &agent.id,
                &agent.name,
                week_start,
                evaluation.as_ref(),
                thresholds,
            ));
        }
        Ok(alerts)
    }
}
