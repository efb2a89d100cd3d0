//! Derived display fields for weekly agent evaluations.
//!
//! Scores are mapped to levels by percentage of the rubric maximum,
//! using the thresholds from `EvaluationThresholds`.

use crate::{
    config::EvaluationThresholds,
    domain::{AgentEvaluation, AlertLevel, EvaluationAlert, PerformanceLevel},
    error::{DeskError, DeskResult},
    rubric::{max_total_score, section_by_id, RubricCategory, MAX_SECTION_SCORE},
    types::EntityId,
};
use chrono::{Duration, NaiveDate, Utc};
use std::collections::BTreeMap;

/// Free-text remarks, one per rubric category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationRemarks {
    pub trading_tasks:     Option<String>,
    pub discipline:        Option<String>,
    pub attitude:          Option<String>,
    pub client_metrics:    Option<String>,
    pub team_contribution: Option<String>,
}

/// A submitted scorecard: one score per rubric section id.
/// Sections left out score zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationInput {
    pub agent_id:       EntityId,
    pub week_start:     NaiveDate,
    pub item_scores:    BTreeMap<String, i64>,
    pub remarks:        EvaluationRemarks,
    pub evaluator_id:   Option<EntityId>,
    pub evaluator_name: Option<String>,
}

impl EvaluationInput {
    pub fn new(agent_id: impl Into<EntityId>, week_start: NaiveDate) -> Self {
        Self {
            agent_id: agent_id.into(),
            week_start,
            item_scores: BTreeMap::new(),
            remarks: EvaluationRemarks::default(),
            evaluator_id: None,
            evaluator_name: None,
        }
    }

    pub fn score(mut self, section_id: &str, score: i64) -> Self {
        self.item_scores.insert(section_id.to_string(), score);
        self
    }

    /// Validate the item scores and roll them up into an evaluation record.
    pub fn build(&self, id: EntityId, thresholds: &EvaluationThresholds) -> DeskResult<AgentEvaluation> {
        let mut by_category: BTreeMap<RubricCategory, i64> = BTreeMap::new();
        for (section_id, &score) in &self.item_scores {
            let section = section_by_id(section_id)
                .ok_or_else(|| DeskError::UnknownRubricSection(section_id.clone()))?;
            if !(0..=MAX_SECTION_SCORE).contains(&score) {
                return Err(DeskError::InvalidScore { section_id: section_id.clone(), score });
            }
            *by_category.entry(section.category).or_default() += score;
        }
        let sub = |c: RubricCategory| by_category.get(&c).copied().unwrap_or(0);

        let now = Utc::now();
        let mut evaluation = AgentEvaluation {
            id,
            agent_id:                  self.agent_id.clone(),
            week_start:                self.week_start,
            week_end:                  self.week_start + Duration::days(6),
            trading_tasks_score:       sub(RubricCategory::TradingTasks),
            discipline_score:          sub(RubricCategory::DisciplineCompliance),
            attitude_score:            sub(RubricCategory::AttitudeConduct),
            client_metrics_score:      sub(RubricCategory::ClientMetrics),
            team_contribution_score:   sub(RubricCategory::TeamContribution),
            total_score:               by_category.values().sum(),
            trading_tasks_remarks:     self.remarks.trading_tasks.clone(),
            discipline_remarks:        self.remarks.discipline.clone(),
            attitude_remarks:          self.remarks.attitude.clone(),
            client_metrics_remarks:    self.remarks.client_metrics.clone(),
            team_contribution_remarks: self.remarks.team_contribution.clone(),
            evaluator_id:              self.evaluator_id.clone(),
            evaluator_name:            self.evaluator_name.clone(),
            created_at:                now,
            updated_at:                now,
            performance_level:         None,
            alert_message:             None,
        };
        apply_display_fields(&mut evaluation, thresholds);
        Ok(evaluation)
    }
}

/// Total score as a percentage of the highest achievable total.
pub fn score_percentage(total_score: i64) -> f64 {
    let max = max_total_score();
    if max <= 0 {
        return 0.0;
    }
    total_score as f64 * 100.0 / max as f64
}

pub fn performance_level(total_score: i64, thresholds: &EvaluationThresholds) -> PerformanceLevel {
    let pct = score_percentage(total_score);
    if pct >= thresholds.excellent {
        PerformanceLevel::Excellent
    } else if pct >= thresholds.good {
        PerformanceLevel::Good
    } else if pct >= thresholds.warning {
        PerformanceLevel::NeedsImprovement
    } else {
        PerformanceLevel::Critical
    }
}

/// Alert level for an evaluation, or `AlertLevel::None` when there is none.
pub fn alert_level(evaluation: Option<&AgentEvaluation>, thresholds: &EvaluationThresholds) -> AlertLevel {
    let Some(evaluation) = evaluation else {
        return AlertLevel::None;
    };
    match performance_level(evaluation.total_score, thresholds) {
        PerformanceLevel::Excellent        => AlertLevel::Excellent,
        PerformanceLevel::Good             => AlertLevel::Good,
        PerformanceLevel::NeedsImprovement => AlertLevel::Warning,
        PerformanceLevel::Critical         => AlertLevel::Critical,
    }
}

pub fn alert_message(level: AlertLevel) -> &'static str {
    match level {
        AlertLevel::Critical  => "Critical: performance far below expectations, review with the agent this week",
        AlertLevel::Warning   => "Warning: performance below target, follow up on weak categories",
        AlertLevel::Good      => "Good: performance on target",
        AlertLevel::Excellent => "Excellent: outstanding performance this week",
        AlertLevel::None      => "No evaluation submitted for this week",
    }
}

/// Fill in `performance_level` and `alert_message` from the scores.
pub fn apply_display_fields(evaluation: &mut AgentEvaluation, thresholds: &EvaluationThresholds) {
    let level = alert_level(Some(evaluation), thresholds);
    evaluation.performance_level = Some(performance_level(evaluation.total_score, thresholds));
    evaluation.alert_message = Some(alert_message(level).to_string());
}

/// Reduce an agent's evaluation for a week (if any) to its dashboard alert.
pub fn to_alert(
    agent_id: &str,
    agent_name: &str,
    week_start: NaiveDate,
    evaluation: Option<&AgentEvaluation>,
    thresholds: &EvaluationThresholds,
) -> EvaluationAlert {
    let level = alert_level(evaluation, thresholds);
    EvaluationAlert {
        evaluation_id: evaluation.map(|e| e.id.clone()),
        agent_id:      agent_id.to_string(),
        agent_name:    agent_name.to_string(),
        week_start,
        total_score:   evaluation.map(|e| e.total_score),
        alert_level:   level,
        alert_message: alert_message(level).to_string(),
    }
}
