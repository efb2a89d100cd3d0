//! Record shapes exchanged with the data service.
//!
//! Field names match the database columns. These are request-scoped copies:
//! the data service owns every persistent entity.

use crate::types::{EntityId, Month, Year};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id:              EntityId,
    pub name:            String,
    pub margin_in:       f64,
    pub overall_margin:  f64,
    pub invested_amount: f64,
    pub monthly_revenue: f64,
    pub nots_generated:  i64,
    pub agent_id:        Option<EntityId>,
    pub created_at:      DateTime<Utc>,
    pub updated_at:      DateTime<Utc>,
    #[serde(default)]
    pub is_new_client:   Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id:              EntityId,
    pub name:            String,
    pub email:           Option<String>,
    pub phone:           Option<String>,
    pub commission_rate: f64,
    pub is_active:       bool,
    pub created_at:      DateTime<Utc>,
    pub updated_at:      DateTime<Utc>,
    // Aggregates filled in by the store, absent on plain reads.
    #[serde(default)]
    pub client_count:         Option<i64>,
    #[serde(default)]
    pub total_client_margin:  Option<f64>,
    #[serde(default)]
    pub total_client_revenue: Option<f64>,
    #[serde(default)]
    pub total_nots:           Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id:                 EntityId,
    pub name:               String,
    pub commission_per_lot: f64,
    pub tick_size:          f64,
    pub tick_value:         f64,
    pub margin_per_lot:     f64,
    pub created_at:         DateTime<Utc>,
}

/// A client's figures archived at the close of a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPerformance {
    pub id:              EntityId,
    pub client_id:       EntityId,
    pub agent_id:        Option<EntityId>,
    pub month:           Month,
    pub year:            Year,
    pub margin_in:       f64,
    pub overall_margin:  f64,
    pub invested_amount: f64,
    pub monthly_revenue: f64,
    pub nots_generated:  i64,
    pub is_new_client:   bool,
    pub created_at:      DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPerformance {
    pub id:             EntityId,
    pub client_id:      EntityId,
    pub date:           NaiveDate,
    pub margin_in:      f64,
    pub revenue:        f64,
    pub nots_generated: i64,
    pub created_at:     DateTime<Utc>,
}

/// Global thresholds plus the month the live client figures belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSettings {
    pub commission_threshold:  f64,
    pub not_target_per_client: i64,
    pub current_month:         Month,
    pub current_year:          Year,
    pub updated_at:            DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceLevel {
    Excellent,
    Good,
    NeedsImprovement,
    Critical,
}

impl PerformanceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent        => "excellent",
            Self::Good             => "good",
            Self::NeedsImprovement => "needs_improvement",
            Self::Critical         => "critical",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "excellent"         => Some(Self::Excellent),
            "good"              => Some(Self::Good),
            "needs_improvement" => Some(Self::NeedsImprovement),
            "critical"          => Some(Self::Critical),
            _ => None,
        }
    }
}

/// Weekly scorecard for one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentEvaluation {
    pub id:                        EntityId,
    pub agent_id:                  EntityId,
    pub week_start:                NaiveDate,
    pub week_end:                  NaiveDate,
    pub trading_tasks_score:       i64,
    pub discipline_score:          i64,
    pub attitude_score:            i64,
    pub client_metrics_score:      i64,
    pub team_contribution_score:   i64,
    pub total_score:               i64,
    pub trading_tasks_remarks:     Option<String>,
    pub discipline_remarks:        Option<String>,
    pub attitude_remarks:          Option<String>,
    pub client_metrics_remarks:    Option<String>,
    pub team_contribution_remarks: Option<String>,
    pub evaluator_id:              Option<EntityId>,
    pub evaluator_name:            Option<String>,
    pub created_at:                DateTime<Utc>,
    pub updated_at:                DateTime<Utc>,
    pub performance_level:         Option<PerformanceLevel>,
    pub alert_message:             Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Critical,
    Warning,
    Good,
    Excellent,
    /// No evaluation on record for the period.
    None,
}

/// An evaluation reduced to the alert it should raise on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationAlert {
    pub evaluation_id: Option<EntityId>,
    pub agent_id:      EntityId,
    pub agent_name:    String,
    pub week_start:    NaiveDate,
    pub total_score:   Option<i64>,
    pub alert_level:   AlertLevel,
    pub alert_message: String,
}

/// Aggregate counters for one reporting month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub month:                Month,
    pub year:                 Year,
    pub total_clients:        i64,
    pub new_clients:          i64,
    pub active_agents:        i64,
    pub total_margin_in:      f64,
    pub total_overall_margin: f64,
    pub total_invested:       f64,
    pub total_revenue:        f64,
    pub total_nots:           i64,
    pub nots_target:          i64,
    pub base_equity:          Option<f64>,
    pub progress_percentage:  f64,
}
