//! Weekly agent evaluation rubric.
//!
//! RULE: section ids are stable and unique. Stored item scores reference them,
//! so an id is never renamed or reused. Append new sections, never reorder.

use serde::Serialize;

/// Highest score a single rubric section can receive.
pub const MAX_SECTION_SCORE: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RubricCategory {
    TradingTasks,
    DisciplineCompliance,
    AttitudeConduct,
    ClientMetrics,
    TeamContribution,
}

impl RubricCategory {
    /// Display order on the evaluation form.
    pub const ALL: [RubricCategory; 5] = [
        Self::TradingTasks,
        Self::DisciplineCompliance,
        Self::AttitudeConduct,
        Self::ClientMetrics,
        Self::TeamContribution,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::TradingTasks         => "Trading Tasks",
            Self::DisciplineCompliance => "Discipline & Compliance",
            Self::AttitudeConduct      => "Attitude & Professional Conduct",
            Self::ClientMetrics        => "Client Metrics",
            Self::TeamContribution     => "Team Contribution",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EvaluationPointSection {
    pub id:          &'static str,
    pub label:       &'static str,
    pub description: &'static str,
    pub category:    RubricCategory,
}

const fn section(
    id: &'static str,
    label: &'static str,
    description: &'static str,
    category: RubricCategory,
) -> EvaluationPointSection {
    EvaluationPointSection { id, label, description, category }
}

use RubricCategory::*;

pub static EVALUATION_POINT_SECTIONS: &[EvaluationPointSection] = &[
    // ── Trading Tasks ─────────────────────────────────────────
    section(
        "daily_trading_report",
        "Daily Trading Report",
        "Submits the end-of-day trading report on time with accurate figures.",
        TradingTasks,
    ),
    section(
        "market_analysis",
        "Market Analysis",
        "Prepares and shares the daily market outlook with assigned clients.",
        TradingTasks,
    ),
    section(
        "trade_execution",
        "Trade Execution",
        "Places orders exactly as instructed by the client, without slippage from delay.",
        TradingTasks,
    ),
    section(
        "risk_management",
        "Risk Management",
        "Applies stop-loss and exposure limits on every open client position.",
        TradingTasks,
    ),
    // ── Discipline & Compliance ───────────────────────────────
    section(
        "attendance_punctuality",
        "Attendance & Punctuality",
        "Present for the full trading session and on time for the morning briefing.",
        DisciplineCompliance,
    ),
    section(
        "kyc_compliance",
        "KYC Compliance",
        "Client documentation is complete before any account is funded.",
        DisciplineCompliance,
    ),
    section(
        "crm_updates",
        "CRM Updates",
        "Logs every client call and follow-up in the CRM the same day.",
        DisciplineCompliance,
    ),
    section(
        "call_recording",
        "Call Recording",
        "All order-taking calls are placed on recorded lines.",
        DisciplineCompliance,
    ),
    section(
        "policy_adherence",
        "Policy Adherence",
        "No unauthorised trades, promises of returns, or off-platform dealing.",
        DisciplineCompliance,
    ),
    // ── Attitude & Professional Conduct ───────────────────────
    section(
        "client_communication",
        "Client Communication",
        "Clear, courteous and timely responses to client queries.",
        AttitudeConduct,
    ),
    section(
        "professional_behavior",
        "Professional Behavior",
        "Respectful conduct with colleagues and clients, on and off the floor.",
        AttitudeConduct,
    ),
    section(
        "initiative_learning",
        "Initiative & Learning",
        "Takes ownership of problems and attends product training sessions.",
        AttitudeConduct,
    ),
    // ── Client Metrics ────────────────────────────────────────
    section(
        "margin_in_target",
        "Margin In Target",
        "Share of the weekly Margin In target brought in by assigned clients.",
        ClientMetrics,
    ),
    section(
        "nots_target",
        "NOTs Target",
        "Share of the weekly Numbers & Targets goal achieved.",
        ClientMetrics,
    ),
    // ── Team Contribution ─────────────────────────────────────
    section(
        "team_support",
        "Team Support",
        "Covers for colleagues and shares client leads with the desk.",
        TeamContribution,
    ),
];

/// Look up a section by its id.
pub fn section_by_id(id: &str) -> Option<&'static EvaluationPointSection> {
    EVALUATION_POINT_SECTIONS.iter().find(|s| s.id == id)
}

/// All sections of one category, in catalog order.
pub fn sections_in(category: RubricCategory) -> impl Iterator<Item = &'static EvaluationPointSection> {
    EVALUATION_POINT_SECTIONS
        .iter()
        .filter(move |s| s.category == category)
}

/// Highest total an evaluation can reach across the full rubric.
pub fn max_total_score() -> i64 {
    EVALUATION_POINT_SECTIONS.len() as i64 * MAX_SECTION_SCORE
}
