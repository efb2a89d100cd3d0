use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Raised locally before any service call when the session lacks admin rights.
    #[error("Unauthorized")]
    Unauthorized,

    /// A failure reported by the remote data service. `message` is passed
    /// through untouched when the service supplied one.
    #[error("{}", message.as_deref().unwrap_or("Remote call failed"))]
    Remote { message: Option<String> },

    #[error("Invalid period: month {month}, year {year}")]
    InvalidPeriod { month: i32, year: i32 },

    #[error("Period {new_month}/{new_year} does not follow current period {month}/{year}")]
    PeriodNotAdvanced {
        month:     i32,
        year:      i32,
        new_month: i32,
        new_year:  i32,
    },

    #[error("Invalid base equity: {0}")]
    InvalidBaseEquity(f64),

    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Unknown rubric section '{0}'")]
    UnknownRubricSection(String),

    #[error("Score {score} out of range for rubric section '{section_id}'")]
    InvalidScore { section_id: String, score: i64 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DeskError {
    /// A remote failure carrying the service's own message.
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote { message: Some(message.into()) }
    }

    /// The human-readable text to record for this failure, if it has one.
    /// Only a `Remote` failure without a (non-empty) message returns `None`.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Remote { message } => message.clone().filter(|m| !m.is_empty()),
            other => Some(other.to_string()),
        }
    }
}

pub type DeskResult<T> = Result<T, DeskError>;
