use crate::types::{Month, Year};
use serde::{Deserialize, Serialize};

/// Seed values for the single `team_settings` row, applied only when the row is missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamDefaults {
    pub commission_threshold:  f64,
    pub not_target_per_client: i64,
    pub start_month:           Month,
    pub start_year:            Year,
}

/// Percentage cut-offs (of the rubric maximum) for evaluation levels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationThresholds {
    pub excellent: f64,
    pub good:      f64,
    pub warning:   f64,
}

impl Default for EvaluationThresholds {
    fn default() -> Self {
        Self { excellent: 90.0, good: 75.0, warning: 60.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    pub agents:  usize,
    pub clients: usize,
}

#[derive(Debug, Clone, Deserialize)]
struct DeskConfigFile {
    database_path:         String,
    team_defaults:         TeamDefaults,
    #[serde(default)]
    evaluation_thresholds: EvaluationThresholds,
    seed:                  SeedConfig,
}

#[derive(Debug, Clone)]
pub struct DeskConfig {
    pub database_path:         String,
    pub team_defaults:         TeamDefaults,
    pub evaluation_thresholds: EvaluationThresholds,
    pub seed:                  SeedConfig,
}

impl DeskConfig {
    /// Load from `{data_dir}/desk_config.json`.
    /// In tests, use DeskConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/desk_config.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let file: DeskConfigFile = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;

        let t = &file.evaluation_thresholds;
        if !(t.excellent >= t.good && t.good >= t.warning) {
            anyhow::bail!(
                "{path}: evaluation thresholds must satisfy excellent >= good >= warning \
                 (got {} / {} / {})",
                t.excellent, t.good, t.warning
            );
        }
        if !(1..=12).contains(&file.team_defaults.start_month) {
            anyhow::bail!("{path}: team_defaults.start_month must be 1..=12");
        }

        Ok(Self {
            database_path:         file.database_path,
            team_defaults:         file.team_defaults,
            evaluation_thresholds: file.evaluation_thresholds,
            seed:                  file.seed,
        })
    }

    /// Fixed configuration for tests: in-memory database, January 2024.
    pub fn default_test() -> Self {
        Self {
            database_path: ":memory:".to_string(),
            team_defaults: TeamDefaults {
                commission_threshold:  5_000.0,
                not_target_per_client: 10,
                start_month:           1,
                start_year:            2024,
            },
            evaluation_thresholds: EvaluationThresholds::default(),
            seed: SeedConfig { agents: 3, clients: 12 },
        }
    }
}
