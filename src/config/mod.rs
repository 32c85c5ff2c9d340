//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::models::{
    AnalysisRole, Metric, Roster, Rosters, DESTRO_CAREERS, DESTRO_TANKS, ORDER_CAREERS,
    ORDER_TANKS,
};

/// Config file looked up when no path is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "./career-relative.toml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Tunables of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Which participants count: "offense" or "support"
    #[serde(default)]
    pub role: AnalysisRole,

    /// Metrics to analyse; empty means the role's preset
    #[serde(default)]
    pub metrics: Vec<Metric>,

    /// Entries below this fraction of their faction's top performer are
    /// treated as late joiners and skipped
    #[serde(default = "default_late_join_threshold")]
    pub late_join_threshold: f64,

    /// Fraction of each pair's worst samples dropped before averaging
    #[serde(default)]
    pub trim_worst_fraction: f64,

    /// Scale values by 80 / renown rank
    #[serde(default)]
    pub normalize_by_progression: bool,

    /// Shard the corpus across threads
    #[serde(default)]
    pub parallel: bool,
}

fn default_late_join_threshold() -> f64 {
    0.1
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            role: AnalysisRole::default(),
            metrics: Vec::new(),
            late_join_threshold: default_late_join_threshold(),
            trim_worst_fraction: 0.0,
            normalize_by_progression: false,
            parallel: false,
        }
    }
}

impl AnalysisConfig {
    /// Metrics this run will analyse.
    pub fn effective_metrics(&self) -> Vec<Metric> {
        if self.metrics.is_empty() {
            self.role.default_metrics().to_vec()
        } else {
            self.metrics.clone()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.late_join_threshold) {
            return Err(ConfigError::ValidationError(format!(
                "late_join_threshold must be within [0, 1], got {}",
                self.late_join_threshold
            )));
        }

        if !(0.0..1.0).contains(&self.trim_worst_fraction) {
            return Err(ConfigError::ValidationError(format!(
                "trim_worst_fraction must be within [0, 1), got {}",
                self.trim_worst_fraction
            )));
        }

        for (i, metric) in self.metrics.iter().enumerate() {
            if self.metrics[..i].contains(metric) {
                return Err(ConfigError::ValidationError(format!(
                    "metric '{}' listed more than once",
                    metric
                )));
            }
        }

        Ok(())
    }
}

/// Career rosters per faction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterConfig {
    #[serde(default = "default_order")]
    pub order: Vec<String>,

    #[serde(default = "default_destro")]
    pub destro: Vec<String>,

    /// Tank careers compared by the support analysis
    #[serde(default = "default_support_order")]
    pub support_order: Vec<String>,

    #[serde(default = "default_support_destro")]
    pub support_destro: Vec<String>,
}

fn default_order() -> Vec<String> {
    ORDER_CAREERS.iter().map(|c| c.to_string()).collect()
}

fn default_destro() -> Vec<String> {
    DESTRO_CAREERS.iter().map(|c| c.to_string()).collect()
}

fn default_support_order() -> Vec<String> {
    ORDER_TANKS.iter().map(|c| c.to_string()).collect()
}

fn default_support_destro() -> Vec<String> {
    DESTRO_TANKS.iter().map(|c| c.to_string()).collect()
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            order: default_order(),
            destro: default_destro(),
            support_order: default_support_order(),
            support_destro: default_support_destro(),
        }
    }
}

impl RosterConfig {
    pub fn rosters(&self) -> Rosters {
        Rosters::new(
            Roster::from_names(&self.order, &self.destro),
            Roster::from_names(&self.support_order, &self.support_destro),
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let named = [
            ("order", &self.order),
            ("destro", &self.destro),
            ("support_order", &self.support_order),
            ("support_destro", &self.support_destro),
        ];
        for (name, careers) in named {
            if careers.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "roster '{}' must not be empty",
                    name
                )));
            }
        }

        let rosters = self.rosters();
        for (name, roster) in [("full", &rosters.full), ("support", &rosters.support)] {
            if let Some(career) = roster.duplicates().first() {
                return Err(ConfigError::ValidationError(format!(
                    "career '{}' appears more than once in the {} roster",
                    career, name
                )));
            }
        }

        if let Some(career) = rosters.support.not_within(&rosters.full).first() {
            return Err(ConfigError::ValidationError(format!(
                "support career '{}' is not on the same faction's full roster",
                career
            )));
        }

        Ok(())
    }
}

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub roster: RosterConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            analysis: AnalysisConfig::default(),
            roster: RosterConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load an explicitly requested file, which must exist, or else the
    /// optional [`DEFAULT_CONFIG_PATH`].
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => Self::load_or_default(Path::new(DEFAULT_CONFIG_PATH)),
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.analysis.validate()?;
        self.roster.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, "info");
        assert_eq!(config.analysis.role, AnalysisRole::Offense);
        assert_eq!(config.analysis.late_join_threshold, 0.1);
        assert_eq!(config.analysis.trim_worst_fraction, 0.0);
        assert!(!config.analysis.normalize_by_progression);
        assert_eq!(config.roster.order.len(), 12);
        assert_eq!(config.roster.support_destro.len(), 3);
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_effective_metrics_uses_role_preset() {
        let mut analysis = AnalysisConfig {
            role: AnalysisRole::Support,
            ..Default::default()
        };
        assert_eq!(analysis.effective_metrics().len(), 4);

        analysis.metrics = vec![Metric::Healing];
        assert_eq!(analysis.effective_metrics(), vec![Metric::Healing]);
    }

    #[test]
    fn test_config_validation_bad_threshold() {
        let mut config = AppConfig::default();
        config.analysis.late_join_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_trim() {
        let mut config = AppConfig::default();
        config.analysis.trim_worst_fraction = 1.0;
        assert!(config.validate().is_err());

        config.analysis.trim_worst_fraction = 0.25;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_duplicate_metric() {
        let mut config = AppConfig::default();
        config.analysis.metrics = vec![Metric::Damage, Metric::KillDamage, Metric::Damage];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_overlapping_rosters() {
        let mut config = AppConfig::default();
        config.roster.destro.push("SLAYER".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_empty_roster() {
        let mut config = AppConfig::default();
        config.roster.support_order.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_support_outside_full_roster() {
        let mut config = AppConfig::default();
        config.roster.support_order.push("BLACK_ORC".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_partial_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
log_level = "debug"

[analysis]
role = "support"
metrics = ["healing", "protection_healing"]
trim_worst_fraction = 0.2
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.analysis.role, AnalysisRole::Support);
        assert_eq!(
            config.analysis.metrics,
            vec![Metric::Healing, Metric::ProtectionHealing]
        );
        assert_eq!(config.analysis.trim_worst_fraction, 0.2);
        assert_eq!(config.analysis.late_join_threshold, 0.1);
        assert_eq!(config.roster, RosterConfig::default());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(matches!(
            AppConfig::load(Some(&missing)),
            Err(ConfigError::ReadError(_))
        ));
    }

    #[test]
    fn test_explicit_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = \"warn\"").unwrap();
        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        // Should be parseable
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }
}
