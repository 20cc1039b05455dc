//! Configuration loading and validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::derive::ClassificationPolicy;
use crate::models::{Classification, Tier};

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

/// Dataset locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Primary player sheet. Required at render time.
    #[serde(default = "default_players_path")]
    pub players_path: PathBuf,

    /// Optional score-gain sheet. Absence is not an error.
    #[serde(default = "default_score_gains_path")]
    pub score_gains_path: PathBuf,

    /// Snapshot date shown in the page caption (quoted "YYYY-MM-DD").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
}

fn default_players_path() -> PathBuf {
    PathBuf::from("./data/players.csv")
}

fn default_score_gains_path() -> PathBuf {
    PathBuf::from("./data/score_gains.csv")
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            players_path: default_players_path(),
            score_gains_path: default_score_gains_path(),
            as_of: None,
        }
    }
}

/// Minimum game counts for the win-rate extremum callouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdsConfig {
    #[serde(default = "default_same_tier_min_games")]
    pub same_tier_min_games: u32,

    #[serde(default = "default_cross_tier_min_games")]
    pub cross_tier_min_games: u32,
}

fn default_same_tier_min_games() -> u32 {
    40
}

fn default_cross_tier_min_games() -> u32 {
    20
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            same_tier_min_games: default_same_tier_min_games(),
            cross_tier_min_games: default_cross_tier_min_games(),
        }
    }
}

/// Classification rule ordering and display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationConfig {
    /// Rule names evaluated top-down; must end with "active_fallback".
    #[serde(default = "default_rule_order")]
    pub rule_order: Vec<String>,

    /// Classification names in table/chart display order.
    #[serde(default = "default_display_order")]
    pub display_order: Vec<String>,
}

fn default_rule_order() -> Vec<String> {
    vec![
        "inactive_change".to_string(),
        "youth_status".to_string(),
        "unranked_pending".to_string(),
        "active_fallback".to_string(),
    ]
}

fn default_display_order() -> Vec<String> {
    vec![
        "active".to_string(),
        "pending".to_string(),
        "inactive".to_string(),
        "youth".to_string(),
    ]
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            rule_order: default_rule_order(),
            display_order: default_display_order(),
        }
    }
}

impl ClassificationConfig {
    pub fn policy(&self) -> Result<ClassificationPolicy, ConfigError> {
        ClassificationPolicy::from_rule_names(&self.rule_order)
            .map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    pub fn display_order(&self) -> Result<Vec<Classification>, ConfigError> {
        let order = self
            .display_order
            .iter()
            .map(|name| {
                Classification::from_name(name).ok_or_else(|| {
                    ConfigError::ValidationError(format!("unknown classification: {name:?}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if order.is_empty() {
            return Err(ConfigError::ValidationError(
                "display_order must not be empty".to_string(),
            ));
        }
        Ok(order)
    }
}

/// Leaderboard (top-k) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardsConfig {
    /// Tier labels excluded from metric leaderboards.
    #[serde(default)]
    pub excluded_tiers: Vec<String>,

    /// k for the most-matches leaderboard.
    #[serde(default = "default_top_k_matches")]
    pub top_k_matches: usize,

    /// k for the clutch/duplicity leaderboards.
    #[serde(default = "default_top_k_metrics")]
    pub top_k_metrics: usize,
}

fn default_top_k_matches() -> usize {
    5
}

fn default_top_k_metrics() -> usize {
    3
}

impl Default for LeaderboardsConfig {
    fn default() -> Self {
        Self {
            excluded_tiers: Vec::new(),
            top_k_matches: default_top_k_matches(),
            top_k_metrics: default_top_k_metrics(),
        }
    }
}

impl LeaderboardsConfig {
    pub fn excluded_tiers(&self) -> Result<Vec<Tier>, ConfigError> {
        self.excluded_tiers
            .iter()
            .map(|s| {
                s.parse::<Tier>()
                    .map_err(|e| ConfigError::ValidationError(e.to_string()))
            })
            .collect()
    }
}

/// Win-rate extremum settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtremaConfig {
    /// Also show the lowest-win-rate callouts.
    #[serde(default = "default_include_lowest")]
    pub include_lowest: bool,

    /// Tie-break for lowest-win-rate: prefer the record with fewer games
    /// instead of plain input order.
    #[serde(default)]
    pub lowest_prefers_fewest_games: bool,
}

fn default_include_lowest() -> bool {
    true
}

impl Default for ExtremaConfig {
    fn default() -> Self {
        Self {
            include_lowest: default_include_lowest(),
            lowest_prefers_fewest_games: false,
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    // Scalar fields stay ahead of the tables so the config serializes.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub thresholds: ThresholdsConfig,

    #[serde(default)]
    pub classification: ClassificationConfig,

    #[serde(default)]
    pub leaderboards: LeaderboardsConfig,

    #[serde(default)]
    pub extrema: ExtremaConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            data: DataConfig::default(),
            thresholds: ThresholdsConfig::default(),
            classification: ClassificationConfig::default(),
            leaderboards: LeaderboardsConfig::default(),
            extrema: ExtremaConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thresholds.same_tier_min_games == 0 || self.thresholds.cross_tier_min_games == 0 {
            return Err(ConfigError::ValidationError(
                "game-count thresholds must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        // Surface bad rule/tier names at startup, not at render time.
        self.classification.policy()?;
        self.classification.display_order()?;
        self.leaderboards.excluded_tiers()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.data.players_path, PathBuf::from("./data/players.csv"));
        assert_eq!(config.thresholds.same_tier_min_games, 40);
        assert_eq!(config.thresholds.cross_tier_min_games, 20);
        assert_eq!(config.leaderboards.top_k_matches, 5);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_threshold() {
        let mut config = AppConfig::default();
        config.thresholds.same_tier_min_games = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_rule_order() {
        let mut config = AppConfig::default();
        config.classification.rule_order = vec!["retired".to_string()];

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_excluded_tier() {
        let mut config = AppConfig::default();
        config.leaderboards.excluded_tiers = vec!["gold".to_string()];

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_display_order_parse() {
        let config = AppConfig::default();
        let order = config.classification.display_order().unwrap();
        assert_eq!(order[0], Classification::Active);
        assert_eq!(order.len(), 4);
    }

    #[test]
    fn test_excluded_tiers_parse() {
        let mut config = AppConfig::default();
        config.leaderboards.excluded_tiers = vec!["7".to_string(), "3S".to_string()];
        let tiers = config.leaderboards.excluded_tiers().unwrap();
        assert_eq!(tiers, vec![Tier::new(7), Tier::special(3)]);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        // Should be parseable
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.data.players_path, parsed.data.players_path);
        assert_eq!(
            config.classification.rule_order,
            parsed.classification.rule_order
        );
    }

    #[test]
    fn test_config_from_toml_snippet() {
        let config: AppConfig = toml::from_str(
            r#"
            [thresholds]
            same_tier_min_games = 30

            [extrema]
            lowest_prefers_fewest_games = true

            [leaderboards]
            excluded_tiers = ["7"]
            "#,
        )
        .unwrap();

        assert_eq!(config.thresholds.same_tier_min_games, 30);
        assert_eq!(config.thresholds.cross_tier_min_games, 20);
        assert!(config.extrema.lowest_prefers_fewest_games);
        assert_eq!(config.leaderboards.excluded_tiers, vec!["7"]);
    }
}
