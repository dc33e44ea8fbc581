//! Battle configuration with documented constants
//!
//! Tunable numbers used by the engine and the result classifiers. The
//! per-variant policy tables (base costs, base XP, minimum energy) and the
//! move validation bounds are not here; they are fixed rules.

use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::battle::constants::{
    COMPLETION_ENERGY_THRESHOLD, EFFICIENT_MOVES_DIVISOR, ENERGY_EFFICIENT_XP_RATIO,
    MAX_PERFORMANCE_MULTIPLIER, MIN_PERFORMANCE_MULTIPLIER, PERFORMANCE_WEIGHT, QUICK_BATTLE_MINUTES, WINNER_BONUS,
};
use crate::core::error::{BattleError, Result};

/// Configuration for battle rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    // === ENGINE ===
    /// Cumulative energy a battle must exceed before it completes itself
    ///
    /// The move that pushes `total_energy_spent` strictly above this value
    /// ends the battle and its actor is declared the winner.
    pub completion_energy_threshold: u32,

    // === REWARDS ===
    /// Multiplier applied to winners of competitive battles
    pub winner_bonus: f64,

    /// Lower clamp for the performance multiplier
    pub min_performance_multiplier: f64,

    /// Upper clamp for the performance multiplier
    pub max_performance_multiplier: f64,

    /// How strongly move efficiency moves the performance multiplier away from 1.0
    ///
    /// At 0.0 every participant gets a neutral multiplier.
    pub performance_weight: f64,

    // === RESULT CLASSIFIERS ===
    /// A battle is "efficient" when moves < energy / this divisor
    pub efficient_moves_divisor: u32,

    /// A battle is "energy efficient" when XP per energy exceeds this ratio
    pub energy_efficient_xp_ratio: f64,

    /// Battles shorter than this many minutes count as quick
    pub quick_battle_minutes: i64,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            completion_energy_threshold: COMPLETION_ENERGY_THRESHOLD,
            winner_bonus: WINNER_BONUS,
            min_performance_multiplier: MIN_PERFORMANCE_MULTIPLIER,
            max_performance_multiplier: MAX_PERFORMANCE_MULTIPLIER,
            performance_weight: PERFORMANCE_WEIGHT,
            efficient_moves_divisor: EFFICIENT_MOVES_DIVISOR,
            energy_efficient_xp_ratio: ENERGY_EFFICIENT_XP_RATIO,
            quick_battle_minutes: QUICK_BATTLE_MINUTES,
        }
    }
}

impl BattleConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: BattleConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.completion_energy_threshold == 0 {
            return Err(BattleError::Config(
                "completion_energy_threshold must be positive".into(),
            ));
        }

        if !self.min_performance_multiplier.is_finite()
            || !self.max_performance_multiplier.is_finite()
            || self.min_performance_multiplier <= 0.0
            || self.min_performance_multiplier > self.max_performance_multiplier
        {
            return Err(BattleError::Config(format!(
                "performance multiplier bounds are inconsistent: [{}, {}]",
                self.min_performance_multiplier, self.max_performance_multiplier
            )));
        }

        if !self.winner_bonus.is_finite() || self.winner_bonus < 1.0 {
            return Err(BattleError::Config(format!(
                "winner_bonus ({}) must be at least 1.0",
                self.winner_bonus
            )));
        }

        if !self.performance_weight.is_finite() || self.performance_weight < 0.0 {
            return Err(BattleError::Config(
                "performance_weight must be a non-negative number".into(),
            ));
        }

        if self.efficient_moves_divisor == 0 {
            return Err(BattleError::Config(
                "efficient_moves_divisor must be positive".into(),
            ));
        }

        if !self.energy_efficient_xp_ratio.is_finite() || self.energy_efficient_xp_ratio < 0.0 {
            return Err(BattleError::Config(format!(
                "energy_efficient_xp_ratio ({}) must be a non-negative number",
                self.energy_efficient_xp_ratio
            )));
        }

        if self.quick_battle_minutes < 0 {
            return Err(BattleError::Config(
                "quick_battle_minutes cannot be negative".into(),
            ));
        }

        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

static CONFIG: OnceLock<BattleConfig> = OnceLock::new();

/// Get the global battle config (initializes with defaults if not set)
pub fn config() -> &'static BattleConfig {
    CONFIG.get_or_init(BattleConfig::default)
}

/// Set the global battle config (can only be called once)
///
/// Returns Err with the rejected config if one was already set.
pub fn set_config(config: BattleConfig) -> std::result::Result<(), BattleConfig> {
    CONFIG.set(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(BattleConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = BattleConfig::from_toml_str("completion_energy_threshold = 60\n").unwrap();
        assert_eq!(config.completion_energy_threshold, 60);
        assert_eq!(config.efficient_moves_divisor, 5);
        assert_eq!(config.winner_bonus, 1.5);
    }

    #[test]
    fn test_inverted_multiplier_bounds_rejected() {
        let toml = "min_performance_multiplier = 3.0\nmax_performance_multiplier = 2.0\n";
        let err = BattleConfig::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, BattleError::Config(_)));
    }

    #[test]
    fn test_malformed_toml_is_infrastructure_error() {
        let err = BattleConfig::from_toml_str("winner_bonus = \"lots\"").unwrap_err();
        assert!(matches!(err, BattleError::TomlError(_)));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("battle-config-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "performance_weight = 0.0\n").unwrap();
        let config = BattleConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(config.performance_weight, 0.0);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = BattleConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, BattleError::IoError(_)));
    }

    #[test]
    fn test_non_finite_and_negative_values_rejected() {
        let broken = [
            BattleConfig { min_performance_multiplier: f64::NAN, ..Default::default() },
            BattleConfig { max_performance_multiplier: f64::NAN, ..Default::default() },
            BattleConfig { max_performance_multiplier: f64::INFINITY, ..Default::default() },
            BattleConfig { winner_bonus: f64::NAN, ..Default::default() },
            BattleConfig { performance_weight: f64::NAN, ..Default::default() },
            BattleConfig { energy_efficient_xp_ratio: f64::NAN, ..Default::default() },
            BattleConfig { energy_efficient_xp_ratio: -0.5, ..Default::default() },
            BattleConfig { quick_battle_minutes: -1, ..Default::default() },
        ];
        for config in broken {
            assert!(config.validate().is_err(), "{:?} should be rejected", config);
        }
    }
}
