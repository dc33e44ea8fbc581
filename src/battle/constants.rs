//! Battle rule constants - default values for the tunable rules
//!
//! `BattleConfig::default()` is built from these.

// Auto-completion
pub const COMPLETION_ENERGY_THRESHOLD: u32 = 100;

// Moves
pub const MAX_MOVE_ENERGY_COST: u32 = 50;
pub const MAX_DESCRIPTION_LEN: usize = 200;

// Cards
pub const MAX_CARD_POWER: u32 = 999;
pub const MAX_CARD_NAME_LEN: usize = 50;

// Rewards
pub const WINNER_BONUS: f64 = 1.5;
pub const MIN_PERFORMANCE_MULTIPLIER: f64 = 0.5;
pub const MAX_PERFORMANCE_MULTIPLIER: f64 = 2.0;
pub const PERFORMANCE_WEIGHT: f64 = 0.25;

// Healing grows 10% per Guardian level
pub const HEALING_PER_LEVEL: f64 = 0.1;

// Result classifiers
pub const EFFICIENT_MOVES_DIVISOR: u32 = 5;
pub const ENERGY_EFFICIENT_XP_RATIO: f64 = 2.0;
pub const QUICK_BATTLE_MINUTES: i64 = 10;
pub const FAST_BATTLE_MINUTES: i64 = 15;
