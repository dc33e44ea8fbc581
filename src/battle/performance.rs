//! Performance multiplier fed into the XP reward formula
//!
//! A Guardian who gets more effect out of each point of energy earns a
//! multiplier above 1.0; a wasteful one falls below it. The reward formula
//! clamps whatever comes out of here.

use crate::battle::state::Battle;
use crate::core::config::BattleConfig;
use crate::core::types::GuardianId;

/// `1.0 + weight * (mean move efficiency - 1.0)`, or exactly 1.0 with no moves
pub fn performance_multiplier(battle: &Battle, guardian_id: GuardianId, config: &BattleConfig) -> f64 {
    let moves = battle.moves_by_guardian(guardian_id);
    if moves.is_empty() {
        return 1.0;
    }

    let mean_efficiency =
        moves.iter().map(|m| m.energy_efficiency()).sum::<f64>() / moves.len() as f64;

    1.0 + config.performance_weight * (mean_efficiency - 1.0)
}
