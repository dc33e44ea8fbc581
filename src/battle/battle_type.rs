//! Battle types and the XP reward formula

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::battle::move_type::BattleContext;
use crate::core::config::BattleConfig;

/// Kind of battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleType {
    SoloChallenge,     // One Guardian against AI challenges
    PvpDuel,           // Two Guardians against each other
    CooperativeBattle, // Two Guardians teamed up
}

/// Fixed constraints of a battle type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleTypeProperties {
    pub required_participants: u8,
    pub base_xp_reward: u32,
    pub minimum_energy_cost: u32,
    pub max_duration_minutes: u32,
}

impl BattleType {
    pub const ALL: [BattleType; 3] = [
        BattleType::SoloChallenge,
        BattleType::PvpDuel,
        BattleType::CooperativeBattle,
    ];

    pub fn properties(&self) -> BattleTypeProperties {
        match self {
            BattleType::SoloChallenge => BattleTypeProperties {
                required_participants: 1,
                base_xp_reward: 50,
                minimum_energy_cost: 10,
                max_duration_minutes: 15,
            },
            BattleType::PvpDuel => BattleTypeProperties {
                required_participants: 2,
                base_xp_reward: 100,
                minimum_energy_cost: 15,
                max_duration_minutes: 30,
            },
            BattleType::CooperativeBattle => BattleTypeProperties {
                required_participants: 2,
                base_xp_reward: 150,
                minimum_energy_cost: 20,
                max_duration_minutes: 45,
            },
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BattleType::SoloChallenge => "Solo Challenge",
            BattleType::PvpDuel => "PvP Duel",
            BattleType::CooperativeBattle => "Cooperative Battle",
        }
    }

    pub fn required_participants(&self) -> u8 {
        self.properties().required_participants
    }

    pub fn base_xp_reward(&self) -> u32 {
        self.properties().base_xp_reward
    }

    pub fn minimum_energy_cost(&self) -> u32 {
        self.properties().minimum_energy_cost
    }

    pub fn max_duration_minutes(&self) -> u32 {
        self.properties().max_duration_minutes
    }

    pub fn is_multiplayer(&self) -> bool {
        self.required_participants() > 1
    }

    pub fn is_solo(&self) -> bool {
        self.required_participants() == 1
    }

    pub fn context(&self) -> BattleContext {
        match self {
            BattleType::SoloChallenge => BattleContext::SoloChallenge,
            BattleType::PvpDuel => BattleContext::Pvp,
            BattleType::CooperativeBattle => BattleContext::Cooperative,
        }
    }

    /// XP for one participant using the default reward rules
    pub fn calculate_xp_reward(
        &self,
        energy_spent: u32,
        is_winner: bool,
        performance_multiplier: f64,
    ) -> u32 {
        self.calculate_xp_reward_with(
            &BattleConfig::default(),
            energy_spent,
            is_winner,
            performance_multiplier,
        )
    }

    /// XP for one participant using the bonus and clamp bounds from `config`
    ///
    /// `(base + energy) * winner_bonus? * clamp(multiplier)`, rounded half away
    /// from zero. Cooperative battles never apply the winner bonus. A NaN
    /// multiplier is treated as the lower bound.
    pub fn calculate_xp_reward_with(
        &self,
        config: &BattleConfig,
        energy_spent: u32,
        is_winner: bool,
        performance_multiplier: f64,
    ) -> u32 {
        let mut reward = self.base_xp_reward() as f64 + energy_spent as f64;

        if is_winner && *self != BattleType::CooperativeBattle {
            reward *= config.winner_bonus;
        }

        let multiplier = if performance_multiplier.is_nan() {
            config.min_performance_multiplier
        } else {
            performance_multiplier.clamp(
                config.min_performance_multiplier,
                config.max_performance_multiplier,
            )
        };
        reward *= multiplier;

        reward.round() as u32
    }
}

impl fmt::Display for BattleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
