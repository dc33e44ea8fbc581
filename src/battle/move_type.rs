//! Move types and their capability table

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::battle::battle_type::BattleType;
use crate::battle::constants::MAX_MOVE_ENERGY_COST;

/// Kind of action a Guardian takes with a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleMoveType {
    Attack,  // Damage a target
    Defense, // Brace; no target, no direct effect
    Support, // Heal self or an ally
    Special, // Damage and heal
}

/// Battle context for effectiveness lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleContext {
    Pvp,
    Cooperative,
    SoloChallenge,
}

/// Fixed capabilities of a move type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveCapabilities {
    pub can_target: bool,
    pub can_deal_damage: bool,
    pub can_heal: bool,
    pub base_energy_cost: u32,
    pub strategic_value: u8,
}

const CAPABILITIES: [(BattleMoveType, MoveCapabilities); 4] = [
    (
        BattleMoveType::Attack,
        MoveCapabilities {
            can_target: true,
            can_deal_damage: true,
            can_heal: false,
            base_energy_cost: 15,
            strategic_value: 8,
        },
    ),
    (
        BattleMoveType::Defense,
        MoveCapabilities {
            can_target: false,
            can_deal_damage: false,
            can_heal: false,
            base_energy_cost: 8,
            strategic_value: 6,
        },
    ),
    (
        BattleMoveType::Support,
        MoveCapabilities {
            can_target: true,
            can_deal_damage: false,
            can_heal: true,
            base_energy_cost: 12,
            strategic_value: 7,
        },
    ),
    (
        BattleMoveType::Special,
        MoveCapabilities {
            can_target: true,
            can_deal_damage: true,
            can_heal: true,
            base_energy_cost: 25,
            strategic_value: 9,
        },
    ),
];

impl BattleMoveType {
    pub const ALL: [BattleMoveType; 4] = [
        BattleMoveType::Attack,
        BattleMoveType::Defense,
        BattleMoveType::Support,
        BattleMoveType::Special,
    ];

    /// Row of the capability table for this type
    pub fn capabilities(&self) -> MoveCapabilities {
        CAPABILITIES[*self as usize].1
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BattleMoveType::Attack => "Attack",
            BattleMoveType::Defense => "Defense",
            BattleMoveType::Support => "Support",
            BattleMoveType::Special => "Special",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BattleMoveType::Attack => "Deal damage to target",
            BattleMoveType::Defense => "Protect from damage or reduce effects",
            BattleMoveType::Support => "Heal or enhance allies",
            BattleMoveType::Special => "Unique card ability with varied effects",
        }
    }

    pub fn can_target(&self) -> bool {
        self.capabilities().can_target
    }

    pub fn can_deal_damage(&self) -> bool {
        self.capabilities().can_deal_damage
    }

    pub fn can_heal(&self) -> bool {
        self.capabilities().can_heal
    }

    pub fn base_energy_cost(&self) -> u32 {
        self.capabilities().base_energy_cost
    }

    /// Strategic value on a 1-10 scale
    pub fn strategic_value(&self) -> u8 {
        self.capabilities().strategic_value
    }

    pub fn is_defensive(&self) -> bool {
        matches!(self, BattleMoveType::Defense)
    }

    pub fn is_supportive(&self) -> bool {
        matches!(self, BattleMoveType::Support | BattleMoveType::Special)
    }

    pub fn is_offensive(&self) -> bool {
        matches!(self, BattleMoveType::Attack | BattleMoveType::Special)
    }

    /// Per-type advisory check: at least the base cost, at most the global cap
    ///
    /// Move construction only enforces the global [0, 50] range.
    pub fn is_valid_energy_cost(&self, energy_cost: u32) -> bool {
        energy_cost >= self.base_energy_cost() && energy_cost <= MAX_MOVE_ENERGY_COST
    }

    pub fn base_cost_multiplier(&self) -> f64 {
        match self {
            BattleMoveType::Attack => 1.0,
            BattleMoveType::Defense => 0.8,
            BattleMoveType::Support => 1.2,
            BattleMoveType::Special => 1.5,
        }
    }

    pub fn effectiveness_multiplier(&self, context: BattleContext) -> f64 {
        match (self, context) {
            (BattleMoveType::Attack, BattleContext::Pvp) => 1.2,
            (BattleMoveType::Defense, BattleContext::Cooperative) => 1.3,
            (BattleMoveType::Support, BattleContext::Cooperative) => 1.4,
            (BattleMoveType::Support, _) => 1.1,
            _ => 1.0,
        }
    }

    /// Support has nobody to help in a solo challenge
    pub fn is_compatible_with(&self, battle_type: BattleType) -> bool {
        !(matches!(self, BattleMoveType::Support) && battle_type.is_solo())
    }
}

impl fmt::Display for BattleMoveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_table_rows_match_variants() {
        for move_type in BattleMoveType::ALL {
            assert_eq!(CAPABILITIES[move_type as usize].0, move_type);
        }
    }

    #[test]
    fn test_capabilities() {
        assert!(BattleMoveType::Attack.can_target());
        assert!(BattleMoveType::Attack.can_deal_damage());
        assert!(!BattleMoveType::Attack.can_heal());

        assert!(!BattleMoveType::Defense.can_target());
        assert!(!BattleMoveType::Defense.can_deal_damage());
        assert!(!BattleMoveType::Defense.can_heal());

        assert!(BattleMoveType::Support.can_target());
        assert!(!BattleMoveType::Support.can_deal_damage());
        assert!(BattleMoveType::Support.can_heal());

        assert!(BattleMoveType::Special.can_target());
        assert!(BattleMoveType::Special.can_deal_damage());
        assert!(BattleMoveType::Special.can_heal());
    }

    #[test]
    fn test_base_costs() {
        assert_eq!(BattleMoveType::Attack.base_energy_cost(), 15);
        assert_eq!(BattleMoveType::Defense.base_energy_cost(), 8);
        assert_eq!(BattleMoveType::Support.base_energy_cost(), 12);
        assert_eq!(BattleMoveType::Special.base_energy_cost(), 25);
    }

    #[test]
    fn test_advisory_energy_cost() {
        assert!(BattleMoveType::Attack.is_valid_energy_cost(15));
        assert!(BattleMoveType::Attack.is_valid_energy_cost(50));
        assert!(!BattleMoveType::Attack.is_valid_energy_cost(14));
        assert!(!BattleMoveType::Special.is_valid_energy_cost(51));
    }

    #[test]
    fn test_effectiveness_by_context() {
        assert_eq!(BattleMoveType::Attack.effectiveness_multiplier(BattleContext::Pvp), 1.2);
        assert_eq!(BattleMoveType::Attack.effectiveness_multiplier(BattleContext::Cooperative), 1.0);
        assert_eq!(BattleMoveType::Defense.effectiveness_multiplier(BattleContext::Cooperative), 1.3);
        assert_eq!(BattleMoveType::Support.effectiveness_multiplier(BattleContext::Cooperative), 1.4);
        assert_eq!(BattleMoveType::Support.effectiveness_multiplier(BattleContext::SoloChallenge), 1.1);
        assert_eq!(BattleMoveType::Special.effectiveness_multiplier(BattleContext::Pvp), 1.0);
    }

    #[test]
    fn test_solo_compatibility() {
        assert!(!BattleMoveType::Support.is_compatible_with(BattleType::SoloChallenge));
        assert!(BattleMoveType::Support.is_compatible_with(BattleType::CooperativeBattle));
        assert!(BattleMoveType::Attack.is_compatible_with(BattleType::SoloChallenge));
    }

    #[test]
    fn test_nature() {
        assert!(BattleMoveType::Defense.is_defensive());
        assert!(BattleMoveType::Special.is_supportive());
        assert!(BattleMoveType::Special.is_offensive());
        assert!(!BattleMoveType::Support.is_offensive());
    }
}
