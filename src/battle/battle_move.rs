//! A single executed move in a battle
//!
//! Moves are immutable values. Every constructor validates, and the only
//! way to change a move is [`BattleMove::with_resolution`], which returns a
//! new, re-validated value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::battle::constants::{MAX_DESCRIPTION_LEN, MAX_MOVE_ENERGY_COST};
use crate::battle::move_type::BattleMoveType;
use crate::core::error::{BattleError, Result};
use crate::core::types::{BattleId, CardId, GuardianId, MoveId};

/// Inputs for the general [`BattleMove::new`] constructor
#[derive(Debug, Clone)]
pub struct MoveParams {
    pub battle_id: BattleId,
    pub guardian_id: GuardianId,
    pub card_id: CardId,
    pub target_guardian_id: Option<GuardianId>,
    pub move_type: BattleMoveType,
    pub energy_cost: u32,
    pub damage_dealt: u32,
    pub healing_done: u32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MoveRecord", into = "MoveRecord")]
pub struct BattleMove {
    id: Option<MoveId>,
    battle_id: BattleId,
    guardian_id: GuardianId,
    card_id: CardId,
    target_guardian_id: Option<GuardianId>,
    move_type: BattleMoveType,
    energy_cost: u32,
    damage_dealt: u32,
    healing_done: u32,
    description: String,
    executed_at: DateTime<Utc>,
}

/// Flat storage form of a move
///
/// Converting a record back into a [`BattleMove`] re-runs every check of
/// [`BattleMove::new`]. Effects or a target the move type cannot have are
/// rejected rather than dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub id: Option<MoveId>,
    pub battle_id: BattleId,
    pub guardian_id: GuardianId,
    pub card_id: CardId,
    pub target_guardian_id: Option<GuardianId>,
    pub move_type: BattleMoveType,
    pub energy_cost: u32,
    pub damage_dealt: u32,
    pub healing_done: u32,
    pub description: String,
    pub executed_at: DateTime<Utc>,
}

impl BattleMove {
    /// Validate and build a move executed now
    ///
    /// Damage and healing the move type cannot produce are forced to 0, and
    /// a defense move never carries a target.
    pub fn new(params: MoveParams) -> Result<Self> {
        let move_type = params.move_type;

        if move_type == BattleMoveType::Attack && params.target_guardian_id.is_none() {
            return Err(BattleError::validation("Target required for attack moves"));
        }

        let target_guardian_id = if move_type.can_target() {
            params.target_guardian_id
        } else {
            None
        };

        Ok(Self {
            id: None,
            battle_id: params.battle_id,
            guardian_id: params.guardian_id,
            card_id: params.card_id,
            target_guardian_id,
            move_type,
            energy_cost: validate_energy_cost(params.energy_cost)?,
            damage_dealt: if move_type.can_deal_damage() { params.damage_dealt } else { 0 },
            healing_done: if move_type.can_heal() { params.healing_done } else { 0 },
            description: validate_description(&params.description)?,
            executed_at: Utc::now(),
        })
    }

    pub fn attack(
        battle_id: BattleId,
        guardian_id: GuardianId,
        card_id: CardId,
        target_guardian_id: GuardianId,
        energy_cost: u32,
        damage_dealt: u32,
        description: &str,
    ) -> Result<Self> {
        Self::new(MoveParams {
            battle_id,
            guardian_id,
            card_id,
            target_guardian_id: Some(target_guardian_id),
            move_type: BattleMoveType::Attack,
            energy_cost,
            damage_dealt,
            healing_done: 0,
            description: description.to_string(),
        })
    }

    pub fn defense(
        battle_id: BattleId,
        guardian_id: GuardianId,
        card_id: CardId,
        energy_cost: u32,
        description: &str,
    ) -> Result<Self> {
        Self::new(MoveParams {
            battle_id,
            guardian_id,
            card_id,
            target_guardian_id: None,
            move_type: BattleMoveType::Defense,
            energy_cost,
            damage_dealt: 0,
            healing_done: 0,
            description: description.to_string(),
        })
    }

    /// Support move; no target means self-support
    pub fn support(
        battle_id: BattleId,
        guardian_id: GuardianId,
        card_id: CardId,
        target_guardian_id: Option<GuardianId>,
        energy_cost: u32,
        healing_done: u32,
        description: &str,
    ) -> Result<Self> {
        Self::new(MoveParams {
            battle_id,
            guardian_id,
            card_id,
            target_guardian_id,
            move_type: BattleMoveType::Support,
            energy_cost,
            damage_dealt: 0,
            healing_done,
            description: description.to_string(),
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn special(
        battle_id: BattleId,
        guardian_id: GuardianId,
        card_id: CardId,
        target_guardian_id: Option<GuardianId>,
        energy_cost: u32,
        damage_dealt: u32,
        healing_done: u32,
        description: &str,
    ) -> Result<Self> {
        Self::new(MoveParams {
            battle_id,
            guardian_id,
            card_id,
            target_guardian_id,
            move_type: BattleMoveType::Special,
            energy_cost,
            damage_dealt,
            healing_done,
            description: description.to_string(),
        })
    }

    /// Copy of this move with executed cost, effects and description
    ///
    /// Capability rules still apply: effects the move type cannot produce
    /// stay at 0.
    pub fn with_resolution(
        &self,
        energy_cost: u32,
        damage_dealt: u32,
        healing_done: u32,
        description: &str,
    ) -> Result<Self> {
        Ok(Self {
            energy_cost: validate_energy_cost(energy_cost)?,
            damage_dealt: if self.move_type.can_deal_damage() { damage_dealt } else { 0 },
            healing_done: if self.move_type.can_heal() { healing_done } else { 0 },
            description: validate_description(description)?,
            ..self.clone()
        })
    }

    /// Assign a persisted identity
    pub fn with_id(&self, id: MoveId) -> Self {
        Self {
            id: Some(id),
            ..self.clone()
        }
    }

    pub fn id(&self) -> Option<MoveId> {
        self.id
    }

    pub fn battle_id(&self) -> BattleId {
        self.battle_id
    }

    pub fn guardian_id(&self) -> GuardianId {
        self.guardian_id
    }

    pub fn card_id(&self) -> CardId {
        self.card_id
    }

    pub fn target_guardian_id(&self) -> Option<GuardianId> {
        self.target_guardian_id
    }

    pub fn move_type(&self) -> BattleMoveType {
        self.move_type
    }

    pub fn energy_cost(&self) -> u32 {
        self.energy_cost
    }

    pub fn damage_dealt(&self) -> u32 {
        self.damage_dealt
    }

    pub fn healing_done(&self) -> u32 {
        self.healing_done
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn executed_at(&self) -> DateTime<Utc> {
        self.executed_at
    }

    pub fn is_targeted(&self) -> bool {
        self.target_guardian_id.is_some()
    }

    pub fn is_attack(&self) -> bool {
        self.move_type == BattleMoveType::Attack
    }

    pub fn is_defense(&self) -> bool {
        self.move_type == BattleMoveType::Defense
    }

    pub fn is_support(&self) -> bool {
        self.move_type == BattleMoveType::Support
    }

    pub fn is_special(&self) -> bool {
        self.move_type == BattleMoveType::Special
    }

    pub fn caused_damage(&self) -> bool {
        self.damage_dealt > 0
    }

    pub fn provided_healing(&self) -> bool {
        self.healing_done > 0
    }

    /// Damage plus healing
    pub fn total_effect(&self) -> u32 {
        self.damage_dealt.saturating_add(self.healing_done)
    }

    /// Total effect per energy spent; 0.0 for free moves
    pub fn energy_efficiency(&self) -> f64 {
        if self.energy_cost == 0 {
            return 0.0;
        }
        self.total_effect() as f64 / self.energy_cost as f64
    }
}

impl TryFrom<MoveRecord> for BattleMove {
    type Error = BattleError;

    fn try_from(record: MoveRecord) -> Result<Self> {
        let move_type = record.move_type;

        if move_type == BattleMoveType::Attack && record.target_guardian_id.is_none() {
            return Err(BattleError::validation("Target required for attack moves"));
        }
        if !move_type.can_target() && record.target_guardian_id.is_some() {
            return Err(BattleError::validation(format!(
                "{} moves cannot have a target",
                move_type
            )));
        }
        if !move_type.can_deal_damage() && record.damage_dealt > 0 {
            return Err(BattleError::validation(format!(
                "{} moves cannot deal damage",
                move_type
            )));
        }
        if !move_type.can_heal() && record.healing_done > 0 {
            return Err(BattleError::validation(format!(
                "{} moves cannot heal",
                move_type
            )));
        }

        Ok(Self {
            id: record.id,
            battle_id: record.battle_id,
            guardian_id: record.guardian_id,
            card_id: record.card_id,
            target_guardian_id: record.target_guardian_id,
            move_type,
            energy_cost: validate_energy_cost(record.energy_cost)?,
            damage_dealt: record.damage_dealt,
            healing_done: record.healing_done,
            description: validate_description(&record.description)?,
            executed_at: record.executed_at,
        })
    }
}

impl From<BattleMove> for MoveRecord {
    fn from(battle_move: BattleMove) -> Self {
        Self {
            id: battle_move.id,
            battle_id: battle_move.battle_id,
            guardian_id: battle_move.guardian_id,
            card_id: battle_move.card_id,
            target_guardian_id: battle_move.target_guardian_id,
            move_type: battle_move.move_type,
            energy_cost: battle_move.energy_cost,
            damage_dealt: battle_move.damage_dealt,
            healing_done: battle_move.healing_done,
            description: battle_move.description,
            executed_at: battle_move.executed_at,
        }
    }
}

fn validate_energy_cost(energy_cost: u32) -> Result<u32> {
    if energy_cost > MAX_MOVE_ENERGY_COST {
        return Err(BattleError::validation(format!(
            "Energy cost must be between 0 and {}, got {}",
            MAX_MOVE_ENERGY_COST, energy_cost
        )));
    }
    Ok(energy_cost)
}

fn validate_description(description: &str) -> Result<String> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(BattleError::validation("Move description cannot be empty"));
    }
    if trimmed.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(BattleError::validation(format!(
            "Move description cannot exceed {} characters",
            MAX_DESCRIPTION_LEN
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;

    fn ids() -> (BattleId, GuardianId, CardId, GuardianId) {
        (BattleId::new(), GuardianId::new(), CardId::new(), GuardianId::new())
    }

    #[test]
    fn test_attack_requires_target() {
        let (battle, guardian, card, _) = ids();
        let err = BattleMove::new(MoveParams {
            battle_id: battle,
            guardian_id: guardian,
            card_id: card,
            target_guardian_id: None,
            move_type: BattleMoveType::Attack,
            energy_cost: 15,
            damage_dealt: 10,
            healing_done: 0,
            description: "Strike".into(),
        })
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_attack_never_heals() {
        let (battle, guardian, card, target) = ids();
        let mv = BattleMove::new(MoveParams {
            battle_id: battle,
            guardian_id: guardian,
            card_id: card,
            target_guardian_id: Some(target),
            move_type: BattleMoveType::Attack,
            energy_cost: 15,
            damage_dealt: 20,
            healing_done: 9,
            description: "Strike".into(),
        })
        .unwrap();
        assert_eq!(mv.damage_dealt(), 20);
        assert_eq!(mv.healing_done(), 0);
        assert!(mv.caused_damage());
        assert!(!mv.provided_healing());
    }

    #[test]
    fn test_defense_drops_target_and_effects() {
        let (battle, guardian, card, target) = ids();
        let mv = BattleMove::new(MoveParams {
            battle_id: battle,
            guardian_id: guardian,
            card_id: card,
            target_guardian_id: Some(target),
            move_type: BattleMoveType::Defense,
            energy_cost: 8,
            damage_dealt: 5,
            healing_done: 5,
            description: "Shield wall".into(),
        })
        .unwrap();
        assert!(!mv.is_targeted());
        assert_eq!(mv.total_effect(), 0);
        assert!(mv.is_defense());
    }

    #[test]
    fn test_support_optional_target() {
        let (battle, guardian, card, target) = ids();
        let self_heal = BattleMove::support(battle, guardian, card, None, 12, 10, "Mend").unwrap();
        assert!(!self_heal.is_targeted());
        let ally = BattleMove::support(battle, guardian, card, Some(target), 12, 10, "Mend").unwrap();
        assert_eq!(ally.target_guardian_id(), Some(target));
        assert_eq!(ally.damage_dealt(), 0);
    }

    #[test]
    fn test_special_keeps_both_effects() {
        let (battle, guardian, card, target) = ids();
        let mv = BattleMove::special(battle, guardian, card, Some(target), 25, 12, 8, "Storm").unwrap();
        assert_eq!(mv.total_effect(), 20);
        assert!((mv.energy_efficiency() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_energy_cost_bounds() {
        let (battle, guardian, card, target) = ids();
        assert!(BattleMove::attack(battle, guardian, card, target, 0, 1, "Jab").is_ok());
        assert!(BattleMove::attack(battle, guardian, card, target, 50, 1, "Jab").is_ok());
        let err = BattleMove::attack(battle, guardian, card, target, 51, 1, "Jab").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_zero_cost_efficiency() {
        let (battle, guardian, card, target) = ids();
        let mv = BattleMove::attack(battle, guardian, card, target, 0, 30, "Free hit").unwrap();
        assert_eq!(mv.energy_efficiency(), 0.0);
    }

    #[test]
    fn test_description_rules() {
        let (battle, guardian, card, _) = ids();
        let trimmed = BattleMove::defense(battle, guardian, card, 8, "  Brace  ").unwrap();
        assert_eq!(trimmed.description(), "Brace");

        assert!(BattleMove::defense(battle, guardian, card, 8, "   ").is_err());

        let max = "x".repeat(200);
        assert!(BattleMove::defense(battle, guardian, card, 8, &max).is_ok());
        let padded = format!("  {}  ", max);
        assert!(BattleMove::defense(battle, guardian, card, 8, &padded).is_ok());
        let too_long = "x".repeat(201);
        assert!(BattleMove::defense(battle, guardian, card, 8, &too_long).is_err());
    }

    #[test]
    fn test_with_resolution_is_pure() {
        let (battle, guardian, card, target) = ids();
        let submitted = BattleMove::attack(battle, guardian, card, target, 15, 0, "Strike").unwrap();
        let executed = submitted
            .with_resolution(20, 14, 6, "Ana plays Ember targeting Leo")
            .unwrap();
        assert_eq!(submitted.energy_cost(), 15);
        assert_eq!(executed.energy_cost(), 20);
        assert_eq!(executed.damage_dealt(), 14);
        assert_eq!(executed.healing_done(), 0);
        assert_eq!(executed.target_guardian_id(), Some(target));
        assert!(submitted.with_resolution(60, 0, 0, "x").is_err());
    }

    #[test]
    fn test_total_effect_saturates() {
        let (battle, guardian, card, target) = ids();
        let mv = BattleMove::special(battle, guardian, card, Some(target), 25, u32::MAX, 100, "Storm")
            .unwrap();
        assert_eq!(mv.total_effect(), u32::MAX);
        assert!(mv.energy_efficiency().is_finite());
    }

    #[test]
    fn test_stored_move_is_revalidated() {
        let (battle, guardian, card, target) = ids();
        let mv = BattleMove::attack(battle, guardian, card, target, 15, 9, "Strike").unwrap();
        let json = serde_json::to_string(&mv).unwrap();
        assert_eq!(serde_json::from_str::<BattleMove>(&json).unwrap(), mv);

        let record = MoveRecord::from(mv.clone());
        let cases = [
            MoveRecord { energy_cost: 999, ..record.clone() },
            MoveRecord { description: "  ".into(), ..record.clone() },
            MoveRecord { target_guardian_id: None, ..record.clone() },
            MoveRecord { healing_done: 4, ..record.clone() },
            MoveRecord {
                move_type: BattleMoveType::Defense,
                damage_dealt: 0,
                ..record.clone()
            },
        ];
        for bad in cases {
            let err = BattleMove::try_from(bad.clone()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation, "{:?}", bad);
            let json = serde_json::to_string(&bad).unwrap();
            assert!(serde_json::from_str::<BattleMove>(&json).is_err());
        }
    }
}
