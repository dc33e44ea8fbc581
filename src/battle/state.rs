//! Battle aggregate - participants, lifecycle status and move history
//!
//! `Battle` is immutable. Every lifecycle operation validates against the
//! current snapshot and returns a new `Battle`; a failed operation leaves
//! the original untouched. Persisting successive snapshots of the same
//! battle id must be serialized by the storage layer.
//!
//! Invariants (checked on every construction path, including deserialization):
//! - challenger and defender differ; defender is absent iff the type is solo
//! - moves are only recorded once the battle has started
//! - `total_energy_spent` equals the sum of recorded move costs
//! - a winner, if any, is a participant
//! - the status only moves along `BattleStatus::valid_transitions`

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::battle::battle_move::BattleMove;
use crate::battle::battle_type::BattleType;
use crate::battle::status::BattleStatus;
use crate::core::error::{BattleError, Result};
use crate::core::types::{BattleId, GuardianId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BattleRecord", into = "BattleRecord")]
pub struct Battle {
    id: BattleId,
    challenger_id: GuardianId,
    defender_id: Option<GuardianId>,
    battle_type: BattleType,
    status: BattleStatus,
    moves: Vec<BattleMove>,
    total_energy_spent: u32,
    winner_id: Option<GuardianId>,
    xp_reward: Option<u32>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

/// Flat storage form of a battle
///
/// Converting a record back into a [`Battle`] re-checks every invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleRecord {
    pub id: BattleId,
    pub challenger_id: GuardianId,
    pub defender_id: Option<GuardianId>,
    pub battle_type: BattleType,
    pub status: BattleStatus,
    pub moves: Vec<BattleMove>,
    pub total_energy_spent: u32,
    pub winner_id: Option<GuardianId>,
    pub xp_reward: Option<u32>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Battle {
    /// New pending two-Guardian battle
    pub fn challenge(
        challenger_id: GuardianId,
        defender_id: GuardianId,
        battle_type: BattleType,
    ) -> Result<Self> {
        if challenger_id == defender_id {
            return Err(BattleError::validation(
                "Challenger and defender cannot be the same Guardian",
            ));
        }
        if battle_type.is_solo() {
            return Err(BattleError::validation(format!(
                "{} does not take a defender",
                battle_type
            )));
        }

        let battle = Self::pending(challenger_id, Some(defender_id), battle_type);
        tracing::debug!(
            battle = %battle.id,
            challenger = %challenger_id,
            defender = %defender_id,
            battle_type = %battle_type,
            "Battle created"
        );
        Ok(battle)
    }

    /// New pending solo challenge
    pub fn solo(challenger_id: GuardianId) -> Self {
        let battle = Self::pending(challenger_id, None, BattleType::SoloChallenge);
        tracing::debug!(battle = %battle.id, challenger = %challenger_id, "Solo battle created");
        battle
    }

    fn pending(
        challenger_id: GuardianId,
        defender_id: Option<GuardianId>,
        battle_type: BattleType,
    ) -> Self {
        Self {
            id: BattleId::new(),
            challenger_id,
            defender_id,
            battle_type,
            status: BattleStatus::Pending,
            moves: Vec::new(),
            total_energy_spent: 0,
            winner_id: None,
            xp_reward: None,
            started_at: None,
            completed_at: None,
            created_at: Utc::now(),
        }
    }

    /// Rebuild a battle from storage, re-checking every invariant
    pub fn restore(record: BattleRecord) -> Result<Self> {
        Self::try_from(record)
    }

    // === LIFECYCLE ===

    fn ensure_transition(&self, next: BattleStatus, action: &str) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(BattleError::state(format!(
                "Cannot {} battle {} in status {}",
                action, self.id, self.status
            )));
        }
        Ok(())
    }

    /// PENDING -> IN_PROGRESS
    pub fn start(&self) -> Result<Self> {
        self.ensure_transition(BattleStatus::InProgress, "start")?;
        tracing::debug!(battle = %self.id, "Battle started");
        Ok(Self {
            status: BattleStatus::InProgress,
            started_at: Some(Utc::now()),
            ..self.clone()
        })
    }

    /// Append a move while IN_PROGRESS
    pub fn add_move(&self, battle_move: BattleMove) -> Result<Self> {
        if !self.status.allows_moves() {
            return Err(BattleError::state(format!(
                "Cannot add moves to battle {} in status {}",
                self.id, self.status
            )));
        }
        if battle_move.battle_id() != self.id {
            return Err(BattleError::validation(format!(
                "Move belongs to battle {}, not {}",
                battle_move.battle_id(),
                self.id
            )));
        }
        if !self.is_participant(battle_move.guardian_id()) {
            return Err(BattleError::participation(format!(
                "Guardian {} is not a participant in battle {}",
                battle_move.guardian_id(),
                self.id
            )));
        }

        let total_energy_spent = self
            .total_energy_spent
            .checked_add(battle_move.energy_cost())
            .ok_or_else(|| BattleError::validation("Total energy spent overflows"))?;
        let mut moves = self.moves.clone();
        moves.push(battle_move);

        Ok(Self {
            moves,
            total_energy_spent,
            ..self.clone()
        })
    }

    /// IN_PROGRESS -> COMPLETED
    pub fn complete(&self, winner_id: Option<GuardianId>, xp_reward: u32) -> Result<Self> {
        self.ensure_transition(BattleStatus::Completed, "complete")?;
        if let Some(winner) = winner_id {
            if !self.is_participant(winner) {
                return Err(BattleError::participation(format!(
                    "Winner {} is not a participant in battle {}",
                    winner, self.id
                )));
            }
        }

        tracing::debug!(battle = %self.id, winner = ?winner_id, xp_reward, "Battle completed");
        Ok(Self {
            status: BattleStatus::Completed,
            winner_id,
            xp_reward: Some(xp_reward),
            completed_at: Some(Utc::now()),
            ..self.clone()
        })
    }

    /// Any non-terminal status -> ABANDONED, with no winner and no reward
    pub fn abandon(&self) -> Result<Self> {
        self.ensure_transition(BattleStatus::Abandoned, "abandon")?;
        tracing::debug!(battle = %self.id, status = %self.status, "Battle abandoned");
        Ok(Self {
            status: BattleStatus::Abandoned,
            winner_id: None,
            xp_reward: Some(0),
            completed_at: Some(Utc::now()),
            ..self.clone()
        })
    }

    // === QUERIES ===

    pub fn can_start(&self) -> bool {
        self.status.can_start()
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Completed or abandoned
    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn is_solo(&self) -> bool {
        self.battle_type.is_solo()
    }

    pub fn is_multiplayer(&self) -> bool {
        self.battle_type.is_multiplayer()
    }

    pub fn is_participant(&self, guardian_id: GuardianId) -> bool {
        self.challenger_id == guardian_id || self.defender_id == Some(guardian_id)
    }

    /// Challenger first, then defender if any
    pub fn participants(&self) -> Vec<GuardianId> {
        std::iter::once(self.challenger_id)
            .chain(self.defender_id)
            .collect()
    }

    /// The other participant; `None` in solo battles
    pub fn opponent_of(&self, guardian_id: GuardianId) -> Result<Option<GuardianId>> {
        if !self.is_participant(guardian_id) {
            return Err(BattleError::participation(format!(
                "Guardian {} is not a participant in battle {}",
                guardian_id, self.id
            )));
        }
        if guardian_id == self.challenger_id {
            Ok(self.defender_id)
        } else {
            Ok(Some(self.challenger_id))
        }
    }

    /// Moves played by one Guardian, in play order
    pub fn moves_by_guardian(&self, guardian_id: GuardianId) -> Vec<&BattleMove> {
        self.moves
            .iter()
            .filter(|m| m.guardian_id() == guardian_id)
            .collect()
    }

    pub fn energy_spent_by(&self, guardian_id: GuardianId) -> u32 {
        self.moves_by_guardian(guardian_id)
            .iter()
            .map(|m| m.energy_cost())
            .sum()
    }

    pub fn total_moves(&self) -> usize {
        self.moves.len()
    }

    /// Time between start and end, once both happened
    pub fn duration(&self) -> Option<Duration> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    pub fn id(&self) -> BattleId {
        self.id
    }

    pub fn challenger_id(&self) -> GuardianId {
        self.challenger_id
    }

    pub fn defender_id(&self) -> Option<GuardianId> {
        self.defender_id
    }

    pub fn battle_type(&self) -> BattleType {
        self.battle_type
    }

    pub fn status(&self) -> BattleStatus {
        self.status
    }

    pub fn moves(&self) -> &[BattleMove] {
        &self.moves
    }

    pub fn total_energy_spent(&self) -> u32 {
        self.total_energy_spent
    }

    pub fn winner_id(&self) -> Option<GuardianId> {
        self.winner_id
    }

    pub fn xp_reward(&self) -> Option<u32> {
        self.xp_reward
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl TryFrom<BattleRecord> for Battle {
    type Error = BattleError;

    fn try_from(record: BattleRecord) -> Result<Self> {
        if record.defender_id == Some(record.challenger_id) {
            return Err(BattleError::validation(
                "Challenger and defender cannot be the same Guardian",
            ));
        }
        if record.battle_type.is_solo() != record.defender_id.is_none() {
            return Err(BattleError::validation(format!(
                "{} battle has an inconsistent defender",
                record.battle_type
            )));
        }
        if record.status == BattleStatus::Pending && !record.moves.is_empty() {
            return Err(BattleError::validation("Pending battle cannot have moves"));
        }
        let is_participant =
            |id: GuardianId| id == record.challenger_id || record.defender_id == Some(id);

        let mut move_total: u32 = 0;
        for battle_move in &record.moves {
            if battle_move.battle_id() != record.id {
                return Err(BattleError::validation(
                    "Battle contains moves from another battle",
                ));
            }
            if !is_participant(battle_move.guardian_id()) {
                return Err(BattleError::participation(format!(
                    "Move played by non-participant {}",
                    battle_move.guardian_id()
                )));
            }
            if let Some(target) = battle_move.target_guardian_id() {
                if !record.battle_type.is_solo() && !is_participant(target) {
                    return Err(BattleError::participation(format!(
                        "Move targets non-participant {}",
                        target
                    )));
                }
            }
            move_total = move_total
                .checked_add(battle_move.energy_cost())
                .ok_or_else(|| BattleError::validation("Total energy spent overflows"))?;
        }
        if move_total != record.total_energy_spent {
            return Err(BattleError::validation(format!(
                "Total energy spent {} does not match recorded moves ({})",
                record.total_energy_spent, move_total
            )));
        }

        if let Some(winner) = record.winner_id {
            if !is_participant(winner) {
                return Err(BattleError::participation(
                    "Winner must be a battle participant",
                ));
            }
        }

        // Fields each status must (not) carry
        let fields_ok = match record.status {
            BattleStatus::Pending => {
                record.started_at.is_none()
                    && record.completed_at.is_none()
                    && record.winner_id.is_none()
                    && record.xp_reward.is_none()
            }
            BattleStatus::InProgress => {
                record.started_at.is_some()
                    && record.completed_at.is_none()
                    && record.winner_id.is_none()
                    && record.xp_reward.is_none()
            }
            BattleStatus::Completed => {
                record.started_at.is_some()
                    && record.completed_at.is_some()
                    && record.xp_reward.is_some()
            }
            BattleStatus::Abandoned => {
                record.completed_at.is_some()
                    && record.winner_id.is_none()
                    && record.xp_reward == Some(0)
            }
        };
        if !fields_ok {
            return Err(BattleError::validation(format!(
                "{} battle has inconsistent timestamps, winner or reward",
                record.status
            )));
        }
        if let (Some(start), Some(end)) = (record.started_at, record.completed_at) {
            if end < start {
                return Err(BattleError::validation(
                    "Battle completed before it started",
                ));
            }
        }

        Ok(Self {
            id: record.id,
            challenger_id: record.challenger_id,
            defender_id: record.defender_id,
            battle_type: record.battle_type,
            status: record.status,
            moves: record.moves,
            total_energy_spent: record.total_energy_spent,
            winner_id: record.winner_id,
            xp_reward: record.xp_reward,
            started_at: record.started_at,
            completed_at: record.completed_at,
            created_at: record.created_at,
        })
    }
}

impl From<Battle> for BattleRecord {
    fn from(battle: Battle) -> Self {
        Self {
            id: battle.id,
            challenger_id: battle.challenger_id,
            defender_id: battle.defender_id,
            battle_type: battle.battle_type,
            status: battle.status,
            moves: battle.moves,
            total_energy_spent: battle.total_energy_spent,
            winner_id: battle.winner_id,
            xp_reward: battle.xp_reward,
            started_at: battle.started_at,
            completed_at: battle.completed_at,
            created_at: battle.created_at,
        }
    }
}
