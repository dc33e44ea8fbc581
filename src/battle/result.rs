//! Post-battle summary and the XP reward ledger
//!
//! A `BattleResult` is built once, when a completed battle is resolved. All
//! statistics are computed from the stored fields on demand.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::battle::constants::FAST_BATTLE_MINUTES;
use crate::core::config::{config, BattleConfig};
use crate::core::error::{BattleError, Result};
use crate::core::types::{BattleId, GuardianId};

/// XP granted to one participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct XpReward {
    pub guardian_id: GuardianId,
    pub amount: u32,
}

impl XpReward {
    pub fn new(guardian_id: GuardianId, amount: u32) -> Self {
        Self { guardian_id, amount }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ResultRecord", into = "ResultRecord")]
pub struct BattleResult {
    battle_id: BattleId,
    winner_id: Option<GuardianId>,
    total_moves: u32,
    total_energy_spent: u32,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    xp_rewards: Vec<XpReward>,
}

/// Storage form of a [`BattleResult`], validated on the way back in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub battle_id: BattleId,
    pub winner_id: Option<GuardianId>,
    pub total_moves: u32,
    pub total_energy_spent: u32,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub xp_rewards: Vec<XpReward>,
}

impl TryFrom<ResultRecord> for BattleResult {
    type Error = BattleError;

    fn try_from(record: ResultRecord) -> Result<Self> {
        Self::new(
            record.battle_id,
            record.winner_id,
            record.total_moves,
            record.total_energy_spent,
            record.started_at,
            record.completed_at,
            record.xp_rewards,
        )
    }
}

impl From<BattleResult> for ResultRecord {
    fn from(result: BattleResult) -> Self {
        Self {
            battle_id: result.battle_id,
            winner_id: result.winner_id,
            total_moves: result.total_moves,
            total_energy_spent: result.total_energy_spent,
            started_at: result.started_at,
            completed_at: result.completed_at,
            xp_rewards: result.xp_rewards,
        }
    }
}

impl BattleResult {
    pub fn new(
        battle_id: BattleId,
        winner_id: Option<GuardianId>,
        total_moves: u32,
        total_energy_spent: u32,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        xp_rewards: Vec<XpReward>,
    ) -> Result<Self> {
        if completed_at < started_at {
            return Err(BattleError::validation(
                "Completion time cannot be before start time",
            ));
        }
        if xp_rewards.is_empty() {
            return Err(BattleError::validation(
                "A battle result needs at least one XP reward",
            ));
        }
        for (i, reward) in xp_rewards.iter().enumerate() {
            if xp_rewards[..i].iter().any(|r| r.guardian_id == reward.guardian_id) {
                return Err(BattleError::validation(format!(
                    "Duplicate XP reward for guardian {}",
                    reward.guardian_id
                )));
            }
        }
        if let Some(winner) = winner_id {
            if !xp_rewards.iter().any(|r| r.guardian_id == winner) {
                return Err(BattleError::participation(format!(
                    "Winner {} has no XP reward",
                    winner
                )));
            }
        }

        Ok(Self {
            battle_id,
            winner_id,
            total_moves,
            total_energy_spent,
            started_at,
            completed_at,
            xp_rewards,
        })
    }

    pub fn battle_id(&self) -> BattleId {
        self.battle_id
    }

    pub fn winner_id(&self) -> Option<GuardianId> {
        self.winner_id
    }

    pub fn total_moves(&self) -> u32 {
        self.total_moves
    }

    pub fn total_energy_spent(&self) -> u32 {
        self.total_energy_spent
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    pub fn xp_rewards(&self) -> &[XpReward] {
        &self.xp_rewards
    }

    pub fn has_winner(&self) -> bool {
        self.winner_id.is_some()
    }

    pub fn is_winner(&self, guardian_id: GuardianId) -> bool {
        self.winner_id == Some(guardian_id)
    }

    pub fn participant_count(&self) -> usize {
        self.xp_rewards.len()
    }

    // === DURATION ===

    pub fn duration_seconds(&self) -> i64 {
        (self.completed_at - self.started_at).num_seconds()
    }

    /// Whole minutes, truncated
    pub fn duration_minutes(&self) -> i64 {
        self.duration_seconds() / 60
    }

    /// Shorter than the configured quick-battle limit
    pub fn was_quick_battle(&self) -> bool {
        self.was_quick_battle_with(config())
    }

    pub fn was_quick_battle_with(&self, config: &BattleConfig) -> bool {
        self.duration_minutes() < config.quick_battle_minutes
    }

    pub fn was_quick(&self) -> bool {
        self.duration_minutes() < FAST_BATTLE_MINUTES
    }

    // === ENERGY ===

    pub fn average_energy_per_move(&self) -> f64 {
        if self.total_moves == 0 {
            return 0.0;
        }
        self.total_energy_spent as f64 / self.total_moves as f64
    }

    /// Fewer moves than the energy spent would have allowed
    pub fn was_efficient(&self) -> bool {
        self.was_efficient_with(config())
    }

    pub fn was_efficient_with(&self, config: &BattleConfig) -> bool {
        if self.total_energy_spent == 0 {
            return false;
        }
        self.total_moves < self.total_energy_spent / config.efficient_moves_divisor
    }

    /// XP awarded per point of energy spent
    pub fn efficiency_score(&self) -> f64 {
        if self.total_energy_spent == 0 {
            return 0.0;
        }
        self.total_xp_awarded() as f64 / self.total_energy_spent as f64
    }

    pub fn was_energy_efficient(&self) -> bool {
        self.was_energy_efficient_with(config())
    }

    pub fn was_energy_efficient_with(&self, config: &BattleConfig) -> bool {
        self.efficiency_score() > config.energy_efficient_xp_ratio
    }

    // === XP ===

    pub fn total_xp_awarded(&self) -> u64 {
        self.xp_rewards.iter().map(|r| r.amount as u64).sum()
    }

    pub fn reward_for(&self, guardian_id: GuardianId) -> Option<&XpReward> {
        self.xp_rewards.iter().find(|r| r.guardian_id == guardian_id)
    }

    /// 0 for Guardians who were not in the battle
    pub fn xp_for(&self, guardian_id: GuardianId) -> u32 {
        self.reward_for(guardian_id).map_or(0, |r| r.amount)
    }

    pub fn winner_reward(&self) -> Option<&XpReward> {
        self.winner_id.and_then(|winner| self.reward_for(winner))
    }

    pub fn highest_xp_reward(&self) -> u32 {
        self.xp_rewards.iter().map(|r| r.amount).max().unwrap_or(0)
    }

    pub fn lowest_xp_reward(&self) -> u32 {
        self.xp_rewards.iter().map(|r| r.amount).min().unwrap_or(0)
    }

    pub fn average_xp_reward(&self) -> f64 {
        if self.xp_rewards.is_empty() {
            return 0.0;
        }
        self.total_xp_awarded() as f64 / self.xp_rewards.len() as f64
    }
}
