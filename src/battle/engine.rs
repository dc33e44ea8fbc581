//! Battle engine - move execution, auto-completion and reward resolution
//!
//! The engine holds no battle state. Each call takes a battle snapshot and
//! returns a new one, so a single engine can be shared across threads.
//! Callers that persist the returned snapshots must serialize writes per
//! battle id; two calls against the same snapshot both succeed.

use std::sync::Arc;

use crate::battle::battle_move::BattleMove;
use crate::battle::battle_type::BattleType;
use crate::battle::constants::{HEALING_PER_LEVEL, MAX_DESCRIPTION_LEN};
use crate::battle::ledger::EnergyLedger;
use crate::battle::performance::performance_multiplier;
use crate::battle::result::{BattleResult, XpReward};
use crate::battle::state::Battle;
use crate::battle::status::BattleStatus;
use crate::core::config::BattleConfig;
use crate::core::error::{BattleError, Result};
use crate::core::types::{Card, Guardian};

pub struct BattleEngine {
    ledger: Arc<dyn EnergyLedger>,
    config: BattleConfig,
}

impl BattleEngine {
    /// Engine with the default battle rules
    pub fn new(ledger: Arc<dyn EnergyLedger>) -> Self {
        Self::with_config(ledger, BattleConfig::default())
    }

    pub fn with_config(ledger: Arc<dyn EnergyLedger>, config: BattleConfig) -> Self {
        Self { ledger, config }
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Whether the Guardian can afford the entry cost of a battle type
    pub fn can_start_battle(&self, guardian: &Guardian, battle_type: BattleType) -> bool {
        let balance = self.ledger.current_energy_balance(guardian.id);
        balance >= battle_type.minimum_energy_cost()
    }

    /// Validate a submitted move, record it and auto-complete if needed
    ///
    /// `target` must be the Guardian named by the move when the move type
    /// takes a target. Nothing is recorded when validation fails.
    pub fn execute_move(
        &self,
        battle: &Battle,
        submitted: &BattleMove,
        card: &Card,
        actor: &Guardian,
        target: Option<&Guardian>,
    ) -> Result<Battle> {
        if battle.status() != BattleStatus::InProgress {
            return Err(BattleError::state(format!(
                "Battle {} is not in progress ({})",
                battle.id(),
                battle.status()
            )));
        }

        if !battle.is_participant(actor.id) {
            tracing::warn!(battle = %battle.id(), guardian = %actor.id, "Move rejected: actor not in battle");
            return Err(BattleError::participation(format!(
                "Guardian {} is not a participant in battle {}",
                actor.id,
                battle.id()
            )));
        }
        if submitted.guardian_id() != actor.id {
            return Err(BattleError::validation(format!(
                "Move was submitted by {}, not {}",
                submitted.guardian_id(),
                actor.id
            )));
        }
        if submitted.card_id() != card.id() {
            return Err(BattleError::validation(format!(
                "Move plays card {}, not {}",
                submitted.card_id(),
                card.id()
            )));
        }

        let target = self.resolve_target(battle, submitted, target)?;

        let available = self.ledger.current_energy_balance(actor.id);
        if available < card.energy_cost() {
            tracing::warn!(
                battle = %battle.id(),
                guardian = %actor.id,
                required = card.energy_cost(),
                available,
                "Move rejected: insufficient energy"
            );
            return Err(BattleError::InsufficientEnergy {
                guardian: actor.id,
                required: card.energy_cost(),
                available,
            });
        }

        let executed = self.stamp_move(submitted, card, actor, target)?;
        tracing::debug!(
            battle = %battle.id(),
            guardian = %actor.id,
            move_type = %executed.move_type(),
            energy = executed.energy_cost(),
            damage = executed.damage_dealt(),
            healing = executed.healing_done(),
            "Move accepted"
        );

        let updated = battle.add_move(executed)?;

        if updated.total_energy_spent() > self.config.completion_energy_threshold {
            tracing::info!(
                battle = %updated.id(),
                winner = %actor.id,
                total_energy = updated.total_energy_spent(),
                "Energy threshold crossed, completing battle"
            );
            return updated.complete(Some(actor.id), updated.battle_type().base_xp_reward());
        }

        Ok(updated)
    }

    /// The target Guardian a move acts on, if it names one
    fn resolve_target<'a>(
        &self,
        battle: &Battle,
        submitted: &BattleMove,
        target: Option<&'a Guardian>,
    ) -> Result<Option<&'a Guardian>> {
        let target_id = match submitted.target_guardian_id() {
            Some(id) if submitted.move_type().can_target() => id,
            _ => return Ok(None),
        };

        let target = match target {
            Some(guardian) if guardian.id == target_id => guardian,
            _ => {
                return Err(BattleError::validation(format!(
                    "Target guardian {} was not supplied",
                    target_id
                )))
            }
        };

        // Solo challenges fight synthetic opponents outside the battle
        if !battle.is_solo() && !battle.is_participant(target_id) {
            tracing::warn!(battle = %battle.id(), target = %target_id, "Move rejected: target not in battle");
            return Err(BattleError::participation(format!(
                "Target {} is not a participant in battle {}",
                target_id,
                battle.id()
            )));
        }

        Ok(Some(target))
    }

    /// The move as it is recorded: card cost, computed effects, description
    fn stamp_move(
        &self,
        submitted: &BattleMove,
        card: &Card,
        actor: &Guardian,
        target: Option<&Guardian>,
    ) -> Result<BattleMove> {
        let move_type = submitted.move_type();

        let damage = if move_type.can_deal_damage() {
            match target {
                Some(t) => card.damage_against(t.defense_rating()),
                None => card.attack_power(),
            }
        } else {
            0
        };

        let healing = if move_type.can_heal() {
            healing_for(card, actor)
        } else {
            0
        };

        let mut description = format!("{} plays {}", actor.name, card.name());
        if let Some(t) = target.filter(|t| t.id != actor.id) {
            description.push_str(&format!(" targeting {}", t.name));
        }
        let description: String = description.chars().take(MAX_DESCRIPTION_LEN).collect();

        submitted.with_resolution(card.energy_cost(), damage, healing, &description)
    }

    /// Reward every participant of a completed battle
    pub fn resolve_battle(&self, battle: &Battle, participants: &[Guardian]) -> Result<BattleResult> {
        if battle.status() != BattleStatus::Completed {
            return Err(BattleError::state(format!(
                "Only completed battles can be resolved; battle {} is {}",
                battle.id(),
                battle.status()
            )));
        }
        if participants.is_empty() {
            return Err(BattleError::validation("No participants to reward"));
        }
        for (i, guardian) in participants.iter().enumerate() {
            if !battle.is_participant(guardian.id) {
                return Err(BattleError::participation(format!(
                    "Guardian {} did not take part in battle {}",
                    guardian.id,
                    battle.id()
                )));
            }
            if participants[..i].iter().any(|g| g.id == guardian.id) {
                return Err(BattleError::validation(format!(
                    "Guardian {} listed twice",
                    guardian.id
                )));
            }
        }
        if participants.len() != battle.participants().len() {
            return Err(BattleError::validation(format!(
                "Expected {} participants, got {}",
                battle.participants().len(),
                participants.len()
            )));
        }

        let (started_at, completed_at) = match (battle.started_at(), battle.completed_at()) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                return Err(BattleError::state(format!(
                    "Battle {} is missing its start or completion time",
                    battle.id()
                )))
            }
        };

        let energy_share = battle.total_energy_spent() / participants.len() as u32;
        let xp_rewards: Vec<XpReward> = participants
            .iter()
            .map(|guardian| {
                let is_winner = battle.winner_id() == Some(guardian.id);
                let multiplier = performance_multiplier(battle, guardian.id, &self.config);
                let amount = battle.battle_type().calculate_xp_reward_with(
                    &self.config,
                    energy_share,
                    is_winner,
                    multiplier,
                );
                XpReward::new(guardian.id, amount)
            })
            .collect();

        let result = BattleResult::new(
            battle.id(),
            battle.winner_id(),
            battle.total_moves() as u32,
            battle.total_energy_spent(),
            started_at,
            completed_at,
            xp_rewards,
        )?;

        tracing::info!(
            battle = %battle.id(),
            winner = ?result.winner_id(),
            total_xp = result.total_xp_awarded(),
            "Battle resolved"
        );
        Ok(result)
    }

    /// How many times the cheapest card could be played right now
    ///
    /// Free cards are ignored.
    pub fn max_possible_moves(&self, guardian: &Guardian, available_cards: &[Card]) -> u32 {
        let cheapest = available_cards
            .iter()
            .map(|c| c.energy_cost())
            .filter(|&cost| cost > 0)
            .min();

        match cheapest {
            Some(cost) => self.ledger.current_energy_balance(guardian.id) / cost,
            None => 0,
        }
    }
}

/// Support healing grows with the actor's level
fn healing_for(card: &Card, actor: &Guardian) -> u32 {
    let scale = 1.0 + HEALING_PER_LEVEL * actor.level as f64;
    (card.defense_power() as f64 * scale).floor() as u32
}
