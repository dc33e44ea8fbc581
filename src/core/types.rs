//! Core type definitions used throughout the codebase

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::battle::constants::{MAX_CARD_NAME_LEN, MAX_CARD_POWER, MAX_MOVE_ENERGY_COST};
use crate::core::error::{BattleError, Result};

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a Guardian (player account)
    GuardianId
);
uuid_id!(
    /// Unique identifier for a catalog card
    CardId
);
uuid_id!(
    /// Persisted identity of a battle
    BattleId
);
uuid_id!(
    /// Persisted identity of a single executed move
    MoveId
);

/// Battle-facing view of a Guardian
///
/// The full Guardian profile lives elsewhere; battles only need the name
/// for move descriptions and the level ordinal (0 = Initiate) for ratings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guardian {
    pub id: GuardianId,
    pub name: String,
    pub level: u8,
}

impl Guardian {
    pub fn new(id: GuardianId, name: impl Into<String>, level: u8) -> Self {
        Self {
            id,
            name: name.into(),
            level,
        }
    }

    /// Attack rating used when a Guardian is the target of a card
    pub fn attack_rating(&self) -> u32 {
        (self.level as u32 + 1) * 10
    }

    /// Defense rating used when a Guardian is the target of a card
    pub fn defense_rating(&self) -> u32 {
        (self.level as u32 + 1) * 8
    }
}

/// Battle-facing view of a catalog card
///
/// Stats are checked on construction and on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CardRecord")]
pub struct Card {
    id: CardId,
    name: String,
    energy_cost: u32,
    attack_power: u32,
    defense_power: u32,
}

#[derive(Deserialize)]
struct CardRecord {
    id: CardId,
    name: String,
    energy_cost: u32,
    attack_power: u32,
    defense_power: u32,
}

impl Card {
    pub fn new(
        id: CardId,
        name: impl Into<String>,
        energy_cost: u32,
        attack_power: u32,
        defense_power: u32,
    ) -> Result<Self> {
        let name: String = name.into();
        let name = name.trim();
        if name.is_empty() || name.chars().count() > MAX_CARD_NAME_LEN {
            return Err(BattleError::validation(format!(
                "Card name must be 1 to {} characters",
                MAX_CARD_NAME_LEN
            )));
        }
        if energy_cost > MAX_MOVE_ENERGY_COST {
            return Err(BattleError::validation(format!(
                "Card energy cost must be between 0 and {}, got {}",
                MAX_MOVE_ENERGY_COST, energy_cost
            )));
        }
        for (stat, value) in [("Attack", attack_power), ("Defense", defense_power)] {
            if value > MAX_CARD_POWER {
                return Err(BattleError::validation(format!(
                    "{} power must be between 0 and {}, got {}",
                    stat, MAX_CARD_POWER, value
                )));
            }
        }

        Ok(Self {
            id,
            name: name.to_string(),
            energy_cost,
            attack_power,
            defense_power,
        })
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn energy_cost(&self) -> u32 {
        self.energy_cost
    }

    pub fn attack_power(&self) -> u32 {
        self.attack_power
    }

    pub fn defense_power(&self) -> u32 {
        self.defense_power
    }

    pub fn can_be_played_with(&self, available_energy: u32) -> bool {
        available_energy >= self.energy_cost
    }

    /// Damage against a defense rating, never below 1
    pub fn damage_against(&self, defense: u32) -> u32 {
        self.attack_power.saturating_sub(defense).max(1)
    }
}

impl TryFrom<CardRecord> for Card {
    type Error = BattleError;

    fn try_from(record: CardRecord) -> Result<Self> {
        Card::new(
            record.id,
            record.name,
            record.energy_cost,
            record.attack_power,
            record.defense_power,
        )
    }
}
