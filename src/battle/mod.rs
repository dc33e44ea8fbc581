//! Battle system - card battles between Guardians fuelled by walking energy
//!
//! A battle moves through a fixed lifecycle: it is created pending, started,
//! fed moves by the engine, and ends completed or abandoned. Completed
//! battles are resolved into XP rewards.
//!
//! Everything here is an immutable value except the energy ledger, which is
//! the one collaborator the engine reads from.

pub mod battle_move;
pub mod battle_type;
pub mod constants;
pub mod engine;
pub mod ledger;
pub mod move_type;
pub mod performance;
pub mod result;
pub mod state;
pub mod status;

// Re-exports for convenient access
pub use battle_move::{BattleMove, MoveParams, MoveRecord};
pub use battle_type::{BattleType, BattleTypeProperties};
pub use constants::*;
pub use engine::BattleEngine;
pub use ledger::{EnergyLedger, InMemoryEnergyLedger};
pub use move_type::{BattleContext, BattleMoveType, MoveCapabilities};
pub use performance::performance_multiplier;
pub use result::{BattleResult, ResultRecord, XpReward};
pub use state::{Battle, BattleRecord};
pub use status::BattleStatus;
