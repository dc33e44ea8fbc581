pub mod config;
pub mod error;
pub mod types;

pub use config::{config, set_config, BattleConfig};
pub use error::{BattleError, ErrorKind, Result};
pub use types::{BattleId, Card, CardId, Guardian, GuardianId, MoveId};
