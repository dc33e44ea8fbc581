use thiserror::Error;

use crate::core::types::GuardianId;

/// Caller-visible category of a [`BattleError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input (ranges, blank text, same challenger and defender)
    Validation,
    /// Illegal lifecycle transition
    State,
    /// Actor, target or winner is not part of the battle
    Participation,
    /// Not enough energy to cover a move
    Resource,
    /// Configuration or IO failure outside the battle rules
    Infrastructure,
}

#[derive(Error, Debug)]
pub enum BattleError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid battle state: {0}")]
    InvalidState(String),

    #[error("Participation error: {0}")]
    NotParticipant(String),

    #[error("Insufficient energy for guardian {guardian}: requires {required}, available {available}")]
    InsufficientEnergy {
        guardian: GuardianId,
        required: u32,
        available: u32,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl BattleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BattleError::Validation(_) => ErrorKind::Validation,
            BattleError::InvalidState(_) => ErrorKind::State,
            BattleError::NotParticipant(_) => ErrorKind::Participation,
            BattleError::InsufficientEnergy { .. } => ErrorKind::Resource,
            BattleError::Config(_)
            | BattleError::IoError(_)
            | BattleError::TomlError(_)
            | BattleError::SerdeError(_) => ErrorKind::Infrastructure,
        }
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        BattleError::Validation(msg.into())
    }

    pub(crate) fn state(msg: impl Into<String>) -> Self {
        BattleError::InvalidState(msg.into())
    }

    pub(crate) fn participation(msg: impl Into<String>) -> Self {
        BattleError::NotParticipant(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, BattleError>;
