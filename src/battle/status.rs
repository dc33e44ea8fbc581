//! Battle lifecycle status and its legal transition table

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BattleStatus {
    /// Created, waiting to begin
    #[default]
    Pending,
    /// Ongoing; moves may be played
    InProgress,
    /// Ended with a result
    Completed,
    /// Ended without a result
    Abandoned,
}

impl BattleStatus {
    pub const ALL: [BattleStatus; 4] = [
        BattleStatus::Pending,
        BattleStatus::InProgress,
        BattleStatus::Completed,
        BattleStatus::Abandoned,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            BattleStatus::Pending => "Pending",
            BattleStatus::InProgress => "In Progress",
            BattleStatus::Completed => "Completed",
            BattleStatus::Abandoned => "Abandoned",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BattleStatus::Pending => "Battle is waiting to begin",
            BattleStatus::InProgress => "Battle is ongoing",
            BattleStatus::Completed => "Battle has ended",
            BattleStatus::Abandoned => "Battle was abandoned",
        }
    }

    pub fn can_start(&self) -> bool {
        matches!(self, BattleStatus::Pending)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, BattleStatus::InProgress)
    }

    /// Terminal: completed or abandoned
    pub fn is_finished(&self) -> bool {
        matches!(self, BattleStatus::Completed | BattleStatus::Abandoned)
    }

    pub fn allows_moves(&self) -> bool {
        matches!(self, BattleStatus::InProgress)
    }

    /// Statuses reachable in one step from this one
    pub fn valid_transitions(&self) -> &'static [BattleStatus] {
        match self {
            BattleStatus::Pending => &[BattleStatus::InProgress, BattleStatus::Abandoned],
            BattleStatus::InProgress => &[BattleStatus::Completed, BattleStatus::Abandoned],
            BattleStatus::Completed | BattleStatus::Abandoned => &[],
        }
    }

    pub fn can_transition_to(&self, next: BattleStatus) -> bool {
        self.valid_transitions().contains(&next)
    }
}

impl fmt::Display for BattleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        use BattleStatus::*;
        let legal = [
            (Pending, InProgress),
            (Pending, Abandoned),
            (InProgress, Completed),
            (InProgress, Abandoned),
        ];
        for from in BattleStatus::ALL {
            for to in BattleStatus::ALL {
                assert_eq!(
                    from.can_transition_to(to),
                    legal.contains(&(from, to)),
                    "{:?} -> {:?}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        assert!(BattleStatus::Completed.valid_transitions().is_empty());
        assert!(BattleStatus::Abandoned.valid_transitions().is_empty());
        assert!(BattleStatus::Completed.is_finished());
        assert!(!BattleStatus::InProgress.is_finished());
    }

    #[test]
    fn test_flags() {
        assert!(BattleStatus::Pending.can_start());
        assert!(!BattleStatus::InProgress.can_start());
        assert!(BattleStatus::InProgress.allows_moves());
        assert!(!BattleStatus::Pending.allows_moves());
        assert_eq!(BattleStatus::InProgress.to_string(), "In Progress");
    }
}
